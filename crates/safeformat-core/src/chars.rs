//! Character types a format string may be written in.

use std::fmt::Debug;

/// A code unit of a format string and of the output written to a sink.
///
/// Directive syntax is pure ASCII, so the formatter only needs to move
/// between the code unit and its ASCII value. The element `0` ends a format
/// string the way NUL ends a C string.
pub trait FormatChar: Copy + Eq + Default + Debug + 'static {
    /// Widen an ASCII byte.
    fn from_ascii(byte: u8) -> Self;

    /// The ASCII value of this code unit, if it is one.
    fn to_ascii(self) -> Option<u8>;

    /// Truncating conversion used by `%c`.
    fn from_code(code: u64) -> Self;

    /// Decimal digit classification used when reading widths and precisions.
    fn is_digit(self) -> bool {
        self.to_ascii().is_some_and(|b| b.is_ascii_digit())
    }

    /// Value of a decimal digit; only meaningful when [`is_digit`](Self::is_digit) holds.
    fn digit_value(self) -> usize {
        self.to_ascii().map_or(0, |b| usize::from(b.wrapping_sub(b'0')))
    }

    fn is_nul(self) -> bool {
        self == Self::default()
    }
}

impl FormatChar for u8 {
    fn from_ascii(byte: u8) -> Self {
        byte
    }

    fn to_ascii(self) -> Option<u8> {
        self.is_ascii().then_some(self)
    }

    fn from_code(code: u64) -> Self {
        code as u8
    }
}

impl FormatChar for u16 {
    fn from_ascii(byte: u8) -> Self {
        u16::from(byte)
    }

    fn to_ascii(self) -> Option<u8> {
        u8::try_from(self).ok().filter(u8::is_ascii)
    }

    fn from_code(code: u64) -> Self {
        code as u16
    }
}

impl FormatChar for u32 {
    fn from_ascii(byte: u8) -> Self {
        u32::from(byte)
    }

    fn to_ascii(self) -> Option<u8> {
        u8::try_from(self).ok().filter(u8::is_ascii)
    }

    fn from_code(code: u64) -> Self {
        code as u32
    }
}

impl FormatChar for char {
    fn from_ascii(byte: u8) -> Self {
        char::from(byte)
    }

    fn to_ascii(self) -> Option<u8> {
        self.is_ascii().then_some(self as u8)
    }

    // Values that are not scalar values render as U+FFFD.
    fn from_code(code: u64) -> Self {
        u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_round_trips_for_every_width() {
        assert_eq!(u8::from_ascii(b'%').to_ascii(), Some(b'%'));
        assert_eq!(u16::from_ascii(b'%').to_ascii(), Some(b'%'));
        assert_eq!(u32::from_ascii(b'%').to_ascii(), Some(b'%'));
        assert_eq!(char::from_ascii(b'%').to_ascii(), Some(b'%'));
    }

    #[test]
    fn non_ascii_units_are_not_syntax() {
        assert_eq!(0xC3u8.to_ascii(), None);
        assert_eq!(0x0125u16.to_ascii(), None);
        assert_eq!('é'.to_ascii(), None);
        assert!(!0x0131u16.is_digit());
    }

    #[test]
    fn digits() {
        assert!(b'7'.is_digit());
        assert_eq!(b'7'.digit_value(), 7);
        assert!(!b'a'.is_digit());
        assert!(FormatChar::is_digit('9'));
    }

    #[test]
    fn from_code_truncates() {
        assert_eq!(u8::from_code(0x141), 0x41);
        assert_eq!(u16::from_code(0x1_0041), 0x41);
        assert_eq!(char::from_code(0xD800), char::REPLACEMENT_CHARACTER);
        assert_eq!(char::from_code(0x41), 'A');
    }

    #[test]
    fn nul_terminates() {
        assert!(0u8.is_nul());
        assert!('\0'.is_nul());
        assert!(!b'0'.is_nul());
    }
}
