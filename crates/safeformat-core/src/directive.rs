//! Per-directive state and the readers for its leaders.
//!
//! Grammar, after the opening `%`:
//!
//! ```text
//! flags   := [-+ #0]*
//! width   := digits | '*'
//! prec    := '.' (digits | '*')?        bare '.' means precision 0
//! length  := 'h' | 'l'
//! conv    := one character
//! ```
//!
//! The readers are resumable: after a deferred `*` has been satisfied by an
//! argument, the next argument re-enters them at the cursor and they pick up
//! where the previous read stopped.

use crate::chars::FormatChar;

/// Flags parsed from a directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub left_justify: bool, // '-'
    pub show_sign: bool,    // '+'
    pub blank: bool,        // ' '
    pub alternate: bool,    // '#'
    pub zero_fill: bool,    // '0'
    pub force_short: bool,  // 'h'
}

/// Everything parsed so far for the directive currently open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectiveSpec {
    pub flags: Flags,
    /// Minimum field width; 0 means unset.
    pub width: usize,
    /// `None` is "unset", which is not the same as `Some(0)`.
    pub precision: Option<usize>,
}

/// The format element at `pos`, or `None` past the end or at a NUL.
pub(crate) fn char_at<C: FormatChar>(fmt: &[C], pos: usize) -> Option<C> {
    fmt.get(pos).copied().filter(|c| !c.is_nul())
}

/// ASCII value of the format element at `pos`.
pub(crate) fn ascii_at<C: FormatChar>(fmt: &[C], pos: usize) -> Option<u8> {
    char_at(fmt, pos).and_then(FormatChar::to_ascii)
}

impl DirectiveSpec {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn read_flags<C: FormatChar>(&mut self, fmt: &[C], pos: &mut usize) {
        loop {
            match ascii_at(fmt, *pos) {
                Some(b'-') => self.flags.left_justify = true,
                Some(b'+') => self.flags.show_sign = true,
                Some(b' ') => self.flags.blank = true,
                Some(b'#') => self.flags.alternate = true,
                Some(b'0') => self.flags.zero_fill = true,
                _ => return,
            }
            *pos += 1;
        }
    }

    /// Leaves the width untouched when no digits are present, so a width
    /// already supplied through `*` survives re-entry.
    pub(crate) fn read_width<C: FormatChar>(&mut self, fmt: &[C], pos: &mut usize) {
        if let Some(width) = parse_decimal(fmt, pos) {
            self.width = width;
        }
    }

    /// Expects the cursor on the `.`.
    pub(crate) fn read_precision<C: FormatChar>(&mut self, fmt: &[C], pos: &mut usize) {
        debug_assert_eq!(ascii_at(fmt, *pos), Some(b'.'));
        *pos += 1;
        self.precision = Some(parse_decimal(fmt, pos).unwrap_or(0));
    }

    pub(crate) fn read_modifiers<C: FormatChar>(&mut self, fmt: &[C], pos: &mut usize) {
        match ascii_at(fmt, *pos) {
            Some(b'h') => {
                self.flags.force_short = true;
                *pos += 1;
            }
            Some(b'l') => *pos += 1,
            _ => {}
        }
    }

    /// Flags, width, precision and length modifier, leaving the cursor on
    /// the conversion character.
    pub(crate) fn read_leaders<C: FormatChar>(&mut self, fmt: &[C], pos: &mut usize) {
        self.read_flags(fmt, pos);
        self.read_width(fmt, pos);
        if ascii_at(fmt, *pos) == Some(b'.') {
            self.read_precision(fmt, pos);
        }
        self.read_modifiers(fmt, pos);
    }
}

/// Parse a run of decimal digits, saturating on overflow.
fn parse_decimal<C: FormatChar>(fmt: &[C], pos: &mut usize) -> Option<usize> {
    let start = *pos;
    let mut result = 0_usize;
    while let Some(c) = char_at(fmt, *pos).filter(|c| c.is_digit()) {
        result = result.saturating_mul(10).saturating_add(c.digit_value());
        *pos += 1;
    }
    (*pos > start).then_some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaders(fmt: &[u8]) -> (DirectiveSpec, usize) {
        let mut spec = DirectiveSpec::default();
        let mut pos = 0;
        spec.read_leaders(fmt, &mut pos);
        (spec, pos)
    }

    #[test]
    fn simple_conversion_has_no_leaders() {
        let (spec, pos) = leaders(b"d");
        assert_eq!(pos, 0);
        assert_eq!(spec, DirectiveSpec::default());
    }

    #[test]
    fn width_and_precision() {
        let (spec, pos) = leaders(b"10.5f");
        assert_eq!(pos, 4);
        assert_eq!(spec.width, 10);
        assert_eq!(spec.precision, Some(5));
    }

    #[test]
    fn bare_dot_is_precision_zero() {
        let (spec, pos) = leaders(b".d");
        assert_eq!(pos, 1);
        assert_eq!(spec.precision, Some(0));
    }

    #[test]
    fn flags_in_any_order_with_repeats() {
        let (spec, pos) = leaders(b"0-+ #-08x");
        assert_eq!(pos, 8);
        assert!(spec.flags.left_justify);
        assert!(spec.flags.show_sign);
        assert!(spec.flags.blank);
        assert!(spec.flags.alternate);
        assert!(spec.flags.zero_fill);
        assert_eq!(spec.width, 8);
    }

    #[test]
    fn short_and_long_modifiers() {
        let (spec, pos) = leaders(b"hx");
        assert!(spec.flags.force_short);
        assert_eq!(pos, 1);

        let (spec, pos) = leaders(b"lu");
        assert!(!spec.flags.force_short);
        assert_eq!(pos, 1);
    }

    #[test]
    fn star_stops_the_width_reader() {
        let (spec, pos) = leaders(b"*d");
        assert_eq!(pos, 0);
        assert_eq!(spec.width, 0);
    }

    #[test]
    fn reentry_keeps_deferred_width() {
        let mut spec = DirectiveSpec {
            width: 7,
            ..DirectiveSpec::default()
        };
        let mut pos = 0;
        spec.read_leaders(b"d".as_slice(), &mut pos);
        assert_eq!(spec.width, 7);
    }

    #[test]
    fn huge_width_saturates() {
        let (spec, _) = leaders(b"99999999999999999999999999d");
        assert_eq!(spec.width, usize::MAX);
    }

    #[test]
    fn nul_ends_the_format() {
        assert_eq!(char_at(b"a\0b".as_slice(), 1), None);
        assert_eq!(ascii_at(b"ab".as_slice(), 2), None);
        let (spec, pos) = leaders(b"5\0");
        assert_eq!(spec.width, 5);
        assert_eq!(pos, 1);
    }

    #[test]
    fn wide_format_strings_parse() {
        let fmt: Vec<u16> = "-12.3d".encode_utf16().collect();
        let mut spec = DirectiveSpec::default();
        let mut pos = 0;
        spec.read_leaders(&fmt, &mut pos);
        assert!(spec.flags.left_justify);
        assert_eq!(spec.width, 12);
        assert_eq!(spec.precision, Some(3));
        assert_eq!(pos, 5);
    }
}
