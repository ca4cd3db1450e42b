//! Tagged argument values fed to a formatter one at a time.

use std::fmt;

use crate::chars::FormatChar;

/// Destination of a `%n` directive.
#[derive(Debug)]
pub enum CountTarget<'a> {
    Int(&'a mut i32),
    Short(&'a mut i16),
    Long(&'a mut i64),
}

impl CountTarget<'_> {
    /// Address of the target, for `%p`.
    #[must_use]
    pub fn address(&self) -> usize {
        match self {
            Self::Int(p) => std::ptr::from_ref::<i32>(p) as usize,
            Self::Short(p) => std::ptr::from_ref::<i16>(p) as usize,
            Self::Long(p) => std::ptr::from_ref::<i64>(p) as usize,
        }
    }

    /// Store a character count, truncated to the target's width like C does.
    pub fn store(&mut self, count: usize) {
        match self {
            Self::Int(p) => **p = count as i32,
            Self::Short(p) => **p = count as i16,
            Self::Long(p) => **p = count as i64,
        }
    }
}

/// One formattable value.
#[derive(Debug)]
pub enum Arg<'a, C: FormatChar = u8> {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    /// Character data; a NUL element ends the text early, as with a C string.
    Text(&'a [C]),
    Pointer(usize),
    Count(CountTarget<'a>),
}

/// Coarse kind of an argument, used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgKind {
    Integer,
    Float,
    Text,
    Pointer,
    Count,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Integer => "an integer",
            Self::Float => "a floating-point",
            Self::Text => "a text",
            Self::Pointer => "a pointer",
            Self::Count => "a count-store",
        })
    }
}

impl<C: FormatChar> Arg<'_, C> {
    #[must_use]
    pub fn kind(&self) -> ArgKind {
        match self {
            Self::Signed(_) | Self::Unsigned(_) => ArgKind::Integer,
            Self::Float(_) => ArgKind::Float,
            Self::Text(_) => ArgKind::Text,
            Self::Pointer(_) => ArgKind::Pointer,
            Self::Count(_) => ArgKind::Count,
        }
    }
}

/// Where an integral magnitude came from.
///
/// Every integral argument reaches the integer path as a sign-extended
/// `u64`; the origin keeps what the bits alone cannot say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntOrigin {
    Signed,
    Unsigned,
    Pointer,
}

macro_rules! signed_args {
    ($($ty:ty),*) => {$(
        impl<C: FormatChar> From<$ty> for Arg<'_, C> {
            fn from(value: $ty) -> Self {
                Self::Signed(i64::from(value))
            }
        }
    )*};
}

macro_rules! unsigned_args {
    ($($ty:ty),*) => {$(
        impl<C: FormatChar> From<$ty> for Arg<'_, C> {
            fn from(value: $ty) -> Self {
                Self::Unsigned(u64::from(value))
            }
        }
    )*};
}

signed_args!(i8, i16, i32, i64);
unsigned_args!(bool, u8, u16, u32, u64);

impl<C: FormatChar> From<isize> for Arg<'_, C> {
    fn from(value: isize) -> Self {
        Self::Signed(value as i64)
    }
}

impl<C: FormatChar> From<usize> for Arg<'_, C> {
    fn from(value: usize) -> Self {
        Self::Unsigned(value as u64)
    }
}

impl<C: FormatChar> From<char> for Arg<'_, C> {
    fn from(value: char) -> Self {
        Self::Unsigned(u64::from(u32::from(value)))
    }
}

impl<C: FormatChar> From<f32> for Arg<'_, C> {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl<C: FormatChar> From<f64> for Arg<'_, C> {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<'a, C: FormatChar> From<&'a [C]> for Arg<'a, C> {
    fn from(value: &'a [C]) -> Self {
        Self::Text(value)
    }
}

impl<'a, C: FormatChar, const N: usize> From<&'a [C; N]> for Arg<'a, C> {
    fn from(value: &'a [C; N]) -> Self {
        Self::Text(value.as_slice())
    }
}

impl<'a> From<&'a str> for Arg<'a, u8> {
    fn from(value: &'a str) -> Self {
        Self::Text(value.as_bytes())
    }
}

impl<'a> From<&'a String> for Arg<'a, u8> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_bytes())
    }
}

impl<C: FormatChar, T> From<*const T> for Arg<'_, C> {
    fn from(value: *const T) -> Self {
        Self::Pointer(value as usize)
    }
}

impl<C: FormatChar, T> From<*mut T> for Arg<'_, C> {
    fn from(value: *mut T) -> Self {
        Self::Pointer(value as usize)
    }
}

impl<'a, C: FormatChar> From<&'a mut i32> for Arg<'a, C> {
    fn from(value: &'a mut i32) -> Self {
        Self::Count(CountTarget::Int(value))
    }
}

impl<'a, C: FormatChar> From<&'a mut i16> for Arg<'a, C> {
    fn from(value: &'a mut i16) -> Self {
        Self::Count(CountTarget::Short(value))
    }
}

impl<'a, C: FormatChar> From<&'a mut i64> for Arg<'a, C> {
    fn from(value: &'a mut i64) -> Self {
        Self::Count(CountTarget::Long(value))
    }
}

impl<'a, C: FormatChar> From<CountTarget<'a>> for Arg<'a, C> {
    fn from(value: CountTarget<'a>) -> Self {
        Self::Count(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_kinds_keep_signedness() {
        assert!(matches!(Arg::<u8>::from(-1i8), Arg::Signed(-1)));
        assert!(matches!(Arg::<u8>::from(-1isize), Arg::Signed(-1)));
        assert!(matches!(Arg::<u8>::from(255u8), Arg::Unsigned(255)));
        assert!(matches!(Arg::<u8>::from(true), Arg::Unsigned(1)));
        assert!(matches!(Arg::<u8>::from('A'), Arg::Unsigned(65)));
    }

    #[test]
    fn floats_promote_to_double() {
        match Arg::<u8>::from(1.5f32) {
            Arg::Float(v) => assert_eq!(v, 1.5),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn text_and_pointer_kinds() {
        assert_eq!(Arg::from("hi").kind(), ArgKind::Text);
        let wide: &[u16] = &[0x68, 0x69];
        assert_eq!(Arg::from(wide).kind(), ArgKind::Text);
        let x = 5u32;
        let arg: Arg<'_, u8> = Arg::from(&raw const x);
        assert_eq!(arg.kind(), ArgKind::Pointer);
    }

    #[test]
    fn count_store_truncates() {
        let mut short = 0i16;
        CountTarget::Short(&mut short).store(70_000);
        assert_eq!(short, 70_000u32 as i16);

        let mut long = 0i64;
        let mut target = CountTarget::Long(&mut long);
        target.store(12);
        assert_eq!(long, 12);
    }

    #[test]
    fn count_target_exposes_address() {
        let mut n = 0i32;
        let expected = (&raw const n) as usize;
        assert_eq!(CountTarget::Int(&mut n).address(), expected);
    }
}
