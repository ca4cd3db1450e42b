//! Integer-to-digits conversion into a fixed scratch buffer.

use crate::chars::FormatChar;

/// Scratch size for one rendered integer: 22 octal digits of a 64-bit
/// value, a sign, a two-character base prefix and a terminator.
pub const INT_SCRATCH: usize = 22 + 1 + 2 + 1;

/// Bases the renderer supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Radix {
    Octal,
    Decimal,
    Hex,
}

impl Radix {
    /// Radix implied by an integer conversion character.
    #[must_use]
    pub fn for_conversion(conversion: u8) -> Self {
        match conversion {
            b'o' => Self::Octal,
            b'x' | b'X' => Self::Hex,
            _ => Self::Decimal,
        }
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        match self {
            Self::Octal => 8,
            Self::Decimal => 10,
            Self::Hex => 16,
        }
    }
}

const LOWER_DIGITS: &[u8; 16] = b"0123456789abcdef";
const UPPER_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Render `value` into the END of `buf`, most significant digit first.
///
/// Returns the index of the first digit; the number occupies
/// `buf[first..]`. Zero renders as a single `0`.
pub fn render_unsigned<C: FormatChar>(
    mut value: u64,
    radix: Radix,
    uppercase: bool,
    buf: &mut [C; INT_SCRATCH],
) -> usize {
    let table = if uppercase { UPPER_DIGITS } else { LOWER_DIGITS };
    let base = radix.value();
    let mut pos = INT_SCRATCH;
    loop {
        pos -= 1;
        buf[pos] = C::from_ascii(table[(value % base) as usize]);
        value /= base;
        if value == 0 {
            return pos;
        }
    }
}

/// Render the magnitude of `value`; the sign is the caller's business.
///
/// The magnitude is taken without signed negation, so `i64::MIN` renders
/// as `9223372036854775808`.
pub fn render_signed<C: FormatChar>(
    value: i64,
    radix: Radix,
    uppercase: bool,
    buf: &mut [C; INT_SCRATCH],
) -> usize {
    render_unsigned(value.unsigned_abs(), radix, uppercase, buf)
}
