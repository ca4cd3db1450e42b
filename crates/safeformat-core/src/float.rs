//! Floating-point directives, rendered by the platform `snprintf`.
//!
//! The directive handed to `snprintf` is rebuilt from the parsed
//! [`DirectiveSpec`], so widths and precisions supplied through `*` reach
//! the C side as literal digits and `snprintf` never reads a variadic
//! argument other than the one double.

use crate::directive::DirectiveSpec;
use crate::error::FormatError;

/// Capacity of the rebuilt directive, terminator included.
pub const FLOAT_DIRECTIVE_CAPACITY: usize = 128;

/// Capacity of the rendered result, terminator included.
pub const FLOAT_RESULT_CAPACITY: usize = 1024;

/// Conversions accepted for floating-point arguments.
pub(crate) fn is_float_conversion(conversion: u8) -> bool {
    matches!(conversion, b'e' | b'E' | b'f' | b'g' | b'G')
}

/// Bounded byte writer over a fixed array.
struct Directive {
    buf: [u8; FLOAT_DIRECTIVE_CAPACITY],
    len: usize,
}

impl Directive {
    fn new() -> Self {
        Self {
            buf: [0; FLOAT_DIRECTIVE_CAPACITY],
            len: 0,
        }
    }

    fn push(&mut self, byte: u8) -> bool {
        // Keep one slot for the terminator.
        if self.len + 1 >= FLOAT_DIRECTIVE_CAPACITY {
            return false;
        }
        self.buf[self.len] = byte;
        self.len += 1;
        true
    }

    fn push_decimal(&mut self, mut value: usize) -> bool {
        let mut digits = [0u8; 20];
        let mut pos = digits.len();
        loop {
            pos -= 1;
            digits[pos] = b'0' + (value % 10) as u8;
            value /= 10;
            if value == 0 {
                break;
            }
        }
        digits[pos..].iter().all(|&d| self.push(d))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

/// Rebuild `%[flags][width][.precision]conv` from the parsed spec.
fn build_directive(spec: &DirectiveSpec, conversion: u8) -> Option<Directive> {
    let mut d = Directive::new();
    let flags = spec.flags;
    let ok = d.push(b'%')
        && (!flags.left_justify || d.push(b'-'))
        && (!flags.show_sign || d.push(b'+'))
        && (!flags.blank || d.push(b' '))
        && (!flags.alternate || d.push(b'#'))
        && (!flags.zero_fill || d.push(b'0'))
        && (spec.width == 0 || d.push_decimal(spec.width))
        && spec
            .precision
            .is_none_or(|p| d.push(b'.') && d.push_decimal(p))
        && d.push(conversion);
    ok.then_some(d)
}

/// Render `value` for the directive whose `%` sits at `position`.
///
/// `raw_len` is the length of the directive as written in the format
/// string, from `%` through the conversion character. On success the
/// rendered bytes occupy `out[..len]`.
pub(crate) fn render(
    spec: &DirectiveSpec,
    conversion: u8,
    value: f64,
    position: usize,
    raw_len: usize,
    out: &mut [u8; FLOAT_RESULT_CAPACITY],
) -> Result<usize, FormatError> {
    let too_long = FormatError::DirectiveTooLong {
        position,
        capacity: FLOAT_DIRECTIVE_CAPACITY,
    };
    if raw_len >= FLOAT_DIRECTIVE_CAPACITY {
        return Err(too_long);
    }
    let directive = build_directive(spec, conversion).ok_or(too_long)?;
    let stored = snprintf_double(directive.as_bytes(), value, out);
    let needed =
        usize::try_from(stored).map_err(|_| FormatError::FloatRenderFailed { position })?;
    if needed >= FLOAT_RESULT_CAPACITY {
        return Err(FormatError::FloatTooLong {
            needed,
            capacity: FLOAT_RESULT_CAPACITY - 1,
        });
    }
    Ok(needed)
}

/// `snprintf(out, sizeof out, directive, value)`.
///
/// `directive` must hold exactly one conversion consuming a double and no
/// `*`; [`build_directive`] only produces such strings.
fn snprintf_double(directive: &[u8], value: f64, out: &mut [u8; FLOAT_RESULT_CAPACITY]) -> i32 {
    let mut cfmt = [0u8; FLOAT_DIRECTIVE_CAPACITY];
    cfmt[..directive.len()].copy_from_slice(directive);
    // SAFETY: `cfmt` is NUL-terminated (the builder leaves at least one
    // trailing zero) and names a single floating conversion matched by the
    // one `c_double` passed. `out` is writable for `out.len()` bytes and
    // snprintf never writes past the size it is given.
    unsafe {
        libc::snprintf(
            out.as_mut_ptr().cast::<libc::c_char>(),
            out.len(),
            cfmt.as_ptr().cast::<libc::c_char>(),
            value,
        )
    }
}
