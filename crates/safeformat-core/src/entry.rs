//! Entry points binding a formatter to a particular kind of sink.
//!
//! ```
//! use safeformat_core::sprintf;
//!
//! let mut out = String::new();
//! let written = sprintf(&mut out, "%-6s|%05.1f|%#x")
//!     .arg("id")
//!     .arg(3.5)
//!     .arg(255)
//!     .result();
//! assert_eq!(out, "id    |003.5|0xff");
//! assert_eq!(written, 17);
//! ```

use std::io::{self, Stdout};

use crate::chars::FormatChar;
use crate::formatter::Formatter;
use crate::sink::{BufSink, Sink, StreamSink};

/// Format to standard output, unbuffered.
pub fn printf<F>(format: &F) -> Formatter<'_, StreamSink<Stdout>>
where
    F: AsRef<[u8]> + ?Sized,
{
    Formatter::new(StreamSink::new(io::stdout()), format.as_ref())
}

/// Format to any writer, unbuffered.
pub fn fprintf<W, F>(writer: W, format: &F) -> Formatter<'_, StreamSink<W>>
where
    W: io::Write,
    F: AsRef<[u8]> + ?Sized,
{
    Formatter::new(StreamSink::new(writer), format.as_ref())
}

/// Append to a growable string.
pub fn sprintf<'f, 's, F>(out: &'s mut String, format: &'f F) -> Formatter<'f, &'s mut String>
where
    F: AsRef<[u8]> + ?Sized,
{
    Formatter::new(out, format.as_ref())
}

/// Format to any caller-provided sink.
pub fn xprintf<'f, 's, S, C>(sink: &'s mut S, format: &'f [C]) -> Formatter<'f, &'s mut S, C>
where
    S: Sink<C> + ?Sized,
    C: FormatChar,
{
    Formatter::new(sink, format)
}

/// Format into a fixed-capacity buffer. Writing past its end is an error,
/// never an overrun; [`Formatter::try_arg`] reports it at once.
pub fn bufprintf<'f, 'b, C>(buf: &'b mut [C], format: &'f [C]) -> Formatter<'f, BufSink<'b, C>, C>
where
    C: FormatChar,
{
    Formatter::new(BufSink::new(buf), format)
}

/// Chain arguments onto a formatter expression.
///
/// ```
/// use safeformat_core::{safe_printf, sprintf};
///
/// let mut out = String::new();
/// let f = safe_printf!(sprintf(&mut out, "%s has %d items"); "cart", 3);
/// assert_eq!(f.finish(), Ok(16));
/// assert_eq!(out, "cart has 3 items");
/// ```
#[macro_export]
macro_rules! safe_printf {
    ($formatter:expr $(; $($arg:expr),* $(,)?)?) => {{
        let mut formatter = $formatter;
        $($( formatter.arg($arg); )*)?
        formatter
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FormatError, SinkError};

    #[test]
    fn sprintf_appends() {
        let mut out = String::from(">");
        let n = sprintf(&mut out, "%d-%s").arg(1).arg("a").result();
        assert_eq!(out, ">1-a");
        assert_eq!(n, 3);
    }

    #[test]
    fn fprintf_streams() {
        let mut out = Vec::new();
        let n = fprintf(&mut out, "%5.2s|").arg("xyz").result();
        assert_eq!(n, 6);
        assert_eq!(out, b"   xy|");
    }

    #[test]
    fn xprintf_accepts_any_sink() {
        let mut out: Vec<u32> = Vec::new();
        let fmt: Vec<u32> = "%c%c".chars().map(u32::from).collect();
        let n = xprintf(&mut out, &fmt).arg('o').arg('k').result();
        assert_eq!(n, 2);
        assert_eq!(out, [u32::from('o'), u32::from('k')]);
    }

    #[test]
    fn bufprintf_fits() {
        let mut buf = [0u8; 8];
        let mut f = bufprintf(&mut buf, b"%d!");
        f.arg(1234);
        assert_eq!(f.sink().as_slice(), b"1234!");
        assert_eq!(f.finish(), Ok(5));
    }

    #[test]
    fn bufprintf_overflow_surfaces_immediately() {
        let mut buf = [0u8; 4];
        let mut f = bufprintf(&mut buf, b"ab%s");
        let err = f.try_arg("cdef").err();
        assert_eq!(
            err,
            Some(SinkError::CapacityExceeded {
                requested: 4,
                remaining: 2
            })
        );
        assert_eq!(f.result(), -1);
        assert_eq!(f.sink().as_slice(), b"ab");
        assert!(f.error().is_some_and(FormatError::is_capacity_exceeded));
    }

    #[test]
    fn macro_with_and_without_arguments() {
        let mut out = String::new();
        let f = safe_printf!(sprintf(&mut out, "100%%"));
        assert_eq!(f.finish(), Ok(4));

        let mut out = String::new();
        let f = safe_printf!(sprintf(&mut out, "%s=%x"); "k", 255u8,);
        assert_eq!(f.result(), 4);
        drop(f);
        assert_eq!(out, "k=ff");
    }
}
