//! Output sinks a formatter writes to.

use std::io;

use crate::chars::FormatChar;
use crate::error::SinkError;

/// Destination for formatted output.
///
/// A write either takes the whole slice or fails. Unbounded sinks only fail
/// on lower-level I/O faults; bounded sinks fail with
/// [`SinkError::CapacityExceeded`].
///
/// On success a sink returns how many elements it now holds because of the
/// write. That is `data.len()` unless the sink re-encodes what it is given;
/// the formatter's character count follows this number.
pub trait Sink<C: FormatChar = u8> {
    fn write(&mut self, data: &[C]) -> Result<usize, SinkError>;
}

impl<C: FormatChar, S: Sink<C> + ?Sized> Sink<C> for &mut S {
    fn write(&mut self, data: &[C]) -> Result<usize, SinkError> {
        (**self).write(data)
    }
}

impl<C: FormatChar> Sink<C> for Vec<C> {
    fn write(&mut self, data: &[C]) -> Result<usize, SinkError> {
        self.extend_from_slice(data);
        Ok(data.len())
    }
}

/// Growable string sink. Writes that are not valid UTF-8 on their own
/// (for example a `%c` of a lone non-ASCII byte) are appended lossily, and
/// the reported length is the number of bytes actually appended.
impl Sink<u8> for String {
    fn write(&mut self, data: &[u8]) -> Result<usize, SinkError> {
        let before = self.len();
        self.push_str(&String::from_utf8_lossy(data));
        Ok(self.len() - before)
    }
}

/// Unbuffered stream sink: every write goes straight to the writer.
#[derive(Debug)]
pub struct StreamSink<W> {
    inner: W,
}

impl<W: io::Write> StreamSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> Sink<u8> for StreamSink<W> {
    fn write(&mut self, data: &[u8]) -> Result<usize, SinkError> {
        self.inner.write_all(data)?;
        Ok(data.len())
    }
}

/// Fixed-capacity sink over a caller-provided slice.
///
/// Invariant: `len <= buf.len()`. Capacity is counted in elements.
#[derive(Debug)]
pub struct BufSink<'a, C> {
    buf: &'a mut [C],
    len: usize,
}

impl<'a, C: FormatChar> BufSink<'a, C> {
    pub fn new(buf: &'a mut [C]) -> Self {
        Self { buf, len: 0 }
    }

    /// Elements written so far.
    #[must_use]
    pub fn written(&self) -> usize {
        self.len
    }

    /// Elements that still fit.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.len
    }

    /// The written prefix of the buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[C] {
        &self.buf[..self.len]
    }
}

impl<C: FormatChar> Sink<C> for BufSink<'_, C> {
    /// Writes nothing at all when the data does not fit.
    fn write(&mut self, data: &[C]) -> Result<usize, SinkError> {
        let remaining = self.remaining();
        if data.len() > remaining {
            return Err(SinkError::CapacityExceeded {
                requested: data.len(),
                remaining,
            });
        }
        let end = self.len + data.len();
        self.buf[self.len..end].copy_from_slice(data);
        self.len = end;
        Ok(data.len())
    }
}
