//! The formatter: a printf state machine driven by argument arrival.
//!
//! A [`Formatter`] owns a cursor into the format string. Construction
//! copies literal text up to the first directive; every argument then
//! completes (or, for `*`, partially fills) the open directive, renders it,
//! and copies literal text up to the next one.
//!
//! Invariant: while a directive is open, the cursor sits just past
//! everything already parsed for it, and `spec` holds what was parsed.
//!
//! Errors latch. Once one is recorded every later call is a no-op and
//! [`Formatter::result`] reports `-1`. Output written before the error
//! stays in the sink.

use crate::arg::{Arg, ArgKind, CountTarget, IntOrigin};
use crate::chars::FormatChar;
use crate::config::{self, Mode};
use crate::directive::{DirectiveSpec, ascii_at, char_at};
use crate::error::{FormatError, SinkError};
use crate::float::{self, FLOAT_RESULT_CAPACITY};
use crate::render::{INT_SCRATCH, Radix, render_signed, render_unsigned};
use crate::sink::Sink;

/// Padding and widening are written in chunks of this many elements.
const CHUNK: usize = 64;

/// What the open directive will do with the next argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    /// A `*` width; expects an integer.
    Width,
    /// A `.*` precision; expects an integer.
    Precision,
    /// The conversion character (non-ASCII characters show as U+FFFD).
    Conversion(char),
}

/// Incremental printf formatter bound to a sink.
#[derive(Debug)]
pub struct Formatter<'f, S, C = u8>
where
    S: Sink<C>,
    C: FormatChar,
{
    sink: S,
    format: &'f [C],
    pos: usize,
    /// Offset of the `%` that opened the current directive.
    start: usize,
    open: bool,
    spec: DirectiveSpec,
    count: usize,
    error: Option<FormatError>,
    mode: Mode,
}

impl<'f, S, C> Formatter<'f, S, C>
where
    S: Sink<C>,
    C: FormatChar,
{
    /// Bind to `sink` and emit literal text up to the first directive.
    ///
    /// The mode comes from [`config::mode`]. A sink failure while writing
    /// that first literal run is latched; check [`error`](Self::error).
    pub fn new(sink: S, format: &'f [C]) -> Self {
        Self::with_mode(sink, format, config::mode())
    }

    pub fn with_mode(sink: S, format: &'f [C], mode: Mode) -> Self {
        let mut formatter = Self {
            sink,
            format,
            pos: 0,
            start: 0,
            open: false,
            spec: DirectiveSpec::default(),
            count: 0,
            error: None,
            mode,
        };
        formatter.advance();
        formatter
    }

    /// Feed the next argument. Errors latch; see [`result`](Self::result).
    pub fn arg<'v>(&mut self, value: impl Into<Arg<'v, C>>) -> &mut Self {
        self.consume(value.into());
        self
    }

    /// Like [`arg`](Self::arg), but a sink fault raised while handling this
    /// argument is returned at once. The fault is latched as well.
    pub fn try_arg<'v>(&mut self, value: impl Into<Arg<'v, C>>) -> Result<&mut Self, SinkError> {
        let clean = self.error.is_none();
        self.consume(value.into());
        if clean {
            if let Some(FormatError::Sink(err)) = &self.error {
                return Err(err.clone());
            }
        }
        Ok(self)
    }

    /// Feed an ordered list of arguments.
    pub fn args<'v, I>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = Arg<'v, C>>,
    {
        for value in values {
            self.consume(value);
        }
        self
    }

    /// Characters written so far, or `-1` once an error has latched.
    #[must_use]
    pub fn result(&self) -> i32 {
        if self.error.is_some() {
            return -1;
        }
        // `write` latches CountOverflow before the count passes i32::MAX.
        i32::try_from(self.count).unwrap_or(-1)
    }

    /// Characters written so far, including output before a latched error.
    #[must_use]
    pub fn written(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn error(&self) -> Option<&FormatError> {
        self.error.as_ref()
    }

    /// True once the whole format string has been consumed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.open && self.error.is_none()
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// What the next argument will be used for, without consuming anything.
    ///
    /// `None` when no directive is open, an error has latched, or the
    /// format ends before a conversion character.
    #[must_use]
    pub fn pending_conversion(&self) -> Option<Pending> {
        if !self.open || self.error.is_some() {
            return None;
        }
        let fmt = self.format;
        let mut spec = self.spec;
        let mut pos = self.pos;
        spec.read_flags(fmt, &mut pos);
        if ascii_at(fmt, pos) == Some(b'*') {
            return Some(Pending::Width);
        }
        spec.read_width(fmt, &mut pos);
        if ascii_at(fmt, pos) == Some(b'.') {
            if ascii_at(fmt, pos + 1) == Some(b'*') {
                return Some(Pending::Precision);
            }
            spec.read_precision(fmt, &mut pos);
        }
        spec.read_modifiers(fmt, &mut pos);
        char_at(fmt, pos).map(|c| Pending::Conversion(display_char(c)))
    }

    /// Consume the formatter and report the outcome.
    ///
    /// A directive still waiting for its argument is an error here.
    pub fn finish(self) -> Result<usize, FormatError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.open {
            return Err(FormatError::MissingArgument {
                position: self.start,
            });
        }
        Ok(self.count)
    }

    // -----------------------------------------------------------------------
    // Dispatch by argument kind
    // -----------------------------------------------------------------------

    fn consume(&mut self, value: Arg<'_, C>) {
        if self.error.is_some() {
            return;
        }
        if !self.open {
            self.fail(FormatError::TooManyArguments);
            return;
        }
        match value {
            Arg::Signed(v) => self.integer(v as u64, IntOrigin::Signed),
            Arg::Unsigned(v) => self.integer(v, IntOrigin::Unsigned),
            Arg::Pointer(addr) => self.integer(addr as u64, IntOrigin::Pointer),
            Arg::Float(v) => self.floating(v),
            Arg::Text(text) => self.text(text),
            Arg::Count(target) => self.store_count(target),
        }
    }

    /// Integer path; also satisfies deferred `*` widths and `.*` precisions.
    fn integer(&mut self, value: u64, origin: IntOrigin) {
        let fmt = self.format;
        self.spec.read_flags(fmt, &mut self.pos);
        if ascii_at(fmt, self.pos) == Some(b'*') {
            self.set_deferred_width(value, origin);
            self.pos += 1;
            return;
        }
        self.spec.read_width(fmt, &mut self.pos);
        if ascii_at(fmt, self.pos) == Some(b'.') {
            if ascii_at(fmt, self.pos + 1) == Some(b'*') {
                self.set_deferred_precision(value, origin);
                self.pos += 2;
                return;
            }
            self.spec.read_precision(fmt, &mut self.pos);
        }
        self.spec.read_modifiers(fmt, &mut self.pos);

        let mut value = value;
        if self.spec.flags.force_short
            && matches!(ascii_at(fmt, self.pos), Some(b'x' | b'X' | b'u' | b'o'))
        {
            value = u64::from(value as u16);
        }
        self.format_integer(value, origin);
    }

    fn floating(&mut self, value: f64) {
        self.read_leaders();
        let Some(conversion) = self.conversion() else {
            return;
        };
        if !float::is_float_conversion(conversion) {
            self.reject(conversion, ArgKind::Float);
            return;
        }
        self.apply_limits();
        let raw_len = self.pos + 1 - self.start;
        let mut out = [0u8; FLOAT_RESULT_CAPACITY];
        match float::render(&self.spec, conversion, value, self.start, raw_len, &mut out) {
            Ok(len) => self.write_ascii(&out[..len]),
            Err(err) => {
                self.fail(err);
                return;
            }
        }
        self.next();
    }

    fn text(&mut self, text: &[C]) {
        self.read_leaders();
        let Some(conversion) = self.conversion() else {
            return;
        };
        match conversion {
            b'p' => self.format_integer(text.as_ptr() as usize as u64, IntOrigin::Pointer),
            b's' => {
                self.apply_limits();
                let len = text.iter().position(|c| c.is_nul()).unwrap_or(text.len());
                let len = self.spec.precision.map_or(len, |p| len.min(p));
                let pad = self.spec.width.saturating_sub(len);
                if self.spec.flags.left_justify {
                    self.write(&text[..len]);
                    self.fill(b' ', pad);
                } else {
                    self.fill(b' ', pad);
                    self.write(&text[..len]);
                }
                self.next();
            }
            other => self.reject(other, ArgKind::Text),
        }
    }

    fn store_count(&mut self, mut target: CountTarget<'_>) {
        self.read_leaders();
        let Some(conversion) = self.conversion() else {
            return;
        };
        match conversion {
            b'p' => self.format_integer(target.address() as u64, IntOrigin::Pointer),
            b'n' => {
                target.store(self.count);
                self.next();
            }
            other => self.reject(other, ArgKind::Count),
        }
    }

    // -----------------------------------------------------------------------
    // Integer rendering
    // -----------------------------------------------------------------------

    /// Render the integer directive whose conversion character is under the
    /// cursor, with the flags, width and precision parsed so far.
    fn format_integer(&mut self, value: u64, origin: IntOrigin) {
        let Some(mut conversion) = self.conversion() else {
            return;
        };
        let mut signed = matches!(conversion, b'd' | b'i');
        if conversion == b'p' {
            if origin != IntOrigin::Pointer {
                self.reject(conversion, ArgKind::Integer);
                return;
            }
            // Pointers print as signed alternate-form hex, as gcc does.
            conversion = b'x';
            self.spec.flags.alternate = true;
            signed = true;
        }
        if !matches!(conversion, b'c' | b'd' | b'i' | b'u' | b'o' | b'x' | b'X') {
            let kind = if origin == IntOrigin::Pointer {
                ArgKind::Pointer
            } else {
                ArgKind::Integer
            };
            self.reject(conversion, kind);
            return;
        }
        self.apply_limits();

        let flags = self.spec.flags;
        let mut buf = [C::default(); INT_SCRATCH];
        let radix = Radix::for_conversion(conversion);
        let mut sign = None;
        let mut first = INT_SCRATCH - 1;
        if conversion == b'c' {
            // One character; the zero-fill flag does not apply.
            self.spec.flags.zero_fill = false;
            buf[first] = C::from_code(value);
        } else {
            let uppercase = conversion == b'X';
            if signed {
                let value = value as i64;
                first = render_signed(value, radix, uppercase, &mut buf);
                sign = if value < 0 {
                    Some(b'-')
                } else if flags.show_sign {
                    Some(b'+')
                } else if flags.blank {
                    Some(b' ')
                } else {
                    None
                };
            } else {
                first = render_unsigned(value, radix, uppercase, &mut buf);
            }
            // C prints no digits for a zero value at precision zero.
            if value == 0 && self.spec.precision == Some(0) {
                first = INT_SCRATCH;
            }
        }
        let digits = &buf[first..];

        let count_digits = digits.len();
        let mut count_zeros = match self.spec.precision {
            Some(p) if conversion != b'c' => p.saturating_sub(count_digits),
            _ => 0,
        };
        let count_base = if !flags.alternate || conversion == b'c' {
            0
        } else {
            match radix {
                Radix::Decimal => 0,
                Radix::Hex if value != 0 => 2,
                Radix::Hex => 0,
                // Octal needs its leading zero unless precision zeros or
                // the digit itself already supply one.
                Radix::Octal if count_zeros > 0 => 0,
                Radix::Octal if value != 0 || count_digits == 0 => 1,
                Radix::Octal => 0,
            }
        };
        let total = count_digits + count_zeros + count_base + usize::from(sign.is_some());

        let width = self.spec.width;
        let (mut pad_left, pad_right) = match width.checked_sub(total) {
            Some(extra) if flags.left_justify => (0, extra),
            Some(extra) => (extra, 0),
            None => (0, 0),
        };
        if self.spec.flags.zero_fill && self.spec.precision.is_none() {
            // Zero fill without precision turns the left padding into zeros.
            count_zeros += pad_left;
            pad_left = 0;
        }

        tracing::trace!(
            position = self.start,
            conversion = %char::from(conversion),
            width,
            precision = ?self.spec.precision,
            "rendering integer directive"
        );
        self.fill(b' ', pad_left);
        if let Some(sign) = sign {
            self.write_ascii(&[sign]);
        }
        if count_base > 0 {
            self.write_ascii(b"0");
        }
        if count_base == 2 {
            self.write_ascii(&[conversion]);
        }
        self.fill(b'0', count_zeros);
        self.write(digits);
        self.fill(b' ', pad_right);
        self.next();
    }

    // -----------------------------------------------------------------------
    // Directive bookkeeping
    // -----------------------------------------------------------------------

    fn read_leaders(&mut self) {
        let fmt = self.format;
        self.spec.read_leaders(fmt, &mut self.pos);
    }

    /// The conversion character under the cursor. Latches an error and
    /// returns `None` if the format ends first or the character is not ASCII.
    fn conversion(&mut self) -> Option<u8> {
        match char_at(self.format, self.pos) {
            None => {
                self.fail(FormatError::IncompleteDirective {
                    position: self.start,
                });
                None
            }
            Some(c) => match c.to_ascii() {
                Some(b) => Some(b),
                None => {
                    self.fail(FormatError::UnknownConversion {
                        position: self.start,
                        conversion: display_char(c),
                    });
                    None
                }
            },
        }
    }

    /// Latch the error for a conversion this argument kind cannot satisfy.
    fn reject(&mut self, conversion: u8, kind: ArgKind) {
        let err = if is_known_conversion(conversion) {
            FormatError::ArgumentMismatch {
                position: self.start,
                conversion: char::from(conversion),
                kind,
            }
        } else {
            FormatError::UnknownConversion {
                position: self.start,
                conversion: char::from(conversion),
            }
        };
        self.fail(err);
    }

    fn set_deferred_width(&mut self, value: u64, origin: IntOrigin) {
        let signed = value as i64;
        if origin == IntOrigin::Signed && signed < 0 {
            // A negative `*` width means left-justify.
            self.spec.flags.left_justify = true;
            self.spec.width = usize::try_from(signed.unsigned_abs()).unwrap_or(usize::MAX);
        } else {
            self.spec.width = usize::try_from(value).unwrap_or(usize::MAX);
        }
    }

    fn set_deferred_precision(&mut self, value: u64, origin: IntOrigin) {
        self.spec.precision = if origin == IntOrigin::Signed && (value as i64) < 0 {
            None
        } else {
            Some(usize::try_from(value).unwrap_or(usize::MAX))
        };
    }

    /// Hardened mode clamps oversized fields before rendering.
    fn apply_limits(&mut self) {
        let Some(limit) = self.mode.field_limit() else {
            return;
        };
        if self.spec.width > limit {
            tracing::warn!(
                position = self.start,
                requested = self.spec.width,
                limit,
                "clamping field width"
            );
            self.spec.width = limit;
        }
        if let Some(precision) = self.spec.precision.filter(|&p| p > limit) {
            tracing::warn!(
                position = self.start,
                requested = precision,
                limit,
                "clamping precision"
            );
            self.spec.precision = Some(limit);
        }
    }

    /// Step past the conversion character and on to the next directive.
    fn next(&mut self) {
        self.pos += 1;
        self.advance();
    }

    /// Copy literal text up to the next directive, collapsing `%%`.
    fn advance(&mut self) {
        self.spec.reset();
        self.open = false;
        let fmt = self.format;
        let mut begin = self.pos;
        loop {
            match char_at(fmt, self.pos).map(FormatChar::to_ascii) {
                None => {
                    self.write(&fmt[begin..self.pos]);
                    return;
                }
                Some(Some(b'%')) => {
                    if ascii_at(fmt, self.pos + 1) == Some(b'%') {
                        // "%%": emit one '%' and keep scanning.
                        self.write(&fmt[begin..=self.pos]);
                        self.pos += 2;
                        begin = self.pos;
                        continue;
                    }
                    self.write(&fmt[begin..self.pos]);
                    self.start = self.pos;
                    self.pos += 1;
                    if !reaches_conversion(fmt, self.pos) {
                        self.fail(FormatError::IncompleteDirective {
                            position: self.start,
                        });
                        return;
                    }
                    self.open = true;
                    return;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    fn write(&mut self, data: &[C]) {
        if self.error.is_some() || data.is_empty() {
            return;
        }
        match self.sink.write(data) {
            Ok(taken) => {
                self.count += taken;
                if self.count > i32::MAX as usize {
                    self.fail(FormatError::CountOverflow);
                }
            }
            Err(err) => self.fail(err.into()),
        }
    }

    /// Write ASCII bytes, widened to the sink's character type.
    fn write_ascii(&mut self, bytes: &[u8]) {
        let mut chunk = [C::default(); CHUNK];
        for piece in bytes.chunks(CHUNK) {
            for (slot, &b) in chunk.iter_mut().zip(piece) {
                *slot = C::from_ascii(b);
            }
            self.write(&chunk[..piece.len()]);
        }
    }

    fn fill(&mut self, byte: u8, mut n: usize) {
        let chunk = [C::from_ascii(byte); CHUNK];
        while n > 0 && self.error.is_none() {
            let take = n.min(CHUNK);
            self.write(&chunk[..take]);
            n -= take;
        }
    }

    fn fail(&mut self, err: FormatError) {
        if self.error.is_none() {
            tracing::debug!(position = self.start, error = %err, "formatter latched an error");
            self.error = Some(err);
        }
    }
}

impl<S, C> From<&Formatter<'_, S, C>> for i32
where
    S: Sink<C>,
    C: FormatChar,
{
    fn from(formatter: &Formatter<'_, S, C>) -> Self {
        formatter.result()
    }
}

/// Conversion characters the grammar knows about, for any argument kind.
fn is_known_conversion(conversion: u8) -> bool {
    matches!(
        conversion,
        b'c' | b'd' | b'i' | b'u' | b'o' | b'x' | b'X' | b'p' | b'n' | b's' | b'*'
    ) || float::is_float_conversion(conversion)
}

/// Whether the directive whose leaders start at `pos` reaches a conversion
/// character before the format ends. `*` fields are skipped unread.
fn reaches_conversion<C: FormatChar>(fmt: &[C], mut pos: usize) -> bool {
    let mut spec = DirectiveSpec::default();
    spec.read_flags(fmt, &mut pos);
    if ascii_at(fmt, pos) == Some(b'*') {
        pos += 1;
    } else {
        spec.read_width(fmt, &mut pos);
    }
    if ascii_at(fmt, pos) == Some(b'.') {
        if ascii_at(fmt, pos + 1) == Some(b'*') {
            pos += 2;
        } else {
            spec.read_precision(fmt, &mut pos);
        }
    }
    spec.read_modifiers(fmt, &mut pos);
    char_at(fmt, pos).is_some()
}

fn display_char<C: FormatChar>(c: C) -> char {
    c.to_ascii()
        .map_or(char::REPLACEMENT_CHARACTER, char::from)
}
