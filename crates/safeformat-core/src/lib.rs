//! # safeformat-core
//!
//! Type-safe printf. A format string drives a sequence of typed arguments,
//! fed one at a time, and the result is written to a sink: an unbuffered
//! stream, a growable string or vector, or a fixed-capacity buffer that
//! refuses to overrun.
//!
//! The conversion grammar is C's (`%[flags][width][.precision][h|l]conv`
//! with `c d i u o x X p s n e E f g G`), and integer output reproduces
//! C's sign, base-prefix, precision and zero-fill rules. Floating-point
//! digits come from the platform `snprintf`.
//!
//! Every argument is checked against the directive it lands on. A mismatch
//! does not panic; it latches an error, after which the formatter ignores
//! further input and reports `-1`.
//!
//! No `unsafe` code is permitted outside the float module's `snprintf` call.

#![deny(unsafe_code)]

pub mod arg;
pub mod chars;
pub mod config;
pub mod directive;
pub mod entry;
pub mod error;
#[allow(unsafe_code)]
pub mod float;
pub mod formatter;
pub mod render;
pub mod sink;

pub use arg::{Arg, ArgKind, CountTarget};
pub use chars::FormatChar;
pub use config::Mode;
pub use entry::{bufprintf, fprintf, printf, sprintf, xprintf};
pub use error::{FormatError, SinkError};
pub use formatter::{Formatter, Pending};
pub use sink::{BufSink, Sink, StreamSink};
