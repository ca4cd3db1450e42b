//! Error taxonomy for the formatter and its sinks.
//!
//! Formatting errors latch: the first one recorded by a [`Formatter`]
//! sticks for the rest of its lifetime. Sink faults are the only errors a
//! caller can also observe immediately, through [`Formatter::try_arg`].
//!
//! [`Formatter`]: crate::Formatter
//! [`Formatter::try_arg`]: crate::Formatter::try_arg

use std::io;

use thiserror::Error;

use crate::arg::ArgKind;

/// Failure reported by a [`Sink`](crate::Sink) write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// A bounded sink cannot hold the requested write. Nothing was written.
    #[error("write of {requested} characters exceeds remaining capacity of {remaining}")]
    CapacityExceeded { requested: usize, remaining: usize },
    /// The underlying stream rejected the write.
    #[error("stream write failed: {kind}")]
    Io { kind: io::ErrorKind },
}

impl From<io::Error> for SinkError {
    fn from(err: io::Error) -> Self {
        Self::Io { kind: err.kind() }
    }
}

/// Terminal error latched by a formatter.
///
/// `position` fields are byte (element) offsets of the directive's `%` in
/// the format string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("format string ends inside the directive at {position}")]
    IncompleteDirective { position: usize },
    #[error("unknown conversion character {conversion:?} in directive at {position}")]
    UnknownConversion { position: usize, conversion: char },
    #[error("conversion {conversion:?} at {position} cannot format {kind} argument")]
    ArgumentMismatch {
        position: usize,
        conversion: char,
        kind: ArgKind,
    },
    #[error("argument supplied after the last directive")]
    TooManyArguments,
    #[error("directive at {position} is still waiting for an argument")]
    MissingArgument { position: usize },
    #[error("floating-point directive at {position} does not fit {capacity} characters")]
    DirectiveTooLong { position: usize, capacity: usize },
    #[error("floating-point result of {needed} characters does not fit {capacity}")]
    FloatTooLong { needed: usize, capacity: usize },
    #[error("platform formatting of directive at {position} failed")]
    FloatRenderFailed { position: usize },
    #[error("character count exceeds i32::MAX")]
    CountOverflow,
    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl FormatError {
    /// Returns true when the error came from a bounded sink running out of room.
    #[must_use]
    pub fn is_capacity_exceeded(&self) -> bool {
        matches!(self, Self::Sink(SinkError::CapacityExceeded { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_keep_their_kind() {
        let err: SinkError = io::Error::new(io::ErrorKind::BrokenPipe, "gone").into();
        assert_eq!(
            err,
            SinkError::Io {
                kind: io::ErrorKind::BrokenPipe
            }
        );
    }

    #[test]
    fn capacity_is_distinguishable() {
        let err = FormatError::from(SinkError::CapacityExceeded {
            requested: 4,
            remaining: 1,
        });
        assert!(err.is_capacity_exceeded());
        assert!(!FormatError::TooManyArguments.is_capacity_exceeded());
        assert_eq!(
            err.to_string(),
            "write of 4 characters exceeds remaining capacity of 1"
        );
    }

    #[test]
    fn mismatch_message_names_kind() {
        let err = FormatError::ArgumentMismatch {
            position: 3,
            conversion: 'd',
            kind: ArgKind::Text,
        };
        assert_eq!(
            err.to_string(),
            "conversion 'd' at 3 cannot format a text argument"
        );
    }
}
