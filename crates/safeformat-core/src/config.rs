//! Formatting mode configuration.
//!
//! The mode is set via the `SAFEFORMAT_MODE` environment variable:
//! - `strict` (default): exact C semantics. A directive expands to whatever
//!   width and precision the format string or its deferred arguments ask for.
//! - `hardened`: width and precision are clamped to [`HARDENED_FIELD_LIMIT`]
//!   so no single directive can expand without bound. Every clamp is logged.

use std::sync::atomic::{AtomicU8, Ordering};

/// Largest width or precision a hardened formatter will honor.
pub const HARDENED_FIELD_LIMIT: usize = 4096;

/// Environment variable consulted by [`mode`].
pub const MODE_ENV: &str = "SAFEFORMAT_MODE";

/// Formatting mode.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// C-compatible output, no limits beyond those of the sink.
    #[default]
    Strict,
    /// Field widths and precisions are clamped.
    Hardened,
}

impl Mode {
    /// Parse from string (case-insensitive). Unknown values fall back to strict.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "hardened" | "clamp" | "bounded" => Self::Hardened,
            _ => Self::Strict,
        }
    }

    /// Upper bound applied to widths and precisions, if any.
    #[must_use]
    pub const fn field_limit(self) -> Option<usize> {
        match self {
            Self::Strict => None,
            Self::Hardened => Some(HARDENED_FIELD_LIMIT),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Hardened => "hardened",
        }
    }
}

// 0 = unresolved, 1 = strict, 2 = hardened.
static CACHED_MODE: AtomicU8 = AtomicU8::new(0);

const MODE_UNRESOLVED: u8 = 0;
const MODE_STRICT: u8 = 1;
const MODE_HARDENED: u8 = 2;

fn mode_to_u8(mode: Mode) -> u8 {
    match mode {
        Mode::Strict => MODE_STRICT,
        Mode::Hardened => MODE_HARDENED,
    }
}

fn u8_to_mode(v: u8) -> Mode {
    match v {
        MODE_HARDENED => Mode::Hardened,
        _ => Mode::Strict,
    }
}

/// Get the configured mode (reads the environment on first call, caches thereafter).
///
/// Racing first calls may each read the environment; they all store the
/// same answer.
#[must_use]
pub fn mode() -> Mode {
    let cached = CACHED_MODE.load(Ordering::Acquire);
    if cached != MODE_UNRESOLVED {
        return u8_to_mode(cached);
    }

    let mode = std::env::var(MODE_ENV)
        .map(|v| Mode::from_str_loose(&v))
        .unwrap_or_default();
    tracing::debug!(mode = mode.as_str(), "resolved formatting mode");
    CACHED_MODE.store(mode_to_u8(mode), Ordering::Release);
    mode
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_modes() {
        assert_eq!(Mode::from_str_loose("strict"), Mode::Strict);
        assert_eq!(Mode::from_str_loose("STRICT"), Mode::Strict);
        assert_eq!(Mode::from_str_loose("hardened"), Mode::Hardened);
        assert_eq!(Mode::from_str_loose("Clamp"), Mode::Hardened);
        assert_eq!(Mode::from_str_loose("bounded"), Mode::Hardened);
        assert_eq!(Mode::from_str_loose("bogus"), Mode::Strict);
    }

    #[test]
    fn default_is_strict() {
        assert_eq!(Mode::default(), Mode::Strict);
        assert_eq!(Mode::Strict.field_limit(), None);
        assert_eq!(Mode::Hardened.field_limit(), Some(HARDENED_FIELD_LIMIT));
    }

    #[test]
    fn cached_mode_is_process_sticky() {
        let previous = CACHED_MODE.swap(MODE_HARDENED, Ordering::SeqCst);
        assert_eq!(mode(), Mode::Hardened);
        assert_eq!(mode(), Mode::Hardened);

        CACHED_MODE.store(MODE_STRICT, Ordering::SeqCst);
        assert_eq!(mode(), Mode::Strict);

        CACHED_MODE.store(previous, Ordering::SeqCst);
    }
}
