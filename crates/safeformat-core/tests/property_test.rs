//! Property-based tests for the formatter.
//!
//! Generated inputs check that:
//! 1. Rendered integers parse back to the value they came from
//! 2. Padded fields are exactly as wide as requested, filled on the right side
//! 3. `%%` emits one `%` and consumes no argument
//! 4. Bounded sinks fault exactly when output outgrows them
//!
//! Run: cargo test -p safeformat-core --test property_test

#![allow(clippy::unwrap_used, reason = "Tests can panic")]

use proptest::prelude::*;
use safeformat_core::config::Mode;
use safeformat_core::{Formatter, SinkError, bufprintf, sprintf};

fn one(format: &str, value: i64) -> String {
    let mut out = Vec::new();
    let mut f = Formatter::with_mode(&mut out, format.as_bytes(), Mode::Strict);
    f.arg(value);
    assert!(f.is_complete(), "{format:?}: {:?}", f.error());
    drop(f);
    String::from_utf8(out).unwrap()
}

/// A literal run: no `%`, no NUL.
fn literal_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 .,:_-]{0,12}").expect("valid regex")
}

proptest! {
    #[test]
    fn decimal_round_trips(value in any::<i64>()) {
        let rendered = one("%d", value);
        prop_assert_eq!(rendered.parse::<i64>().unwrap(), value);
        prop_assert_eq!(one("%i", value), rendered);
    }

    #[test]
    fn unsigned_radixes_round_trip(value in any::<u64>()) {
        let bits = value as i64;
        prop_assert_eq!(one("%u", bits).parse::<u64>().unwrap(), value);
        prop_assert_eq!(u64::from_str_radix(&one("%x", bits), 16).unwrap(), value);
        prop_assert_eq!(u64::from_str_radix(&one("%X", bits), 16).unwrap(), value);
        prop_assert_eq!(u64::from_str_radix(&one("%o", bits), 8).unwrap(), value);
    }

    #[test]
    fn padded_fields_have_exact_width(
        value in any::<i64>(),
        width in 0usize..48,
        flag in prop::sample::select(vec!["", "-", "0", "+", "-+", "0+"]),
    ) {
        let natural = one("%d", value).len() + usize::from(flag.contains('+') && value >= 0);
        let rendered = one(&format!("%{flag}{width}d"), value);
        prop_assert_eq!(rendered.len(), natural.max(width));

        let pad = width.saturating_sub(natural);
        if pad > 0 {
            if flag.contains('-') {
                prop_assert!(rendered.ends_with(&" ".repeat(pad)));
            } else if flag.contains('0') {
                let digits = rendered.trim_start_matches(['-', '+']);
                prop_assert!(digits.starts_with(&"0".repeat(pad)));
            } else {
                prop_assert!(rendered.starts_with(&" ".repeat(pad)));
            }
        }
        let parsed = rendered.trim().parse::<i64>().unwrap();
        prop_assert_eq!(parsed, value);
    }

    #[test]
    fn percent_escapes_consume_no_argument(
        segments in prop::collection::vec(literal_strategy(), 1..6),
        value in any::<i32>(),
    ) {
        let format = format!("{}%d", segments.join("%%"));
        let mut out = String::new();
        let result = sprintf(&mut out, &format).arg(value).result();
        let expected = format!("{}{value}", segments.join("%"));
        prop_assert_eq!(result, expected.len() as i32);
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn bounded_sink_faults_only_on_overflow(
        text in literal_strategy(),
        capacity in 0usize..16,
    ) {
        let mut buf = [0u8; 16];
        let mut f = bufprintf(&mut buf[..capacity], b"%s");
        let outcome = f.try_arg(text.as_str()).map(|_| ()).err();
        if text.len() > capacity {
            prop_assert_eq!(
                outcome,
                Some(SinkError::CapacityExceeded { requested: text.len(), remaining: capacity })
            );
            prop_assert_eq!(f.result(), -1);
            prop_assert_eq!(f.sink().written(), 0);
        } else {
            prop_assert_eq!(outcome, None);
            prop_assert_eq!(f.result(), text.len() as i32);
        }

        let mut out = String::new();
        prop_assert_eq!(sprintf(&mut out, "%s").arg(text.as_str()).result(), text.len() as i32);
    }
}
