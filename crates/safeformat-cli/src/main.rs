//! CLI entrypoint for safeformat: a printf(1) that types its arguments.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use safeformat_core::config::{self, Mode};
use safeformat_core::{Arg, BufSink, FormatError, Formatter, Pending, Sink, StreamSink};
use serde::Serialize;
use thiserror::Error;

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "SAFEFORMAT_LOG";

/// Format and print arguments under control of FORMAT.
#[derive(Debug, Parser)]
#[command(name = "safeformat")]
#[command(about = "Type-checked printf: every argument is parsed for the directive it lands on")]
struct Cli {
    /// Formatting mode (strict or hardened). Defaults to SAFEFORMAT_MODE.
    #[arg(long)]
    mode: Option<String>,
    /// Format into a bounded buffer of this many characters before printing.
    #[arg(long)]
    buffer: Option<usize>,
    /// Outcome report written to stderr.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
    /// printf format string. `\n`, `\t`, `\r` and `\\` are expanded.
    format: String,
    /// Arguments, consumed left to right by the directives. `%c` takes the
    /// first character of its argument; outside ASCII it keeps only the low
    /// byte of the code point, as C's `%c` does.
    #[arg(allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("argument {index} ({value:?}) is not a valid {expected}")]
    BadArgument {
        index: usize,
        value: String,
        expected: &'static str,
    },
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Serialize)]
struct Report {
    mode: &'static str,
    written: usize,
    result: i32,
    error: Option<String>,
}

/// What a formatting run produced.
#[derive(Debug)]
struct Outcome {
    written: usize,
    finished: Result<usize, FormatError>,
}

impl Outcome {
    /// 0 on success, 2 when a bounded buffer overflowed, 1 otherwise.
    fn exit_status(&self) -> u8 {
        match &self.finished {
            Ok(_) => 0,
            Err(err) if err.is_capacity_exceeded() => 2,
            Err(_) => 1,
        }
    }

    fn report(&self, mode: Mode) -> Report {
        Report {
            mode: mode.as_str(),
            written: self.written,
            result: match &self.finished {
                Ok(n) => i32::try_from(*n).unwrap_or(-1),
                Err(_) => -1,
            },
            error: self.finished.as_ref().err().map(ToString::to_string),
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let mode = cli
        .mode
        .as_deref()
        .map_or_else(config::mode, Mode::from_str_loose);
    let format = unescape(&cli.format);

    let outcome = match execute(&cli, &format, mode) {
        Ok(outcome) => outcome,
        Err(err) => {
            eprintln!("safeformat: {err}");
            return ExitCode::from(1);
        }
    };

    let report = outcome.report(mode);
    match cli.report {
        ReportFormat::Json => match serde_json::to_string(&report) {
            Ok(json) => eprintln!("{json}"),
            Err(err) => eprintln!("safeformat: failed to serialize report: {err}"),
        },
        ReportFormat::Text => {
            if let Some(error) = &report.error {
                eprintln!("safeformat: {error}");
            }
        }
    }
    ExitCode::from(outcome.exit_status())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    // Silent unless SAFEFORMAT_LOG is set.
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(filter)
            .init();
    }
}

fn execute(cli: &Cli, format: &[u8], mode: Mode) -> Result<Outcome, CliError> {
    let mut stdout = io::stdout().lock();
    let outcome = match cli.buffer {
        Some(capacity) => {
            let mut storage = vec![0u8; capacity];
            let outcome = run(
                Formatter::with_mode(BufSink::new(&mut storage), format, mode),
                &cli.args,
            )?;
            stdout.write_all(&storage[..outcome.written])?;
            outcome
        }
        None => run(
            Formatter::with_mode(StreamSink::new(&mut stdout), format, mode),
            &cli.args,
        )?,
    };
    stdout.flush()?;
    tracing::debug!(written = outcome.written, "formatting finished");
    Ok(outcome)
}

fn run<S: Sink>(mut formatter: Formatter<'_, S>, args: &[String]) -> Result<Outcome, CliError> {
    feed(&mut formatter, args)?;
    let written = formatter.written();
    Ok(Outcome {
        written,
        finished: formatter.finish(),
    })
}

/// Convert each textual argument to the kind its directive expects.
fn feed<S: Sink>(formatter: &mut Formatter<'_, S>, args: &[String]) -> Result<(), CliError> {
    let mut count_scratch = 0i64;
    for (index, value) in args.iter().enumerate() {
        if formatter.error().is_some() {
            break;
        }
        let bad = |expected| CliError::BadArgument {
            index: index + 1,
            value: value.clone(),
            expected,
        };
        match formatter.pending_conversion() {
            Some(Pending::Width | Pending::Precision) => {
                let arg = parse_integer(value).ok_or_else(|| bad("field width or precision"))?;
                formatter.arg(arg);
            }
            // printf(1): `%c` prints the first character of its argument.
            Some(Pending::Conversion('c')) => {
                let ch = value.chars().next().ok_or_else(|| bad("character"))?;
                formatter.arg(ch);
            }
            Some(Pending::Conversion('d' | 'i' | 'u' | 'o' | 'x' | 'X')) => {
                let arg = parse_integer(value).ok_or_else(|| bad("integer"))?;
                formatter.arg(arg);
            }
            Some(Pending::Conversion('e' | 'E' | 'f' | 'g' | 'G')) => {
                let number: f64 = value.trim().parse().map_err(|_| bad("number"))?;
                formatter.arg(number);
            }
            Some(Pending::Conversion('n')) => {
                formatter.arg(&mut count_scratch);
            }
            // `s`, `p`, unknown conversions and surplus arguments: the
            // formatter decides what a text argument is worth.
            _ => {
                formatter.arg(value.as_str());
            }
        }
    }
    Ok(())
}

/// Decimal, `0x` hexadecimal or leading-`0` octal, optionally signed.
fn parse_integer(text: &str) -> Option<Arg<'static>> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (digits, radix) = if let Some(hex) = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
    {
        (hex, 16)
    } else if body.len() > 1 && body.starts_with('0') {
        (&body[1..], 8)
    } else {
        (body, 10)
    };
    if digits.starts_with(['+', '-']) {
        return None;
    }
    let magnitude = u64::from_str_radix(digits, radix).ok()?;
    if negative {
        return 0i64.checked_sub_unsigned(magnitude).map(Arg::Signed);
    }
    Some(i64::try_from(magnitude).map_or(Arg::Unsigned(magnitude), Arg::Signed))
}

/// Expand the backslash escapes printf(1) users rely on most.
fn unescape(format: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(format.len());
    let mut bytes = format.bytes();
    while let Some(b) = bytes.next() {
        if b != b'\\' {
            out.push(b);
            continue;
        }
        match bytes.next() {
            Some(b'n') => out.push(b'\n'),
            Some(b't') => out.push(b'\t'),
            Some(b'r') => out.push(b'\r'),
            Some(b'\\') => out.push(b'\\'),
            Some(other) => out.extend_from_slice(&[b'\\', other]),
            None => out.push(b'\\'),
        }
    }
    out
}
