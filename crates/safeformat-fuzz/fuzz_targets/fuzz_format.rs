#![no_main]
use libfuzzer_sys::fuzz_target;
use safeformat_core::config::Mode;
use safeformat_core::{Arg, BufSink, Formatter};

// Layout: [mode][arg kinds...][0xff][format bytes...]. Each kind byte picks
// the next argument; the formatter must never panic or overrun its buffer.
fuzz_target!(|data: &[u8]| {
    let Some((&mode, rest)) = data.split_first() else {
        return;
    };
    let split = rest.iter().position(|&b| b == 0xff).unwrap_or(rest.len());
    let (kinds, format) = rest.split_at(split);
    let format = format.get(1..).unwrap_or_default();
    let mode = if mode & 1 == 0 { Mode::Strict } else { Mode::Hardened };

    let mut buf = [0u8; 512];
    let mut count = 0i32;
    let mut f = Formatter::with_mode(BufSink::new(&mut buf), format, mode);
    for (i, &kind) in kinds.iter().enumerate() {
        let seed = i64::from(kind) * 0x0101_0101 - (i as i64);
        match kind % 7 {
            0 => f.arg(Arg::Signed(seed)),
            1 => f.arg(Arg::Unsigned(seed as u64)),
            // Keep `*` widths modest so the bounded sink, not time, is the limit.
            2 => f.arg(Arg::Signed(i64::from(kind % 64) - 8)),
            3 => f.arg(seed as f64 / 7.0),
            4 => f.arg(&format[..format.len().min(usize::from(kind))]),
            5 => f.arg(format.as_ptr()),
            _ => f.arg(&mut count),
        };
    }
    let written = f.written();
    let outcome = f.result();
    assert!(written <= 512);
    assert!(outcome == -1 || usize::try_from(outcome).ok() == Some(written));
});
