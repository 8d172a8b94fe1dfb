//! Line parser for perf/ftrace branch logs.
//!
//! Recognized lines look like:
//!
//! ```text
//! 732768 [004] 154939.925854842:   call   ffffffff85b516cc do_syscall_64+0x2c => ffffffff851c1830 __x64_sys_futex+0x0
//! 732768 [004] 154939.925854981:   return ffffffff851bf229 futex_wake+0xa9   => ffffffff851c1075 do_futex+0xc5
//! ```
//!
//! Anything else is skipped and counted; a malformed line is never an error.

use super::record::{TraceEvent, TraceRecord};
use crate::utils::error::ParseError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Records extracted from one log, plus line accounting
#[derive(Debug, Clone, Default)]
pub struct ParsedLog {
    pub records: Vec<TraceRecord>,
    pub total_lines: usize,
    pub skipped_lines: usize,
}

impl ParsedLog {
    pub fn call_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_call()).count()
    }

    pub fn return_count(&self) -> usize {
        self.records.len() - self.call_count()
    }
}

/// Read and parse a trace log from disk
///
/// **Public** - main entry point for parsing
///
/// # Errors
/// * `ParseError::NotFound` - path does not exist
/// * `ParseError::Io` - read failure
pub fn read_log(path: impl AsRef<Path>) -> Result<ParsedLog, ParseError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ParseError::NotFound(path.display().to_string()));
    }

    info!("Reading trace log: {}", path.display());
    let file = File::open(path)?;
    let parsed = parse_log(file)?;

    info!(
        "Parsed {} records from {} lines ({} skipped)",
        parsed.records.len(),
        parsed.total_lines,
        parsed.skipped_lines
    );

    Ok(parsed)
}

/// Parse every line of `reader`, keeping arrival order
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
pub fn parse_log<R: Read>(reader: R) -> Result<ParsedLog, ParseError> {
    let mut reader = BufReader::new(reader);
    let mut parsed = ParsedLog::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        parsed.total_lines += 1;

        let line = String::from_utf8_lossy(&buf);
        match parse_line(&line) {
            Some(record) => parsed.records.push(record),
            None => parsed.skipped_lines += 1,
        }
    }

    debug!(
        "{} calls, {} returns",
        parsed.call_count(),
        parsed.return_count()
    );

    Ok(parsed)
}

/// Parse one log line into a record, or `None` if it is not a call/return line
pub fn parse_line(line: &str) -> Option<TraceRecord> {
    let mut tokens = line.split_whitespace();

    let pid = parse_decimal(tokens.next()?)?;

    let cpu = tokens
        .next()?
        .strip_prefix('[')?
        .strip_suffix(']')
        .and_then(parse_decimal)?;

    let timestamp = parse_timestamp(tokens.next()?.strip_suffix(':')?)?;

    let kind = tokens.next()?;

    let _from_addr = address(tokens.next()?)?;
    let left = symbol(tokens.next()?)?;
    if tokens.next()? != "=>" {
        return None;
    }
    let _to_addr = address(tokens.next()?)?;
    let right = symbol(tokens.next()?)?;

    let event = match kind {
        "call" => TraceEvent::Call {
            caller: left.to_string(),
            callee: right.to_string(),
        },
        "return" => TraceEvent::Return {
            returning: left.to_string(),
            target: right.to_string(),
        },
        _ => return None,
    };

    Some(TraceRecord {
        pid,
        cpu,
        timestamp,
        event,
    })
}

fn parse_decimal(token: &str) -> Option<u32> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// `<digits>.<digits>` seconds; overlong values that overflow to infinity are rejected
fn parse_timestamp(token: &str) -> Option<f64> {
    let (secs, frac) = token.split_once('.')?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(secs) || !all_digits(frac) {
        return None;
    }
    token.parse().ok().filter(|t: &f64| t.is_finite())
}

fn address(token: &str) -> Option<&str> {
    let valid = token
        .bytes()
        .all(|b| b.is_ascii_hexdigit() || b == b'x');
    valid.then_some(token)
}

/// `name+offset`, returning `name`
fn symbol(token: &str) -> Option<&str> {
    let (name, offset) = token.split_once('+')?;
    let is_word = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_');
    (is_word(name) && is_word(offset)).then_some(name)
}
