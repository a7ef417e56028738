//! Text schedule files: one `<tick> <port> <value>` triple per line.
//! Blank lines and `#` comments are skipped. The character port accepts
//! character tokens; other ports take decimal or `0x` hex integers.

use std::fmt;
use std::fs;
use std::path::Path;

use stackharv_core::io::IoEvent;
use stackharv_core::isa::PORT_CH;

#[derive(Debug)]
pub enum ScheduleError {
    Io(std::io::Error),
    /// A non-comment line that is not a `tick port value` triple.
    BadLine { line: usize, text: String },
    /// A field that does not parse for its position/port.
    BadValue { line: usize, token: String },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::BadLine { line, text } => {
                write!(f, "schedule line {line}: expected `tick port value`, got {text:?}")
            }
            Self::BadValue { line, token } => {
                write!(f, "schedule line {line}: bad value {token:?}")
            }
        }
    }
}

impl std::error::Error for ScheduleError {}

impl From<std::io::Error> for ScheduleError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

pub fn parse_schedule(path: &Path) -> Result<Vec<IoEvent>, ScheduleError> {
    let text = fs::read_to_string(path)?;
    parse_schedule_text(&text)
}

pub fn parse_schedule_text(text: &str) -> Result<Vec<IoEvent>, ScheduleError> {
    let mut events = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let s = raw.trim();
        if s.is_empty() || s.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = s.split_whitespace().collect();
        let [tick, port, value] = parts[..] else {
            return Err(ScheduleError::BadLine {
                line,
                text: s.to_string(),
            });
        };
        let bad = |token: &str| ScheduleError::BadValue {
            line,
            token: token.to_string(),
        };
        let tick: u64 = tick.parse().map_err(|_| bad(tick))?;
        let port: u32 = port.parse().map_err(|_| bad(port))?;
        let value = if port == PORT_CH {
            decode_char_token(value).ok_or_else(|| bad(value))?
        } else {
            parse_int_token(value).ok_or_else(|| bad(value))?
        };
        events.push(IoEvent { tick, port, value });
    }
    Ok(events)
}

/// Character-port value token: an escape (`\n`, `\t`, `\r`, `\0`, `\xHH`),
/// a quoted character (`'A'`, `"A"`), a `0x` hex integer, or the first
/// character of a bare token.
fn decode_char_token(tok: &str) -> Option<u32> {
    match tok {
        "\\n" => return Some(10),
        "\\t" => return Some(9),
        "\\r" => return Some(13),
        "\\0" => return Some(0),
        _ => {}
    }
    if let Some(hex) = tok.strip_prefix("\\x") {
        if hex.len() == 2 {
            return u32::from_str_radix(hex, 16).ok();
        }
    }
    let bytes = tok.as_bytes();
    if tok.chars().count() >= 3
        && ((bytes[0] == b'\'' && bytes[bytes.len() - 1] == b'\'')
            || (bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"'))
    {
        return tok.chars().nth(1).map(|c| c as u32);
    }
    if let Some(hex) = hex_digits(tok) {
        return u32::from_str_radix(hex, 16).ok();
    }
    tok.chars().next().map(|c| c as u32)
}

fn parse_int_token(tok: &str) -> Option<u32> {
    if let Some(hex) = hex_digits(tok) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        tok.parse::<i64>().ok().map(|v| v as u32)
    }
}

fn hex_digits(tok: &str) -> Option<&str> {
    tok.strip_prefix("0x").or_else(|| tok.strip_prefix("0X"))
}
