//! Line protocol for client commands
//!
//! One newline-terminated text command in, exactly one reply line out.
//! Command words are case-insensitive; `duty`/`setvalue` take a single
//! finite float argument.
//!
//! | Client sends | Reply |
//! |---|---|
//! | `arm` / `enable` | `ACK ENABLED` |
//! | `disarm` / `disable` | `ACK DISABLED` |
//! | `stop` | `ACK STOPPED` |
//! | `duty <float>` / `setvalue <float>` | `ACK DUTY <value>` or `ERR NOT_ENABLED` |
//! | `ping` | `PONG` |
//! | `status` | `STATUS ENABLED\|DISABLED DUTY <value>` |
//! | anything else | `ERR UNKNOWN_CMD` |

use std::fmt;

/// Greeting sent once per connection, before any command is read
pub const GREETING: &str = "HELLO VESC SAFE_MODE";

/// A parsed client command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Allow nonzero output (`arm` / `enable`)
    Arm,
    /// Safe idle (`disarm` / `disable`)
    Disarm,
    /// Safe idle, the emergency flavor (`stop`)
    Stop,
    /// Store a commanded duty (`duty <v>` / `setvalue <v>`)
    SetDuty(f64),
    /// Liveness probe (`ping`)
    Ping,
    /// Report the current snapshot without side effects (`status`)
    Status,
}

/// Why a line could not be parsed into a [`Command`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Command word not in the fixed set
    UnknownCommand,
    /// Missing or non-finite numeric argument
    BadValue,
}

/// Parse one raw line
///
/// Returns `Ok(None)` for whitespace-only lines, which are ignored without
/// a reply.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut parts = line.splitn(2, char::is_whitespace);
    let word = parts.next().unwrap_or("").to_ascii_lowercase();
    let arg = parts.next().map(str::trim);

    let command = match word.as_str() {
        "arm" | "enable" => Command::Arm,
        "disarm" | "disable" => Command::Disarm,
        "stop" => Command::Stop,
        "duty" | "setvalue" => {
            let value: f64 = arg
                .ok_or(ParseError::BadValue)?
                .parse()
                .map_err(|_| ParseError::BadValue)?;
            if !value.is_finite() {
                return Err(ParseError::BadValue);
            }
            Command::SetDuty(value)
        }
        "ping" => Command::Ping,
        "status" => Command::Status,
        _ => return Err(ParseError::UnknownCommand),
    };

    Ok(Some(command))
}

/// One reply line, rendered without the trailing newline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reply {
    Enabled,
    Disabled,
    Stopped,
    /// Echo of the stored (unclamped) duty
    Duty(f64),
    Pong,
    /// Snapshot report: armed flag and stored duty
    Status(bool, f64),
    NotEnabled,
    BadValue,
    UnknownCommand,
}

impl From<ParseError> for Reply {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::UnknownCommand => Reply::UnknownCommand,
            ParseError::BadValue => Reply::BadValue,
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Reply::Enabled => write!(f, "ACK ENABLED"),
            Reply::Disabled => write!(f, "ACK DISABLED"),
            Reply::Stopped => write!(f, "ACK STOPPED"),
            Reply::Duty(duty) => write!(f, "ACK DUTY {:.4}", duty),
            Reply::Pong => write!(f, "PONG"),
            Reply::Status(armed, duty) => {
                let flag = if armed { "ENABLED" } else { "DISABLED" };
                write!(f, "STATUS {} DUTY {:.4}", flag, duty)
            }
            Reply::NotEnabled => write!(f, "ERR NOT_ENABLED"),
            Reply::BadValue => write!(f, "ERR BAD_VALUE"),
            Reply::UnknownCommand => write!(f, "ERR UNKNOWN_CMD"),
        }
    }
}
