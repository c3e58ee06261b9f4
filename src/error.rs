//! Error types for the pumphouse monitor's I/O edges.
//!
//! Each subsystem has a small error enum with a `Display` impl.  None of
//! these are allowed to escape the polling loop: the monitor absorbs
//! sensor, tank and output failures locally.  The binary's startup path
//! wraps them in `anyhow` with context.

use core::fmt;

// ---------------------------------------------------------------------------
// GPIO errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpioError {
    /// The value file or command could not be accessed.
    Unavailable(String),
    /// The line returned something other than `0` or `1`.
    InvalidLevel(String),
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "line unavailable: {msg}"),
            Self::InvalidLevel(raw) => write!(f, "invalid level {raw:?}"),
        }
    }
}

impl std::error::Error for GpioError {}

impl embedded_hal::digital::Error for GpioError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

// ---------------------------------------------------------------------------
// Tank source errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TankError {
    /// No tank URL configured.
    NotConfigured,
    /// Request failed or timed out.
    Http(String),
    /// Server answered with a non-success status.
    Status(u16),
    /// The page did not contain a usable depth reading.
    Parse(&'static str),
}

impl fmt::Display for TankError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "tank source not configured"),
            Self::Http(msg) => write!(f, "request failed: {msg}"),
            Self::Status(code) => write!(f, "unexpected HTTP status {code}"),
            Self::Parse(what) => write!(f, "page parse failed: {what}"),
        }
    }
}

impl std::error::Error for TankError {}

// ---------------------------------------------------------------------------
// Output file errors (CSV event log, status snapshot)
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum OutputError {
    Io(std::io::Error),
    Serialize(serde_json::Error),
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Serialize(e) => write!(f, "serialization error: {e}"),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Serialize(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for OutputError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for OutputError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e)
    }
}
