//! Port traits: the boundary between the monitor and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PressureMonitor (domain)
//! ```
//!
//! Driven adapters (GPIO switches, the tank web page, the CSV log, the
//! clock) implement these traits.  The monitor and the polling loop consume
//! them via generics, so the state machine never touches hardware or the
//! network directly and every test can inject its own doubles.

use core::time::Duration;

use chrono::{DateTime, Local};

use crate::config::SystemConfig;
use crate::error::TankError;

use super::events::PressureEvent;
use super::state::{FloatState, PressureState, TankReading};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: switches → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the two digital switches.
///
/// Implementations debounce internally and report `Unknown` rather than
/// failing; the monitor treats `Unknown` as "skip this tick".
pub trait SensorPort {
    fn read_pressure(&mut self) -> PressureState;

    fn read_float(&mut self) -> FloatState;
}

// ───────────────────────────────────────────────────────────────
// Tank port (driven adapter: tank-level page → domain)
// ───────────────────────────────────────────────────────────────

/// Supplies one consistent tank reading per call, or an error.
///
/// Implementations must bound their own latency; a slow tank source must
/// never stall pressure classification.
pub trait TankPort {
    fn fetch_tank(&mut self) -> Result<TankReading, TankError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → CSV / log)
// ───────────────────────────────────────────────────────────────

/// Append-only destination for classified events.
///
/// Must not panic and has no error return: write failures are reported by
/// the adapter itself and swallowed so polling continues.
pub trait EventSink {
    fn record(&mut self, event: &PressureEvent);
}

/// Fan out to two sinks (e.g. CSV file and the log stream).
impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn record(&mut self, event: &PressureEvent) {
        self.0.record(event);
        self.1.record(event);
    }
}

// ───────────────────────────────────────────────────────────────
// Time port (driven adapter: wall clock + sleeping)
// ───────────────────────────────────────────────────────────────

/// Wall clock and sleep used by the polling loop.
pub trait TimePort {
    fn now(&self) -> DateTime<Local>;

    fn sleep(&mut self, duration: Duration);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ config file)
// ───────────────────────────────────────────────────────────────

/// Loads the system configuration.
///
/// Implementations MUST validate before returning; invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// Stored config failed to deserialize.
    Corrupted(String),
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError(std::io::Error),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted(msg) => write!(f, "config corrupted: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
