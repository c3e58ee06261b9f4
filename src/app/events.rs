//! Outbound pressure events.
//!
//! The [`PressureMonitor`](super::monitor::PressureMonitor) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Each one is an
//! immutable record of a completed (or forcibly closed) interval plus the
//! system snapshot taken at logging time.

use chrono::{DateTime, Local};
use serde::Serialize;

use super::state::SystemSnapshot;

/// Classification of a logged interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Process start marker (zero duration).
    Init,
    /// A complete water delivery observed from its rising edge.
    Normal,
    /// A delivery already in progress when the process started.
    Startup,
    /// A delivery closed because the process is stopping.
    Shutdown,
    /// Checkpoint of a delivery that has run for the maximum log interval.
    Maxtime,
    /// Tank level moved by at least the configured threshold between polls.
    TankChange,
    /// Pressure while the float reads full; attributed to a shared draw.
    PressureArtifact,
}

impl EventType {
    /// Label written to the `event_type` CSV column.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::Normal => "NORMAL",
            Self::Startup => "STARTUP",
            Self::Shutdown => "SHUTDOWN",
            Self::Maxtime => "MAXTIME",
            Self::TankChange => "TANK_CHANGE",
            Self::PressureArtifact => "PRESSURE_ARTIFACT",
        }
    }
}

impl core::fmt::Display for EventType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the event log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PressureEvent {
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    pub duration_secs: f64,
    pub estimated_gallons: f64,
    pub event_type: EventType,
    /// Tank gallons now minus tank gallons at the previous logged event.
    pub gallons_changed: Option<f64>,
    pub snapshot: SystemSnapshot,
}

impl PressureEvent {
    /// Seconds between two instants, to the millisecond.
    pub fn seconds_between(start: DateTime<Local>, end: DateTime<Local>) -> f64 {
        (end - start).num_milliseconds() as f64 / 1000.0
    }
}
