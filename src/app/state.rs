//! Live system state and its snapshot copies.
//!
//! [`SystemState`] is the blackboard the monitor writes each tick: latest
//! tank reading, float state, pressure state and the gallons figure at the
//! last logged event.  The monitor is its only writer.  Everyone else
//! (event sinks, the status file) receives a [`SystemSnapshot`], an owned
//! copy, so a reader can never observe a half-applied update.

use chrono::{DateTime, Local};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Sensor-level values
// ---------------------------------------------------------------------------

/// Pressure switch reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PressureState {
    /// ≥10 PSI.
    High,
    /// <10 PSI.
    Low,
    /// Sensor unreadable this tick.
    #[default]
    Unknown,
}

impl PressureState {
    pub fn from_level(high: Option<bool>) -> Self {
        match high {
            Some(true) => Self::High,
            Some(false) => Self::Low,
            None => Self::Unknown,
        }
    }
}

/// Tank float switch reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FloatState {
    /// Tank at capacity; outside pressure is not filling it.
    Full,
    /// Tank can receive water.
    Calling,
    #[default]
    Unknown,
}

impl FloatState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::Calling => "CALLING",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// One consistent reading from the tank-level source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TankReading {
    pub depth_inches: Option<f64>,
    pub percentage: Option<f64>,
    /// Percentage as reported by the source page itself.
    pub pt_percentage: Option<f64>,
    pub gallons: Option<f64>,
    /// When the source says the reading was taken.
    pub last_updated: Option<DateTime<Local>>,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Read-only copy of [`SystemState`] attached to events and status output.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SystemSnapshot {
    pub tank_gallons: Option<f64>,
    pub tank_depth: Option<f64>,
    pub tank_percentage: Option<f64>,
    pub tank_pt_percentage: Option<f64>,
    pub last_updated: Option<DateTime<Local>>,
    pub float_state: FloatState,
    pub float_last_change: Option<DateTime<Local>>,
    pub pressure_state: PressureState,
    pub activation_start_time: Option<DateTime<Local>>,
    pub last_logged_gallons: Option<f64>,
    pub consecutive_tank_errors: u32,
    pub last_tank_error: Option<String>,
}

// ---------------------------------------------------------------------------
// SystemState
// ---------------------------------------------------------------------------

/// Mutable state owned by the monitor.
#[derive(Debug, Default)]
pub struct SystemState {
    inner: SystemSnapshot,
}

impl SystemState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every tank field from one reading.
    ///
    /// Returns `true` if anything differs from the previous values.
    pub fn update_tank(&mut self, reading: &TankReading, float_state: FloatState) -> bool {
        let s = &mut self.inner;
        let changed = s.tank_gallons != reading.gallons
            || s.tank_depth != reading.depth_inches
            || s.tank_percentage != reading.percentage
            || s.tank_pt_percentage != reading.pt_percentage
            || s.last_updated != reading.last_updated
            || s.float_state != float_state;

        s.tank_gallons = reading.gallons;
        s.tank_depth = reading.depth_inches;
        s.tank_percentage = reading.percentage;
        s.tank_pt_percentage = reading.pt_percentage;
        s.last_updated = reading.last_updated;
        s.float_state = float_state;
        changed
    }

    /// Record the float state, stamping the change time when it flips.
    ///
    /// Returns `true` on a change.  The first observation after start is
    /// not counted as a change.
    pub fn update_float(&mut self, float_state: FloatState, now: DateTime<Local>) -> bool {
        let s = &mut self.inner;
        if s.float_state == float_state {
            return false;
        }
        let first = s.float_state == FloatState::Unknown && s.float_last_change.is_none();
        s.float_state = float_state;
        s.float_last_change = Some(now);
        !first
    }

    pub fn update_pressure(
        &mut self,
        state: PressureState,
        activation_start_time: Option<DateTime<Local>>,
    ) {
        self.inner.pressure_state = state;
        self.inner.activation_start_time = activation_start_time;
    }

    pub fn set_last_logged_gallons(&mut self, gallons: Option<f64>) {
        self.inner.last_logged_gallons = gallons;
    }

    pub fn record_tank_success(&mut self) {
        self.inner.consecutive_tank_errors = 0;
        self.inner.last_tank_error = None;
    }

    /// Returns the new consecutive-error count.
    pub fn record_tank_error(&mut self, message: impl Into<String>) -> u32 {
        self.inner.consecutive_tank_errors = self.inner.consecutive_tank_errors.saturating_add(1);
        self.inner.last_tank_error = Some(message.into());
        self.inner.consecutive_tank_errors
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> SystemSnapshot {
        self.inner.clone()
    }

    pub fn tank_gallons(&self) -> Option<f64> {
        self.inner.tank_gallons
    }

    pub fn float_state(&self) -> FloatState {
        self.inner.float_state
    }

    pub fn last_logged_gallons(&self) -> Option<f64> {
        self.inner.last_logged_gallons
    }

    pub fn consecutive_tank_errors(&self) -> u32 {
        self.inner.consecutive_tank_errors
    }
}
