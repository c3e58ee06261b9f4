//! System configuration parameters
//!
//! All tunable parameters for the pumphouse monitor.  Values come from a
//! JSON file (see [`crate::adapters::config_file`]); any field missing from
//! the file keeps its default.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::pins;

/// Upper bound for the tank, grace and checkpoint intervals (one week).
pub const MAX_INTERVAL_SECS: u64 = 7 * 24 * 3600;

/// How switch levels are read from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpioBackend {
    /// `/sys/class/gpio/gpioN/value` files (line must already be exported).
    Sysfs,
    /// Shell out to libgpiod's `gpioget` for every read.
    Gpioget,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Timing ---
    /// Pressure poll cadence (seconds)
    pub poll_interval_secs: u64,
    /// Tank poll cadence (seconds), piggybacked on pressure ticks
    pub tank_interval_secs: u64,
    /// Continuous low pressure required to confirm an artifact ended (seconds)
    pub artifact_grace_period_secs: u64,
    /// Checkpoint interval for long deliveries (seconds)
    pub max_pressure_log_interval_secs: u64,

    // --- Gallons estimation ---
    /// Line pressure that lingers after the pump stops (seconds)
    pub residual_pressure_secs: f64,
    /// Pump calibration: delivered volume per minute of pressure
    pub pump_gallons_per_minute: f64,

    // --- Tank ---
    /// Minimum tank-level change between polls worth an event (gallons)
    pub tank_threshold_gallons: f64,
    /// Tank-level page; empty disables tank polling
    pub tank_url: String,
    /// Bound on a single tank fetch (seconds)
    pub tank_timeout_secs: u64,
    /// Label preceding the depth-in-inches value on the tank page
    pub tank_depth_label: String,
    /// Water depth of a full tank (inches)
    pub tank_height_inches: f64,
    /// Volume of a full tank (gallons)
    pub tank_capacity_gallons: f64,

    // --- Sensors ---
    pub gpio_backend: GpioBackend,
    pub pressure_gpio: u32,
    pub float_gpio: u32,
    pub gpio_chip: String,
    /// `true` if a HIGH level on the pressure line means ≥10 PSI
    pub pressure_active_high: bool,
    /// `true` if a HIGH level on the float line means the tank is full
    pub float_full_when_high: bool,
    /// Extra reads taken when a sample disagrees with the last good value
    pub debounce_retries: u8,
    /// Pause between debounce re-reads (milliseconds)
    pub debounce_delay_ms: u32,

    // --- Outputs ---
    /// Append-only event log
    pub events_csv_path: String,
    /// Optional JSON snapshot for dashboard readers
    pub status_path: Option<String>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Timing
            poll_interval_secs: 5,
            tank_interval_secs: 60,
            artifact_grace_period_secs: 300,
            max_pressure_log_interval_secs: 1800, // 30 min

            // Gallons
            residual_pressure_secs: 30.0,
            pump_gallons_per_minute: 0.84, // ≈71.43 s/gal

            // Tank
            tank_threshold_gallons: 2.0,
            tank_url: String::new(),
            tank_timeout_secs: 10,
            tank_depth_label: "Depth".to_string(),
            tank_height_inches: 58.0,
            tank_capacity_gallons: 1400.0,

            // Sensors
            gpio_backend: GpioBackend::Sysfs,
            pressure_gpio: pins::PRESSURE_GPIO,
            float_gpio: pins::FLOAT_GPIO,
            gpio_chip: pins::GPIO_CHIP.to_string(),
            pressure_active_high: false,
            float_full_when_high: true,
            debounce_retries: 2,
            debounce_delay_ms: 1000,

            // Outputs
            events_csv_path: "pressure_events.csv".to_string(),
            status_path: None,
        }
    }
}

impl SystemConfig {
    /// Seconds of pressure per gallon delivered, derived from the pump calibration.
    pub fn seconds_per_gallon(&self) -> f64 {
        60.0 / self.pump_gallons_per_minute
    }

    /// Reject values the monitor cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=3600).contains(&self.poll_interval_secs) {
            return Err(ConfigError::ValidationFailed(
                "poll_interval_secs must be 1–3600",
            ));
        }
        if self.tank_interval_secs > MAX_INTERVAL_SECS
            || self.artifact_grace_period_secs > MAX_INTERVAL_SECS
            || self.max_pressure_log_interval_secs > MAX_INTERVAL_SECS
        {
            return Err(ConfigError::ValidationFailed(
                "tank, grace and checkpoint intervals must be at most one week",
            ));
        }
        if self.tank_interval_secs < self.poll_interval_secs {
            return Err(ConfigError::ValidationFailed(
                "tank_interval_secs must be >= poll_interval_secs",
            ));
        }
        if self.max_pressure_log_interval_secs < self.poll_interval_secs {
            return Err(ConfigError::ValidationFailed(
                "max_pressure_log_interval_secs must be >= poll_interval_secs",
            ));
        }
        if self.residual_pressure_secs.is_nan() || self.residual_pressure_secs < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "residual_pressure_secs must be >= 0",
            ));
        }
        if !is_positive(self.pump_gallons_per_minute) {
            return Err(ConfigError::ValidationFailed(
                "pump_gallons_per_minute must be > 0",
            ));
        }
        if self.tank_threshold_gallons.is_nan() || self.tank_threshold_gallons < 0.0 {
            return Err(ConfigError::ValidationFailed(
                "tank_threshold_gallons must be >= 0",
            ));
        }
        if !is_positive(self.tank_height_inches) || !is_positive(self.tank_capacity_gallons) {
            return Err(ConfigError::ValidationFailed(
                "tank_height_inches and tank_capacity_gallons must be > 0",
            ));
        }
        if !(1..=120).contains(&self.tank_timeout_secs) {
            return Err(ConfigError::ValidationFailed(
                "tank_timeout_secs must be 1–120",
            ));
        }
        if self.debounce_retries > 10 {
            return Err(ConfigError::ValidationFailed(
                "debounce_retries must be 0–10",
            ));
        }
        if self.events_csv_path.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "events_csv_path must not be empty",
            ));
        }
        Ok(())
    }
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}
