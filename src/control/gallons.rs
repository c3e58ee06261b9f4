//! Gallons estimation from pressure duration
//!
//! The pressure switch stays closed for a while after the pump stops
//! (residual line pressure), so that tail is subtracted before converting
//! the remaining time to volume at the calibrated pump rate.

/// Trailing pressure time that does not correspond to pumping.
pub const RESIDUAL_PRESSURE_SECONDS: f64 = 30.0;

/// Calibrated pump delivery rate.
pub const PUMP_GALLONS_PER_MINUTE: f64 = 0.84;

/// Seconds of pumping per gallon delivered (≈71.43).
pub const SECONDS_PER_GALLON: f64 = 60.0 / PUMP_GALLONS_PER_MINUTE;

/// Duration → volume estimator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GallonsEstimator {
    residual_secs: f64,
    secs_per_gallon: f64,
}

impl Default for GallonsEstimator {
    fn default() -> Self {
        Self::new(RESIDUAL_PRESSURE_SECONDS, SECONDS_PER_GALLON)
    }
}

impl GallonsEstimator {
    pub fn new(residual_secs: f64, secs_per_gallon: f64) -> Self {
        Self {
            residual_secs,
            secs_per_gallon,
        }
    }

    pub fn from_config(config: &crate::config::SystemConfig) -> Self {
        Self::new(config.residual_pressure_secs, config.seconds_per_gallon())
    }

    /// Estimated gallons delivered by `duration_secs` of pressure.
    ///
    /// Never negative: blips shorter than the residual delivered nothing.
    pub fn estimate(&self, duration_secs: f64) -> f64 {
        let pumping = duration_secs - self.residual_secs;
        if pumping > 0.0 {
            pumping / self.secs_per_gallon
        } else {
            0.0
        }
    }
}
