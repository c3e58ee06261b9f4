//! Sensor subsystem: switch drivers, the tank page parser, and the
//! aggregating [`SensorHub`].
//!
//! The hub owns both switches plus the delay used for debounce re-reads,
//! and is what the polling loop hands to the monitor as its `SensorPort`.

pub mod debounce;
pub mod switches;
pub mod tank;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::app::state::{FloatState, PressureState};
use crate::config::SystemConfig;
use debounce::RetryPolicy;
use switches::{FloatSwitch, PressureSwitch};

/// Both switches and the shared debounce delay.
pub struct SensorHub<P, F, D> {
    pub pressure: PressureSwitch<P>,
    pub float: FloatSwitch<F>,
    delay: D,
}

impl<P: InputPin, F: InputPin, D: DelayNs> SensorHub<P, F, D> {
    /// Construct a hub.  Pins are built in main where the GPIO backend is
    /// chosen.
    pub fn new(pressure_pin: P, float_pin: F, delay: D, config: &SystemConfig) -> Self {
        let policy = RetryPolicy {
            retries: config.debounce_retries,
            delay_ms: config.debounce_delay_ms,
        };
        Self {
            pressure: PressureSwitch::new(pressure_pin, config.pressure_active_high, policy),
            float: FloatSwitch::new(float_pin, config.float_full_when_high, policy),
            delay,
        }
    }

    pub fn read_pressure(&mut self) -> PressureState {
        self.pressure.read(&mut self.delay)
    }

    pub fn read_float(&mut self) -> FloatState {
        self.float.read(&mut self.delay)
    }
}
