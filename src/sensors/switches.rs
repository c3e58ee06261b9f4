//! Pressure and float switch drivers.
//!
//! Both are plain digital inputs behind [`InputPin`].  Wiring polarity is
//! configurable because the switches are normally-closed with a pull-up:
//! which electrical level means "pressure present" or "tank full" depends
//! on how the installer wired them.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::app::state::{FloatState, PressureState};

use super::debounce::{Debouncer, RetryPolicy};

/// Pressure switch (closes at ≥10 PSI).
pub struct PressureSwitch<P> {
    pin: P,
    active_high: bool,
    debounce: Debouncer,
}

impl<P: InputPin> PressureSwitch<P> {
    pub fn new(pin: P, active_high: bool, policy: RetryPolicy) -> Self {
        Self {
            pin,
            active_high,
            debounce: Debouncer::new(policy),
        }
    }

    pub fn read(&mut self, delay: &mut impl DelayNs) -> PressureState {
        let active_high = self.active_high;
        let pin = &mut self.pin;
        let level = self
            .debounce
            .sample(|| pin.is_high().map(|high| high == active_high), delay);
        PressureState::from_level(level)
    }
}

/// Tank float switch.
pub struct FloatSwitch<P> {
    pin: P,
    full_when_high: bool,
    debounce: Debouncer,
}

impl<P: InputPin> FloatSwitch<P> {
    pub fn new(pin: P, full_when_high: bool, policy: RetryPolicy) -> Self {
        Self {
            pin,
            full_when_high,
            debounce: Debouncer::new(policy),
        }
    }

    pub fn read(&mut self, delay: &mut impl DelayNs) -> FloatState {
        let full_when_high = self.full_when_high;
        let pin = &mut self.pin;
        match self
            .debounce
            .sample(|| pin.is_high().map(|high| high == full_when_high), delay)
        {
            Some(true) => FloatState::Full,
            Some(false) => FloatState::Calling,
            None => FloatState::Unknown,
        }
    }
}
