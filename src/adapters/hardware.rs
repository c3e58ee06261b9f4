//! Hardware adapter: bridges the switch drivers to the domain's
//! [`SensorPort`].
//!
//! This and `drivers::gpio` are the only modules that touch real GPIO.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::app::ports::SensorPort;
use crate::app::state::{FloatState, PressureState};
use crate::config::{GpioBackend, SystemConfig};
use crate::drivers::delay::ThreadDelay;
use crate::drivers::gpio::{GpioGetPin, SysfsPin};
use crate::error::GpioError;
use crate::sensors::SensorHub;

impl<P: InputPin, F: InputPin, D: DelayNs> SensorPort for SensorHub<P, F, D> {
    fn read_pressure(&mut self) -> PressureState {
        SensorHub::read_pressure(self)
    }

    fn read_float(&mut self) -> FloatState {
        SensorHub::read_float(self)
    }
}

/// Input pin for whichever backend the config selects.
#[derive(Debug, Clone)]
pub enum LinuxPin {
    Sysfs(SysfsPin),
    Gpioget(GpioGetPin),
}

impl LinuxPin {
    pub fn open(config: &SystemConfig, line: u32) -> Self {
        match config.gpio_backend {
            GpioBackend::Sysfs => Self::Sysfs(SysfsPin::new(line)),
            GpioBackend::Gpioget => Self::Gpioget(GpioGetPin::new(config.gpio_chip.clone(), line)),
        }
    }
}

impl embedded_hal::digital::ErrorType for LinuxPin {
    type Error = GpioError;
}

impl InputPin for LinuxPin {
    fn is_high(&mut self) -> Result<bool, GpioError> {
        match self {
            Self::Sysfs(p) => p.is_high(),
            Self::Gpioget(p) => p.is_high(),
        }
    }

    fn is_low(&mut self) -> Result<bool, GpioError> {
        self.is_high().map(|high| !high)
    }
}

/// Sensor hub wired to the real GPIO lines.
pub type HardwareSensors = SensorHub<LinuxPin, LinuxPin, ThreadDelay>;

/// Build the production sensor hub from config.
pub fn hardware_sensors(config: &SystemConfig) -> HardwareSensors {
    SensorHub::new(
        LinuxPin::open(config, config.pressure_gpio),
        LinuxPin::open(config, config.float_gpio),
        ThreadDelay,
        config,
    )
}
