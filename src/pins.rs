//! GPIO line assignments for the pumphouse Raspberry Pi.
//!
//! Single source of truth for the default wiring.  Both switches are
//! wired normally-closed to ground with the internal pull-up enabled, so
//! a broken wire reads HIGH.  Numbers are BCM line offsets on `gpiochip0`.

/// Pressure switch (closes at ≥10 PSI).  LOW = pressure present.
pub const PRESSURE_GPIO: u32 = 17;

/// Tank float switch.  HIGH = float raised (tank full).
pub const FLOAT_GPIO: u32 = 27;

/// Character device used by the `gpioget` fallback backend.
pub const GPIO_CHIP: &str = "gpiochip0";

/// Root of the legacy sysfs GPIO interface.
pub const SYSFS_GPIO_ROOT: &str = "/sys/class/gpio";
