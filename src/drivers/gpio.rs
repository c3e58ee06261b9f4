//! Linux GPIO input pins.
//!
//! Two backends, picked by [`GpioBackend`](crate::config::GpioBackend):
//!
//! - [`SysfsPin`] reads `/sys/class/gpio/gpioN/value`.  The line must be
//!   exported and configured as input beforehand (udev rule or boot script).
//! - [`GpioGetPin`] runs libgpiod's `gpioget <chip> <line>` per read.  Slower,
//!   but works on kernels that no longer ship the sysfs interface.
//!
//! Both implement [`embedded_hal::digital::InputPin`] so the switch drivers
//! are agnostic to which one is wired in.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use embedded_hal::digital::{ErrorType, InputPin};

use crate::error::GpioError;
use crate::pins::SYSFS_GPIO_ROOT;

fn parse_level(raw: &str) -> Result<bool, GpioError> {
    match raw.trim() {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(GpioError::InvalidLevel(other.to_string())),
    }
}

// ── sysfs ─────────────────────────────────────────────────────

/// GPIO line read through the sysfs value file.
#[derive(Debug, Clone)]
pub struct SysfsPin {
    value_path: PathBuf,
}

impl SysfsPin {
    pub fn new(line: u32) -> Self {
        Self::with_root(SYSFS_GPIO_ROOT, line)
    }

    /// Use a different sysfs root (tests point this at a temp dir).
    pub fn with_root(root: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            value_path: root.into().join(format!("gpio{line}")).join("value"),
        }
    }
}

impl ErrorType for SysfsPin {
    type Error = GpioError;
}

impl InputPin for SysfsPin {
    fn is_high(&mut self) -> Result<bool, GpioError> {
        let raw = fs::read_to_string(&self.value_path).map_err(|e| {
            GpioError::Unavailable(format!("{}: {}", self.value_path.display(), e))
        })?;
        parse_level(&raw)
    }

    fn is_low(&mut self) -> Result<bool, GpioError> {
        self.is_high().map(|high| !high)
    }
}

// ── gpioget ───────────────────────────────────────────────────

/// GPIO line read by spawning `gpioget`.
#[derive(Debug, Clone)]
pub struct GpioGetPin {
    chip: String,
    line: u32,
}

impl GpioGetPin {
    pub fn new(chip: impl Into<String>, line: u32) -> Self {
        Self {
            chip: chip.into(),
            line,
        }
    }
}

impl ErrorType for GpioGetPin {
    type Error = GpioError;
}

impl InputPin for GpioGetPin {
    fn is_high(&mut self) -> Result<bool, GpioError> {
        let output = Command::new("gpioget")
            .arg(&self.chip)
            .arg(self.line.to_string())
            .output()
            .map_err(|e| GpioError::Unavailable(format!("gpioget: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GpioError::Unavailable(format!(
                "gpioget {} {} exited with {}: {}",
                self.chip,
                self.line,
                output.status,
                stderr.trim()
            )));
        }
        parse_level(&String::from_utf8_lossy(&output.stdout))
    }

    fn is_low(&mut self) -> Result<bool, GpioError> {
        self.is_high().map(|high| !high)
    }
}
