//! Linux peripheral drivers: GPIO input backends and a blocking delay.

pub mod delay;
pub mod gpio;
