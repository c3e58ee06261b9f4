//! Pure numeric helpers used by the monitor.

pub mod gallons;
