//! System clock adapter.
//!
//! Provides wall-clock time (local zone, as events are stamped) and a
//! blocking sleep for the polling loop.

use std::thread;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::app::ports::TimePort;

/// [`TimePort`] backed by `chrono::Local` and `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl TimePort for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}
