//! Confirm-on-disagreement debouncing for mechanical switches.
//!
//! A sample that matches the last known-good level is accepted at once.
//! Anything else (a changed level or a read error) triggers a bounded
//! number of re-reads with a fixed pause.  The new level is accepted only
//! if every sample agrees; a lone outlier falls back to the known-good
//! level.  If no sample could be read at all the result is `None`.
//!
//! The pause goes through [`DelayNs`] so tests inject a no-op delay
//! instead of sleeping.

use core::fmt::Debug;

use embedded_hal::delay::DelayNs;
use log::{debug, warn};

/// How hard to try before trusting a changed level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra reads after the first disagreeing sample.
    pub retries: u8,
    /// Pause before each extra read.
    pub delay_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            delay_ms: 1000,
        }
    }
}

/// Debounce state for one switch.
#[derive(Debug, Clone)]
pub struct Debouncer {
    policy: RetryPolicy,
    last_good: Option<bool>,
}

impl Debouncer {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            last_good: None,
        }
    }

    /// Last level accepted by [`sample`](Self::sample).
    pub fn last_good(&self) -> Option<bool> {
        self.last_good
    }

    /// Take a debounced sample using `read` for each raw read.
    pub fn sample<E: Debug>(
        &mut self,
        mut read: impl FnMut() -> Result<bool, E>,
        delay: &mut impl DelayNs,
    ) -> Option<bool> {
        let first = match read() {
            Ok(level) => Some(level),
            Err(e) => {
                warn!("Switch read failed: {:?}", e);
                None
            }
        };

        match (first, self.last_good) {
            (Some(level), Some(good)) if level == good => return Some(level),
            (Some(level), None) => {
                self.last_good = Some(level);
                return Some(level);
            }
            _ => {}
        }

        let mut unanimous = first.is_some();
        let mut any_read = first.is_some();
        for _ in 0..self.policy.retries {
            delay.delay_ms(self.policy.delay_ms);
            match read() {
                Ok(level) => {
                    any_read = true;
                    if Some(level) != first {
                        unanimous = false;
                    }
                }
                Err(e) => {
                    warn!("Switch re-read failed: {:?}", e);
                    unanimous = false;
                }
            }
        }

        if unanimous {
            self.last_good = first;
            first
        } else if any_read {
            debug!("Switch samples disagree, keeping {:?}", self.last_good);
            self.last_good
        } else {
            None
        }
    }
}
