//! Polling loop: drives the [`PressureMonitor`] at a fixed cadence.
//!
//! ```text
//!   start ──▶ ┌─ sleep (1 s slices) ─▶ tick ─▶ publish ─┐ ──▶ shutdown
//!             └─────────────── until token ─────────────┘
//! ```
//!
//! The loop owns every port.  Closing the open interval happens in
//! [`PollingLoop::shutdown`], which is also called from `Drop`, so the
//! final event is written on a normal return, on a signal, and while
//! unwinding from a panic inside a tick.

use core::time::Duration;

use log::{info, warn};

use crate::adapters::status_file::StatusFile;
use crate::app::monitor::PressureMonitor;
use crate::app::ports::{EventSink, SensorPort, TankPort, TimePort};
use crate::app::state::SystemSnapshot;
use crate::config::SystemConfig;
use crate::shutdown::ShutdownToken;

/// Longest single sleep, bounding shutdown latency.
pub const SLEEP_SLICE: Duration = Duration::from_secs(1);

pub struct PollingLoop<S, T, E, C>
where
    S: SensorPort,
    T: TankPort,
    E: EventSink,
    C: TimePort,
{
    monitor: PressureMonitor,
    sensors: S,
    tank: T,
    sink: E,
    clock: C,
    status: Option<StatusFile>,
    last_published: Option<SystemSnapshot>,
    poll_interval: Duration,
}

impl<S, T, E, C> PollingLoop<S, T, E, C>
where
    S: SensorPort,
    T: TankPort,
    E: EventSink,
    C: TimePort,
{
    pub fn new(config: &SystemConfig, sensors: S, tank: T, sink: E, clock: C) -> Self {
        Self {
            monitor: PressureMonitor::new(config),
            sensors,
            tank,
            sink,
            clock,
            status: config.status_path.as_ref().map(StatusFile::new),
            last_published: None,
            poll_interval: Duration::from_secs(config.poll_interval_secs),
        }
    }

    /// Run until `token` is triggered, then close any open interval.
    pub fn run(&mut self, token: &ShutdownToken) {
        self.start();
        info!("Polling every {}s", self.poll_interval.as_secs_f64());
        while !token.is_triggered() {
            self.sleep_interval(token);
            if token.is_triggered() {
                break;
            }
            self.tick();
        }
        info!("Shutdown requested, closing open interval");
        self.shutdown();
    }

    // ── Steps ─────────────────────────────────────────────────

    pub fn start(&mut self) {
        let now = self.clock.now();
        self.monitor
            .start(now, &mut self.sensors, &mut self.tank, &mut self.sink);
        self.publish();
    }

    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.monitor
            .tick(now, &mut self.sensors, &mut self.tank, &mut self.sink);
        self.publish();
    }

    /// Idempotent; only the first call can log an event.
    pub fn shutdown(&mut self) {
        if self.monitor.is_shut_down() {
            return;
        }
        let now = self.clock.now();
        self.monitor.shutdown(now, &mut self.tank, &mut self.sink);
        self.publish();
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn monitor(&self) -> &PressureMonitor {
        &self.monitor
    }

    pub fn sensors_mut(&mut self) -> &mut S {
        &mut self.sensors
    }

    pub fn tank_mut(&mut self) -> &mut T {
        &mut self.tank
    }

    pub fn sink(&self) -> &E {
        &self.sink
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ── Internals ─────────────────────────────────────────────

    fn sleep_interval(&mut self, token: &ShutdownToken) {
        let mut remaining = self.poll_interval;
        while !remaining.is_zero() && !token.is_triggered() {
            let slice = remaining.min(SLEEP_SLICE);
            self.clock.sleep(slice);
            remaining -= slice;
        }
    }

    fn publish(&mut self) {
        let Some(status) = &self.status else {
            return;
        };
        let snapshot = self.monitor.snapshot();
        if self.last_published.as_ref() != Some(&snapshot) {
            status.publish(&snapshot);
            self.last_published = Some(snapshot);
        }
    }
}

impl<S, T, E, C> Drop for PollingLoop<S, T, E, C>
where
    S: SensorPort,
    T: TankPort,
    E: EventSink,
    C: TimePort,
{
    fn drop(&mut self) {
        if !self.monitor.is_shut_down() {
            if std::thread::panicking() {
                warn!("Polling loop unwinding, flushing open interval");
            }
            self.shutdown();
        }
    }
}
