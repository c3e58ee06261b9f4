//! Pressure monitor: the event-classification state machine.
//!
//! [`PressureMonitor`] owns the [`SystemState`] and the open-interval
//! bookkeeping.  It is driven one tick at a time by the polling loop and
//! talks to the outside world only through the port traits passed into
//! each call, so the whole machine runs under test with scripted doubles
//! and a synthetic clock.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                 │     PressureMonitor      │
//!   TankPort  ──▶ │ edges · grace · MAXTIME  │
//!                 └──────────────────────────┘
//! ```
//!
//! ## Intervals
//!
//! At most one interval is open at a time:
//!
//! | Interval   | Opened when                         | Closed when                               |
//! |------------|-------------------------------------|-------------------------------------------|
//! | `Delivery` | pressure rises, float not full      | pressure falls (no grace) or shutdown     |
//! | `Artifact` | pressure rises, float full          | low for the grace period, float calls, or shutdown |
//!
//! A delivery that was already running at process start is tagged
//! `STARTUP` instead of `NORMAL` because its real start is unknown.
//! Long deliveries are checkpointed as `MAXTIME`, which restarts the
//! checkpoint clock but keeps the interval (and its tag) open.

use chrono::{DateTime, Local, TimeDelta};
use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::control::gallons::GallonsEstimator;

use super::events::{EventType, PressureEvent};
use super::ports::{EventSink, SensorPort, TankPort};
use super::state::{FloatState, PressureState, SystemSnapshot, SystemState};

/// The interval currently being tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenInterval {
    Idle,
    /// Water is being delivered to this tank.
    Delivery {
        /// Start of the current checkpoint segment.
        start: DateTime<Local>,
        from_startup: bool,
    },
    /// Pressure attributed to a shared draw.
    Artifact {
        start: DateTime<Local>,
        /// Set while pressure is low and the grace period is running.
        low_since: Option<DateTime<Local>>,
    },
}

/// Pressure-interval classifier.
pub struct PressureMonitor {
    estimator: GallonsEstimator,
    state: SystemState,
    interval: OpenInterval,
    /// Last valid (non-`Unknown`) pressure reading.
    pressure: PressureState,

    grace: TimeDelta,
    max_interval: TimeDelta,
    tank_interval: TimeDelta,
    tank_threshold: f64,
    last_tank_poll: Option<DateTime<Local>>,

    started: bool,
    shut_down: bool,
}

impl PressureMonitor {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            estimator: GallonsEstimator::from_config(config),
            state: SystemState::new(),
            interval: OpenInterval::Idle,
            pressure: PressureState::Unknown,
            grace: secs(config.artifact_grace_period_secs),
            max_interval: secs(config.max_pressure_log_interval_secs),
            tank_interval: secs(config.tank_interval_secs),
            tank_threshold: config.tank_threshold_gallons,
            last_tank_poll: None,
            started: false,
            shut_down: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Take the initial readings, log `INIT`, and open an interval if
    /// pressure is already present.
    pub fn start(
        &mut self,
        now: DateTime<Local>,
        sensors: &mut impl SensorPort,
        tank: &mut impl TankPort,
        sink: &mut impl EventSink,
    ) {
        if self.started {
            return;
        }
        self.started = true;

        let float = sensors.read_float();
        self.state.update_float(float, now);
        self.fetch_tank(now, tank);

        let pressure = sensors.read_pressure();
        if pressure == PressureState::High {
            if float == FloatState::Full {
                info!("Startup: pressure present with float FULL, tracking as artifact");
                self.interval = OpenInterval::Artifact {
                    start: now,
                    low_since: None,
                };
            } else {
                info!("Startup: pressure already present, tracking as STARTUP delivery");
                self.interval = OpenInterval::Delivery {
                    start: now,
                    from_startup: true,
                };
            }
        }
        if pressure != PressureState::Unknown {
            self.pressure = pressure;
        }
        self.log(EventType::Init, now, now, 0.0, sink);
    }

    /// Run one poll: classify the pressure edge, service the artifact
    /// grace timer and MAXTIME checkpoint, then poll the tank if due.
    pub fn tick(
        &mut self,
        now: DateTime<Local>,
        sensors: &mut impl SensorPort,
        tank: &mut impl TankPort,
        sink: &mut impl EventSink,
    ) {
        if !self.started || self.shut_down {
            return;
        }

        let pressure = sensors.read_pressure();
        if pressure == PressureState::Unknown {
            debug!("Pressure unreadable, skipping tick");
            return;
        }
        let previous = self.pressure;
        self.pressure = pressure;

        let float = sensors.read_float();
        let prev_float = self.state.float_state();
        if self.state.update_float(float, now) {
            info!("Float: {} -> {}", prev_float.as_str(), float.as_str());
        }

        // The tank became ready mid-artifact: the rest of this pressure
        // run is a real delivery.
        if pressure == PressureState::High && float == FloatState::Calling {
            if let OpenInterval::Artifact { start, low_since } = self.interval {
                info!("Float calling during artifact, converting to delivery");
                self.interval = OpenInterval::Delivery {
                    start: now,
                    from_startup: false,
                };
                self.log_artifact(start, low_since.unwrap_or(now), sink);
            }
        }

        match (pressure, previous == PressureState::High) {
            (PressureState::High, false) => self.on_pressure_rise(now, float),
            (PressureState::Low, true) => self.on_pressure_fall(now, tank, sink),
            _ => {}
        }

        match pressure {
            PressureState::Low => self.confirm_artifact_end(now, sink),
            PressureState::High => self.checkpoint_delivery(now, sink),
            PressureState::Unknown => {}
        }

        self.sync_pressure();

        if self.tank_poll_due(now) {
            self.poll_tank(now, tank, sink);
        }
    }

    /// Close whatever is open.  Safe to call more than once; only the
    /// first call logs.
    pub fn shutdown(
        &mut self,
        now: DateTime<Local>,
        tank: &mut impl TankPort,
        sink: &mut impl EventSink,
    ) {
        if !self.started || self.shut_down {
            return;
        }
        self.shut_down = true;

        match self.interval {
            OpenInterval::Artifact { start, low_since } => {
                self.interval = OpenInterval::Idle;
                info!("Shutdown: closing open artifact");
                self.log_artifact(start, low_since.unwrap_or(now), sink);
            }
            OpenInterval::Delivery { start, .. } => {
                self.interval = OpenInterval::Idle;
                self.fetch_tank(now, tank);
                info!("Shutdown: closing open delivery");
                self.log_delivery(EventType::Shutdown, start, now, sink);
            }
            OpenInterval::Idle => {}
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Owned copy of the current system state.
    pub fn snapshot(&self) -> SystemSnapshot {
        self.state.snapshot()
    }

    /// Start of the open delivery's current segment, if any.
    pub fn activation_start_time(&self) -> Option<DateTime<Local>> {
        match self.interval {
            OpenInterval::Delivery { start, .. } => Some(start),
            _ => None,
        }
    }

    pub fn artifact_start_time(&self) -> Option<DateTime<Local>> {
        match self.interval {
            OpenInterval::Artifact { start, .. } => Some(start),
            _ => None,
        }
    }

    /// When pressure dropped during the open artifact, if the grace timer is running.
    pub fn pressure_low_since(&self) -> Option<DateTime<Local>> {
        match self.interval {
            OpenInterval::Artifact { low_since, .. } => low_since,
            _ => None,
        }
    }

    pub fn is_artifact(&self) -> bool {
        matches!(self.interval, OpenInterval::Artifact { .. })
    }

    pub fn has_open_interval(&self) -> bool {
        self.interval != OpenInterval::Idle
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    // ── Transitions ───────────────────────────────────────────

    fn on_pressure_rise(&mut self, now: DateTime<Local>, float: FloatState) {
        match self.interval {
            OpenInterval::Artifact {
                start,
                low_since: Some(_),
            } => {
                debug!("Pressure returned during artifact grace period");
                self.interval = OpenInterval::Artifact {
                    start,
                    low_since: None,
                };
            }
            OpenInterval::Artifact { .. } | OpenInterval::Delivery { .. } => {}
            OpenInterval::Idle if float == FloatState::Full => {
                info!("Pressure HIGH with float FULL, artifact started");
                self.interval = OpenInterval::Artifact {
                    start: now,
                    low_since: None,
                };
            }
            OpenInterval::Idle => {
                info!("Pressure HIGH, delivery started");
                self.interval = OpenInterval::Delivery {
                    start: now,
                    from_startup: false,
                };
            }
        }
    }

    fn on_pressure_fall(
        &mut self,
        now: DateTime<Local>,
        tank: &mut impl TankPort,
        sink: &mut impl EventSink,
    ) {
        match self.interval {
            OpenInterval::Artifact {
                start,
                low_since: None,
            } => {
                debug!("Pressure LOW during artifact, grace period started");
                self.interval = OpenInterval::Artifact {
                    start,
                    low_since: Some(now),
                };
            }
            OpenInterval::Delivery {
                start,
                from_startup,
            } => {
                let kind = if from_startup {
                    EventType::Startup
                } else {
                    EventType::Normal
                };
                self.interval = OpenInterval::Idle;
                // Re-read so the logged level reflects the finished delivery.
                self.fetch_tank(now, tank);
                self.log_delivery(kind, start, now, sink);
            }
            OpenInterval::Artifact { .. } | OpenInterval::Idle => {}
        }
    }

    fn confirm_artifact_end(&mut self, now: DateTime<Local>, sink: &mut impl EventSink) {
        if let OpenInterval::Artifact {
            start,
            low_since: Some(low_since),
        } = self.interval
        {
            if now - low_since >= self.grace {
                self.interval = OpenInterval::Idle;
                info!("Artifact ended (low since {})", low_since.format("%H:%M:%S"));
                self.log_artifact(start, low_since, sink);
            }
        }
    }

    fn checkpoint_delivery(&mut self, now: DateTime<Local>, sink: &mut impl EventSink) {
        if let OpenInterval::Delivery {
            start,
            from_startup,
        } = self.interval
        {
            if now - start >= self.max_interval {
                self.interval = OpenInterval::Delivery {
                    start: now,
                    from_startup,
                };
                info!("Delivery still running, MAXTIME checkpoint");
                self.log_delivery(EventType::Maxtime, start, now, sink);
            }
        }
    }

    // ── Tank ──────────────────────────────────────────────────

    fn tank_poll_due(&self, now: DateTime<Local>) -> bool {
        self.last_tank_poll
            .is_none_or(|last| now - last >= self.tank_interval)
    }

    fn poll_tank(
        &mut self,
        now: DateTime<Local>,
        tank: &mut impl TankPort,
        sink: &mut impl EventSink,
    ) {
        let since = self.last_tank_poll.unwrap_or(now);
        let previous = self.state.tank_gallons();
        if !self.fetch_tank(now, tank) {
            return;
        }
        let (Some(prev), Some(cur)) = (previous, self.state.tank_gallons()) else {
            return;
        };
        let delta = cur - prev;
        if delta == 0.0 || delta.abs() < self.tank_threshold {
            return;
        }
        if self.is_artifact() {
            debug!("Tank moved {:+.1} gal during artifact, not logged", delta);
            return;
        }
        info!("Tank changed {:+.1} gal ({:.0} -> {:.0})", delta, prev, cur);
        self.log(EventType::TankChange, since, now, 0.0, sink);
    }

    /// Fetch and store a tank reading.  Returns `false` on failure, leaving
    /// the previous (stale) values in place.
    fn fetch_tank(&mut self, now: DateTime<Local>, tank: &mut impl TankPort) -> bool {
        self.last_tank_poll = Some(now);
        match tank.fetch_tank() {
            Ok(reading) => {
                let errors = self.state.consecutive_tank_errors();
                if errors > 0 {
                    info!("Tank source recovered after {} failed fetches", errors);
                }
                let float = self.state.float_state();
                if self.state.update_tank(&reading, float) {
                    debug!("Tank reading updated: {:?} gal", reading.gallons);
                }
                self.state.record_tank_success();
                true
            }
            Err(e) => {
                let errors = self.state.record_tank_error(e.to_string());
                warn!("Tank fetch failed ({} consecutive): {}", errors, e);
                false
            }
        }
    }

    // ── Logging ───────────────────────────────────────────────

    fn sync_pressure(&mut self) {
        let activation = self.activation_start_time();
        self.state.update_pressure(self.pressure, activation);
    }

    fn log_delivery(
        &mut self,
        kind: EventType,
        start: DateTime<Local>,
        end: DateTime<Local>,
        sink: &mut impl EventSink,
    ) {
        let gallons = self
            .estimator
            .estimate(PressureEvent::seconds_between(start, end));
        self.log(kind, start, end, gallons, sink);
    }

    /// Artifacts never count as water delivered to this tank.
    fn log_artifact(
        &mut self,
        start: DateTime<Local>,
        end: DateTime<Local>,
        sink: &mut impl EventSink,
    ) {
        self.log(EventType::PressureArtifact, start, end, 0.0, sink);
    }

    fn log(
        &mut self,
        event_type: EventType,
        start: DateTime<Local>,
        end: DateTime<Local>,
        estimated_gallons: f64,
        sink: &mut impl EventSink,
    ) {
        self.sync_pressure();
        let snapshot = self.state.snapshot();
        let gallons_changed = match (snapshot.tank_gallons, snapshot.last_logged_gallons) {
            (Some(now), Some(before)) => Some(now - before),
            _ => None,
        };
        if snapshot.tank_gallons.is_some() {
            self.state.set_last_logged_gallons(snapshot.tank_gallons);
        }

        let event = PressureEvent {
            start_time: start,
            end_time: end,
            duration_secs: PressureEvent::seconds_between(start, end),
            estimated_gallons,
            event_type,
            gallons_changed,
            snapshot,
        };
        sink.record(&event);
    }
}

/// Saturates at `TimeDelta::MAX` so an oversized setting means "never".
fn secs(v: u64) -> TimeDelta {
    i64::try_from(v)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}
