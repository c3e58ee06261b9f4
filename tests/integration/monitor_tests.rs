//! End-to-end scenarios for the pressure monitor state machine.
//!
//! Each test drives `PressureMonitor` tick by tick at the default 5 s
//! cadence with a synthetic clock and checks the emitted event stream.

use pumphouse::app::events::EventType;
use pumphouse::app::monitor::PressureMonitor;
use pumphouse::app::state::{FloatState, PressureState};
use pumphouse::config::SystemConfig;

use crate::mock_hw::{MockSwitches, MockTank, RecordingSink, at, t0};

const STEP: i64 = 5;

struct Rig {
    monitor: PressureMonitor,
    switches: MockSwitches,
    tank: MockTank,
    sink: RecordingSink,
    /// Seconds since t0 of the last tick.
    clock: i64,
}

impl Rig {
    fn start(pressure: PressureState, float: FloatState) -> Self {
        let mut rig = Self {
            monitor: PressureMonitor::new(&SystemConfig::default()),
            switches: MockSwitches::new(pressure, float),
            tank: MockTank::new(500.0),
            sink: RecordingSink::new(),
            clock: 0,
        };
        rig.monitor
            .start(t0(), &mut rig.switches, &mut rig.tank, &mut rig.sink);
        rig
    }

    fn set(&mut self, pressure: PressureState, float: FloatState) {
        self.switches.pressure = pressure;
        self.switches.float = float;
    }

    fn tick_at(&mut self, secs: i64) {
        self.clock = secs;
        self.monitor
            .tick(at(secs), &mut self.switches, &mut self.tank, &mut self.sink);
    }

    /// Tick every 5 s up to and including `secs`.
    fn run_until(&mut self, secs: i64) {
        while self.clock + STEP <= secs {
            let next = self.clock + STEP;
            self.tick_at(next);
        }
    }

    fn shutdown_at(&mut self, secs: i64) {
        self.monitor
            .shutdown(at(secs), &mut self.tank, &mut self.sink);
    }
}

// ── Deliveries ────────────────────────────────────────────────

#[test]
fn normal_delivery_estimates_gallons() {
    let mut rig = Rig::start(PressureState::Low, FloatState::Calling);
    rig.run_until(5);
    rig.set(PressureState::High, FloatState::Calling);
    rig.run_until(10);
    assert_eq!(rig.monitor.activation_start_time(), Some(at(10)));

    rig.run_until(105);
    rig.set(PressureState::Low, FloatState::Calling);
    rig.run_until(110);

    let normal = rig.sink.of_type(EventType::Normal);
    assert_eq!(normal.len(), 1);
    let e = normal[0];
    assert_eq!(e.start_time, at(10));
    assert_eq!(e.end_time, at(110));
    assert!((e.duration_secs - 100.0).abs() < 1e-9);
    assert!((e.estimated_gallons - 0.98).abs() < 0.005, "got {}", e.estimated_gallons);
    assert!(!rig.monitor.has_open_interval());
}

#[test]
fn short_delivery_is_all_residual_pressure() {
    let mut rig = Rig::start(PressureState::Low, FloatState::Calling);
    rig.set(PressureState::High, FloatState::Calling);
    rig.run_until(25);
    rig.set(PressureState::Low, FloatState::Calling);
    rig.run_until(30);

    let e = rig.sink.of_type(EventType::Normal)[0];
    assert!((e.duration_secs - 25.0).abs() < 1e-9);
    assert_eq!(e.estimated_gallons, 0.0);
}

#[test]
fn pressure_at_start_closes_as_startup() {
    let mut rig = Rig::start(PressureState::High, FloatState::Calling);
    assert_eq!(rig.sink.kinds(), vec![EventType::Init]);
    rig.run_until(200);
    rig.set(PressureState::Low, FloatState::Calling);
    rig.run_until(205);

    assert_eq!(rig.sink.kinds(), vec![EventType::Init, EventType::Startup]);
    let e = rig.sink.last();
    assert_eq!(e.start_time, t0());
    assert!((e.duration_secs - 205.0).abs() < 1e-9);
}

// ── Artifacts ─────────────────────────────────────────────────

#[test]
fn artifact_waits_for_grace_period() {
    let mut rig = Rig::start(PressureState::Low, FloatState::Full);
    rig.set(PressureState::High, FloatState::Full);
    rig.run_until(10);
    assert!(rig.monitor.is_artifact());
    assert_eq!(rig.monitor.artifact_start_time(), Some(at(5)));

    rig.set(PressureState::Low, FloatState::Full);
    rig.run_until(20);
    assert_eq!(rig.monitor.pressure_low_since(), Some(at(15)));

    // Still within grace: nothing logged yet.
    rig.run_until(310);
    assert!(rig.sink.of_type(EventType::PressureArtifact).is_empty());
    assert!(rig.monitor.is_artifact());

    rig.run_until(315);
    let artifacts = rig.sink.of_type(EventType::PressureArtifact);
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].start_time, at(5));
    assert_eq!(artifacts[0].end_time, at(15));
    assert_eq!(artifacts[0].estimated_gallons, 0.0);
    assert!(!rig.monitor.has_open_interval());
}

#[test]
fn pressure_blip_restarts_grace_period() {
    let mut rig = Rig::start(PressureState::Low, FloatState::Full);
    rig.set(PressureState::High, FloatState::Full);
    rig.run_until(5);
    rig.set(PressureState::Low, FloatState::Full);
    rig.run_until(200);
    assert_eq!(rig.monitor.pressure_low_since(), Some(at(10)));

    // Brief return of pressure: same artifact, grace cleared.
    rig.set(PressureState::High, FloatState::Full);
    rig.run_until(205);
    assert_eq!(rig.monitor.pressure_low_since(), None);
    assert_eq!(rig.monitor.artifact_start_time(), Some(at(5)));

    rig.set(PressureState::Low, FloatState::Full);
    rig.run_until(505);
    assert!(rig.sink.of_type(EventType::PressureArtifact).is_empty());

    rig.run_until(510);
    let artifacts = rig.sink.of_type(EventType::PressureArtifact);
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].start_time, at(5));
    assert_eq!(artifacts[0].end_time, at(210));
}

#[test]
fn float_calling_converts_artifact_to_delivery() {
    let mut rig = Rig::start(PressureState::Low, FloatState::Full);
    rig.set(PressureState::High, FloatState::Full);
    rig.run_until(95);

    rig.set(PressureState::High, FloatState::Calling);
    rig.run_until(100);
    let artifacts = rig.sink.of_type(EventType::PressureArtifact);
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].start_time, at(5));
    assert_eq!(artifacts[0].end_time, at(100));
    assert_eq!(rig.monitor.activation_start_time(), Some(at(100)));

    rig.run_until(200);
    rig.set(PressureState::Low, FloatState::Calling);
    rig.run_until(205);
    let normal = rig.sink.of_type(EventType::Normal);
    assert_eq!(normal.len(), 1);
    assert_eq!(normal[0].start_time, at(100));
    assert!((normal[0].duration_secs - 105.0).abs() < 1e-9);
}

#[test]
fn float_calling_during_grace_ends_artifact_at_pressure_drop() {
    let mut rig = Rig::start(PressureState::Low, FloatState::Full);
    rig.set(PressureState::High, FloatState::Full);
    rig.run_until(50);
    rig.set(PressureState::Low, FloatState::Full);
    rig.run_until(100);
    assert_eq!(rig.monitor.pressure_low_since(), Some(at(55)));

    rig.set(PressureState::High, FloatState::Calling);
    rig.run_until(105);
    let e = rig.sink.of_type(EventType::PressureArtifact)[0];
    assert_eq!(e.end_time, at(55));
    assert_eq!(rig.monitor.activation_start_time(), Some(at(105)));
}

// ── MAXTIME ───────────────────────────────────────────────────

#[test]
fn long_delivery_checkpoints_once_per_max_interval() {
    let mut rig = Rig::start(PressureState::Low, FloatState::Calling);
    rig.set(PressureState::High, FloatState::Calling);
    rig.run_until(1800);
    assert!(rig.sink.of_type(EventType::Maxtime).is_empty());

    rig.run_until(1805);
    let maxtime = rig.sink.of_type(EventType::Maxtime);
    assert_eq!(maxtime.len(), 1);
    assert_eq!(maxtime[0].start_time, at(5));
    assert_eq!(maxtime[0].end_time, at(1805));
    assert!(rig.monitor.has_open_interval());
    assert_eq!(rig.monitor.activation_start_time(), Some(at(1805)));

    rig.run_until(3600);
    assert_eq!(rig.sink.of_type(EventType::Maxtime).len(), 1);

    rig.set(PressureState::Low, FloatState::Calling);
    rig.run_until(3605);
    let normal = rig.sink.of_type(EventType::Normal);
    assert_eq!(normal.len(), 1);
    assert_eq!(normal[0].start_time, at(1805));
}

#[test]
fn startup_delivery_keeps_tag_across_maxtime() {
    let mut rig = Rig::start(PressureState::High, FloatState::Calling);
    rig.run_until(1900);
    rig.set(PressureState::Low, FloatState::Calling);
    rig.run_until(1905);
    assert_eq!(
        rig.sink.kinds(),
        vec![EventType::Init, EventType::Maxtime, EventType::Startup]
    );
}

// ── Shutdown ──────────────────────────────────────────────────

#[test]
fn shutdown_closes_open_delivery_exactly_once() {
    let mut rig = Rig::start(PressureState::Low, FloatState::Calling);
    rig.set(PressureState::High, FloatState::Calling);
    rig.run_until(65);
    rig.shutdown_at(67);
    rig.shutdown_at(70);
    rig.run_until(120);

    let closes = rig.sink.of_type(EventType::Shutdown);
    assert_eq!(closes.len(), 1);
    assert!((closes[0].duration_secs - 62.0).abs() < 1e-9);
    assert_eq!(rig.sink.events.len(), 2, "INIT + SHUTDOWN only");
}

#[test]
fn shutdown_closes_open_artifact() {
    let mut rig = Rig::start(PressureState::High, FloatState::Full);
    rig.set(PressureState::Low, FloatState::Full);
    rig.run_until(30);
    rig.shutdown_at(40);
    assert_eq!(
        rig.sink.kinds(),
        vec![EventType::Init, EventType::PressureArtifact]
    );
    assert_eq!(rig.sink.last().end_time, at(5));
}

#[test]
fn shutdown_while_idle_logs_nothing() {
    let mut rig = Rig::start(PressureState::Low, FloatState::Calling);
    rig.run_until(60);
    rig.shutdown_at(60);
    assert_eq!(rig.sink.kinds(), vec![EventType::Init]);
}

// ── Tank changes ──────────────────────────────────────────────

#[test]
fn tank_change_suppressed_during_artifact_then_logged() {
    let mut rig = Rig::start(PressureState::Low, FloatState::Full);
    rig.set(PressureState::High, FloatState::Full);
    rig.run_until(5);
    rig.tank.gallons = Some(560.0);
    rig.run_until(60);
    assert_eq!(rig.monitor.snapshot().tank_gallons, Some(560.0));
    assert!(rig.sink.of_type(EventType::TankChange).is_empty());

    rig.set(PressureState::Low, FloatState::Full);
    rig.run_until(370);
    assert_eq!(rig.sink.of_type(EventType::PressureArtifact).len(), 1);

    rig.tank.gallons = Some(600.0);
    rig.run_until(420);
    let changes = rig.sink.of_type(EventType::TankChange);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].start_time, at(360));
    assert_eq!(changes[0].end_time, at(420));
    assert_eq!(changes[0].estimated_gallons, 0.0);
    assert_eq!(changes[0].gallons_changed, Some(40.0));
}

#[test]
fn small_tank_moves_are_ignored() {
    let mut rig = Rig::start(PressureState::Low, FloatState::Calling);
    rig.tank.gallons = Some(501.5);
    rig.run_until(60);
    assert!(rig.sink.of_type(EventType::TankChange).is_empty());

    rig.tank.gallons = Some(503.5);
    rig.run_until(120);
    assert_eq!(rig.sink.of_type(EventType::TankChange).len(), 1);
}

#[test]
fn tank_outage_keeps_polling_and_recovers() {
    let mut rig = Rig::start(PressureState::Low, FloatState::Calling);
    rig.tank.gallons = None;
    rig.run_until(180);
    let snap = rig.monitor.snapshot();
    assert_eq!(snap.consecutive_tank_errors, 3);
    assert_eq!(snap.tank_gallons, Some(500.0));
    assert!(snap.last_tank_error.is_some());

    rig.tank.gallons = Some(500.0);
    rig.run_until(240);
    assert_eq!(rig.monitor.snapshot().consecutive_tank_errors, 0);
    assert!(rig.sink.of_type(EventType::TankChange).is_empty());
}

#[test]
fn events_carry_state_snapshot() {
    let mut rig = Rig::start(PressureState::Low, FloatState::Calling);
    rig.set(PressureState::High, FloatState::Calling);
    rig.run_until(5);
    rig.tank.gallons = Some(510.0);
    rig.set(PressureState::Low, FloatState::Calling);
    rig.run_until(100);

    let e = rig.sink.of_type(EventType::Normal)[0];
    assert_eq!(e.snapshot.tank_gallons, Some(510.0));
    assert_eq!(e.snapshot.float_state, FloatState::Calling);
    assert_eq!(e.snapshot.pressure_state, PressureState::Low);
    assert_eq!(e.snapshot.activation_start_time, None);
    assert_eq!(e.gallons_changed, Some(10.0));
}
