//! Polling loop tests: cadence, cancellation, and the shutdown flush on
//! both the normal and the panic path.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use pumphouse::app::events::EventType;
use pumphouse::app::state::{FloatState, PressureState};
use pumphouse::config::SystemConfig;
use pumphouse::poller::PollingLoop;
use pumphouse::shutdown::ShutdownToken;

use crate::mock_hw::{
    FakeClock, MockTank, RecordingSink, ScriptedSwitches, SharedSink, at, sim_time,
};

use PressureState::{High, Low, Unknown};

fn delivery_script() -> Vec<(i64, PressureState, FloatState)> {
    vec![
        (0, Low, FloatState::Calling),
        (10, High, FloatState::Calling),
        (110, Low, FloatState::Calling),
    ]
}

#[test]
fn run_logs_delivery_and_stops_on_token() {
    let time = sim_time();
    let token = ShutdownToken::new();
    let mut poller = PollingLoop::new(
        &SystemConfig::default(),
        ScriptedSwitches::new(time.clone(), delivery_script()),
        MockTank::new(500.0),
        RecordingSink::new(),
        FakeClock::new(time.clone()).stop_at(300, token.clone()),
    );
    poller.run(&token);

    let sink = poller.sink();
    assert_eq!(sink.kinds(), vec![EventType::Init, EventType::Normal]);
    let normal = sink.last();
    assert_eq!(normal.start_time, at(10));
    assert_eq!(normal.end_time, at(110));
    assert!(poller.monitor().is_shut_down());
}

#[test]
fn sleeps_in_short_slices() {
    let time = sim_time();
    let token = ShutdownToken::new();
    let mut config = SystemConfig::default();
    config.poll_interval_secs = 5;
    let mut poller = PollingLoop::new(
        &config,
        ScriptedSwitches::new(time.clone(), delivery_script()),
        MockTank::new(500.0),
        RecordingSink::new(),
        FakeClock::new(time.clone()).stop_at(60, token.clone()),
    );
    poller.run(&token);

    assert!(poller.clock().longest_sleep <= Duration::from_secs(1));
    assert_eq!(poller.clock().sleeps, 60);
}

#[test]
fn token_mid_delivery_logs_shutdown() {
    let time = sim_time();
    let token = ShutdownToken::new();
    let mut poller = PollingLoop::new(
        &SystemConfig::default(),
        ScriptedSwitches::new(time.clone(), delivery_script()),
        MockTank::new(500.0),
        RecordingSink::new(),
        FakeClock::new(time.clone()).stop_at(63, token.clone()),
    );
    poller.run(&token);

    let closes = poller.sink().of_type(EventType::Shutdown);
    assert_eq!(closes.len(), 1);
    assert_eq!(closes[0].start_time, at(10));
    assert_eq!(closes[0].end_time, at(63));

    // A later explicit shutdown (or the drop) adds nothing.
    poller.shutdown();
    assert_eq!(poller.sink().of_type(EventType::Shutdown).len(), 1);
}

#[test]
fn panic_in_tick_still_flushes_open_delivery() {
    let time = sim_time();
    let shared = SharedSink::default();
    let token = ShutdownToken::new();

    let result = catch_unwind(AssertUnwindSafe(|| {
        let mut switches = ScriptedSwitches::new(time.clone(), delivery_script());
        switches.panic_after = Some(50);
        let mut poller = PollingLoop::new(
            &SystemConfig::default(),
            switches,
            MockTank::new(500.0),
            shared.clone(),
            FakeClock::new(time.clone()),
        );
        poller.run(&token);
    }));
    assert!(result.is_err(), "sensor fault should propagate");

    let events = shared.0.lock().unwrap();
    let kinds: Vec<EventType> = events.iter().map(|e| e.event_type).collect();
    assert_eq!(kinds, vec![EventType::Init, EventType::Shutdown]);
    assert_eq!(events[1].start_time, at(10));
    assert_eq!(events[1].end_time, at(50));
}

#[test]
fn unknown_pressure_skips_tank_polls() {
    let time = sim_time();
    let token = ShutdownToken::new();
    let mut poller = PollingLoop::new(
        &SystemConfig::default(),
        ScriptedSwitches::new(time.clone(), vec![(0, Unknown, FloatState::Calling)]),
        MockTank::new(500.0),
        RecordingSink::new(),
        FakeClock::new(time.clone()).stop_at(600, token.clone()),
    );
    poller.run(&token);

    assert_eq!(poller.tank_mut().fetches, 1, "only the startup fetch");
    assert_eq!(poller.sink().kinds(), vec![EventType::Init]);
}

#[test]
fn status_file_tracks_snapshot() {
    let path = std::env::temp_dir().join(format!(
        "pumphouse-poller-status-{}.json",
        std::process::id()
    ));
    let mut config = SystemConfig::default();
    config.status_path = Some(path.to_string_lossy().into_owned());

    let time = sim_time();
    let token = ShutdownToken::new();
    let mut poller = PollingLoop::new(
        &config,
        ScriptedSwitches::new(time.clone(), delivery_script()),
        MockTank::new(640.0),
        RecordingSink::new(),
        FakeClock::new(time.clone()).stop_at(30, token.clone()),
    );
    poller.run(&token);

    let text = std::fs::read_to_string(&path).unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["tank_gallons"], 640.0);
    assert_eq!(v["pressure_state"], "HIGH");
    assert_eq!(v["float_state"], "CALLING");
    std::fs::remove_file(path).ok();
}
