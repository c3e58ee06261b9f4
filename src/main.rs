//! Pumphouse monitor main entry point.
//!
//! Hexagonal layout: the monitor core only sees port traits; this file
//! wires the Linux adapters to them and runs the polling loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  SensorHub (GPIO)   HttpTankAdapter   CsvEventLog + LogSink  │
//! │  (SensorPort)       (TankPort)        (EventSink)            │
//! │  SystemClock        JsonConfigFile    StatusFile             │
//! │  (TimePort)         (ConfigPort)                             │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ─────────────────      │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │            PressureMonitor (pure logic)                │  │
//! │  │  edges · artifact grace · MAXTIME · tank change        │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  PollingLoop · ShutdownToken (SIGINT / SIGTERM)              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::{info, warn};

use pumphouse::adapters::config_file::JsonConfigFile;
use pumphouse::adapters::csv_log::CsvEventLog;
use pumphouse::adapters::hardware::hardware_sensors;
use pumphouse::adapters::log_sink::LogEventSink;
use pumphouse::adapters::tank_http::HttpTankAdapter;
use pumphouse::adapters::time::SystemClock;
use pumphouse::app::ports::ConfigPort;
use pumphouse::poller::PollingLoop;
use pumphouse::shutdown::{ShutdownToken, install_signal_handlers};

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Pumphouse monitor v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Config ─────────────────────────────────────────────
    let config_file = JsonConfigFile::from_env();
    let config = config_file
        .load()
        .with_context(|| format!("loading {}", config_file.path().display()))?;
    info!(
        "Config: poll={}s tank={}s grace={}s maxtime={}s threshold={} gal",
        config.poll_interval_secs,
        config.tank_interval_secs,
        config.artifact_grace_period_secs,
        config.max_pressure_log_interval_secs,
        config.tank_threshold_gallons,
    );

    // ── 3. Adapters ───────────────────────────────────────────
    let sensors = hardware_sensors(&config);
    info!(
        "GPIO: backend={:?} pressure={} float={}",
        config.gpio_backend, config.pressure_gpio, config.float_gpio
    );

    let tank = HttpTankAdapter::new(&config).context("building tank HTTP client")?;
    if !tank.is_configured() {
        warn!("No tank_url configured, tank readings will be empty");
    }

    let csv = CsvEventLog::new(&config.events_csv_path);
    info!("Events: {}", csv.path().display());
    let sink = (csv, LogEventSink::new());

    // ── 4. Signals ────────────────────────────────────────────
    let token = ShutdownToken::new();
    install_signal_handlers(token.clone()).context("installing signal handlers")?;

    // ── 5. Run ────────────────────────────────────────────────
    let mut poller = PollingLoop::new(&config, sensors, tank, sink, SystemClock::new());
    poller.run(&token);

    let failures = poller.sink().0.write_failures();
    if failures > 0 {
        warn!("{} event rows could not be written", failures);
    }
    info!("Stopped");
    Ok(())
}
