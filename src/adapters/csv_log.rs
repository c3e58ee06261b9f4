//! CSV event log adapter.
//!
//! Implements [`EventSink`] by appending one row per [`PressureEvent`] to a
//! CSV file.  The header is written only when the file is created, so
//! restarts keep appending to the same log.  The file is opened per write,
//! which keeps rows intact even if the process is killed between events.
//!
//! Write failures are logged and counted, never propagated: losing one row
//! must not stop the monitor.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::error;

use crate::app::events::PressureEvent;
use crate::app::ports::EventSink;
use crate::error::OutputError;

/// Column order is part of the file format; downstream tools index by name.
pub const CSV_HEADER: &str = "pressure_on_time,pressure_off_time,duration_seconds,\
estimated_gallons,event_type,float_state,float_last_change,tank_gallons,tank_depth,\
tank_percentage,tank_pt_percentage,gallons_changed";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct CsvEventLog {
    path: PathBuf,
    write_failures: u32,
}

impl CsvEventLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_failures: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows that could not be written since start.
    pub fn write_failures(&self) -> u32 {
        self.write_failures
    }

    fn append(&self, row: &str) -> Result<(), OutputError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        if file.metadata()?.len() == 0 {
            writeln!(file, "{CSV_HEADER}")?;
        }
        writeln!(file, "{row}")?;
        file.flush()?;
        Ok(())
    }
}

impl EventSink for CsvEventLog {
    fn record(&mut self, event: &PressureEvent) {
        if let Err(e) = self.append(&format_row(event)) {
            self.write_failures = self.write_failures.saturating_add(1);
            error!(
                "Event log write to {} failed ({} total): {}",
                self.path.display(),
                self.write_failures,
                e
            );
        }
    }
}

/// Render one event as a CSV row (no trailing newline).
pub fn format_row(event: &PressureEvent) -> String {
    let s = &event.snapshot;
    [
        fmt_time(Some(event.start_time)),
        fmt_time(Some(event.end_time)),
        format!("{:.3}", event.duration_secs),
        format!("{:.2}", event.estimated_gallons),
        event.event_type.as_str().to_string(),
        s.float_state.as_str().to_string(),
        fmt_time(s.float_last_change),
        fmt_num(s.tank_gallons, 1),
        fmt_num(s.tank_depth, 2),
        fmt_num(s.tank_percentage, 1),
        fmt_num(s.tank_pt_percentage, 1),
        fmt_num(event.gallons_changed, 1),
    ]
    .join(",")
}

fn fmt_time(t: Option<DateTime<Local>>) -> String {
    t.map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_default()
}

fn fmt_num(v: Option<f64>, decimals: usize) -> String {
    v.map(|v| format!("{v:.decimals$}")).unwrap_or_default()
}
