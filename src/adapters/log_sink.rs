//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each classified event to the `log`
//! facade, so the journal shows the same history as the CSV file.

use log::info;

use crate::app::events::{EventType, PressureEvent};
use crate::app::ports::EventSink;

/// Adapter that logs every [`PressureEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn record(&mut self, event: &PressureEvent) {
        let s = &event.snapshot;
        match event.event_type {
            EventType::Init => {
                info!(
                    "EVENT | INIT | float={} | pressure={:?} | tank={:?} gal",
                    s.float_state.as_str(),
                    s.pressure_state,
                    s.tank_gallons,
                );
            }
            EventType::TankChange => {
                info!(
                    "EVENT | TANK_CHANGE | tank={:?} gal | changed={:?} gal",
                    s.tank_gallons, event.gallons_changed,
                );
            }
            kind => {
                info!(
                    "EVENT | {} | {} -> {} | {:.1}s | est={:.2} gal | float={} | tank={:?} gal",
                    kind,
                    event.start_time.format("%H:%M:%S"),
                    event.end_time.format("%H:%M:%S"),
                    event.duration_secs,
                    event.estimated_gallons,
                    s.float_state.as_str(),
                    s.tank_gallons,
                );
            }
        }
    }
}
