//! Fuzz target: tank status page parser
//!
//! Feeds arbitrary bytes (lossily decoded as UTF-8) to `parse_tank_page`
//! and checks that a successful parse always yields a finite,
//! non-negative depth and a percentage within 0–100 after geometry.
//!
//! cargo fuzz run fuzz_tank_page

#![no_main]

use chrono::Local;
use libfuzzer_sys::fuzz_target;
use pumphouse::sensors::tank::{TankGeometry, parse_tank_page};

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);
    let Ok(page) = parse_tank_page(&html, "Depth") else {
        return;
    };

    assert!(page.depth_inches.is_finite() && page.depth_inches >= 0.0);

    let geometry = TankGeometry {
        height_inches: 58.0,
        capacity_gallons: 1400.0,
    };
    let reading = geometry.reading(&page, Local::now());
    let pct = reading.percentage.unwrap_or_default();
    assert!((0.0..=100.0).contains(&pct), "percentage {pct} out of range");
});
