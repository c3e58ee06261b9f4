//! Tank-level page parsing and geometry.
//!
//! The tank controller publishes a small status page.  Three things are
//! pulled out of its visible text:
//!
//! | Field          | Looks like                         | Required |
//! |----------------|------------------------------------|----------|
//! | depth          | `<label> 41.5` (inches)            | yes      |
//! | reading age    | `5 minutes ago`, `just now`        | no       |
//! | page percent   | `72%`                              | no       |
//!
//! Percentage and gallons are derived locally from the depth so they stay
//! consistent with the configured tank size.

use chrono::{DateTime, Local, TimeDelta};

use crate::config::SystemConfig;
use crate::app::state::TankReading;
use crate::error::TankError;

/// Values scraped from one page.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTankPage {
    pub depth_inches: f64,
    /// Percentage printed on the page, if any.
    pub pt_percentage: Option<f64>,
    /// How old the page says its reading is.
    pub age: Option<TimeDelta>,
}

/// Parse the visible text of a tank status page.
pub fn parse_tank_page(html: &str, depth_label: &str) -> Result<ParsedTankPage, TankError> {
    let text = visible_text(html).to_lowercase();
    let label = depth_label.to_lowercase();

    let after_label = text
        .find(&label)
        .map(|i| &text[i + label.len()..])
        .ok_or(TankError::Parse("depth label not found"))?;
    let depth_inches =
        leading_number(after_label).ok_or(TankError::Parse("no number after depth label"))?;
    if !(depth_inches.is_finite() && depth_inches >= 0.0) {
        return Err(TankError::Parse("depth out of range"));
    }

    Ok(ParsedTankPage {
        depth_inches,
        pt_percentage: percent_value(&text),
        age: reading_age(&text),
    })
}

/// Converts depth to percentage and gallons for a vertical cylinder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankGeometry {
    pub height_inches: f64,
    pub capacity_gallons: f64,
}

impl TankGeometry {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            height_inches: config.tank_height_inches,
            capacity_gallons: config.tank_capacity_gallons,
        }
    }

    pub fn reading(&self, page: &ParsedTankPage, now: DateTime<Local>) -> TankReading {
        let percentage = (page.depth_inches / self.height_inches * 100.0).clamp(0.0, 100.0);
        TankReading {
            depth_inches: Some(page.depth_inches),
            percentage: Some(round1(percentage)),
            pt_percentage: page.pt_percentage,
            gallons: Some(round1(self.capacity_gallons * percentage / 100.0)),
            last_updated: Some(
                page.age
                    .and_then(|age| now.checked_sub_signed(age))
                    .unwrap_or(now),
            ),
        }
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

// ── Text helpers ──────────────────────────────────────────────

/// Strip tags and entities, collapse whitespace.
fn visible_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    let out = out.replace("&nbsp;", " ").replace("&#37;", "%");
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First decimal number in `s`, skipping separators such as `:` or `=`.
fn leading_number(s: &str) -> Option<f64> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let prefix = &s[..start];
    if prefix.chars().any(char::is_alphabetic) {
        return None;
    }
    let digits: String = s[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.trim_end_matches('.').parse().ok()
}

/// First number immediately followed by `%`.
fn percent_value(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    for (i, _) in text.match_indices('%') {
        let mut end = i;
        while end > 0 && bytes[end - 1] == b' ' {
            end -= 1;
        }
        let mut start = end;
        while start > 0 && (bytes[start - 1].is_ascii_digit() || bytes[start - 1] == b'.') {
            start -= 1;
        }
        if start < end {
            if let Ok(v) = text[start..end].trim_start_matches('.').parse::<f64>() {
                return Some(v);
            }
        }
    }
    None
}

/// Age from phrases like "5 minutes ago", "an hour ago" or "just now".
fn reading_age(text: &str) -> Option<TimeDelta> {
    if text.contains("just now") {
        return Some(TimeDelta::zero());
    }
    let words: Vec<&str> = text.split(' ').collect();
    let ago = words.iter().position(|w| w.trim_end_matches(['.', ',', ')']) == "ago")?;
    if ago < 2 {
        return None;
    }
    let count: i64 = match words[ago - 2] {
        "a" | "an" | "one" => 1,
        n => n.trim_start_matches('(').parse().ok()?,
    };
    if count < 0 {
        return None;
    }
    let unit = words[ago - 1].trim_end_matches('s');
    match unit {
        "second" | "sec" => TimeDelta::try_seconds(count),
        "minute" | "min" => TimeDelta::try_minutes(count),
        "hour" | "hr" => TimeDelta::try_hours(count),
        "day" => TimeDelta::try_days(count),
        _ => None,
    }
}
