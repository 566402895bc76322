//! Delivery SLA parsing into whole days.

use crate::config::DeliveryConfig;
use crate::report::DeliveryReport;
use crate::table::{Table, Value};
use regex::Regex;
use std::num::IntErrorKind;
use std::sync::LazyLock;

/// Leading `a-b` range; an en dash also separates the bounds.
static RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*[-–]\s*(\d+)").expect("valid regex"));

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)").expect("valid regex"));

/// Days promised by an SLA string: `"same day"` is 0, `"3-5 days"` is 5,
/// `"7 days"` is 7. Anything else is `None`.
pub fn parse_days(raw: &str) -> Option<i64> {
    let text = raw.trim().to_lowercase();
    if text == "same day" || text == "sameday" {
        return Some(0);
    }
    if let Some(caps) = RANGE.captures(&text) {
        let low = whole_days(caps.get(1)?.as_str())?;
        let high = whole_days(caps.get(2)?.as_str())?;
        return Some(low.max(high));
    }
    LEADING_NUMBER
        .captures(&text)
        .and_then(|caps| whole_days(caps.get(1)?.as_str()))
}

/// Digit run as days, saturating at `i64::MAX` so oversized values still clip.
fn whole_days(digits: &str) -> Option<i64> {
    match digits.parse::<i64>() {
        Ok(days) => Some(days),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => Some(i64::MAX),
        Err(_) => None,
    }
}

/// Parse the delivery column into `Int` days.
///
/// Unparseable and negative values become null. With `clip_max`, parsed
/// values are capped at `max_days`.
pub fn standardize_delivery(mut table: Table, config: &DeliveryConfig) -> (Table, DeliveryReport) {
    let mut report = DeliveryReport::default();
    let Some(idx) = config
        .column
        .as_deref()
        .and_then(|c| table.column_index(c))
    else {
        return (table, report);
    };

    for cell in table.column_mut(idx) {
        if cell.is_null() {
            continue;
        }
        let days = cell
            .to_text()
            .and_then(|raw| parse_days(&raw))
            .filter(|d| *d >= 0)
            .map(|d| if config.clip_max { d.min(config.max_days) } else { d });
        if days.is_none() {
            report.delivery_nullified += 1;
        }
        let new = Value::from(days);
        if *cell != new {
            report.delivery_changed += 1;
            *cell = new;
        }
    }

    (table, report)
}
