//! Ratings normalization onto a 1 to 5 scale.

use super::{mean, median, round_to};
use crate::config::{RatingImpute, RatingsConfig};
use crate::report::RatingsReport;
use crate::table::{Table, Value};
use regex::Regex;
use std::sync::LazyLock;

/// Upper end of the rating scale; the lower end is 1.
pub const SCALE_MAX: f64 = 5.0;

static STARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+(?:\.\d+)?)\s*stars?$").expect("valid regex"));

static FRACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)\s*/\s*(\d+(?:\.\d+)?)$").expect("valid regex")
});

/// Parse one rating: a bare positive number, `"<n> stars"`, or `"<a>/<b>"`.
///
/// The result is clamped into `[1, SCALE_MAX]`. Blank, zero, negative and
/// unrecognized values yield `None`.
pub fn parse_rating(raw: &str) -> Option<f64> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(x) = text.parse::<f64>()
        && x > 0.0
    {
        return Some(clamp(x));
    }
    if let Some(caps) = STARS.captures(text) {
        return caps.get(1)?.as_str().parse::<f64>().ok().map(clamp);
    }
    if let Some(caps) = FRACTION.captures(text) {
        let num: f64 = caps.get(1)?.as_str().parse().ok()?;
        let den: f64 = caps.get(2)?.as_str().parse().ok()?;
        if den > 0.0 {
            return Some(clamp(num / den * SCALE_MAX));
        }
    }
    None
}

fn clamp(x: f64) -> f64 {
    x.clamp(1.0, SCALE_MAX)
}

/// Parse the ratings column and fill what did not parse.
///
/// The fill value is the configured number, or the mean / median of the
/// parsed ratings. Every value is rounded to `decimal_places`.
pub fn standardize_ratings(mut table: Table, config: &RatingsConfig) -> (Table, RatingsReport) {
    let mut report = RatingsReport::default();
    let Some(idx) = config.column.as_deref().and_then(|c| table.column_index(c)) else {
        return (table, report);
    };

    let originals: Vec<Value> = table.column(idx).cloned().collect();
    let parsed: Vec<Option<f64>> = originals
        .iter()
        .map(|v| v.to_text().and_then(|s| parse_rating(&s)))
        .collect();
    report.ratings_changed = parsed.iter().flatten().count();

    let fill = match &config.impute_strategy {
        RatingImpute::Fixed(x) => Some(*x).filter(|x| !x.is_nan()),
        RatingImpute::Named(name) => {
            let mut values: Vec<f64> = parsed.iter().flatten().copied().collect();
            if name == "mean" {
                mean(&values)
            } else {
                median(&mut values)
            }
        }
    };

    report.ratings_imputed = match fill {
        // Nothing to fill with: every unparsed value stays null.
        None => parsed.iter().filter(|p| p.is_none()).count(),
        Some(_) => originals.iter().filter(|v| v.is_null()).count(),
    };

    for (cell, rating) in table.column_mut(idx).zip(parsed) {
        let new = Value::from(rating.or(fill).map(|x| round_to(x, config.decimal_places)));
        if *cell != new {
            report.cells_changed += 1;
            *cell = new;
        }
    }

    (table, report)
}
