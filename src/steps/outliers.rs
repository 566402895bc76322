//! Scale-error outlier correction.
//!
//! A value far above the column median is assumed to have been entered in
//! the wrong unit (paise instead of rupees, say). Dividing by a power of
//! ten that lands it back near the median fixes it.

use super::{median, round_to};
use crate::config::OutliersConfig;
use crate::report::OutliersReport;
use crate::table::{Table, Value};

/// Numeric reading of a cell; numeric text counts.
fn numeric(value: &Value) -> Option<f64> {
    value.as_f64().or_else(|| {
        value
            .as_str()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .filter(|x| !x.is_nan())
    })
}

/// Correct values above `median * high_factor` by the first divisor that
/// brings them into `[median / 10, median * 10]`.
///
/// Corrected cells are rounded to `decimal_places`. Flagged values that no
/// divisor fixes, and everything below the threshold, are left untouched.
pub fn correct_outliers(mut table: Table, config: &OutliersConfig) -> (Table, OutliersReport) {
    let mut report = OutliersReport::default();
    let Some(idx) = config
        .column
        .as_deref()
        .and_then(|c| table.column_index(c))
    else {
        return (table, report);
    };

    let mut values: Vec<f64> = table.column(idx).filter_map(numeric).collect();
    let Some(med) = median(&mut values) else {
        return (table, report);
    };
    report.median = Some(med);

    let threshold = med * config.high_factor;
    let (low, high) = (med / 10.0, med * 10.0);
    for cell in table.column_mut(idx) {
        let Some(x) = numeric(cell) else {
            continue;
        };
        if x <= threshold {
            continue;
        }
        let corrected = config
            .downscale_candidates
            .iter()
            .filter(|d| **d != 0)
            .map(|d| x / f64::from(*d))
            .find(|candidate| (low..=high).contains(candidate));
        match corrected {
            Some(candidate) => {
                *cell = Value::float(round_to(candidate, config.decimal_places));
                report.corrected += 1;
            }
            None => report.flagged += 1,
        }
    }

    (table, report)
}
