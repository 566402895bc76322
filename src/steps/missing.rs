//! Missing-value imputation.
//!
//! Numeric columns are filled with their mean or median, everything else
//! with the most frequent value. Statistics are computed over the non-null
//! cells of the column being filled.

use super::{mean, median};
use crate::config::{MissingConfig, NumericStrategy};
use crate::report::MissingReport;
use crate::table::{Table, Value, ValueKey};
use std::collections::{BTreeSet, HashMap};

/// Fill nulls in the targeted columns.
///
/// An empty `include` list targets every column; `exclude` always wins.
/// Columns named in `include` that the table lacks are ignored, and a
/// column named twice is filled once.
pub fn impute_missing(mut table: Table, config: &MissingConfig) -> (Table, MissingReport) {
    let mut report = MissingReport::default();

    let targets: BTreeSet<usize> = if config.include.is_empty() {
        (0..table.width()).collect()
    } else {
        config
            .include
            .iter()
            .filter_map(|name| table.column_index(name))
            .collect()
    };

    for idx in targets {
        let Some(name) = table.columns().get(idx).cloned() else {
            continue;
        };
        if config.exclude.contains(&name) {
            continue;
        }

        let nulls = table.null_count(idx);
        if table.is_numeric_column(idx) {
            let fill = numeric_fill(&table, idx, config.numeric_strategy).map(Value::Float);
            report.numeric.insert(name, nulls);
            if let Some(fill) = fill {
                report.cells_filled += fill_nulls(&mut table, idx, &fill);
            }
        } else if let Some(fill) = mode(&table, idx) {
            report.categorical.insert(name, nulls);
            report.cells_filled += fill_nulls(&mut table, idx, &fill);
        }
    }

    (table, report)
}

fn numeric_fill(table: &Table, idx: usize, strategy: NumericStrategy) -> Option<f64> {
    let mut values: Vec<f64> = table.column(idx).filter_map(Value::as_f64).collect();
    match strategy {
        NumericStrategy::Mean => mean(&values),
        NumericStrategy::Median => median(&mut values),
    }
}

/// Most frequent non-null value; ties go to the smallest value.
fn mode(table: &Table, idx: usize) -> Option<Value> {
    let mut counts: HashMap<ValueKey, (&Value, usize)> = HashMap::new();
    for value in table.column(idx).filter(|v| !v.is_null()) {
        counts.entry(value.key()).or_insert((value, 0)).1 += 1;
    }
    counts
        .into_values()
        .max_by(|(a, a_count), (b, b_count)| a_count.cmp(b_count).then_with(|| b.total_cmp(a)))
        .map(|(value, _)| value.clone())
}

fn fill_nulls(table: &mut Table, idx: usize, fill: &Value) -> usize {
    let mut filled = 0;
    for cell in table.column_mut(idx).filter(|v| v.is_null()) {
        *cell = fill.clone();
        filled += 1;
    }
    filled
}
