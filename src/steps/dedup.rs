//! Key-based deduplication and quantity aggregation.

use crate::config::{DedupConfig, DedupStrategy};
use crate::report::DedupReport;
use crate::table::{Table, Value, ValueKey};
use std::collections::{HashMap, HashSet};

/// Remove or merge rows that share a key tuple.
///
/// Only the configured keys the table actually has take part; the others
/// are reported in `missing_keys`. With no usable key the table is returned
/// untouched and the report is marked `skipped`.
///
/// `aggregate` needs the quantity column to be present, otherwise it falls
/// back to `keep_first`. Aggregated groups come out ordered by key.
pub fn deduplicate(table: Table, config: &DedupConfig) -> (Table, DedupReport) {
    let mut report = DedupReport::default();
    if config.key_fields.is_empty() {
        report.kept = table.height();
        return (table, report);
    }

    let mut key_indices = Vec::new();
    for key in &config.key_fields {
        match table.column_index(key) {
            Some(idx) => key_indices.push(idx),
            None => report.missing_keys.push(key.clone()),
        }
    }
    if key_indices.is_empty() {
        report.kept = table.height();
        report.skipped = true;
        return (table, report);
    }

    let quantity = config
        .quantity_field
        .as_deref()
        .and_then(|q| table.column_index(q));
    let before = table.height();
    let out = match (config.strategy, quantity) {
        (DedupStrategy::Aggregate, Some(qty_idx)) => {
            report.aggregated = true;
            aggregate(table, &key_indices, qty_idx)
        }
        _ => keep_first(table, &key_indices),
    };
    report.kept = out.height();
    report.dropped = before - report.kept;
    (out, report)
}

fn key_of(row: &[Value], key_indices: &[usize]) -> Vec<ValueKey> {
    key_indices
        .iter()
        .map(|idx| row.get(*idx).map_or(ValueKey::Null, Value::key))
        .collect()
}

fn keep_first(table: Table, key_indices: &[usize]) -> Table {
    let mut seen = HashSet::new();
    let (columns, rows) = table.into_rows();
    let kept = rows
        .into_iter()
        .filter(|row| seen.insert(key_of(row, key_indices)))
        .collect();
    Table::new(columns).with_rows(kept)
}

/// One row per key: the quantity is summed and every other column takes the
/// group's first non-null value.
fn aggregate(table: Table, key_indices: &[usize], qty_idx: usize) -> Table {
    let (columns, rows) = table.into_rows();

    let mut groups: Vec<Vec<Vec<Value>>> = Vec::new();
    let mut index: HashMap<Vec<ValueKey>, usize> = HashMap::new();
    for row in rows {
        let key = key_of(&row, key_indices);
        match index.get(&key) {
            Some(&slot) => {
                if let Some(group) = groups.get_mut(slot) {
                    group.push(row);
                }
            }
            None => {
                index.insert(key, groups.len());
                groups.push(vec![row]);
            }
        }
    }

    let mut merged: Vec<Vec<Value>> = groups
        .into_iter()
        .map(|group| merge_group(group, qty_idx))
        .collect();
    merged.sort_by(|a, b| {
        key_indices
            .iter()
            .map(|idx| match (a.get(*idx), b.get(*idx)) {
                (Some(x), Some(y)) => x.total_cmp(y),
                _ => std::cmp::Ordering::Equal,
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Table::new(columns).with_rows(merged)
}

fn merge_group(group: Vec<Vec<Value>>, qty_idx: usize) -> Vec<Value> {
    let width = group.first().map_or(0, Vec::len);
    let mut merged = vec![Value::Null; width];
    for (col, slot) in merged.iter_mut().enumerate() {
        *slot = if col == qty_idx {
            sum_values(group.iter().filter_map(|row| row.get(col)))
        } else {
            group
                .iter()
                .filter_map(|row| row.get(col))
                .find(|v| !v.is_null())
                .cloned()
                .unwrap_or_default()
        };
    }
    merged
}

/// Sum of the numeric cells; integers stay integers while nothing overflows.
/// A group with no numeric cell sums to `0`.
fn sum_values<'v>(values: impl Iterator<Item = &'v Value>) -> Value {
    let mut int_sum: Option<i64> = Some(0);
    let mut float_sum = 0.0;
    for value in values {
        match value {
            Value::Int(i) => {
                int_sum = int_sum.and_then(|s| s.checked_add(*i));
                float_sum += *i as f64;
            }
            Value::Float(x) if !x.is_nan() => {
                int_sum = None;
                float_sum += x;
            }
            _ => {}
        }
    }
    int_sum.map_or(Value::Float(float_sum), Value::Int)
}
