//! Categorical text canonicalization.

use crate::config::CategoricalConfig;
use crate::report::CategoricalReport;
use crate::table::{Table, Value};
use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Apply the enabled normalizations in a fixed order: strip, lowercase,
/// `&` to `and`, whitespace collapse.
pub fn normalize_category(raw: &str, config: &CategoricalConfig) -> String {
    let mut text = if config.strip {
        raw.trim().to_owned()
    } else {
        raw.to_owned()
    };
    if config.lowercase {
        text = text.to_lowercase();
    }
    if config.replace_ampersand {
        text = text.replace('&', "and");
    }
    if config.collapse_spaces {
        text = WHITESPACE_RUN.replace_all(&text, " ").into_owned();
    }
    text
}

/// Normalize each configured field, then apply that field's remap table.
///
/// Remap keys are matched against the normalized string. Non-null cells
/// always come out as text.
pub fn standardize_categories(
    mut table: Table,
    config: &CategoricalConfig,
) -> (Table, CategoricalReport) {
    let mut report = CategoricalReport::default();

    for field in &config.fields {
        let Some(idx) = table.column_index(field) else {
            continue;
        };
        let mapping = config.mappings.get(field);
        let mut changed = 0;
        for cell in table.column_mut(idx) {
            let Some(raw) = cell.to_text() else {
                continue;
            };
            let normalized = normalize_category(&raw, config);
            let new = match mapping.and_then(|m| m.get(&normalized)) {
                Some(mapped) => mapped.clone(),
                None => normalized,
            };
            let new = Value::Text(new);
            if *cell != new {
                changed += 1;
                *cell = new;
            }
        }
        report.categories_standardized.insert(field.clone(), changed);
    }

    (table, report)
}
