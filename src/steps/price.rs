//! Price and currency normalization.

use super::round_to;
use crate::config::PriceConfig;
use crate::report::PriceReport;
use crate::table::{Table, Value};
use regex::Regex;
use std::sync::LazyLock;

/// Everything that cannot be part of a number: currency symbols, letters, spaces.
static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\d\-.,()]").expect("valid regex"));

static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\((.*)\)$").expect("valid regex"));

/// Parse currency-like values into rounded numbers.
///
/// `"₹1,299"` becomes `1299.0` and, with `allow_parentheses_negative`,
/// `"(1,234.50)"` becomes `-1234.5`. Values that do not parse are kept as
/// they were, or nulled when `coerce_invalid_to_null` is set.
pub fn standardize_prices(mut table: Table, config: &PriceConfig) -> (Table, PriceReport) {
    let mut report = PriceReport::default();

    for field in &config.fields {
        let Some(idx) = table.column_index(field) else {
            continue;
        };
        let mut parsed_count = 0;
        for cell in table.column_mut(idx) {
            let Some(raw) = cell.to_text() else {
                continue;
            };
            let new = match parse_price(&raw, config.allow_parentheses_negative) {
                Some(x) => {
                    parsed_count += 1;
                    Value::float(round_to(x, config.decimal_places))
                }
                None if config.coerce_invalid_to_null => Value::Null,
                None => continue,
            };
            if *cell != new {
                report.cells_changed += 1;
                *cell = new;
            }
        }
        report.prices_standardized.insert(field.clone(), parsed_count);
    }

    (table, report)
}

/// Numeric value of a price string, `None` if nothing numeric remains.
pub fn parse_price(raw: &str, allow_parentheses_negative: bool) -> Option<f64> {
    let stripped = NON_NUMERIC.replace_all(raw, "").replace(',', "");
    let text = if allow_parentheses_negative {
        PARENTHESIZED.replace(&stripped, "-$1").into_owned()
    } else {
        stripped
    };
    text.parse::<f64>().ok().filter(|x| x.is_finite())
}
