//! Boolean coercion.

use crate::config::BooleansConfig;
use crate::report::BooleansReport;
use crate::table::{Table, Value};

const TRUE_WORDS: &[&str] = &["true", "t", "yes", "y", "1"];
const FALSE_WORDS: &[&str] = &["false", "f", "no", "n", "0"];

/// Interpret a cell as a boolean. Unrecognized values are `None`, never `false`.
pub fn parse_bool(value: &Value) -> Option<bool> {
    if let Value::Bool(b) = value {
        return Some(*b);
    }
    let text = value.to_text()?.trim().to_lowercase();
    if TRUE_WORDS.contains(&text.as_str()) {
        Some(true)
    } else if FALSE_WORDS.contains(&text.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Coerce each configured field to `Bool` or `Null`.
pub fn standardize_booleans(mut table: Table, config: &BooleansConfig) -> (Table, BooleansReport) {
    let mut report = BooleansReport::default();

    for field in &config.fields {
        let Some(idx) = table.column_index(field) else {
            continue;
        };
        let mut changed = 0;
        for cell in table.column_mut(idx) {
            let new = Value::from(parse_bool(cell));
            if new.is_null() && cell.is_null() {
                continue;
            }
            if *cell != new {
                changed += 1;
                *cell = new;
            }
        }
        report.booleans_standardized.insert(field.clone(), changed);
    }

    (table, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{row, table};

    #[test]
    fn test_parse_bool() {
        for yes in ["Y", "yes", "1", " TRUE ", "t"] {
            assert_eq!(parse_bool(&Value::from(yes)), Some(true), "{yes}");
        }
        for no in ["N", "no", "0", "False"] {
            assert_eq!(parse_bool(&Value::from(no)), Some(false), "{no}");
        }
        assert_eq!(parse_bool(&Value::from("maybe")), None);
        assert_eq!(parse_bool(&Value::Int(1)), Some(true));
        assert_eq!(parse_bool(&Value::Float(1.0)), None);
        assert_eq!(parse_bool(&Value::Null), None);
    }

    #[test]
    fn test_standardize_booleans() {
        let config = BooleansConfig {
            fields: vec!["is_gift".to_owned(), "absent".to_owned()],
        };
        let t = table(
            &["is_gift"],
            vec![
                row!["Y"],
                row!["maybe"],
                row![true],
                row![Value::Null],
                row![0_i64],
            ],
        );
        let (out, report) = standardize_booleans(t, &config);

        let got: Vec<_> = out.column(0).cloned().collect();
        assert_eq!(
            got,
            vec![
                Value::Bool(true),
                Value::Null,
                Value::Bool(true),
                Value::Null,
                Value::Bool(false),
            ]
        );
        assert_eq!(report.booleans_standardized.get("is_gift"), Some(&3));
        assert!(!report.booleans_standardized.contains_key("absent"));

        let (_, again) = standardize_booleans(out, &config);
        assert_eq!(again.booleans_standardized.get("is_gift"), Some(&0));
    }
}
