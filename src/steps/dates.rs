//! Date standardization.
//!
//! Each value is tried against the ISO-8601 family first, then against the
//! configured input formats in order. The first successful parse is
//! rewritten with the target format.

use crate::config::DatesConfig;
use crate::report::DatesReport;
use crate::table::{Table, Value};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt::Write as _;

const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// True if `format` is a strftime pattern chrono can work with.
pub fn is_valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Rewrite every parseable value of the configured fields.
///
/// Unparsed values keep their raw form unless `invalid_to_null` is set.
/// Blank strings never count as converted.
pub fn standardize_dates(mut table: Table, config: &DatesConfig) -> (Table, DatesReport) {
    let mut report = DatesReport::default();

    for field in &config.fields {
        let Some(idx) = table.column_index(field) else {
            continue;
        };
        let mut converted = 0;
        for cell in table.column_mut(idx) {
            let Some(raw) = cell.to_text() else {
                continue;
            };
            let new = match parse_date(&raw, &config.input_formats)
                .and_then(|dt| render(dt, &config.target_format))
            {
                Some(formatted) => {
                    converted += 1;
                    Value::Text(formatted)
                }
                None if config.invalid_to_null => Value::Null,
                None => continue,
            };
            if *cell != new {
                report.cells_changed += 1;
                *cell = new;
            }
        }
        report.dates_converted.insert(field.clone(), converted);
    }

    (table, report)
}

/// Parse with the ISO tier, then each explicit format in order.
pub fn parse_date(raw: &str, formats: &[String]) -> Option<NaiveDateTime> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    parse_iso(text).or_else(|| formats.iter().find_map(|fmt| parse_with(text, fmt)))
}

fn parse_iso(text: &str) -> Option<NaiveDateTime> {
    if let Some(dt) = ISO_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(dt);
    }
    if let Some(date) = ISO_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    {
        return Some(date.and_time(NaiveTime::MIN));
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.naive_local())
}

/// A format without time fields parses as a date at midnight.
fn parse_with(text: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, format).ok().or_else(|| {
        NaiveDate::parse_from_str(text, format)
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN))
    })
}

fn render(dt: NaiveDateTime, format: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", dt.format(format)).ok()?;
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{row, table};

    fn config(fields: &[&str]) -> DatesConfig {
        DatesConfig {
            fields: fields.iter().map(|f| (*f).to_owned()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_mixed_formats_converge() {
        let t = table(
            &["order_date"],
            vec![
                row!["2024-01-05"],
                row!["05/01/2024"],
                row!["07-Feb-2024"],
                row!["Mar 09, 2024"],
                row!["2024-04-10T13:45:00"],
                row!["11.05.2024"],
            ],
        );
        let (out, report) = standardize_dates(t, &config(&["order_date"]));

        let got: Vec<_> = out.column(0).filter_map(Value::as_str).collect();
        assert_eq!(
            got,
            vec![
                "2024-01-05",
                "2024-01-05",
                "2024-02-07",
                "2024-03-09",
                "2024-04-10",
                "2024-05-11"
            ]
        );
        assert_eq!(report.dates_converted.get("order_date"), Some(&6));
        assert_eq!(report.cells_changed, 5);
    }

    #[test]
    fn test_unparsed_kept_or_nulled() {
        let rows = || vec![row!["not a date"], row![""], row![Value::Null], row!["2024-02-30"]];

        let (kept, report) = standardize_dates(table(&["d"], rows()), &config(&["d"]));
        assert_eq!(kept.cell(0, "d"), Some(&Value::from("not a date")));
        assert_eq!(kept.cell(1, "d"), Some(&Value::from("")));
        assert_eq!(kept.cell(3, "d"), Some(&Value::from("2024-02-30")));
        assert_eq!(report.dates_converted.get("d"), Some(&0));

        let mut cfg = config(&["d"]);
        cfg.invalid_to_null = true;
        let (nulled, _) = standardize_dates(table(&["d"], rows()), &cfg);
        assert!(nulled.column(0).all(Value::is_null));
    }

    #[test]
    fn test_custom_target_format() {
        let mut cfg = config(&["d"]);
        cfg.target_format = "%d %B %Y".to_owned();
        let (out, _) = standardize_dates(table(&["d"], vec![row!["2024-03-01"]]), &cfg);
        assert_eq!(out.cell(0, "d"), Some(&Value::from("01 March 2024")));
    }

    #[test]
    fn test_missing_field_ignored() {
        let (out, report) = standardize_dates(table(&["x"], vec![row!["2024-01-01"]]), &config(&["d"]));
        assert_eq!(out.cell(0, "x"), Some(&Value::from("2024-01-01")));
        assert!(report.dates_converted.is_empty());
    }

    #[test]
    fn test_rfc3339_keeps_wall_time() {
        let parsed = parse_date("2024-06-01T23:30:00+05:30", &[]);
        let expected = NaiveDate::from_ymd_opt(2024, 6, 1).and_then(|d| d.and_hms_opt(23, 30, 0));
        assert_eq!(parsed, expected);
    }

    #[test]
    fn test_format_validation() {
        assert!(is_valid_format("%Y-%m-%d"));
        assert!(is_valid_format("%d %b %Y"));
        assert!(!is_valid_format("%Y-%"));
    }
}
