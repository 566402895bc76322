//! Integration tests for the full cleaning workflow
//!
//! These tests load the fixture order export, run every configured step and
//! check the cleaned table, the report, and the CSV written back out.

use std::path::PathBuf;
use tabclean::config::CleaningConfig;
use tabclean::error::CleanerError;
use tabclean::io::{load_table, save_table};
use tabclean::pipeline::clean_table;
use tabclean::report::{StepKind, StepReport, write_report};
use tabclean::table::{Table, Value};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name)
}

fn load_fixture() -> (Table, CleaningConfig) {
    let table = load_table(fixture("orders_raw.csv")).unwrap();
    let config = CleaningConfig::from_file(fixture("cleaning.json")).unwrap();
    (table, config)
}

fn column(table: &Table, name: &str) -> Vec<Value> {
    table
        .column_by_name(name)
        .unwrap()
        .into_iter()
        .cloned()
        .collect()
}

#[test]
fn test_fixture_loads() {
    let (table, _) = load_fixture();
    assert_eq!(table.height(), 6, "Should have 6 rows");
    assert_eq!(table.width(), 11, "Should have 11 columns");
    assert_eq!(table.cell(3, "quantity"), Some(&Value::Null));
    assert_eq!(table.cell(0, "order_id"), Some(&Value::Int(1)));
    assert_eq!(
        table.cell(1, "category"),
        Some(&Value::from("  ELECTRONICS "))
    );
}

#[test]
fn test_full_pipeline_values() {
    let (table, config) = load_fixture();
    let (cleaned, _) = clean_table(table, &config);

    // The duplicate (1, X) row is merged away.
    assert_eq!(cleaned.height(), 5);
    assert_eq!(
        column(&cleaned, "order_id"),
        vec![
            Value::Int(1),
            Value::Int(2),
            Value::Int(3),
            Value::Int(4),
            Value::Int(5)
        ]
    );
    assert_eq!(
        column(&cleaned, "quantity"),
        vec![
            Value::Int(5),
            Value::Int(1),
            Value::Float(2.0),
            Value::Int(1),
            Value::Int(2)
        ]
    );
    assert_eq!(
        column(&cleaned, "order_date"),
        vec![
            Value::from("2024-01-05"),
            Value::from("2024-02-05"),
            Value::from("2024-03-09"),
            Value::from("not a date"),
            Value::from("2024-04-10"),
        ]
    );
    assert_eq!(
        column(&cleaned, "unit_price"),
        vec![
            Value::Float(100.0),
            Value::Float(-1234.5),
            Value::from("N/A"),
            Value::Float(120.0),
            Value::Float(600.0),
        ]
    );
    assert_eq!(
        column(&cleaned, "rating"),
        vec![
            Value::Float(4.0),
            Value::Float(3.0),
            Value::Float(4.5),
            Value::Float(4.5),
            Value::Float(5.0),
        ]
    );
    assert_eq!(
        column(&cleaned, "category"),
        vec![
            Value::from("home and kitchen"),
            Value::from("electronics"),
            Value::from("toys and games"),
            Value::from("books"),
            Value::from("books"),
        ]
    );
    assert_eq!(
        column(&cleaned, "city"),
        vec![
            Value::from("Bangalore"),
            Value::from("Mumbai"),
            Value::from("Chennai"),
            Value::from("Gotham"),
            Value::from("Delhi"),
        ]
    );
    assert_eq!(
        column(&cleaned, "is_gift"),
        vec![
            Value::Bool(true),
            Value::Bool(false),
            Value::Null,
            Value::Bool(true),
            Value::Bool(false),
        ]
    );
    assert_eq!(
        column(&cleaned, "delivery_sla"),
        vec![
            Value::Int(5),
            Value::Int(0),
            Value::Int(30),
            Value::Null,
            Value::Int(2),
        ]
    );
    assert_eq!(
        column(&cleaned, "payment_method"),
        vec![
            Value::from("UPI"),
            Value::from("Credit Card"),
            Value::from("Cash on Delivery"),
            Value::from("Wallet"),
            Value::from("Net Banking"),
        ]
    );
}

#[test]
fn test_full_pipeline_report() {
    let (table, config) = load_fixture();
    let (_, report) = clean_table(table, &config);

    let kinds: Vec<_> = report.steps.iter().map(|(kind, _)| kind).collect();
    assert_eq!(kinds.len(), 11, "Every step is configured");
    assert_eq!(kinds.first(), Some(&StepKind::Missing));
    assert_eq!(kinds.last(), Some(&StepKind::Payment));

    let Some(StepReport::Dates(dates)) = report.steps.get(StepKind::Dates) else {
        panic!("dates report missing");
    };
    assert_eq!(dates.dates_converted.get("order_date"), Some(&5));

    let Some(StepReport::Price(price)) = report.steps.get(StepKind::Price) else {
        panic!("price report missing");
    };
    assert_eq!(price.prices_standardized.get("unit_price"), Some(&5));

    let Some(StepReport::Ratings(ratings)) = report.steps.get(StepKind::Ratings) else {
        panic!("ratings report missing");
    };
    assert_eq!(ratings.ratings_changed, 4);
    assert_eq!(ratings.ratings_imputed, 1);

    let Some(StepReport::Geo(geo)) = report.steps.get(StepKind::Geo) else {
        panic!("geo report missing");
    };
    assert_eq!(geo.geo_resolved, 4);

    let Some(StepReport::Delivery(delivery)) = report.steps.get(StepKind::Delivery) else {
        panic!("delivery report missing");
    };
    assert_eq!(delivery.delivery_changed, 6);
    assert_eq!(delivery.delivery_nullified, 1);

    let Some(StepReport::Dedup(dedup)) = report.steps.get(StepKind::Dedup) else {
        panic!("dedup report missing");
    };
    assert_eq!(dedup.dropped, 1);
    assert_eq!(dedup.kept, 5);
    assert!(dedup.aggregated);
    assert!(dedup.missing_keys.is_empty());

    let Some(StepReport::Outliers(outliers)) = report.steps.get(StepKind::Outliers) else {
        panic!("outliers report missing");
    };
    assert_eq!(outliers.corrected, 1);
    assert_eq!(outliers.flagged, 0);
    assert_eq!(outliers.median, Some(110.0));

    assert_eq!(report.dq.rows_before, 6);
    assert_eq!(report.dq.rows_after, 5);
    assert_eq!(report.dq.missing_before.get("quantity"), Some(&1));
    assert_eq!(report.dq.missing_before.get("rating"), Some(&1));
    assert_eq!(report.dq.missing_after.get("quantity"), Some(&0));
    assert_eq!(report.dq.missing_after.get("is_gift"), Some(&1));
    assert_eq!(report.dq.missing_after.get("delivery_sla"), Some(&1));
}

#[test]
fn test_second_run_changes_nothing() {
    let (table, config) = load_fixture();
    let (once, _) = clean_table(table, &config);
    let (twice, report) = clean_table(once.clone(), &config);

    assert_eq!(once, twice);
    for (kind, step) in report.steps.iter() {
        assert_eq!(step.changed_values(), 0, "{kind} changed values on a clean table");
    }
}

#[test]
fn test_report_json_shape() -> anyhow::Result<()> {
    let (table, config) = load_fixture();
    let (_, report) = clean_table(table, &config);

    let json: serde_json::Value = serde_json::from_str(&report.to_json()?)?;
    assert_eq!(json["steps"]["dedup"]["dropped"], 1);
    assert_eq!(json["steps"]["dedup"]["aggregated"], true);
    assert_eq!(json["steps"]["missing"]["numeric"]["quantity"], 1);
    assert_eq!(json["steps"]["booleans"]["booleans_standardized"]["is_gift"], 6);
    assert_eq!(json["steps"]["payment"]["payment_standardized"], 5);
    assert_eq!(json["dq"]["rows_before"], 6);

    let step_names: Vec<&str> = json["steps"]
        .as_object()
        .map(|steps| steps.keys().map(String::as_str).collect())
        .unwrap_or_default();
    assert!(step_names.contains(&"categorical"));
    assert_eq!(step_names.len(), 11);
    Ok(())
}

#[test]
fn test_cleaned_csv_and_report_written() -> anyhow::Result<()> {
    let (table, config) = load_fixture();
    let (cleaned, report) = clean_table(table, &config);

    let dir = tempfile::tempdir()?;
    let csv_path = dir.path().join("processed").join("orders_clean.csv");
    let report_path = dir.path().join("processed").join("report.json");
    save_table(&cleaned, &csv_path)?;
    write_report(&report, &report_path)?;

    let reloaded = load_table(&csv_path)?;
    assert_eq!(reloaded.height(), 5);
    assert_eq!(reloaded.columns(), cleaned.columns());
    assert_eq!(reloaded.cell(0, "quantity"), Some(&Value::Float(5.0)));
    assert_eq!(reloaded.cell(0, "city"), Some(&Value::from("Bangalore")));
    assert_eq!(reloaded.cell(1, "is_gift"), Some(&Value::Bool(false)));
    assert_eq!(reloaded.cell(3, "delivery_sla"), Some(&Value::Null));

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path)?)?;
    assert_eq!(written["dq"]["rows_after"], 5);
    Ok(())
}

#[test]
fn test_invalid_config_rejected() {
    let err = CleaningConfig::from_file(fixture("invalid.json")).unwrap_err();
    assert!(matches!(err, CleanerError::Config(_)));
    let message = err.to_string();
    assert!(message.contains("fuzzy_threshold"));
    assert!(message.contains("downscale_candidates"));
}

#[test]
fn test_concurrent_runs_are_independent() {
    let (table, config) = load_fixture();
    let (expected, expected_report) = clean_table(table.clone(), &config);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let table = table.clone();
            let config = config.clone();
            std::thread::spawn(move || clean_table(table, &config))
        })
        .collect();

    for handle in handles {
        let (cleaned, report) = handle.join().unwrap();
        assert_eq!(cleaned, expected);
        assert_eq!(report, expected_report);
    }
}

#[test]
fn test_abbreviated_currency_feeds_outlier_median() -> anyhow::Result<()> {
    let (table, config) = load_fixture();
    let price_idx = table.column_index("unit_price").unwrap();
    let mut rows = table.rows().to_vec();
    rows[4][price_idx] = Value::from("Rs. 120");
    let table = Table::from_rows(table.columns().to_vec(), rows)?;

    let (cleaned, report) = clean_table(table, &config);

    // "Rs." keeps its dot, so 120 reads as 0.12 and pulls the median down.
    assert_eq!(cleaned.cell(3, "unit_price"), Some(&Value::Float(0.12)));
    let Some(StepReport::Outliers(outliers)) = report.steps.get(StepKind::Outliers) else {
        panic!("outliers report missing");
    };
    let median = outliers.median.unwrap();
    assert!((median - 50.06).abs() < 1e-9, "median was {median}");
    assert_eq!(outliers.corrected, 1);
    assert_eq!(cleaned.cell(4, "unit_price"), Some(&Value::Float(60.0)));
    Ok(())
}
