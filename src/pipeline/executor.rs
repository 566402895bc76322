//! Pipeline execution engine.
//!
//! Runs the cleaning steps in their fixed order against one table and
//! assembles the step reports.

use super::validation::check_table;
use crate::config::CleaningConfig;
use crate::report::{CleaningReport, DqSummary, StepKind, StepReport, StepReports};
use crate::steps;
use crate::table::Table;
use std::time::Instant;

type Enabled = fn(&CleaningConfig) -> bool;
type Run = fn(Table, &CleaningConfig) -> (Table, StepReport);

fn always(_: &CleaningConfig) -> bool {
    true
}

/// Every step in execution order, with the condition under which it runs.
const STEPS: &[(StepKind, Enabled, Run)] = &[
    (StepKind::Missing, always, |t, c| {
        let (t, r) = steps::impute_missing(t, &c.missing);
        (t, StepReport::Missing(r))
    }),
    (StepKind::Dates, always, |t, c| {
        let (t, r) = steps::standardize_dates(t, &c.dates);
        (t, StepReport::Dates(r))
    }),
    (StepKind::Price, always, |t, c| {
        let (t, r) = steps::standardize_prices(t, &c.price);
        (t, StepReport::Price(r))
    }),
    (
        StepKind::Ratings,
        |c| c.ratings.column.is_some(),
        |t, c| {
            let (t, r) = steps::standardize_ratings(t, &c.ratings);
            (t, StepReport::Ratings(r))
        },
    ),
    (StepKind::Categorical, always, |t, c| {
        let (t, r) = steps::standardize_categories(t, &c.categorical);
        (t, StepReport::Categorical(r))
    }),
    (StepKind::Geo, always, |t, c| {
        let (t, r) = steps::resolve_cities(t, &c.geo);
        (t, StepReport::Geo(r))
    }),
    (
        StepKind::Booleans,
        |c| !c.booleans.fields.is_empty(),
        |t, c| {
            let (t, r) = steps::standardize_booleans(t, &c.booleans);
            (t, StepReport::Booleans(r))
        },
    ),
    (
        StepKind::Delivery,
        |c| c.delivery.column.is_some(),
        |t, c| {
            let (t, r) = steps::standardize_delivery(t, &c.delivery);
            (t, StepReport::Delivery(r))
        },
    ),
    (
        StepKind::Dedup,
        |c| !c.dedup.key_fields.is_empty(),
        |t, c| {
            let (t, r) = steps::deduplicate(t, &c.dedup);
            (t, StepReport::Dedup(r))
        },
    ),
    (
        StepKind::Outliers,
        |c| c.outliers.column.is_some(),
        |t, c| {
            let (t, r) = steps::correct_outliers(t, &c.outliers);
            (t, StepReport::Outliers(r))
        },
    ),
    (
        StepKind::Payment,
        |c| c.payment.column.is_some(),
        |t, c| {
            let (t, r) = steps::normalize_payment(t, &c.payment);
            (t, StepReport::Payment(r))
        },
    ),
];

/// Steps that `config` enables, in the order they would run.
pub fn planned_steps(config: &CleaningConfig) -> Vec<StepKind> {
    STEPS
        .iter()
        .filter(|(_, enabled, _)| enabled(config))
        .map(|(kind, _, _)| *kind)
        .collect()
}

/// Run every enabled step, each on the output of the previous one.
///
/// Steps that are not configured are skipped and absent from the reports.
pub fn run_cleaning(table: Table, config: &CleaningConfig) -> (Table, StepReports) {
    let start = Instant::now();
    let rows_before = table.height();
    tracing::info!(
        rows = rows_before,
        columns = table.width(),
        "Starting cleaning pipeline"
    );

    for warning in check_table(config, &table) {
        tracing::warn!("{warning}");
    }

    let mut table = table;
    let mut reports = StepReports::default();
    for (kind, enabled, run) in STEPS {
        if !enabled(config) {
            tracing::trace!(step = %kind, "Step not configured, skipping");
            continue;
        }
        let (next, report) = run(table, config);
        tracing::debug!(
            step = %kind,
            changed = report.changed_values(),
            rows = next.height(),
            "Step finished"
        );
        table = next;
        reports.push(*kind, report);
    }

    tracing::info!(
        rows_before,
        rows_after = table.height(),
        steps = reports.len(),
        elapsed = ?start.elapsed(),
        "Cleaning pipeline finished"
    );
    (table, reports)
}

/// [`run_cleaning`] plus the data-quality summary of the input and output.
pub fn clean_table(table: Table, config: &CleaningConfig) -> (Table, CleaningReport) {
    let before = table.clone();
    let (cleaned, steps) = run_cleaning(table, config);
    let dq = DqSummary::compute(&before, &cleaned);
    let report = CleaningReport { steps, dq };
    tracing::info!("{}", report.summary());
    (cleaned, report)
}
