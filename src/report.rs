//! Report model returned alongside the cleaned table.
//!
//! A [`CleaningReport`] serializes as
//!
//! ```json
//! {
//!   "steps": { "missing": { ... }, "dates": { ... }, ... },
//!   "dq": { "rows_before": 120, "rows_after": 117,
//!           "missing_before": { ... }, "missing_after": { ... } }
//! }
//! ```
//!
//! `steps` keeps pipeline order and only lists the steps that ran.

use crate::error::{Result, ResultExt as _};
use crate::table::Table;
use serde::ser::SerializeMap as _;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::path::Path;

/// Per-column counts keyed by column name.
pub type ColumnCounts = BTreeMap<String, usize>;

/// Nulls found per imputed column, split by how the fill value was chosen.
///
/// A numeric column is listed even when it had no gaps; a non-numeric
/// column is listed only if it has a mode to fill with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MissingReport {
    pub numeric: ColumnCounts,
    pub categorical: ColumnCounts,
    /// Cells that actually received a fill value
    #[serde(skip)]
    pub cells_filled: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatesReport {
    /// Non-empty values successfully rewritten in the target format
    pub dates_converted: ColumnCounts,
    #[serde(skip)]
    pub cells_changed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriceReport {
    /// Values that parsed as a number
    pub prices_standardized: ColumnCounts,
    /// Values whose cell actually changed
    #[serde(skip)]
    pub cells_changed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RatingsReport {
    pub ratings_changed: usize,
    pub ratings_imputed: usize,
    #[serde(skip)]
    pub cells_changed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoricalReport {
    pub categories_standardized: ColumnCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeoReport {
    /// Values resolved by any tier, including ones already canonical
    pub geo_resolved: usize,
    #[serde(skip)]
    pub cells_changed: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BooleansReport {
    pub booleans_standardized: ColumnCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub delivery_changed: usize,
    pub delivery_nullified: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DedupReport {
    pub dropped: usize,
    pub kept: usize,
    /// Set when rows were merged by the `aggregate` strategy
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub aggregated: bool,
    /// Configured key columns absent from the table
    pub missing_keys: Vec<String>,
    /// Set when no key column was present and the step did nothing
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub skipped: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutliersReport {
    pub corrected: usize,
    /// Rows still above the threshold after every divisor was tried
    pub flagged: usize,
    /// Median of the numeric values, `null` when the column had none
    pub median: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaymentReport {
    pub payment_standardized: usize,
}

/// One step's report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StepReport {
    Missing(MissingReport),
    Dates(DatesReport),
    Price(PriceReport),
    Ratings(RatingsReport),
    Categorical(CategoricalReport),
    Geo(GeoReport),
    Booleans(BooleansReport),
    Delivery(DeliveryReport),
    Dedup(DedupReport),
    Outliers(OutliersReport),
    Payment(PaymentReport),
}

impl StepReport {
    /// Cells (or rows, for dedup) this step altered. Zero on a second run
    /// over already-clean output.
    pub fn changed_values(&self) -> usize {
        fn total(counts: &ColumnCounts) -> usize {
            counts.values().sum()
        }
        match self {
            Self::Missing(r) => r.cells_filled,
            Self::Dates(r) => r.cells_changed,
            Self::Price(r) => r.cells_changed,
            Self::Ratings(r) => r.cells_changed,
            Self::Categorical(r) => total(&r.categories_standardized),
            Self::Geo(r) => r.cells_changed,
            Self::Booleans(r) => total(&r.booleans_standardized),
            Self::Delivery(r) => r.delivery_changed,
            Self::Dedup(r) => r.dropped,
            Self::Outliers(r) => r.corrected,
            Self::Payment(r) => r.payment_standardized,
        }
    }
}

/// Pipeline steps in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Missing,
    Dates,
    Price,
    Ratings,
    Categorical,
    Geo,
    Booleans,
    Delivery,
    Dedup,
    Outliers,
    Payment,
}

impl StepKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Dates => "dates",
            Self::Price => "price",
            Self::Ratings => "ratings",
            Self::Categorical => "categorical",
            Self::Geo => "geo",
            Self::Booleans => "booleans",
            Self::Delivery => "delivery",
            Self::Dedup => "dedup",
            Self::Outliers => "outliers",
            Self::Payment => "payment",
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reports of the steps that ran, in pipeline order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReports(Vec<(StepKind, StepReport)>);

impl StepReports {
    pub fn push(&mut self, kind: StepKind, report: StepReport) {
        self.0.push((kind, report));
    }

    pub fn get(&self, kind: StepKind) -> Option<&StepReport> {
        self.0.iter().find(|(k, _)| *k == kind).map(|(_, r)| r)
    }

    pub fn contains(&self, kind: StepKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StepKind, &StepReport)> + '_ {
        self.0.iter().map(|(k, r)| (*k, r))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of [`StepReport::changed_values`] across all steps.
    pub fn total_changes(&self) -> usize {
        self.0.iter().map(|(_, r)| r.changed_values()).sum()
    }
}

impl Serialize for StepReports {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (kind, report) in &self.0 {
            map.serialize_entry(kind.as_str(), report)?;
        }
        map.end()
    }
}

/// Row counts and per-column null counts before and after cleaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DqSummary {
    pub rows_before: usize,
    pub rows_after: usize,
    pub missing_before: ColumnCounts,
    pub missing_after: ColumnCounts,
}

impl DqSummary {
    /// Compare the raw and cleaned tables. Each side is counted on its own
    /// columns; an empty table yields an empty missing map.
    pub fn compute(before: &Table, after: &Table) -> Self {
        Self {
            rows_before: before.height(),
            rows_after: after.height(),
            missing_before: missing_counts(before),
            missing_after: missing_counts(after),
        }
    }
}

fn missing_counts(table: &Table) -> ColumnCounts {
    if table.is_empty() {
        return ColumnCounts::new();
    }
    table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.clone(), table.null_count(idx)))
        .collect()
}

/// Everything a pipeline run reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleaningReport {
    pub steps: StepReports,
    pub dq: DqSummary,
}

impl CleaningReport {
    /// One-line summary for logs and the CLI.
    pub fn summary(&self) -> String {
        let missing_before: usize = self.dq.missing_before.values().sum();
        let missing_after: usize = self.dq.missing_after.values().sum();
        format!(
            "Cleaning completed: {} steps, {} values changed, rows {} → {}, missing cells {} → {}",
            self.steps.len(),
            self.steps.total_changes(),
            self.dq.rows_before,
            self.dq.rows_after,
            missing_before,
            missing_after,
        )
    }

    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize cleaning report")
    }
}

/// Write the report as pretty JSON, creating parent directories.
///
/// # Errors
///
/// Returns an I/O error if the directory or file cannot be written.
pub fn write_report(report: &CleaningReport, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory {}", parent.display()))?;
    }
    std::fs::write(path, report.to_json()?)
        .with_context(|| format!("Failed to write report {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Value, row, table};

    #[test]
    fn test_dq_counts_each_side() {
        let before = table(
            &["a", "b"],
            vec![row![Value::Null, "x"], row![1_i64, Value::Null]],
        );
        let after = table(&["a", "b"], vec![row![2_i64, "x"]]);

        let dq = DqSummary::compute(&before, &after);
        assert_eq!(dq.rows_before, 2);
        assert_eq!(dq.rows_after, 1);
        assert_eq!(dq.missing_before.get("a"), Some(&1));
        assert_eq!(dq.missing_before.get("b"), Some(&1));
        assert_eq!(dq.missing_after.get("a"), Some(&0));
    }

    #[test]
    fn test_dq_empty_table_has_empty_map() {
        let empty = table(&["a", "b"], vec![]);
        let dq = DqSummary::compute(&empty, &empty);
        assert!(dq.missing_before.is_empty());
        assert_eq!(dq.rows_before, 0);
    }

    #[test]
    fn test_steps_serialize_in_pipeline_order() -> anyhow::Result<()> {
        let mut steps = StepReports::default();
        steps.push(
            StepKind::Price,
            StepReport::Price(PriceReport {
                prices_standardized: [("unit_price".to_owned(), 3)].into_iter().collect(),
                cells_changed: 3,
            }),
        );
        steps.push(
            StepKind::Dedup,
            StepReport::Dedup(DedupReport {
                dropped: 1,
                kept: 4,
                ..Default::default()
            }),
        );
        let report = CleaningReport {
            steps,
            dq: DqSummary::default(),
        };

        let json = report.to_json()?;
        let price_at = json.find("\"price\"").unwrap_or(usize::MAX);
        let dedup_at = json.find("\"dedup\"").unwrap_or(0);
        assert!(price_at < dedup_at);
        assert!(json.contains("\"prices_standardized\""));
        assert!(!json.contains("cells_changed"));
        assert!(!json.contains("aggregated"));
        assert_eq!(report.steps.total_changes(), 4);
        Ok(())
    }

    #[test]
    fn test_write_report_creates_directories() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("reports").join("run.json");
        write_report(&CleaningReport::default(), &path)?;
        let text = std::fs::read_to_string(&path)?;
        assert!(text.contains("\"rows_before\": 0"));
        Ok(())
    }
}
