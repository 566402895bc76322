//! Configuration validation.
//!
//! [`validate_config`] catches settings no table could make sense of and is
//! fatal at load time. [`check_table`] compares a configuration with the
//! columns of a concrete table; its findings are warnings, since every step
//! already tolerates absent columns.

use crate::config::{CleaningConfig, DedupStrategy};
use crate::report::StepKind;
use crate::steps::dates::is_valid_format;
use crate::table::Table;

/// Validation finding tied to the step whose settings caused it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub step: StepKind,
    pub message: String,
}

impl ValidationError {
    fn new(step: StepKind, message: impl Into<String>) -> Self {
        Self {
            step,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.step, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Static checks that do not depend on any table.
pub fn validate_config(config: &CleaningConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !is_valid_format(&config.dates.target_format) {
        errors.push(ValidationError::new(
            StepKind::Dates,
            format!(
                "Invalid target_format '{}'",
                config.dates.target_format
            ),
        ));
    }
    for format in &config.dates.input_formats {
        if !is_valid_format(format) {
            errors.push(ValidationError::new(
                StepKind::Dates,
                format!("Invalid input format '{format}'"),
            ));
        }
    }

    let threshold = config.geo.fuzzy_threshold;
    if !(0.0..=1.0).contains(&threshold) {
        errors.push(ValidationError::new(
            StepKind::Geo,
            format!("fuzzy_threshold must be between 0 and 1, got {threshold}"),
        ));
    }

    if config.delivery.max_days < 0 {
        errors.push(ValidationError::new(
            StepKind::Delivery,
            format!(
                "max_days must not be negative, got {}",
                config.delivery.max_days
            ),
        ));
    }

    let factor = config.outliers.high_factor;
    if !factor.is_finite() || factor <= 0.0 {
        errors.push(ValidationError::new(
            StepKind::Outliers,
            format!("high_factor must be a positive number, got {factor}"),
        ));
    }
    if config.outliers.downscale_candidates.contains(&0) {
        errors.push(ValidationError::new(
            StepKind::Outliers,
            "downscale_candidates must not contain 0",
        ));
    }

    errors
}

/// Configured columns the table does not have, plus an `aggregate` dedup
/// with no quantity column to sum.
pub fn check_table(config: &CleaningConfig, table: &Table) -> Vec<ValidationError> {
    let mut warnings = Vec::new();
    let mut require = |step: StepKind, what: &str, column: &str| {
        if !table.has_column(column) {
            warnings.push(ValidationError::new(
                step,
                format!("{what} '{column}' not found in input"),
            ));
        }
    };

    for column in &config.missing.include {
        require(StepKind::Missing, "Included column", column);
    }
    for column in &config.dates.fields {
        require(StepKind::Dates, "Date field", column);
    }
    for column in &config.price.fields {
        require(StepKind::Price, "Price field", column);
    }
    if let Some(column) = &config.ratings.column {
        require(StepKind::Ratings, "Ratings column", column);
    }
    for column in &config.categorical.fields {
        require(StepKind::Categorical, "Categorical field", column);
    }
    if let Some(column) = &config.geo.city_field {
        require(StepKind::Geo, "City field", column);
    }
    for column in &config.booleans.fields {
        require(StepKind::Booleans, "Boolean field", column);
    }
    if let Some(column) = &config.delivery.column {
        require(StepKind::Delivery, "Delivery column", column);
    }
    for column in &config.dedup.key_fields {
        require(StepKind::Dedup, "Key field", column);
    }
    if let Some(column) = &config.outliers.column {
        require(StepKind::Outliers, "Outlier column", column);
    }
    if let Some(column) = &config.payment.column {
        require(StepKind::Payment, "Payment column", column);
    }

    if config.dedup.strategy == DedupStrategy::Aggregate
        && !config.dedup.key_fields.is_empty()
        && !config
            .dedup
            .quantity_field
            .as_deref()
            .is_some_and(|q| table.has_column(q))
    {
        warnings.push(ValidationError::new(
            StepKind::Dedup,
            "aggregate strategy without a quantity column present, keeping first rows instead",
        ));
    }

    warnings
}
