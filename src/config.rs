//! Cleaning configuration: one section per step, every field defaulted.
//!
//! Configurations are JSON documents. Any section may be omitted, and any
//! field inside a section may be omitted; unknown fields inside a section
//! are rejected so typos surface before a run instead of silently doing
//! nothing.
//!
//! ```json
//! {
//!   "dates": { "fields": ["order_date"], "target_format": "%Y-%m-%d" },
//!   "price": { "fields": ["unit_price"], "decimal_places": 2 },
//!   "dedup": { "key_fields": ["order_id", "product_id"],
//!              "quantity_field": "quantity", "strategy": "aggregate" }
//! }
//! ```

use crate::error::{CleanerError, Result, ResultExt as _};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Root configuration, one section per cleaning step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    pub missing: MissingConfig,
    pub dates: DatesConfig,
    pub price: PriceConfig,
    pub categorical: CategoricalConfig,
    pub geo: GeoConfig,
    pub ratings: RatingsConfig,
    pub booleans: BooleansConfig,
    pub delivery: DeliveryConfig,
    pub payment: PaymentConfig,
    pub dedup: DedupConfig,
    pub outliers: OutliersConfig,
}

impl CleaningConfig {
    /// Load and statically validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`CleanerError::Config`] if the file is missing, is not valid
    /// JSON for this schema, or fails [`validate_config`](crate::pipeline::validate_config).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CleanerError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&content).with_context(|| path.display().to_string())
    }

    /// Parse and statically validate a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`CleanerError::Config`] on malformed JSON or invalid settings.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        let errors = crate::pipeline::validate_config(&config);
        if !errors.is_empty() {
            return Err(CleanerError::Config(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            ));
        }
        Ok(config)
    }

    /// # Errors
    ///
    /// Fails only if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize cleaning config")
    }

    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json).context("Failed to write cleaning config")
    }
}

/// Missing-value imputation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MissingConfig {
    pub numeric_strategy: NumericStrategy,
    pub categorical_strategy: CategoricalStrategy,
    /// Columns to impute; empty means every column.
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

/// Central tendency used to fill numeric gaps. Unrecognized names fall back
/// to the median.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericStrategy {
    Mean,
    #[default]
    #[serde(other)]
    Median,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoricalStrategy {
    #[default]
    #[serde(other)]
    Mode,
}

/// Date standardization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatesConfig {
    pub fields: Vec<String>,
    /// strftime pattern written for every parsed value
    pub target_format: String,
    /// Explicit patterns tried, in order, after the ISO-8601 tier
    pub input_formats: Vec<String>,
    pub invalid_to_null: bool,
}

impl Default for DatesConfig {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            target_format: "%Y-%m-%d".to_owned(),
            input_formats: default_input_formats(),
            invalid_to_null: false,
        }
    }
}

fn default_input_formats() -> Vec<String> {
    [
        "%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%m/%d/%Y", "%d-%b-%Y", "%d %b %Y", "%b %d, %Y",
        "%Y/%m/%d", "%d.%m.%Y",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

/// Price / currency normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriceConfig {
    pub fields: Vec<String>,
    /// Read `(123.45)` as `-123.45`
    pub allow_parentheses_negative: bool,
    pub decimal_places: u32,
    pub coerce_invalid_to_null: bool,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            allow_parentheses_negative: true,
            decimal_places: 2,
            coerce_invalid_to_null: false,
        }
    }
}

/// Categorical text canonicalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CategoricalConfig {
    pub fields: Vec<String>,
    pub lowercase: bool,
    pub strip: bool,
    pub collapse_spaces: bool,
    pub replace_ampersand: bool,
    /// Per-field remap, keyed by the already-normalized string
    pub mappings: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for CategoricalConfig {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            lowercase: true,
            strip: true,
            collapse_spaces: true,
            replace_ampersand: true,
            mappings: BTreeMap::new(),
        }
    }
}

/// City name resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeoConfig {
    pub city_field: Option<String>,
    pub canonical_cities: Vec<String>,
    /// Exact raw-string remaps, checked before anything else
    pub city_mappings: BTreeMap<String, String>,
    /// Minimum similarity (0..=1) for a fuzzy match
    pub fuzzy_threshold: f64,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            city_field: None,
            canonical_cities: Vec::new(),
            city_mappings: BTreeMap::new(),
            fuzzy_threshold: 0.85,
        }
    }
}

/// Ratings normalization onto a 1..=5 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RatingsConfig {
    pub column: Option<String>,
    pub decimal_places: u32,
    pub impute_strategy: RatingImpute,
}

impl Default for RatingsConfig {
    fn default() -> Self {
        Self {
            column: None,
            decimal_places: 1,
            impute_strategy: RatingImpute::default(),
        }
    }
}

/// Either a fixed fill value or the name of a statistic (`"mean"`,
/// anything else meaning median).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatingImpute {
    Fixed(f64),
    Named(String),
}

impl Default for RatingImpute {
    fn default() -> Self {
        Self::Named("median".to_owned())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BooleansConfig {
    pub fields: Vec<String>,
}

/// Delivery SLA parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeliveryConfig {
    pub column: Option<String>,
    pub max_days: i64,
    pub clip_max: bool,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            column: None,
            max_days: 30,
            clip_max: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaymentConfig {
    pub column: Option<String>,
    /// Exact raw-string remaps, checked before the built-in patterns
    pub extra_mappings: BTreeMap<String, String>,
}

/// Key-based deduplication.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DedupConfig {
    pub key_fields: Vec<String>,
    pub quantity_field: Option<String>,
    pub strategy: DedupStrategy,
}

/// Unrecognized strategies behave as `keep_first`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupStrategy {
    Aggregate,
    #[default]
    #[serde(other)]
    KeepFirst,
}

/// Scale-error outlier correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutliersConfig {
    pub column: Option<String>,
    /// Values above `median * high_factor` are suspected scale errors
    pub high_factor: f64,
    /// Divisors tried in order until the value lands near the median
    pub downscale_candidates: Vec<u32>,
    pub decimal_places: u32,
}

impl Default for OutliersConfig {
    fn default() -> Self {
        Self {
            column: None,
            high_factor: 50.0,
            downscale_candidates: vec![10, 100],
            decimal_places: 2,
        }
    }
}
