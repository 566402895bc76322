//! Error handling for tabclean.
//!
//! The cleaning steps themselves never fail: a malformed cell is nulled or
//! kept as-is and counted in the step report. Errors only come from the
//! edges of the engine, which is where this module is used:
//!
//! - loading or validating a configuration document
//! - reading and writing tables on disk
//! - building a [`Table`](crate::table::Table) from ragged rows
//!
//! ```no_run
//! use tabclean::config::CleaningConfig;
//! use tabclean::error::{CleanerError, Result};
//!
//! fn load(path: &str) -> Result<CleaningConfig> {
//!     match CleaningConfig::from_file(path) {
//!         Err(CleanerError::Config(msg)) => Err(CleanerError::Config(format!("{path}: {msg}"))),
//!         other => other,
//!     }
//! }
//! ```
//!
//! The [`ResultExt`] trait adds `.context()` to any `Result` whose error
//! converts into [`CleanerError`].

use std::fmt;

/// Main error type for tabclean operations.
#[derive(Debug)]
pub enum CleanerError {
    /// I/O errors (reading configs, tables, writing reports)
    Io(std::io::Error),

    /// Table construction or conversion errors
    DataProcessing(String),

    /// Configuration document missing, malformed, or invalid
    Config(String),

    /// Unsupported or unusable path
    InvalidPath(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for CleanerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::InvalidPath(msg) => write!(f, "Invalid path: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CleanerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CleanerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for CleanerError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<serde_json::Error> for CleanerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for CleanerError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

/// Result type alias for tabclean operations.
pub type Result<T> = std::result::Result<T, CleanerError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<CleanerError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| wrap(msg.into(), e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap(f(), e.into()))
    }
}

/// Keeps the variant of the wrapped error so callers can still match on it.
fn wrap(msg: String, err: CleanerError) -> CleanerError {
    match err {
        CleanerError::Config(inner) => CleanerError::Config(format!("{msg}: {inner}")),
        CleanerError::InvalidPath(inner) => CleanerError::InvalidPath(format!("{msg}: {inner}")),
        CleanerError::DataProcessing(inner) => {
            CleanerError::DataProcessing(format!("{msg}: {inner}"))
        }
        other => CleanerError::Other(format!("{msg}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CleanerError::DataProcessing("row 3 has 2 cells, expected 4".to_owned());
        assert_eq!(
            err.to_string(),
            "Data processing error: row 3 has 2 cells, expected 4"
        );
    }

    #[test]
    fn test_config_error_keeps_variant_under_context() {
        let result: std::result::Result<(), CleanerError> =
            Err(CleanerError::Config("fuzzy_threshold out of range".to_owned()));

        let err = result.context("cleaning.json").unwrap_err();
        assert!(matches!(err, CleanerError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: cleaning.json: fuzzy_threshold out of range"
        );
    }

    #[test]
    fn test_result_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "raw.csv",
        ));

        let result: Result<()> = result.with_context(|| "Failed to read table".to_owned());
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read table")
        );
    }
}
