//! Cleaning pipeline orchestration.
//!
//! The steps always run in the same order, each one skipped when its
//! configuration leaves nothing to do:
//!
//! 1. `missing` (always)
//! 2. `dates` (always)
//! 3. `price` (always)
//! 4. `ratings` (needs `ratings.column`)
//! 5. `categorical` (always)
//! 6. `geo` (always)
//! 7. `booleans` (needs `booleans.fields`)
//! 8. `delivery` (needs `delivery.column`)
//! 9. `dedup` (needs `dedup.key_fields`)
//! 10. `outliers` (needs `outliers.column`)
//! 11. `payment` (needs `payment.column`)
//!
//! # Example
//!
//! ```no_run
//! use tabclean::config::CleaningConfig;
//! use tabclean::io::load_table;
//! use tabclean::pipeline::clean_table;
//!
//! let config = CleaningConfig::from_file("cleaning.json")?;
//! let table = load_table("orders.csv")?;
//! let (cleaned, report) = clean_table(table, &config);
//! println!("{} → {} rows", report.dq.rows_before, cleaned.height());
//! # Ok::<(), tabclean::error::CleanerError>(())
//! ```
//!
//! A run never fails on bad data: every step reports what it could not
//! interpret instead of erroring.

pub mod executor;
pub mod validation;

pub use executor::{clean_table, planned_steps, run_cleaning};
pub use validation::{ValidationError, check_table, validate_config};
