//! # tabclean - configurable cleaning for messy business tables
//!
//! tabclean takes a raw table (typically an order or product export) and a
//! JSON configuration, runs a fixed sequence of cleaning steps over it, and
//! returns the cleaned table together with a report of what each step did.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tabclean::config::CleaningConfig;
//! use tabclean::io::{load_table, save_table};
//! use tabclean::pipeline::clean_table;
//!
//! let config = CleaningConfig::from_json(r#"{
//!     "price": { "fields": ["unit_price"] },
//!     "geo": { "city_field": "city", "canonical_cities": ["Mumbai", "Chennai"] }
//! }"#)?;
//!
//! let table = load_table("orders.csv")?;
//! let (cleaned, report) = clean_table(table, &config);
//! save_table(&cleaned, "orders_clean.csv")?;
//!
//! println!("{}", report.summary());
//! # Ok::<(), tabclean::error::CleanerError>(())
//! ```
//!
//! ## Core Modules
//!
//! - [`table`]: the in-memory [`Table`](table::Table) and [`Value`](table::Value) model
//! - [`config`]: the per-step configuration sections and their defaults
//! - [`steps`]: the individual cleaning steps
//! - [`pipeline`]: step ordering, execution and configuration validation
//! - [`report`]: step reports and the before/after data-quality summary
//! - [`io`]: CSV loading and saving
//! - [`error`]: error types and handling utilities
//! - [`logging`]: subscriber setup for the binary
//!
//! ## Failure model
//!
//! Cleaning never fails on bad data. A value a step cannot interpret is
//! nulled or left as it was, and the step report counts it. Only loading a
//! configuration and touching files return errors.
//!
//! The engine keeps no state between calls, so independent tables can be
//! cleaned from several threads at once.

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod steps;
pub mod table;
