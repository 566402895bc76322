//! # tabclean command-line entry point
//!
//! ```text
//! main()
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   ├─> Install the tracing subscriber (stderr, optional log files)
//!   └─> Run the subcommand
//! ```
//!
//! ```bash
//! tabclean clean --input raw.csv --output clean.csv --config cleaning.json --report report.json
//! tabclean check --config cleaning.json --input raw.csv
//! ```
//!
//! The report JSON goes to stdout, logs go to stderr, so the two can be
//! redirected separately.

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // The report is the program's output

mod cli;

use anyhow::Result;
use clap::Parser as _;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    let log_options = cli.log_options()?;
    let _guard = tabclean::logging::init(&log_options)?;
    if let Some(dir) = &log_options.log_dir {
        tracing::debug!(
            "Writing logs to {}",
            tabclean::logging::current_log_path(dir).display()
        );
    }

    cli::run_command(cli.command).inspect_err(|e| tracing::error!("{e:#}"))
}
