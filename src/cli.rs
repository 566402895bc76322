use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabclean::config::CleaningConfig;
use tabclean::io::{load_table, save_table};
use tabclean::logging::LogOptions;
use tabclean::pipeline::{check_table, clean_table, planned_steps, validate_config};
use tabclean::report::write_report;

#[derive(Parser)]
#[command(name = "tabclean", version, about = "Configurable cleaning for tabular exports")]
pub struct Cli {
    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write daily log files; without a value, uses the platform data directory
    #[arg(long, global = true, num_args = 0..=1, value_name = "DIR")]
    #[expect(clippy::option_option)] // absent / flag only / flag with a path
    pub log_dir: Option<Option<PathBuf>>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn log_options(&self) -> Result<LogOptions> {
        let log_dir = match &self.log_dir {
            None => None,
            Some(Some(dir)) => Some(dir.clone()),
            Some(None) => Some(tabclean::logging::default_log_dir()?),
        };
        Ok(LogOptions {
            verbose: self.verbose,
            log_dir,
        })
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a CSV file and print the cleaning report
    Clean {
        /// CSV file to clean
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the cleaned CSV
        #[arg(short, long)]
        output: PathBuf,

        /// JSON cleaning configuration
        #[arg(short, long)]
        config: PathBuf,

        /// Also write the report JSON to this file
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
    /// Validate a cleaning configuration, optionally against a CSV file's columns
    Check {
        /// JSON cleaning configuration
        #[arg(short, long)]
        config: PathBuf,

        /// CSV file whose columns the configuration should match
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Clean {
            input,
            output,
            config,
            report,
        } => handle_clean(&input, &output, &config, report.as_deref()),
        Commands::Check { config, input } => handle_check(&config, input.as_deref()),
    }
}

fn handle_clean(input: &Path, output: &Path, config_path: &Path, report_path: Option<&Path>) -> Result<()> {
    let config = CleaningConfig::from_file(config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    let table = load_table(input).context("Failed to load input file")?;

    let (cleaned, report) = clean_table(table, &config);

    save_table(&cleaned, output).context("Failed to save cleaned file")?;
    tracing::info!("Cleaned table written to {}", output.display());

    if let Some(path) = report_path {
        write_report(&report, path).context("Failed to write report")?;
        tracing::info!("Report written to {}", path.display());
    }

    println!("{}", report.to_json()?);
    Ok(())
}

fn handle_check(config_path: &Path, input: Option<&Path>) -> Result<()> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let config: CleaningConfig =
        serde_json::from_str(&content).context("Failed to parse JSON config")?;

    let errors = validate_config(&config);
    for error in &errors {
        println!("error: {error}");
    }

    if let Some(path) = input {
        let table = load_table(path).context("Failed to load input file")?;
        let warnings = check_table(&config, &table);
        for warning in &warnings {
            println!("warning: {warning}");
        }
        println!(
            "{}: {} rows, {} columns, {} warning(s)",
            path.display(),
            table.height(),
            table.width(),
            warnings.len()
        );
    }

    if !errors.is_empty() {
        anyhow::bail!("{} configuration error(s) in {}", errors.len(), config_path.display());
    }

    let steps: Vec<String> = planned_steps(&config)
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("Configuration OK, steps: {}", steps.join(", "));
    Ok(())
}
