//! CSV loading and saving through polars.
//!
//! The engine never touches files; this module converts between CSV on disk
//! and the in-memory [`Table`].

use crate::error::{CleanerError, Result, ResultExt as _};
use crate::table::{Table, Value};
use polars::prelude::*;
use std::path::Path;

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn ensure_csv(path: &Path) -> Result<()> {
    match extension(path).as_str() {
        "csv" => Ok(()),
        ext => Err(CleanerError::InvalidPath(format!(
            "Unsupported file extension '{ext}' for {}",
            path.display()
        ))),
    }
}

/// Read a headered CSV file. Empty fields load as nulls.
///
/// # Errors
///
/// [`CleanerError::InvalidPath`] for a non-CSV path, otherwise
/// [`CleanerError::DataProcessing`] if polars cannot read the file.
pub fn load_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    ensure_csv(path)?;
    if !path.exists() {
        return Err(CleanerError::InvalidPath(format!(
            "Input file not found: {}",
            path.display()
        )));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(10000))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .with_context(|| format!("Failed to read CSV {}", path.display()))?;

    let table = dataframe_to_table(&df)?;
    tracing::debug!(
        path = %path.display(),
        rows = table.height(),
        columns = table.width(),
        "Loaded table"
    );
    Ok(table)
}

/// Write `table` as a headered CSV file, creating parent directories.
///
/// # Errors
///
/// [`CleanerError::InvalidPath`] for a non-CSV path; I/O or polars errors
/// if the file cannot be written.
pub fn save_table(table: &Table, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    ensure_csv(path)?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut df = table_to_dataframe(table)?;
    let file = std::fs::File::create(path).context("Failed to create CSV file")?;
    CsvWriter::new(file)
        .include_header(true)
        .finish(&mut df)
        .context("Failed to write CSV file")?;
    tracing::debug!(path = %path.display(), rows = table.height(), "Saved table");
    Ok(())
}

/// Convert a polars frame into a [`Table`], column by column.
pub fn dataframe_to_table(df: &DataFrame) -> Result<Table> {
    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let mut rows = vec![Vec::with_capacity(columns.len()); df.height()];

    for column in df.get_columns() {
        let series = column.as_materialized_series();
        let cells = series_values(series)?;
        for (row, cell) in rows.iter_mut().zip(cells) {
            row.push(cell);
        }
    }

    Table::from_rows(columns, rows)
}

fn series_values(series: &Series) -> Result<Vec<Value>> {
    let dtype = series.dtype();
    let values = if dtype.is_bool() {
        series.bool()?.into_iter().map(Value::from).collect()
    } else if dtype.is_integer() {
        let ints = series.cast(&DataType::Int64)?;
        ints.i64()?.into_iter().map(Value::from).collect()
    } else if dtype.is_float() {
        let floats = series.cast(&DataType::Float64)?;
        floats.f64()?.into_iter().map(Value::from).collect()
    } else {
        let text = series.cast(&DataType::String)?;
        text.str()?.into_iter().map(Value::from).collect()
    };
    Ok(values)
}

/// How a [`Table`] column is written back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Int,
    Float,
    Bool,
    Text,
}

fn column_kind<'v>(values: impl Iterator<Item = &'v Value>) -> ColumnKind {
    let mut kind: Option<ColumnKind> = None;
    for value in values.filter(|v| !v.is_null()) {
        let this = match value {
            Value::Int(_) => ColumnKind::Int,
            Value::Float(_) => ColumnKind::Float,
            Value::Bool(_) => ColumnKind::Bool,
            Value::Text(_) | Value::Null => return ColumnKind::Text,
        };
        kind = Some(match (kind, this) {
            (None, k) => k,
            (Some(a), b) if a == b => a,
            (Some(ColumnKind::Int | ColumnKind::Float), ColumnKind::Int | ColumnKind::Float) => {
                ColumnKind::Float
            }
            _ => return ColumnKind::Text,
        });
    }
    kind.unwrap_or(ColumnKind::Text)
}

/// Convert a [`Table`] into a polars frame.
///
/// A column of integers becomes Int64, any mix of numbers Float64, booleans
/// Boolean, and anything else String using the text form of each cell.
pub fn table_to_dataframe(table: &Table) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(table.width());
    for (idx, name) in table.columns().iter().enumerate() {
        let name = PlSmallStr::from(name.as_str());
        let series = match column_kind(table.column(idx)) {
            ColumnKind::Int => Series::new(
                name,
                table
                    .column(idx)
                    .map(|v| match v {
                        Value::Int(i) => Some(*i),
                        _ => None,
                    })
                    .collect::<Vec<_>>(),
            ),
            ColumnKind::Float => Series::new(
                name,
                table.column(idx).map(Value::as_f64).collect::<Vec<_>>(),
            ),
            ColumnKind::Bool => Series::new(
                name,
                table
                    .column(idx)
                    .map(|v| match v {
                        Value::Bool(b) => Some(*b),
                        _ => None,
                    })
                    .collect::<Vec<_>>(),
            ),
            ColumnKind::Text => Series::new(
                name,
                table.column(idx).map(Value::to_text).collect::<Vec<_>>(),
            ),
        };
        columns.push(series.into());
    }
    DataFrame::new(columns).context("Failed to build DataFrame")
}
