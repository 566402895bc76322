//! In-memory table model shared by every cleaning step.
//!
//! A [`Table`] is an ordered list of column names plus row-major rows, each
//! row holding exactly one [`Value`] per column. Columns carry no declared
//! type: whether a column is numeric is decided from its contents when a
//! step needs to know (see [`Table::is_numeric_column`]).
//!
//! Steps take a `Table` by value and hand back the cleaned one, so a table
//! passed into the pipeline is never observed half-cleaned by anyone else.

use crate::error::{CleanerError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single, possibly-absent cell value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// `Null` and NaN floats are both missing.
    pub fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Float(x) => x.is_nan(),
            _ => false,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Int(_)) || matches!(self, Self::Float(x) if !x.is_nan())
    }

    /// Numeric view of the cell. Text is not parsed here.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(x) if !x.is_nan() => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// String form of the cell, `None` for missing values.
    ///
    /// Floats always keep a fractional part (`999.0`) and booleans render as
    /// `True` / `False`, which is how the raw exports spell them.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Float(x) if x.is_nan() => None,
            Self::Bool(true) => Some("True".to_owned()),
            Self::Bool(false) => Some("False".to_owned()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(x) => Some(render_float(*x)),
            Self::Text(s) => Some(s.clone()),
        }
    }

    /// Float cell, collapsing NaN into `Null`.
    pub fn float(x: f64) -> Self {
        if x.is_nan() { Self::Null } else { Self::Float(x) }
    }

    /// Total order used for mode tie-breaks and group ordering.
    ///
    /// Numbers sort numerically and come first, then booleans, then text;
    /// missing values sort last.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            _ => match (self, other) {
                (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
                (Self::Text(a), Self::Text(b)) => a.cmp(b),
                _ => self.rank().cmp(&other.rank()),
            },
        }
    }

    fn rank(&self) -> u8 {
        if self.is_null() {
            return 3;
        }
        match self {
            Self::Int(_) | Self::Float(_) => 0,
            Self::Bool(_) => 1,
            Self::Text(_) => 2,
            Self::Null => 3,
        }
    }

    /// Hashable identity of the value, used to group rows by key tuple.
    ///
    /// Integral floats share a key with the equal integer, so `5` and `5.0`
    /// land in the same group.
    pub fn key(&self) -> ValueKey {
        match self {
            Self::Null => ValueKey::Null,
            Self::Bool(b) => ValueKey::Bool(*b),
            Self::Int(i) => ValueKey::Int(*i),
            Self::Float(x) if x.is_nan() => ValueKey::Null,
            Self::Float(x) => {
                if x.fract() == 0.0 && x.abs() < 9.0e15 {
                    ValueKey::Int(*x as i64)
                } else {
                    ValueKey::Float(x.to_bits())
                }
            }
            Self::Text(s) => ValueKey::Text(s.clone()),
        }
    }
}

/// See [`Value::key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(String),
}

fn render_float(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 1.0e16 {
        format!("{x:.1}")
    } else {
        format!("{x}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_text() {
            Some(s) => f.write_str(&s),
            None => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Ordered columns plus row-major cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Empty table with the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table, checking every row has one cell per column.
    ///
    /// # Errors
    ///
    /// Returns [`CleanerError::DataProcessing`] for a ragged row or a
    /// duplicated column name.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        for (i, name) in columns.iter().enumerate() {
            if columns.iter().skip(i + 1).any(|other| other == name) {
                return Err(CleanerError::DataProcessing(format!(
                    "duplicate column name '{name}'"
                )));
            }
        }
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// # Errors
    ///
    /// Returns [`CleanerError::DataProcessing`] if the row width is wrong.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(CleanerError::DataProcessing(format!(
                "row {} has {} cells, expected {}",
                self.rows.len(),
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// True when the table has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at `row` in column `name`.
    pub fn cell(&self, row: usize, name: &str) -> Option<&Value> {
        let idx = self.column_index(name)?;
        self.rows.get(row)?.get(idx)
    }

    /// All cells of a column, top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    pub fn column_mut(&mut self, idx: usize) -> impl Iterator<Item = &mut Value> + '_ {
        self.rows.iter_mut().filter_map(move |row| row.get_mut(idx))
    }

    /// Cells of a named column, `None` if the column does not exist.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.column(idx).collect())
    }

    pub fn null_count(&self, idx: usize) -> usize {
        self.column(idx).filter(|v| v.is_null()).count()
    }

    /// Whether a column behaves as numeric for imputation.
    ///
    /// Every non-null cell must be a number (an all-null column counts), or
    /// the column must be entirely non-null booleans.
    pub fn is_numeric_column(&self, idx: usize) -> bool {
        let mut all_bool = true;
        let mut all_number = true;
        for value in self.column(idx) {
            if value.is_null() {
                all_bool = false;
                continue;
            }
            all_number &= value.is_number();
            all_bool &= matches!(value, Value::Bool(_));
        }
        all_number || (all_bool && self.height() > 0)
    }

    /// Replace the row set, keeping the columns.
    pub(crate) fn with_rows(self, rows: Vec<Vec<Value>>) -> Self {
        Self {
            columns: self.columns,
            rows,
        }
    }

    pub(crate) fn into_rows(self) -> (Vec<String>, Vec<Vec<Value>>) {
        (self.columns, self.rows)
    }
}

/// Shorthand used throughout the tests: `table(&["a", "b"], vec![row![1, "x"]])`.
#[cfg(test)]
pub(crate) fn table(columns: &[&str], rows: Vec<Vec<Value>>) -> Table {
    Table::from_rows(columns.iter().map(|c| (*c).to_owned()).collect(), rows)
        .expect("well-formed test table")
}

#[cfg(test)]
macro_rules! row {
    ($($cell:expr),* $(,)?) => {
        vec![$($crate::table::Value::from($cell)),*]
    };
}

#[cfg(test)]
pub(crate) use row;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ragged_row_rejected() {
        let result = Table::from_rows(
            vec!["a".to_owned(), "b".to_owned()],
            vec![vec![Value::Int(1)]],
        );
        let err = result.unwrap_err();
        assert!(err.to_string().contains("expected 2"));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = Table::from_rows(vec!["a".to_owned(), "a".to_owned()], vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn test_text_rendering() {
        assert_eq!(Value::Float(999.0).to_text().as_deref(), Some("999.0"));
        assert_eq!(Value::Float(12.5).to_text().as_deref(), Some("12.5"));
        assert_eq!(Value::Int(7).to_text().as_deref(), Some("7"));
        assert_eq!(Value::Bool(true).to_text().as_deref(), Some("True"));
        assert_eq!(Value::Float(f64::NAN).to_text(), None);
        assert_eq!(Value::Null.to_text(), None);
    }

    #[test]
    fn test_numeric_detection() {
        let t = table(
            &["qty", "name", "empty", "flag", "flag_gap"],
            vec![
                row![1_i64, "a", Value::Null, true, true],
                row![2.5, Value::Null, Value::Null, false, Value::Null],
                row![Value::Null, "c", Value::Null, true, false],
            ],
        );
        assert!(t.is_numeric_column(0));
        assert!(!t.is_numeric_column(1));
        assert!(t.is_numeric_column(2));
        assert!(t.is_numeric_column(3));
        assert!(!t.is_numeric_column(4));
    }

    #[test]
    fn test_integral_float_shares_key_with_int() {
        assert_eq!(Value::Float(5.0).key(), Value::Int(5).key());
        assert_ne!(Value::Float(5.5).key(), Value::Int(5).key());
        assert_eq!(Value::Float(f64::NAN).key(), ValueKey::Null);
    }

    #[test]
    fn test_total_cmp_puts_nulls_last() {
        let mut values = vec![
            Value::Null,
            Value::from("b"),
            Value::Int(3),
            Value::from("a"),
            Value::Float(1.5),
        ];
        values.sort_by(Value::total_cmp);
        assert_eq!(
            values,
            vec![
                Value::Float(1.5),
                Value::Int(3),
                Value::from("a"),
                Value::from("b"),
                Value::Null,
            ]
        );
    }
}
