//! Column oriented table of water samples.
//!
//! Rows are samples (one per station, depth and cast) and columns are measured or derived
//! quantities. Columns are kept in insertion order, and every operation here preserves the order
//! of the columns it does not touch. Numeric cells use `Optioned<f64>` so a missing measurement
//! travels through calculations as a missing value instead of aborting them.

use crate::error::{AnalysisError, Result};
use optional::Optioned;

/// The values of a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Measured or derived quantities.
    Numeric(Vec<Optioned<f64>>),
    /// Identifiers and flags, e.g. station codes or the mixed layer flag.
    Text(Vec<String>),
}

impl Column {
    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(vals) => vals.len(),
            Column::Text(vals) => vals.len(),
        }
    }

    /// True if there are no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the numeric values, if this is a numeric column.
    #[inline]
    pub fn as_numeric(&self) -> Option<&[Optioned<f64>]> {
        match self {
            Column::Numeric(vals) => Some(vals),
            Column::Text(_) => None,
        }
    }

    /// Get the text values, if this is a text column.
    #[inline]
    pub fn as_text(&self) -> Option<&[String]> {
        match self {
            Column::Text(vals) => Some(vals),
            Column::Numeric(_) => None,
        }
    }

    /// Render one cell the way it is written to a delimited file. Missing values are empty.
    pub fn cell(&self, row: usize) -> String {
        match self {
            Column::Numeric(vals) => vals[row]
                .into_option()
                .map(|v| v.to_string())
                .unwrap_or_default(),
            Column::Text(vals) => vals[row].clone(),
        }
    }

    fn retain(&self, mask: &[bool]) -> Column {
        match self {
            Column::Numeric(vals) => Column::Numeric(
                vals.iter()
                    .zip(mask)
                    .filter(|(_, keep)| **keep)
                    .map(|(v, _)| *v)
                    .collect(),
            ),
            Column::Text(vals) => Column::Text(
                vals.iter()
                    .zip(mask)
                    .filter(|(_, keep)| **keep)
                    .map(|(v, _)| v.clone())
                    .collect(),
            ),
        }
    }
}

/// A table of samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleTable {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl SampleTable {
    /// Create an empty table.
    #[inline]
    pub fn new() -> Self {
        SampleTable::default()
    }

    /// Builder method to append, or replace in place, a numeric column.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use optional::{none, some};
    /// use trace_metal_analysis::SampleTable;
    ///
    /// let tbl = SampleTable::new()
    ///     .with_text_column("Station", vec!["IO01".to_owned(), "IO02".to_owned()])
    ///     .with_numeric_column("pAl", vec![some(1.2), none()]);
    ///
    /// assert_eq!(tbl.num_rows(), 2);
    /// assert_eq!(tbl.column_names().collect::<Vec<_>>(), vec!["Station", "pAl"]);
    /// ```
    #[inline]
    pub fn with_numeric_column<S: Into<String>>(
        mut self,
        name: S,
        values: Vec<Optioned<f64>>,
    ) -> Self {
        self.set_column(name, Column::Numeric(values));
        self
    }

    /// Builder method to append, or replace in place, a text column.
    #[inline]
    pub fn with_text_column<S: Into<String>>(mut self, name: S, values: Vec<String>) -> Self {
        self.set_column(name, Column::Text(values));
        self
    }

    /// Number of samples in the table.
    #[inline]
    pub fn num_rows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// Number of columns in the table.
    #[inline]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column labels in table order.
    #[inline]
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Check for a column by label.
    #[inline]
    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Iterate over (label, column) pairs in table order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    /// Get a column by label.
    #[inline]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|i| &self.columns[i])
    }

    /// Get a numeric column by label.
    ///
    /// Fails with `MissingColumn` if there is no such column or it holds text.
    pub fn numeric(&self, name: &str) -> Result<&[Optioned<f64>]> {
        self.column(name)
            .and_then(Column::as_numeric)
            .ok_or_else(|| AnalysisError::MissingColumn(name.to_owned()))
    }

    /// Get a text column by label.
    ///
    /// Fails with `MissingColumn` if there is no such column or it is numeric.
    pub fn text(&self, name: &str) -> Result<&[String]> {
        self.column(name)
            .and_then(Column::as_text)
            .ok_or_else(|| AnalysisError::MissingColumn(name.to_owned()))
    }

    /// Append a column, or replace the values of an existing column of the same label without
    /// moving it.
    pub fn set_column<S: Into<String>>(&mut self, name: S, column: Column) {
        let name = name.into();
        debug_assert!(self.columns.is_empty() || column.len() == self.num_rows());

        match self.position(&name) {
            Some(i) => self.columns[i] = column,
            None => {
                self.names.push(name);
                self.columns.push(column);
            }
        }
    }

    /// Insert a column directly after another one. If a column with the new label already exists
    /// it is moved.
    ///
    /// Fails with `MissingColumn` if `after` is not in the table.
    pub fn insert_column_after<S: Into<String>>(
        &mut self,
        after: &str,
        name: S,
        column: Column,
    ) -> Result<()> {
        let name = name.into();
        debug_assert!(self.columns.is_empty() || column.len() == self.num_rows());

        if name == after || !self.has_column(after) {
            return Err(AnalysisError::MissingColumn(after.to_owned()));
        }

        self.remove_column(&name);
        let idx = self
            .position(after)
            .ok_or_else(|| AnalysisError::MissingColumn(after.to_owned()))?;

        self.names.insert(idx + 1, name);
        self.columns.insert(idx + 1, column);

        Ok(())
    }

    /// Remove a column, returning its values if it was present.
    pub fn remove_column(&mut self, name: &str) -> Option<Column> {
        let idx = self.position(name)?;
        self.names.remove(idx);
        Some(self.columns.remove(idx))
    }

    /// Replace every value of a text column.
    ///
    /// Fails with `MissingColumn` if the column is missing or numeric.
    pub fn map_text<F>(&mut self, name: &str, func: F) -> Result<()>
    where
        F: Fn(&str) -> String,
    {
        let idx = self
            .position(name)
            .ok_or_else(|| AnalysisError::MissingColumn(name.to_owned()))?;

        match &mut self.columns[idx] {
            Column::Text(vals) => {
                for val in vals.iter_mut() {
                    *val = func(val);
                }
                Ok(())
            }
            Column::Numeric(_) => Err(AnalysisError::MissingColumn(name.to_owned())),
        }
    }

    /// Replace every value of a numeric column.
    ///
    /// Fails with `MissingColumn` if the column is missing or holds text.
    pub fn map_numeric<F>(&mut self, name: &str, func: F) -> Result<()>
    where
        F: Fn(Optioned<f64>) -> Optioned<f64>,
    {
        let idx = self
            .position(name)
            .ok_or_else(|| AnalysisError::MissingColumn(name.to_owned()))?;

        match &mut self.columns[idx] {
            Column::Numeric(vals) => {
                for val in vals.iter_mut() {
                    *val = func(*val);
                }
                Ok(())
            }
            Column::Text(_) => Err(AnalysisError::MissingColumn(name.to_owned())),
        }
    }

    /// Create a new table with only the listed columns, in the listed order.
    ///
    /// Fails with `MissingColumn` for the first label that is not in the table.
    pub fn select(&self, names: &[&str]) -> Result<SampleTable> {
        let mut tbl = SampleTable::new();
        for &name in names {
            let col = self
                .column(name)
                .ok_or_else(|| AnalysisError::MissingColumn(name.to_owned()))?;
            tbl.set_column(name, col.clone());
        }

        Ok(tbl)
    }

    /// Labels from `first` through `last` inclusive, in table order. Empty if `last` comes
    /// before `first`.
    ///
    /// Fails with `MissingColumn` if either label is not in the table.
    pub fn labels_between(&self, first: &str, last: &str) -> Result<Vec<&str>> {
        let start = self
            .position(first)
            .ok_or_else(|| AnalysisError::MissingColumn(first.to_owned()))?;
        let end = self
            .position(last)
            .ok_or_else(|| AnalysisError::MissingColumn(last.to_owned()))?;

        if end < start {
            return Ok(vec![]);
        }

        Ok(self.names[start..=end].iter().map(String::as_str).collect())
    }

    /// Labels of the numeric columns, in table order.
    #[inline]
    pub fn numeric_labels(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, col)| col.as_numeric().is_some())
            .map(|(name, _)| name)
    }

    /// Create a new table with only the rows where `mask` is true.
    pub fn retain_rows(&self, mask: &[bool]) -> SampleTable {
        debug_assert_eq!(mask.len(), self.num_rows());

        SampleTable {
            names: self.names.clone(),
            columns: self.columns.iter().map(|col| col.retain(mask)).collect(),
        }
    }

    #[inline]
    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}
