//! Load sample tables from delimited text.
//!
//! Workbook sheets are read from their comma separated exports. Column labels in the source
//! carry unit annotations, e.g. `pFe (nmol/kg)`, which are stripped so the rest of the crate can
//! refer to the bare analyte name.

use crate::{
    error::{AnalysisError, Result},
    table::{Column, SampleTable},
    utility::optioned,
};
use csv::ReaderBuilder;
use optional::{none, Optioned};
use regex::Regex;
use std::{collections::HashMap, fs::File, io::Read, path::Path};
use tracing::{debug, info, warn};

// A parenthesised span plus the whitespace around it.
const ANNOTATION_PATTERN: &str = r"\s*\([^)]*\)\s*";

// Cell contents treated as a missing value.
const MISSING_TOKENS: [&str; 3] = ["NaN", "nan", "NA"];

/// Strips unit annotations from column labels.
#[derive(Debug, Clone)]
pub struct HeaderCleaner {
    annotation: Regex,
}

impl HeaderCleaner {
    /// Create a new cleaner.
    pub fn new() -> Result<Self> {
        Ok(HeaderCleaner {
            annotation: Regex::new(ANNOTATION_PATTERN)?,
        })
    }

    /// Remove every `(...)` span with its surrounding whitespace, then trim.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use trace_metal_analysis::loader::HeaderCleaner;
    ///
    /// let cleaner = HeaderCleaner::new().unwrap();
    /// assert_eq!(cleaner.clean("pFe (nmol/kg)"), "pFe");
    /// assert_eq!(cleaner.clean(" Temp (°C) "), "Temp");
    /// assert_eq!(cleaner.clean("Station Label"), "Station Label");
    /// ```
    pub fn clean(&self, label: &str) -> String {
        self.annotation.replace_all(label, "").trim().to_owned()
    }
}

/// Load a table from a CSV file.
///
/// Fails with `MissingFile` before reading anything if `path` does not exist.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<SampleTable> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(AnalysisError::MissingFile(path.to_path_buf()));
    }

    let tbl = read_csv(File::open(path)?)?;
    info!(
        path = %path.display(),
        rows = tbl.num_rows(),
        columns = tbl.num_columns(),
        "loaded sample table"
    );

    Ok(tbl)
}

/// Read a table from any source of CSV text with a header row.
pub fn read_csv<R: Read>(source: R) -> Result<SampleTable> {
    let cleaner = HeaderCleaner::new()?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(source);

    let headers = dedup_labels(rdr.headers()?.iter().map(|h| cleaner.clean(h)).collect());

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in rdr.records() {
        let record = record?;
        for (col, field) in cells.iter_mut().zip(record.iter()) {
            col.push(field.trim().to_owned());
        }
    }

    let mut tbl = SampleTable::new();
    for (name, raw) in headers.into_iter().zip(cells) {
        let column = infer_column(raw);
        debug!(
            column = %name,
            numeric = column.as_numeric().is_some(),
            "read column"
        );
        tbl.set_column(name, column);
    }

    Ok(tbl)
}

// Numeric when every present cell parses as a float, otherwise text.
fn infer_column(raw: Vec<String>) -> Column {
    let parsed: Option<Vec<Optioned<f64>>> = raw.iter().map(|cell| parse_cell(cell)).collect();

    match parsed {
        Some(vals) => Column::Numeric(vals),
        None => Column::Text(raw),
    }
}

fn parse_cell(cell: &str) -> Option<Optioned<f64>> {
    if cell.is_empty() || MISSING_TOKENS.contains(&cell) {
        return Some(none());
    }

    cell.parse::<f64>().ok().map(optioned)
}

// Repeated labels get a numeric suffix so every column stays addressable.
fn dedup_labels(labels: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();

    labels
        .into_iter()
        .map(|label| {
            let count = seen.entry(label.clone()).or_insert(0);
            let out = if *count == 0 {
                label.clone()
            } else {
                warn!(column = %label, "duplicate column label after cleaning");
                format!("{}.{}", label, count)
            };
            *count += 1;
            out
        })
        .collect()
}
