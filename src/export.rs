//! Write sample tables as comma separated text.
//!
//! Columns are written in table order and every row is written. Missing values become empty
//! fields, and numbers use the shortest representation that reads back to the same value.

use crate::{error::Result, table::SampleTable};
use csv::Writer;
use std::{fs::File, io::Write, path::Path};
use tracing::info;

/// Write a table to `path`, replacing any existing file.
pub fn write_csv<P: AsRef<Path>>(tbl: &SampleTable, path: P) -> Result<()> {
    let path = path.as_ref();
    write_to(tbl, File::create(path)?)?;

    info!(
        path = %path.display(),
        rows = tbl.num_rows(),
        columns = tbl.num_columns(),
        "exported sample table"
    );

    Ok(())
}

/// Write a table with a header row to any writer.
pub fn write_to<W: Write>(tbl: &SampleTable, sink: W) -> Result<()> {
    if tbl.num_columns() == 0 {
        return Ok(());
    }

    let mut wtr = Writer::from_writer(sink);

    wtr.write_record(tbl.column_names())?;

    let columns: Vec<_> = tbl.iter().map(|(_, col)| col).collect();
    for row in 0..tbl.num_rows() {
        wtr.write_record(columns.iter().map(|col| col.cell(row)))?;
    }

    wtr.flush()?;
    Ok(())
}
