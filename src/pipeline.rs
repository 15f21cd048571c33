//! Run the configured stages: correct each dataset, then build summary and correlation tables
//! from the corrected output.
//!
//! Each stage reads its input file and writes its output files before the next stage starts,
//! so later stages see what earlier ones wrote. The first error aborts the run.

use crate::{
    config::{
        Correction, CorrelationConfig, DatasetConfig, Derivation, PipelineConfig, SummaryConfig,
    },
    correction::{correct_table, recompute_non_lithogenic},
    derive::{
        add_cyanobacteria, add_percent_columns, add_phaeopigments, convert_units, drop_missing,
        mixed_layer, relabel_stations, PHYTO_GROUPS, TOTAL_CHLA_COLUMN,
    },
    error::Result,
    export::write_csv,
    kendall::{correlation_matrix, CorrelationMatrix},
    keys::CorrelationStat,
    loader::load_csv,
    stats::{summarize_by, summary_table},
    table::SampleTable,
};
use tracing::info;

// Label of the row variable column in exported correlation tables.
const VARIABLE_COLUMN: &str = "Variable";

impl Derivation {
    /// Add the derived columns to a table.
    pub fn apply(&self, tbl: &mut SampleTable) -> Result<()> {
        match self {
            Derivation::Convert { column, conversion } => convert_units(tbl, column, *conversion),
            Derivation::Cyanobacteria => add_cyanobacteria(tbl),
            Derivation::Phaeopigments => add_phaeopigments(tbl),
            Derivation::PhytoPercent => add_percent_columns(tbl, &PHYTO_GROUPS, TOTAL_CHLA_COLUMN),
        }
    }
}

/// Load, correct and export one dataset. Returns the corrected table.
pub fn run_dataset(cfg: &DatasetConfig) -> Result<SampleTable> {
    info!(dataset = %cfg.name, sheet = ?cfg.sheet, "correcting dataset");

    let mut tbl = load_csv(&cfg.input)?;
    tbl = match cfg.correction {
        Correction::Full => correct_table(tbl)?,
        Correction::Recompute => {
            recompute_non_lithogenic(&mut tbl, &cfg.metals)?;
            tbl
        }
    };

    write_csv(&tbl, &cfg.output)?;

    Ok(tbl)
}

/// Build the formatted per-group summary of a corrected table.
pub fn build_summary(tbl: &SampleTable, cfg: &SummaryConfig) -> Result<SampleTable> {
    let mut tbl = if cfg.mixed_layer {
        mixed_layer(tbl)?
    } else {
        tbl.clone()
    };

    for derivation in &cfg.derive {
        derivation.apply(&mut tbl)?;
    }

    if cfg.relabel_stations {
        relabel_stations(&mut tbl)?;
    }

    let columns: Vec<&str> = cfg.columns.iter().map(String::as_str).collect();
    let summaries = summarize_by(&tbl, &cfg.group_column, &columns)?;

    Ok(summary_table(
        &summaries,
        &cfg.group_column,
        cfg.kind,
        cfg.decimals,
    ))
}

/// Load a corrected table, summarize it and export the summary.
pub fn run_summary(cfg: &SummaryConfig) -> Result<SampleTable> {
    info!(summary = %cfg.name, kind = ?cfg.kind, "building summary table");

    let summary = build_summary(&load_csv(&cfg.input)?, cfg)?;
    write_csv(&summary, &cfg.output)?;

    Ok(summary)
}

/// Correlate the numeric columns in the configured range of a corrected table.
///
/// Text columns inside the range are skipped. The result is restricted to the configured row
/// and column variables, if any.
pub fn build_correlations(
    tbl: &SampleTable,
    cfg: &CorrelationConfig,
) -> Result<CorrelationMatrix> {
    let mut tbl = tbl.clone();
    for derivation in &cfg.derive {
        derivation.apply(&mut tbl)?;
    }

    if let Some(required) = &cfg.require {
        tbl = drop_missing(&tbl, required)?;
    }

    let columns: Vec<&str> = tbl
        .labels_between(&cfg.first_column, &cfg.last_column)?
        .into_iter()
        .filter(|name| tbl.numeric(name).is_ok())
        .collect();

    let mtx = correlation_matrix(&tbl, &columns)?;

    let rows: Vec<&str> = match &cfg.rows {
        Some(rows) => rows.iter().map(String::as_str).collect(),
        None => mtx.rows().iter().map(String::as_str).collect(),
    };
    let cols: Vec<&str> = match &cfg.cols {
        Some(cols) => cols.iter().map(String::as_str).collect(),
        None => mtx.cols().iter().map(String::as_str).collect(),
    };

    mtx.select(&rows, &cols)
}

/// Load a corrected table, correlate it and export the configured tables.
pub fn run_correlation(cfg: &CorrelationConfig) -> Result<CorrelationMatrix> {
    info!(correlation = %cfg.name, "building rank correlation tables");

    let mtx = build_correlations(&load_csv(&cfg.input)?, cfg)?;

    write_csv(&mtx.to_table(VARIABLE_COLUMN, CorrelationStat::Tau), &cfg.tau_output)?;
    write_csv(
        &mtx.to_table(VARIABLE_COLUMN, CorrelationStat::PValue),
        &cfg.p_value_output,
    )?;
    if let Some(path) = &cfg.count_output {
        write_csv(&mtx.to_table(VARIABLE_COLUMN, CorrelationStat::Count), path)?;
    }
    if let Some(path) = &cfg.long_output {
        write_csv(&mtx.to_long_table(), path)?;
    }

    Ok(mtx)
}

/// Run every stage of a pipeline in order.
pub fn run_pipeline(cfg: &PipelineConfig) -> Result<()> {
    for dataset in &cfg.datasets {
        run_dataset(dataset)?;
    }

    for summary in &cfg.summaries {
        run_summary(summary)?;
    }

    for correlation in &cfg.correlations {
        run_correlation(correlation)?;
    }

    info!(
        datasets = cfg.datasets.len(),
        summaries = cfg.summaries.len(),
        correlations = cfg.correlations.len(),
        "pipeline complete"
    );

    Ok(())
}
