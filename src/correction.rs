//! Lithogenic correction of a whole sample table.
//!
//! The correction runs in two phases. `derive_corrections` reads the measured totals and `pAl`
//! and computes every derived value without touching the table. `apply_corrections` then widens
//! the table: percent lithogenic columns, lithogenic columns, and for each metal the total is
//! copied to its `_T` column before the metal column is overwritten with the non-lithogenic
//! remainder. Rows are never added, removed or reordered.

use crate::{
    error::{AnalysisError, Result},
    lithogenic::LithogenicSplit,
    metal::Metal,
    table::{Column, SampleTable},
    utility::optioned,
};
use itertools::izip;
use optional::{none, Optioned};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

/// Label of the aluminium column used as the dust proxy.
pub const ALUMINIUM_COLUMN: &str = "pAl";

/// Derived values of one metal for every row of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct MetalCorrection {
    metal: Metal,
    splits: Vec<LithogenicSplit>,
}

impl MetalCorrection {
    /// The metal these values belong to.
    #[inline]
    pub fn metal(&self) -> Metal {
        self.metal
    }

    /// Per row split of the measured total.
    #[inline]
    pub fn splits(&self) -> &[LithogenicSplit] {
        &self.splits
    }

    fn total(&self) -> Vec<Optioned<f64>> {
        self.splits.iter().map(|s| s.total).collect()
    }

    fn percent_lith(&self) -> Vec<Optioned<f64>> {
        self.splits.iter().map(|s| s.percent_lith).collect()
    }

    fn lith(&self) -> Vec<Optioned<f64>> {
        self.splits.iter().map(|s| s.lith).collect()
    }

    fn non_lith(&self) -> Vec<Optioned<f64>> {
        self.splits.iter().map(|s| s.non_lith).collect()
    }
}

/// Compute the lithogenic split of every metal for every row.
///
/// Fails with `MissingColumn` if `pAl` or any of the seven metal columns is absent or not
/// numeric. All columns are checked before any value is computed.
pub fn derive_corrections(tbl: &SampleTable) -> Result<Vec<MetalCorrection>> {
    let p_al = tbl.numeric(ALUMINIUM_COLUMN)?;

    let totals: Vec<(Metal, &[Optioned<f64>])> = Metal::iter()
        .map(|metal| tbl.numeric(metal.column()).map(|vals| (metal, vals)))
        .collect::<Result<_>>()?;

    let corrections = totals
        .into_iter()
        .map(|(metal, p_tm)| {
            let splits: Vec<LithogenicSplit> = izip!(p_al, p_tm)
                .map(|(&al, &tm)| LithogenicSplit::new(al, metal, tm))
                .collect();

            let capped = splits
                .iter()
                .filter(|s| s.percent_lith.into_option() == Some(100.0))
                .count();
            debug!(metal = %metal, capped, "derived lithogenic fractions");

            MetalCorrection { metal, splits }
        })
        .collect();

    Ok(corrections)
}

/// Write derived values into the table and substitute the non-lithogenic remainder for the
/// measured total.
///
/// Columns are appended in this order: every `%p<M>_lith`, every `p<M>_lith`, every `p<M>_T`.
/// For each metal the total is copied to `p<M>_T` before `p<M>` is overwritten.
///
/// Fails with `MissingColumn` if a metal column has gone missing since the corrections were
/// derived, and with `StaleCorrection` if the corrections have a different number of rows or the
/// metal column no longer holds the totals they were derived from. Nothing is written in either
/// case.
pub fn apply_corrections(tbl: &mut SampleTable, corrections: &[MetalCorrection]) -> Result<()> {
    for corr in corrections {
        let current = tbl.numeric(corr.metal.column())?;
        if corr.splits.len() != current.len()
            || izip!(current, &corr.splits).any(|(&val, split)| val != split.total)
        {
            return Err(AnalysisError::StaleCorrection(corr.metal.column().to_owned()));
        }

        if tbl.has_column(corr.metal.total_column()) {
            warn!(
                column = corr.metal.total_column(),
                "table already has a total column, it will be overwritten"
            );
        }
    }

    for corr in corrections {
        tbl.set_column(
            corr.metal.percent_lith_column(),
            Column::Numeric(corr.percent_lith()),
        );
    }

    for corr in corrections {
        tbl.set_column(corr.metal.lith_column(), Column::Numeric(corr.lith()));
    }

    for corr in corrections {
        tbl.set_column(corr.metal.total_column(), Column::Numeric(corr.total()));
        tbl.set_column(corr.metal.column(), Column::Numeric(corr.non_lith()));
    }

    Ok(())
}

/// Run both phases of the lithogenic correction on a table.
///
/// # Examples
///
/// ```rust
/// use optional::some;
/// use trace_metal_analysis::{correct_table, Metal, SampleTable};
///
/// let mut tbl = SampleTable::new().with_numeric_column("pAl", vec![some(10.0)]);
/// for metal in &[Metal::Fe, Metal::Mn, Metal::Co, Metal::Zn, Metal::Cd, Metal::Ni, Metal::Cu] {
///     tbl = tbl.with_numeric_column(metal.column(), vec![some(1.0)]);
/// }
///
/// let tbl = correct_table(tbl).unwrap();
///
/// assert_eq!(tbl.numeric("pFe_T").unwrap()[0], some(1.0));
/// assert_eq!(tbl.numeric("pFe_lith").unwrap()[0], some(1.0));
/// assert_eq!(tbl.numeric("%pFe_lith").unwrap()[0], some(100.0));
/// assert_eq!(tbl.numeric("pFe").unwrap()[0], some(0.0));
/// ```
pub fn correct_table(mut tbl: SampleTable) -> Result<SampleTable> {
    let corrections = derive_corrections(&tbl)?;
    apply_corrections(&mut tbl, &corrections)?;

    info!(
        rows = tbl.num_rows(),
        columns = tbl.num_columns(),
        "applied lithogenic correction"
    );

    Ok(tbl)
}

/// Recompute the non-lithogenic remainder of each listed metal from existing total and
/// lithogenic columns, `p<M> = p<M>_T - p<M>_lith`.
///
/// Only for tables that already carry the derived columns, such as an earlier corrected export
/// whose lithogenic columns were edited by hand. Fails with `MissingColumn` if any
/// `_T` or `_lith` column is absent, and nothing is written in that case.
pub fn recompute_non_lithogenic(tbl: &mut SampleTable, metals: &[Metal]) -> Result<()> {
    let remainders: Vec<(Metal, Vec<Optioned<f64>>)> = metals
        .iter()
        .map(|&metal| -> Result<(Metal, Vec<Optioned<f64>>)> {
            let total = tbl.numeric(metal.total_column())?;
            let lith = tbl.numeric(metal.lith_column())?;

            let remainder = izip!(total, lith)
                .map(|(t, l)| match (t.into_option(), l.into_option()) {
                    (Some(t), Some(l)) => optioned(t - l),
                    _ => none(),
                })
                .collect();

            Ok((metal, remainder))
        })
        .collect::<Result<_>>()?;

    for (metal, remainder) in remainders {
        tbl.set_column(metal.column(), Column::Numeric(remainder));
    }

    info!(metals = metals.len(), "recomputed non-lithogenic remainders");

    Ok(())
}
