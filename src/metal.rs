//! The particulate trace metals that receive a lithogenic correction.
//!
//! Each metal carries its crustal abundance ratio relative to aluminium (Rudnick and Gao, 2013)
//! and the labels of the four columns the correction reads and writes. The Mn ratio is the Gao
//! value; Taylor and McLennan (1985) give 0.0034.

use crate::error::AnalysisError;
use serde::Deserialize;
use std::{fmt::Display, str::FromStr};
use strum_macros::EnumIter;

/// A trace metal with a known crustal ratio.
///
/// Variant order is the order derived columns are laid out in a corrected table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Hash, PartialOrd, Ord, Deserialize)]
#[allow(missing_docs)]
pub enum Metal {
    Fe,
    Mn,
    Co,
    Zn,
    Cd,
    Ni,
    Cu,
}

/// Constants describing one metal.
#[derive(Debug)]
struct MetalInfo {
    symbol: &'static str,
    crustal_ratio: f64,
    column: &'static str,
    total_column: &'static str,
    lith_column: &'static str,
    percent_lith_column: &'static str,
}

macro_rules! metal_info {
    ($name:ident, $sym:expr, $ratio:expr) => {
        const $name: MetalInfo = MetalInfo {
            symbol: $sym,
            crustal_ratio: $ratio,
            column: concat!("p", $sym),
            total_column: concat!("p", $sym, "_T"),
            lith_column: concat!("p", $sym, "_lith"),
            percent_lith_column: concat!("%p", $sym, "_lith"),
        };
    };
}

metal_info!(FE, "Fe", 0.2323);
metal_info!(MN, "Mn", 0.00948);
metal_info!(CO, "Co", 0.00021);
metal_info!(ZN, "Zn", 0.00163);
metal_info!(CD, "Cd", 0.000001);
metal_info!(NI, "Ni", 0.00058);
metal_info!(CU, "Cu", 0.00034);

impl Metal {
    #[inline]
    fn info(self) -> &'static MetalInfo {
        use Metal::*;

        match self {
            Fe => &FE,
            Mn => &MN,
            Co => &CO,
            Zn => &ZN,
            Cd => &CD,
            Ni => &NI,
            Cu => &CU,
        }
    }

    /// Chemical symbol, e.g. `"Fe"`.
    #[inline]
    pub fn symbol(self) -> &'static str {
        self.info().symbol
    }

    /// Crustal abundance ratio of this metal to aluminium.
    #[inline]
    pub fn crustal_ratio(self) -> f64 {
        self.info().crustal_ratio
    }

    /// Particulate concentration column, e.g. `"pFe"`. Holds the measured total before the
    /// correction and the non-lithogenic remainder after it.
    #[inline]
    pub fn column(self) -> &'static str {
        self.info().column
    }

    /// Column the measured total is preserved under, e.g. `"pFe_T"`.
    #[inline]
    pub fn total_column(self) -> &'static str {
        self.info().total_column
    }

    /// Column holding the lithogenic contribution, e.g. `"pFe_lith"`.
    #[inline]
    pub fn lith_column(self) -> &'static str {
        self.info().lith_column
    }

    /// Column holding the lithogenic percentage of the total, e.g. `"%pFe_lith"`.
    #[inline]
    pub fn percent_lith_column(self) -> &'static str {
        self.info().percent_lith_column
    }
}

impl FromStr for Metal {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Metal::*;

        match s {
            "Fe" => Ok(Fe),
            "Mn" => Ok(Mn),
            "Co" => Ok(Co),
            "Zn" => Ok(Zn),
            "Cd" => Ok(Cd),
            "Ni" => Ok(Ni),
            "Cu" => Ok(Cu),
            _ => Err(AnalysisError::UnsupportedMetal(s.to_owned())),
        }
    }
}

impl Display for Metal {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "{}", self.symbol())
    }
}
