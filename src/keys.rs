//! Enums used as keys for setting options in functions.

use crate::error::AnalysisError;
use serde::Deserialize;
use std::{convert::TryFrom, str::FromStr};
use strum_macros::EnumIter;

/// Which quantity the lithogenic calculation returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum LithogenicMode {
    /// Lithogenic share of the total in percent, capped at 100.
    Percent,
    /// Lithogenic concentration in the units of the total, capped at the total.
    Absolute,
}

impl FromStr for LithogenicMode {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "percent" => Ok(LithogenicMode::Percent),
            "absolute" | "lith" => Ok(LithogenicMode::Absolute),
            _ => Err(AnalysisError::InvalidMode(s.to_owned())),
        }
    }
}

/// Fixed unit conversions applied to single columns before summarizing.
#[derive(Debug, Clone, Copy, PartialEq, EnumIter, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitConversion {
    /// pmol to nmol, e.g. dissolved Cd.
    PicomolToNanomol,
    /// nmol to pmol, e.g. particulate Mn.
    NanomolToPicomol,
}

impl UnitConversion {
    /// Multiplicative factor for this conversion.
    #[inline]
    pub fn factor(self) -> f64 {
        match self {
            UnitConversion::PicomolToNanomol => 1.0e-3,
            UnitConversion::NanomolToPicomol => 1.0e3,
        }
    }
}

/// Layout of a formatted per-group summary cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Deserialize)]
#[serde(try_from = "String")]
pub enum SummaryKind {
    /// `mean`
    Mean,
    /// `mean ± sd`
    MeanSd,
    /// `median ± mad`
    Median,
    /// `median ± mad (n)`
    MedianN,
    /// `mean ± sd (min - max)`
    MeanRange,
}

impl FromStr for SummaryKind {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use SummaryKind::*;

        match s.to_ascii_lowercase().as_str() {
            "mean" => Ok(Mean),
            "mean_sd" => Ok(MeanSd),
            "median" => Ok(Median),
            "median_n" => Ok(MedianN),
            "mean_range" => Ok(MeanRange),
            _ => Err(AnalysisError::InvalidSummaryKind(s.to_owned())),
        }
    }
}

impl TryFrom<String> for SummaryKind {
    type Error = AnalysisError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Which statistic of a pairwise rank correlation to lay out as a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum CorrelationStat {
    /// Kendall tau-b.
    Tau,
    /// Two sided p-value.
    PValue,
    /// Number of complete pairs.
    Count,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!(
            "percent".parse::<LithogenicMode>().unwrap(),
            LithogenicMode::Percent
        );
        assert_eq!(
            "Absolute".parse::<LithogenicMode>().unwrap(),
            LithogenicMode::Absolute
        );
        assert_eq!(
            "lith".parse::<LithogenicMode>().unwrap(),
            LithogenicMode::Absolute
        );

        match "bogus".parse::<LithogenicMode>() {
            Err(AnalysisError::InvalidMode(s)) => assert_eq!(s, "bogus"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_summary_kind() {
        assert_eq!("median_n".parse::<SummaryKind>().unwrap(), SummaryKind::MedianN);
        assert_eq!("MEAN".parse::<SummaryKind>().unwrap(), SummaryKind::Mean);
        assert!(matches!(
            "mode".parse::<SummaryKind>(),
            Err(AnalysisError::InvalidSummaryKind(_))
        ));
    }

    #[test]
    fn test_conversion_factors() {
        assert_eq!(UnitConversion::PicomolToNanomol.factor() * 1000.0, 1.0);
        assert_eq!(UnitConversion::NanomolToPicomol.factor(), 1000.0);
    }
}
