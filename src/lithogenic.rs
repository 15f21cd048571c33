//! Lithogenic fraction of particulate trace metals.
//!
//! The share of a particulate metal concentration that comes from mineral dust is estimated from
//! the particulate aluminium of the same sample and the metal's crustal ratio:
//!
//! ```text
//! lith      = min(pAl × ratio, pTM)
//! %lith     = min(pAl × ratio / pTM × 100, 100)
//! non-lith  = pTM − lith
//! ```
//!
//! Missing inputs give missing outputs. A zero total has no defined percentage, so `%lith` is
//! missing there while `lith` is zero.

use crate::{error::Result, keys::LithogenicMode, metal::Metal, utility::optioned};
use optional::{none, Optioned};

/// Calculate the lithogenic percentage or the lithogenic concentration of a metal.
///
/// # Examples
///
/// ```rust
/// use optional::some;
/// use trace_metal_analysis::{lithogenic_fraction, LithogenicMode, Metal};
///
/// // Dust can not account for more than all of the iron.
/// let pct = lithogenic_fraction(some(10.0), Metal::Fe, some(1.0), LithogenicMode::Percent);
/// assert_eq!(pct, some(100.0));
///
/// let lith = lithogenic_fraction(some(10.0), Metal::Fe, some(1.0), LithogenicMode::Absolute);
/// assert_eq!(lith, some(1.0));
/// ```
pub fn lithogenic_fraction(
    p_al: Optioned<f64>,
    metal: Metal,
    p_tm: Optioned<f64>,
    mode: LithogenicMode,
) -> Optioned<f64> {
    let (p_al, p_tm) = match (p_al.into_option(), p_tm.into_option()) {
        (Some(p_al), Some(p_tm)) => (p_al, p_tm),
        _ => return none(),
    };

    let raw_lith = p_al * metal.crustal_ratio();

    match mode {
        LithogenicMode::Percent => {
            if p_tm == 0.0 {
                none()
            } else {
                optioned((raw_lith / p_tm * 100.0).min(100.0))
            }
        }
        LithogenicMode::Absolute => optioned(raw_lith.min(p_tm)),
    }
}

/// Same as `lithogenic_fraction`, but with the metal and mode given by name.
///
/// Fails with `UnsupportedMetal` if the symbol is not one of the seven corrected metals and with
/// `InvalidMode` if the mode is not `percent` or `absolute` (`lith` is accepted as an alias).
///
/// # Examples
///
/// ```rust
/// use optional::some;
/// use trace_metal_analysis::{lithogenic_fraction_by_name, AnalysisError};
///
/// assert!(lithogenic_fraction_by_name(some(1.0), "Cu", some(0.5), "percent").is_ok());
///
/// match lithogenic_fraction_by_name(some(1.0), "Xx", some(1.0), "percent") {
///     Err(AnalysisError::UnsupportedMetal(_)) => {}
///     _ => panic!("Xx is not a supported metal"),
/// }
/// ```
pub fn lithogenic_fraction_by_name(
    p_al: Optioned<f64>,
    metal: &str,
    p_tm: Optioned<f64>,
    mode: &str,
) -> Result<Optioned<f64>> {
    let metal: Metal = metal.parse()?;
    let mode: LithogenicMode = mode.parse()?;

    Ok(lithogenic_fraction(p_al, metal, p_tm, mode))
}

/// All derived quantities of one metal in one sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LithogenicSplit {
    /// Measured total.
    pub total: Optioned<f64>,
    /// Lithogenic contribution, never more than the total.
    pub lith: Optioned<f64>,
    /// Lithogenic percentage of the total, capped at 100.
    pub percent_lith: Optioned<f64>,
    /// What is left of the total after removing the lithogenic part.
    pub non_lith: Optioned<f64>,
}

impl LithogenicSplit {
    /// Split a measured total into its lithogenic and non-lithogenic parts.
    pub fn new(p_al: Optioned<f64>, metal: Metal, p_tm: Optioned<f64>) -> Self {
        let lith = lithogenic_fraction(p_al, metal, p_tm, LithogenicMode::Absolute);
        let percent_lith = lithogenic_fraction(p_al, metal, p_tm, LithogenicMode::Percent);

        let non_lith = match (p_tm.into_option(), lith.into_option()) {
            (Some(total), Some(lith)) => optioned(total - lith),
            _ => none(),
        };

        LithogenicSplit {
            total: p_tm,
            lith,
            percent_lith,
            non_lith,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{error::AnalysisError, utility::test_tools::approx_equal};
    use optional::some;
    use strum::IntoEnumIterator;

    #[test]
    fn test_iron_capped_at_total() {
        let pct = lithogenic_fraction(some(10.0), Metal::Fe, some(1.0), LithogenicMode::Percent);
        let lith = lithogenic_fraction(some(10.0), Metal::Fe, some(1.0), LithogenicMode::Absolute);

        assert_eq!(pct, some(100.0));
        assert_eq!(lith, some(1.0));

        let split = LithogenicSplit::new(some(10.0), Metal::Fe, some(1.0));
        assert_eq!(split.non_lith, some(0.0));
        assert_eq!(split.total, some(1.0));
    }

    #[test]
    fn test_copper_small_fraction() {
        let pct = lithogenic_fraction(some(0.1), Metal::Cu, some(0.05), LithogenicMode::Percent)
            .unpack();
        let lith = lithogenic_fraction(some(0.1), Metal::Cu, some(0.05), LithogenicMode::Absolute)
            .unpack();

        assert!(approx_equal(pct, 0.068, 1.0e-9));
        assert!(approx_equal(lith, 0.000034, 1.0e-12));

        let split = LithogenicSplit::new(some(0.1), Metal::Cu, some(0.05));
        assert!(approx_equal(split.non_lith.unpack(), 0.049966, 1.0e-12));
    }

    #[test]
    fn test_bounds() {
        let p_als = [0.0, 0.01, 0.5, 3.0, 12.0, 250.0];
        let p_tms = [1.0e-6, 0.002, 0.1, 1.0, 40.0];

        for metal in Metal::iter() {
            for &p_al in &p_als {
                for &p_tm in &p_tms {
                    let lith = lithogenic_fraction(
                        some(p_al),
                        metal,
                        some(p_tm),
                        LithogenicMode::Absolute,
                    )
                    .unpack();
                    let pct =
                        lithogenic_fraction(some(p_al), metal, some(p_tm), LithogenicMode::Percent)
                            .unpack();

                    assert!(lith >= 0.0 && lith <= p_tm);
                    assert!(pct >= 0.0 && pct <= 100.0);

                    // Below the cap the two modes agree with each other.
                    if p_al * metal.crustal_ratio() < p_tm {
                        assert!(approx_equal(lith / p_tm * 100.0, pct, 1.0e-9));
                    }
                }
            }
        }
    }

    #[test]
    fn test_missing_values_propagate() {
        for &mode in &[LithogenicMode::Percent, LithogenicMode::Absolute] {
            assert!(lithogenic_fraction(none(), Metal::Zn, some(1.0), mode).is_none());
            assert!(lithogenic_fraction(some(1.0), Metal::Zn, none(), mode).is_none());
        }

        let split = LithogenicSplit::new(none(), Metal::Mn, some(2.0));
        assert_eq!(split.total, some(2.0));
        assert!(split.lith.is_none());
        assert!(split.percent_lith.is_none());
        assert!(split.non_lith.is_none());
    }

    #[test]
    fn test_zero_total() {
        assert!(
            lithogenic_fraction(some(1.0), Metal::Ni, some(0.0), LithogenicMode::Percent)
                .is_none()
        );
        assert_eq!(
            lithogenic_fraction(some(1.0), Metal::Ni, some(0.0), LithogenicMode::Absolute),
            some(0.0)
        );
    }

    #[test]
    fn test_by_name() {
        let pct = lithogenic_fraction_by_name(some(10.0), "Fe", some(1.0), "percent").unwrap();
        assert_eq!(pct, some(100.0));

        let lith = lithogenic_fraction_by_name(some(10.0), "Fe", some(1.0), "lith").unwrap();
        assert_eq!(lith, some(1.0));

        match lithogenic_fraction_by_name(some(1.0), "Xx", some(1.0), "percent") {
            Err(AnalysisError::UnsupportedMetal(sym)) => assert_eq!(sym, "Xx"),
            other => panic!("unexpected result: {:?}", other),
        }

        match lithogenic_fraction_by_name(some(1.0), "Fe", some(1.0), "bogus") {
            Err(AnalysisError::InvalidMode(mode)) => assert_eq!(mode, "bogus"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
