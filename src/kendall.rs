//! Kendall rank correlation between sample columns.
//!
//! The coefficient is tau-b, which adjusts for ties. The two sided p-value comes from the exact
//! distribution of discordant pairs for small samples without ties, and from the normal
//! approximation with tie corrected variance otherwise.

use crate::{
    error::{AnalysisError, Result},
    keys::CorrelationStat,
    table::{Column, SampleTable},
    utility::optioned,
};
use itertools::{iproduct, izip};
use optional::{none, some, Optioned};
use std::collections::HashMap;

// Largest sample size for which the exact distribution is used.
const EXACT_MAX_SIZE: usize = 33;

/// Result of a rank correlation between two columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KendallTau {
    /// Kendall tau-b, missing when it is undefined.
    pub tau: Optioned<f64>,
    /// Two sided p-value for the null hypothesis of no association.
    pub p_value: Optioned<f64>,
    /// Number of rows where both values are present.
    pub n: usize,
}

/// Kendall tau-b of two columns over the rows where both are present.
///
/// Tau and the p-value are missing with fewer than two complete pairs, or when either column is
/// constant over those pairs.
///
/// Without ties and with at most 33 pairs the p-value is exact. Otherwise it comes from the normal
/// approximation, whose complementary error function is accurate to about 1.2e-7, so those
/// p-values agree with scipy's to that tolerance.
///
/// # Examples
///
/// ```rust
/// use optional::{none, some};
/// use trace_metal_analysis::kendall::kendall_tau;
///
/// let x = [some(1.0), some(2.0), some(3.0), none(), some(4.0), some(5.0)];
/// let y = [some(2.0), some(1.0), some(4.0), some(9.0), some(3.0), some(5.0)];
///
/// let result = kendall_tau(&x, &y);
///
/// assert_eq!(result.n, 5);
/// assert!((result.tau.unpack() - 0.6).abs() < 1.0e-12);
/// ```
pub fn kendall_tau(x: &[Optioned<f64>], y: &[Optioned<f64>]) -> KendallTau {
    debug_assert_eq!(x.len(), y.len());

    let pairs: Vec<(f64, f64)> = izip!(x, y)
        .filter_map(|(x, y)| match (x.into_option(), y.into_option()) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        })
        .collect();
    let n = pairs.len();

    let undefined = KendallTau {
        tau: none(),
        p_value: none(),
        n,
    };

    if n < 2 {
        return undefined;
    }

    let counts = PairCounts::new(&pairs);
    let tot = n * (n - 1) / 2;
    if counts.x_ties == tot || counts.y_ties == tot {
        return undefined;
    }

    let con_minus_dis = counts.concordant as f64 - counts.discordant as f64;
    let tau = con_minus_dis / ((tot - counts.x_ties) as f64).sqrt()
        / ((tot - counts.y_ties) as f64).sqrt();
    let tau = tau.max(-1.0).min(1.0);

    let p_value = if counts.x_ties == 0
        && counts.y_ties == 0
        && (n <= EXACT_MAX_SIZE || counts.discordant.min(tot - counts.discordant) <= 1)
    {
        exact_p_value(n, counts.discordant.min(tot - counts.discordant))
    } else {
        asymptotic_p_value(n, con_minus_dis, &pairs, &counts)
    };

    KendallTau {
        tau: optioned(tau),
        p_value: optioned(p_value),
        n,
    }
}

#[derive(Debug, Default)]
struct PairCounts {
    concordant: usize,
    discordant: usize,
    // Pairs tied in x, including those also tied in y.
    x_ties: usize,
    // Pairs tied in y, including those also tied in x.
    y_ties: usize,
}

impl PairCounts {
    fn new(pairs: &[(f64, f64)]) -> Self {
        let mut counts = PairCounts::default();

        for (i, &(xi, yi)) in pairs.iter().enumerate() {
            for &(xj, yj) in &pairs[(i + 1)..] {
                let dx = xi - xj;
                let dy = yi - yj;

                if dx == 0.0 {
                    counts.x_ties += 1;
                }
                if dy == 0.0 {
                    counts.y_ties += 1;
                }

                if dx != 0.0 && dy != 0.0 {
                    if (dx > 0.0) == (dy > 0.0) {
                        counts.concordant += 1;
                    } else {
                        counts.discordant += 1;
                    }
                }
            }
        }

        counts
    }
}

// Probability of at most `c` discordant pairs (or at least tot - c) among n untied values.
fn exact_p_value(n: usize, c: usize) -> f64 {
    if n <= 2 {
        return 1.0;
    }

    // Number of permutations of j items with k inversions, for k <= c.
    let mut dist = vec![0.0; c + 1];
    dist[0] = 1.0;

    let mut prefix = vec![0.0; c + 1];
    for j in 2..=n {
        let mut running = 0.0;
        for (p, &d) in prefix.iter_mut().zip(dist.iter()) {
            running += d;
            *p = running;
        }

        for k in 0..=c {
            dist[k] = if k >= j {
                prefix[k] - prefix[k - j]
            } else {
                prefix[k]
            };
        }
    }

    let factorial: f64 = (1..=n).map(|i| i as f64).product();
    let prob = 2.0 * dist.iter().sum::<f64>() / factorial;

    prob.max(0.0).min(1.0)
}

fn asymptotic_p_value(
    n: usize,
    con_minus_dis: f64,
    pairs: &[(f64, f64)],
    counts: &PairCounts,
) -> f64 {
    let (x0, x1) = tie_terms(pairs.iter().map(|&(x, _)| x));
    let (y0, y1) = tie_terms(pairs.iter().map(|&(_, y)| y));

    let size = n as f64;
    let m = size * (size - 1.0);
    let mut var = (m * (2.0 * size + 5.0) - x1 - y1) / 18.0
        + (2.0 * counts.x_ties as f64 * counts.y_ties as f64) / m;
    if n > 2 {
        var += x0 * y0 / (9.0 * m * (size - 2.0));
    }

    let z = con_minus_dis / var.sqrt();
    erfc(z.abs() / std::f64::consts::SQRT_2)
}

// Sums of t(t-1)(t-2) and t(t-1)(2t+5) over groups of t tied values.
fn tie_terms<I: Iterator<Item = f64>>(vals: I) -> (f64, f64) {
    let mut groups: HashMap<u64, usize> = HashMap::new();
    for val in vals {
        // Normalize negative zero so it ties with zero.
        *groups.entry((val + 0.0).to_bits()).or_insert(0) += 1;
    }

    groups
        .values()
        .filter(|&&cnt| cnt > 1)
        .map(|&cnt| cnt as f64)
        .fold((0.0, 0.0), |(t0, t1), cnt| {
            (
                t0 + cnt * (cnt - 1.0) * (cnt - 2.0),
                t1 + cnt * (cnt - 1.0) * (2.0 * cnt + 5.0),
            )
        })
}

/// Complementary error function, with a fractional error below 1.2e-7 everywhere.
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);

    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87
                                    + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let ans = t * poly.exp();

    if x >= 0.0 {
        ans
    } else {
        2.0 - ans
    }
}

/// Pairwise rank correlations between sets of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    rows: Vec<String>,
    cols: Vec<String>,
    // Row major.
    cells: Vec<KendallTau>,
}

/// Correlate every listed column with every other one.
///
/// The diagonal has tau and p-value of one and counts the values present in that column.
///
/// Fails with `MissingColumn` if a listed column is absent or not numeric.
pub fn correlation_matrix(tbl: &SampleTable, columns: &[&str]) -> Result<CorrelationMatrix> {
    let data: Vec<&[Optioned<f64>]> = columns
        .iter()
        .map(|&name| tbl.numeric(name))
        .collect::<Result<_>>()?;

    let cells = iproduct!(0..data.len(), 0..data.len())
        .map(|(i, j)| {
            if i == j {
                KendallTau {
                    tau: some(1.0),
                    p_value: some(1.0),
                    n: data[i].iter().filter(|v| v.is_some()).count(),
                }
            } else {
                kendall_tau(data[i], data[j])
            }
        })
        .collect();

    let names: Vec<String> = columns.iter().map(|&name| name.to_owned()).collect();

    Ok(CorrelationMatrix {
        rows: names.clone(),
        cols: names,
        cells,
    })
}

impl CorrelationMatrix {
    /// Row labels.
    #[inline]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Column labels.
    #[inline]
    pub fn cols(&self) -> &[String] {
        &self.cols
    }

    /// Correlation of a row variable with a column variable.
    pub fn get(&self, row: &str, col: &str) -> Option<&KendallTau> {
        let i = self.rows.iter().position(|r| r == row)?;
        let j = self.cols.iter().position(|c| c == col)?;

        Some(&self.cells[i * self.cols.len() + j])
    }

    /// Sub-matrix with the listed row and column variables, in the listed order.
    ///
    /// Fails with `MissingColumn` for the first label that is not in the matrix.
    pub fn select(&self, rows: &[&str], cols: &[&str]) -> Result<CorrelationMatrix> {
        let find = |labels: &[String], name: &str| {
            labels
                .iter()
                .position(|l| l == name)
                .ok_or_else(|| AnalysisError::MissingColumn(name.to_owned()))
        };

        let row_idx: Vec<usize> = rows
            .iter()
            .map(|&r| find(&self.rows, r))
            .collect::<Result<_>>()?;
        let col_idx: Vec<usize> = cols
            .iter()
            .map(|&c| find(&self.cols, c))
            .collect::<Result<_>>()?;

        let cells = iproduct!(&row_idx, &col_idx)
            .map(|(&i, &j)| self.cells[i * self.cols.len() + j])
            .collect();

        Ok(CorrelationMatrix {
            rows: rows.iter().map(|&r| r.to_owned()).collect(),
            cols: cols.iter().map(|&c| c.to_owned()).collect(),
            cells,
        })
    }

    /// Lay out one statistic as a table: a text column of row labels named `index_label`, then
    /// one numeric column per column variable.
    pub fn to_table(&self, index_label: &str, stat: CorrelationStat) -> SampleTable {
        let mut tbl = SampleTable::new().with_text_column(index_label, self.rows.clone());

        for (j, col) in self.cols.iter().enumerate() {
            let vals = self
                .cells
                .iter()
                .skip(j)
                .step_by(self.cols.len())
                .map(|cell| stat_value(cell, stat))
                .collect();
            tbl.set_column(col.as_str(), Column::Numeric(vals));
        }

        tbl
    }

    /// Lay out every pair as one row with both labels, tau and the p-value.
    pub fn to_long_table(&self) -> SampleTable {
        let (var1, var2): (Vec<String>, Vec<String>) = iproduct!(&self.rows, &self.cols)
            .map(|(r, c)| (r.clone(), c.clone()))
            .unzip();

        SampleTable::new()
            .with_text_column("Variable 1", var1)
            .with_text_column("Variable 2", var2)
            .with_numeric_column(
                "Kendall Correlation",
                self.cells.iter().map(|c| c.tau).collect(),
            )
            .with_numeric_column("P-value", self.cells.iter().map(|c| c.p_value).collect())
    }
}

fn stat_value(cell: &KendallTau, stat: CorrelationStat) -> Optioned<f64> {
    match stat {
        CorrelationStat::Tau => cell.tau,
        CorrelationStat::PValue => cell.p_value,
        CorrelationStat::Count => some(cell.n as f64),
    }
}
