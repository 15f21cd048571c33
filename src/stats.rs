//! Descriptive statistics of sample columns, and per-station summary tables.
//!
//! All statistics skip missing values. The standard deviation is the sample standard deviation
//! (one delta degree of freedom) and the median absolute deviation is unscaled.

use crate::{
    error::Result,
    keys::SummaryKind,
    table::{Column, SampleTable},
    utility::{optioned, present},
};
use itertools::{Itertools, MinMaxResult};
use optional::{none, some, Optioned};
use std::collections::BTreeMap;

/// Number of values that are not missing.
#[inline]
pub fn count(vals: &[Optioned<f64>]) -> usize {
    vals.iter().filter(|v| v.is_some()).count()
}

/// Arithmetic mean.
pub fn mean(vals: &[Optioned<f64>]) -> Optioned<f64> {
    let (sum, n) = present(vals).fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));

    if n == 0 {
        none()
    } else {
        optioned(sum / n as f64)
    }
}

/// Sample standard deviation. Missing if there are fewer than two values.
pub fn std_dev(vals: &[Optioned<f64>]) -> Optioned<f64> {
    let n = count(vals);
    if n < 2 {
        return none();
    }

    let m = mean(vals).unpack();
    let sum_sq = present(vals).map(|v| (v - m) * (v - m)).sum::<f64>();

    optioned((sum_sq / (n - 1) as f64).sqrt())
}

/// Median.
pub fn median(vals: &[Optioned<f64>]) -> Optioned<f64> {
    let sorted: Vec<f64> = present(vals).sorted_by(|a, b| a.total_cmp(b)).collect();
    median_of_sorted(&sorted)
}

/// Median of the absolute deviations from the median.
pub fn median_abs_deviation(vals: &[Optioned<f64>]) -> Optioned<f64> {
    let med = match median(vals).into_option() {
        Some(med) => med,
        None => return none(),
    };

    let deviations: Vec<f64> = present(vals)
        .map(|v| (v - med).abs())
        .sorted_by(|a, b| a.total_cmp(b))
        .collect();

    median_of_sorted(&deviations)
}

/// Smallest and largest value.
pub fn min_max(vals: &[Optioned<f64>]) -> (Optioned<f64>, Optioned<f64>) {
    match present(vals).minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => (none(), none()),
        MinMaxResult::OneElement(v) => (some(v), some(v)),
        MinMaxResult::MinMax(lo, hi) => (some(lo), some(hi)),
    }
}

fn median_of_sorted(sorted: &[f64]) -> Optioned<f64> {
    let n = sorted.len();
    if n == 0 {
        none()
    } else if n % 2 == 1 {
        some(sorted[n / 2])
    } else {
        optioned((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// Descriptive statistics of one column.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    /// Number of values present.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: Optioned<f64>,
    /// Sample standard deviation.
    pub std_dev: Optioned<f64>,
    /// Median.
    pub median: Optioned<f64>,
    /// Median absolute deviation.
    pub mad: Optioned<f64>,
    /// Smallest value.
    pub min: Optioned<f64>,
    /// Largest value.
    pub max: Optioned<f64>,
}

/// Calculate all the descriptive statistics of a column.
///
/// # Examples
///
/// ```rust
/// use optional::{none, some};
/// use trace_metal_analysis::stats::describe;
///
/// let summary = describe(&[some(1.0), some(2.0), none(), some(4.0)]);
///
/// assert_eq!(summary.count, 3);
/// assert_eq!(summary.median, some(2.0));
/// assert_eq!(summary.mad, some(1.0));
/// assert_eq!(summary.max, some(4.0));
/// ```
pub fn describe(vals: &[Optioned<f64>]) -> Summary {
    let (min, max) = min_max(vals);

    Summary {
        count: count(vals),
        mean: mean(vals),
        std_dev: std_dev(vals),
        median: median(vals),
        mad: median_abs_deviation(vals),
        min,
        max,
    }
}

impl Summary {
    /// Format as a table cell with `decimals` digits after the point.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use optional::some;
    /// use trace_metal_analysis::{stats::describe, SummaryKind};
    ///
    /// let summary = describe(&[some(0.5), some(1.25), some(2.0)]);
    ///
    /// assert_eq!(summary.format(SummaryKind::MedianN, 2), "1.25 ± 0.75 (3)");
    /// assert_eq!(summary.format(SummaryKind::Mean, 0), "1");
    /// ```
    pub fn format(&self, kind: SummaryKind, decimals: usize) -> String {
        let fmt = |val: Optioned<f64>| format_value(val, decimals);

        match kind {
            SummaryKind::Mean => fmt(self.mean),
            SummaryKind::MeanSd => format!("{} ± {}", fmt(self.mean), fmt(self.std_dev)),
            SummaryKind::Median => format!("{} ± {}", fmt(self.median), fmt(self.mad)),
            SummaryKind::MedianN => format!(
                "{} ± {} ({})",
                fmt(self.median),
                fmt(self.mad),
                self.count
            ),
            SummaryKind::MeanRange => format!(
                "{} ± {} ({} - {})",
                fmt(self.mean),
                fmt(self.std_dev),
                fmt(self.min),
                fmt(self.max)
            ),
        }
    }
}

// Zero decimals rounds half to even and prints an integer.
fn format_value(val: Optioned<f64>, decimals: usize) -> String {
    match val.into_option() {
        None => "NaN".to_owned(),
        Some(v) if decimals == 0 => format!("{}", round_half_even(v) as i64),
        Some(v) => format!("{:.*}", decimals, v),
    }
}

fn round_half_even(val: f64) -> f64 {
    if (val - val.trunc()).abs() == 0.5 {
        2.0 * (val / 2.0).round()
    } else {
        val.round()
    }
}

/// Statistics of several columns for one group of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    /// Value of the grouping column shared by these rows.
    pub group: String,
    /// Column label and statistics, in the order the columns were requested.
    pub columns: Vec<(String, Summary)>,
}

impl GroupSummary {
    /// Statistics for a column by label.
    pub fn get(&self, column: &str) -> Option<&Summary> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, summary)| summary)
    }
}

/// Group rows on a text column and describe each of the listed numeric columns per group.
///
/// Groups are returned in ascending order of their key.
///
/// Fails with `MissingColumn` if the grouping column is not text or one of the listed columns
/// is not numeric.
pub fn summarize_by(
    tbl: &SampleTable,
    group_column: &str,
    columns: &[&str],
) -> Result<Vec<GroupSummary>> {
    let keys = tbl.text(group_column)?;
    let data: Vec<(&str, &[Optioned<f64>])> = columns
        .iter()
        .map(|&name| tbl.numeric(name).map(|vals| (name, vals)))
        .collect::<Result<_>>()?;

    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (row, key) in keys.iter().enumerate() {
        groups.entry(key.as_str()).or_default().push(row);
    }

    let summaries = groups
        .into_iter()
        .map(|(key, rows)| {
            let columns = data
                .iter()
                .map(|&(name, vals)| {
                    let group_vals: Vec<Optioned<f64>> = rows.iter().map(|&r| vals[r]).collect();
                    (name.to_owned(), describe(&group_vals))
                })
                .collect();

            GroupSummary {
                group: key.to_owned(),
                columns,
            }
        })
        .collect();

    Ok(summaries)
}

/// Lay out group summaries as a table of formatted cells, one row per group.
///
/// The first column holds the group key under `group_column`, followed by one text column per
/// summarized column.
pub fn summary_table(
    summaries: &[GroupSummary],
    group_column: &str,
    kind: SummaryKind,
    decimals: usize,
) -> SampleTable {
    let mut tbl = SampleTable::new().with_text_column(
        group_column,
        summaries.iter().map(|s| s.group.clone()).collect(),
    );

    let names: Vec<&str> = summaries
        .first()
        .map(|s| s.columns.iter().map(|(name, _)| name.as_str()).collect())
        .unwrap_or_default();

    for (i, name) in names.into_iter().enumerate() {
        let cells = summaries
            .iter()
            .map(|s| s.columns[i].1.format(kind, decimals))
            .collect();
        tbl.set_column(name, Column::Text(cells));
    }

    tbl
}
