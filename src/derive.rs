//! Derived columns and row selections used when summarizing the corrected tables.
//!
//! Includes unit conversions, sums of pigment-based phytoplankton groups, shares of total
//! chlorophyll, the mixed layer selection and the station labels used in tables.

use crate::{
    error::Result,
    keys::UnitConversion,
    table::{Column, SampleTable},
    utility::optioned,
};
use itertools::izip;
use optional::{none, some, Optioned};

/// Label of the mixed layer flag column.
pub const MIXED_LAYER_COLUMN: &str = "ML";
/// Flag value for samples inside the mixed layer.
pub const IN_MIXED_LAYER: &str = "IN";
/// Label of the station code column.
pub const STATION_COLUMN: &str = "Station";
/// Label of the total chlorophyll a column.
pub const TOTAL_CHLA_COLUMN: &str = "Tchla";

/// Phytoplankton groups from pigment analysis, after the cyanobacteria are combined.
pub const PHYTO_GROUPS: [&str; 9] = [
    "Diatoms",
    "Phaeocystis",
    "Coccolithophores",
    "Dinoflagellates",
    "Cryptophytes",
    "Pelagophytes",
    "Prasinophytes",
    "Chlorophytes",
    "Cyanobacteria",
];

/// Station codes along the cruise track and the latitude labels used in tables.
pub const STATION_LABELS: [(&str, &str); 8] = [
    ("IO01", "St. 58.5°S"),
    ("IO02", "St. 56.0°S"),
    ("IO03", "St. 53.5°S"),
    ("IO04", "St. 50.6°S"),
    ("IO05", "St. 48.0°S"),
    ("IO06", "St. 45.5°S"),
    ("IO07", "St. 43.0°S"),
    ("IO08", "St. 41.0°S"),
];

/// Multiply every value of a column by `factor`.
pub fn scale_column(tbl: &mut SampleTable, name: &str, factor: f64) -> Result<()> {
    tbl.map_numeric(name, |val| val.map_t(|v| v * factor))
}

/// Apply a fixed unit conversion to a column.
///
/// # Examples
///
/// ```rust
/// use optional::some;
/// use trace_metal_analysis::{convert_units, SampleTable, UnitConversion};
///
/// let mut tbl = SampleTable::new().with_numeric_column("dCd", vec![some(450.0)]);
/// convert_units(&mut tbl, "dCd", UnitConversion::PicomolToNanomol).unwrap();
///
/// assert_eq!(tbl.numeric("dCd").unwrap()[0], some(0.45));
/// ```
#[inline]
pub fn convert_units(tbl: &mut SampleTable, name: &str, conversion: UnitConversion) -> Result<()> {
    scale_column(tbl, name, conversion.factor())
}

/// Add a column holding the row-wise sum of `parts`.
///
/// The sum is missing wherever one of the parts is missing. The new column goes directly after
/// `after`, or at the end if `after` is `None`.
pub fn add_sum_column(
    tbl: &mut SampleTable,
    name: &str,
    parts: &[&str],
    after: Option<&str>,
) -> Result<()> {
    let mut sums: Vec<Optioned<f64>> = vec![some(0.0); tbl.num_rows()];

    for &part in parts {
        let vals = tbl.numeric(part)?;
        for (sum, val) in sums.iter_mut().zip(vals) {
            *sum = match (sum.into_option(), val.into_option()) {
                (Some(s), Some(v)) => optioned(s + v),
                _ => none(),
            };
        }
    }

    place_column(tbl, name, Column::Numeric(sums), after)
}

/// Add a column holding `numerator / denominator × scale`.
///
/// The ratio is missing where either value is missing or the denominator is zero.
pub fn add_ratio_column(
    tbl: &mut SampleTable,
    name: &str,
    numerator: &str,
    denominator: &str,
    scale: f64,
) -> Result<()> {
    let ratios = ratio_values(tbl.numeric(numerator)?, tbl.numeric(denominator)?, scale);
    tbl.set_column(name, Column::Numeric(ratios));

    Ok(())
}

/// For each group add a `{group}_P` column with its percentage of `reference`.
///
/// All groups are checked before any column is added.
pub fn add_percent_columns(tbl: &mut SampleTable, groups: &[&str], reference: &str) -> Result<()> {
    let reference_vals = tbl.numeric(reference)?;

    let percents: Vec<(String, Vec<Optioned<f64>>)> = groups
        .iter()
        .map(|&group| {
            tbl.numeric(group)
                .map(|vals| (format!("{}_P", group), ratio_values(vals, reference_vals, 100.0)))
        })
        .collect::<Result<_>>()?;

    for (name, vals) in percents {
        tbl.set_column(name, Column::Numeric(vals));
    }

    Ok(())
}

/// Combine Synechococcus and Prochlorococcus into a `Cyanobacteria` column placed after
/// Prochlorococcus.
#[inline]
pub fn add_cyanobacteria(tbl: &mut SampleTable) -> Result<()> {
    add_sum_column(
        tbl,
        "Cyanobacteria",
        &["Synechococcus", "Prochlorococcus"],
        Some("Prochlorococcus"),
    )
}

/// Add total phaeopigments (`PhaeoTotal` = phaeophorbide a + phaeophytin a) and their ratio to
/// total chlorophyll a (`Phaeo_Chla`).
pub fn add_phaeopigments(tbl: &mut SampleTable) -> Result<()> {
    add_sum_column(tbl, "PhaeoTotal", &["Phorb_a", "Phytin_a"], None)?;
    add_ratio_column(tbl, "Phaeo_Chla", "PhaeoTotal", TOTAL_CHLA_COLUMN, 1.0)
}

/// Keep the rows where a text column equals `value`.
pub fn filter_rows(tbl: &SampleTable, column: &str, value: &str) -> Result<SampleTable> {
    let mask: Vec<bool> = tbl.text(column)?.iter().map(|v| v == value).collect();

    Ok(tbl.retain_rows(&mask))
}

/// Keep the rows where a numeric column has a value.
pub fn drop_missing(tbl: &SampleTable, column: &str) -> Result<SampleTable> {
    let mask: Vec<bool> = tbl.numeric(column)?.iter().map(|v| v.is_some()).collect();

    Ok(tbl.retain_rows(&mask))
}

/// Keep only the samples flagged as inside the mixed layer and drop the flag column.
pub fn mixed_layer(tbl: &SampleTable) -> Result<SampleTable> {
    let mut ml = filter_rows(tbl, MIXED_LAYER_COLUMN, IN_MIXED_LAYER)?;
    ml.remove_column(MIXED_LAYER_COLUMN);

    Ok(ml)
}

/// Latitude label of a station code, if it is one of the cruise stations.
#[inline]
pub fn station_label(code: &str) -> Option<&'static str> {
    STATION_LABELS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|&(_, label)| label)
}

/// Replace station codes with their latitude labels. Unknown codes are left alone.
pub fn relabel_stations(tbl: &mut SampleTable) -> Result<()> {
    tbl.map_text(STATION_COLUMN, |code| {
        station_label(code)
            .map(str::to_owned)
            .unwrap_or_else(|| code.to_owned())
    })
}

fn place_column(
    tbl: &mut SampleTable,
    name: &str,
    column: Column,
    after: Option<&str>,
) -> Result<()> {
    match after {
        Some(after) => tbl.insert_column_after(after, name, column),
        None => {
            tbl.set_column(name, column);
            Ok(())
        }
    }
}

fn ratio_values(
    numerator: &[Optioned<f64>],
    denominator: &[Optioned<f64>],
    scale: f64,
) -> Vec<Optioned<f64>> {
    izip!(numerator, denominator)
        .map(|(n, d)| match (n.into_option(), d.into_option()) {
            (Some(n), Some(d)) if d != 0.0 => optioned(n / d * scale),
            _ => none(),
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utility::test_tools::approx_equal;

    fn make_table() -> SampleTable {
        SampleTable::new()
            .with_text_column(
                STATION_COLUMN,
                vec!["IO08".to_owned(), "IO01".to_owned(), "XX99".to_owned()],
            )
            .with_text_column(
                MIXED_LAYER_COLUMN,
                vec!["IN".to_owned(), "OUT".to_owned(), "IN".to_owned()],
            )
            .with_numeric_column(TOTAL_CHLA_COLUMN, vec![some(0.5), some(0.0), some(0.2)])
            .with_numeric_column("Synechococcus", vec![some(0.05), some(0.01), none()])
            .with_numeric_column("Prochlorococcus", vec![some(0.05), some(0.0), some(0.1)])
            .with_numeric_column("Phorb_a", vec![some(0.02), some(0.01), some(0.0)])
            .with_numeric_column("Phytin_a", vec![some(0.03), some(0.01), some(0.0)])
            .with_numeric_column("pMn", vec![some(0.12), none(), some(0.3)])
    }

    #[test]
    fn test_unit_conversion() {
        let mut tbl = make_table();
        convert_units(&mut tbl, "pMn", UnitConversion::NanomolToPicomol).unwrap();

        let pmn = tbl.numeric("pMn").unwrap();
        assert!(approx_equal(pmn[0].unpack(), 120.0, 1.0e-9));
        assert!(pmn[1].is_none());

        assert!(convert_units(&mut tbl, "Station", UnitConversion::NanomolToPicomol).is_err());
    }

    #[test]
    fn test_cyanobacteria() {
        let mut tbl = make_table();
        add_cyanobacteria(&mut tbl).unwrap();

        let names: Vec<&str> = tbl.column_names().collect();
        let idx = names.iter().position(|&n| n == "Cyanobacteria").unwrap();
        assert_eq!(names[idx - 1], "Prochlorococcus");

        let cyano = tbl.numeric("Cyanobacteria").unwrap();
        assert!(approx_equal(cyano[0].unpack(), 0.1, 1.0e-12));
        assert!(approx_equal(cyano[1].unpack(), 0.01, 1.0e-12));
        assert!(cyano[2].is_none());
    }

    #[test]
    fn test_phaeopigments() {
        let mut tbl = make_table();
        add_phaeopigments(&mut tbl).unwrap();

        let ratio = tbl.numeric("Phaeo_Chla").unwrap();
        assert!(approx_equal(ratio[0].unpack(), 0.1, 1.0e-12));
        // Zero chlorophyll has no defined ratio.
        assert!(ratio[1].is_none());
        assert_eq!(ratio[2], some(0.0));
    }

    #[test]
    fn test_percent_columns() {
        let mut tbl = make_table();
        add_cyanobacteria(&mut tbl).unwrap();
        add_percent_columns(&mut tbl, &["Cyanobacteria"], TOTAL_CHLA_COLUMN).unwrap();

        let pct = tbl.numeric("Cyanobacteria_P").unwrap();
        assert!(approx_equal(pct[0].unpack(), 20.0, 1.0e-9));
        assert!(pct[1].is_none());

        let before = tbl.clone();
        assert!(add_percent_columns(&mut tbl, &["Cyanobacteria", "Diatoms"], "Tchla").is_err());
        assert_eq!(tbl, before);
    }

    #[test]
    fn test_mixed_layer() {
        let tbl = make_table();
        let ml = mixed_layer(&tbl).unwrap();

        assert_eq!(ml.num_rows(), 2);
        assert!(!ml.has_column(MIXED_LAYER_COLUMN));
        assert_eq!(ml.text(STATION_COLUMN).unwrap(), &["IO08", "XX99"]);
    }

    #[test]
    fn test_station_labels() {
        assert_eq!(station_label("IO01"), Some("St. 58.5°S"));
        assert_eq!(station_label("IO08"), Some("St. 41.0°S"));
        assert_eq!(station_label("IO09"), None);

        let mut tbl = make_table();
        relabel_stations(&mut tbl).unwrap();
        assert_eq!(
            tbl.text(STATION_COLUMN).unwrap(),
            &["St. 41.0°S", "St. 58.5°S", "XX99"]
        );
    }

    #[test]
    fn test_drop_missing() {
        let tbl = make_table();

        let kept = drop_missing(&tbl, "Synechococcus").unwrap();
        assert_eq!(kept.num_rows(), 2);
        assert_eq!(kept.text(STATION_COLUMN).unwrap(), &["IO08", "IO01"]);

        assert!(drop_missing(&tbl, STATION_COLUMN).is_err());
    }
}
