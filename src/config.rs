//! Description of the runs the pipeline makes.
//!
//! A pipeline is a list of datasets to correct, followed by summary tables and rank correlation
//! tables built from the corrected output. The built-in configuration reproduces the standard
//! WC17 products; a TOML file with the same layout replaces it.
//!
//! ```toml
//! [[dataset]]
//! name = "WC17_Data_150m"
//! input = "WC17_Data_150m.csv"
//! output = "WC17_DataComp_update.csv"
//!
//! [[summary]]
//! name = "pTM medians"
//! input = "WC17_TM_Comp_update.csv"
//! output = "WC17_TM_pTM_median.csv"
//! columns = ["pFe", "pMn"]
//! kind = "median_n"
//! derive = [{ kind = "convert", column = "pMn", conversion = "nanomol_to_picomol" }]
//! ```

use crate::{
    derive::{PHYTO_GROUPS, STATION_COLUMN, TOTAL_CHLA_COLUMN},
    error::Result,
    keys::{SummaryKind, UnitConversion},
    metal::Metal,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

/// How a dataset is corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Correction {
    /// Derive the lithogenic columns of all seven metals and substitute the remainder.
    Full,
    /// The table already carries `_T` and `_lith` columns, only recompute the remainder.
    Recompute,
}

/// One dataset to load, correct and export.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetConfig {
    /// Name used in log messages.
    pub name: String,
    /// CSV export of the source sheet.
    pub input: PathBuf,
    /// Workbook sheet the input was exported from, for reference.
    #[serde(default)]
    pub sheet: Option<String>,
    /// Where the corrected table is written.
    pub output: PathBuf,
    /// Which correction to run.
    #[serde(default = "default_correction")]
    pub correction: Correction,
    /// Metals to recompute with `Correction::Recompute`.
    #[serde(default = "default_metals")]
    pub metals: Vec<Metal>,
}

/// A column derivation applied before summarizing or correlating.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Derivation {
    /// Rescale one column.
    Convert {
        /// Column to rescale.
        column: String,
        /// Conversion to apply.
        conversion: UnitConversion,
    },
    /// Combine the picoplankton into `Cyanobacteria`.
    Cyanobacteria,
    /// Total phaeopigments and their ratio to total chlorophyll a.
    Phaeopigments,
    /// Share of total chlorophyll a for every phytoplankton group.
    PhytoPercent,
}

/// A per-station summary table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SummaryConfig {
    /// Name used in log messages.
    pub name: String,
    /// Corrected table to summarize.
    pub input: PathBuf,
    /// Where the summary table is written.
    pub output: PathBuf,
    /// Rows are grouped on this text column.
    #[serde(default = "default_group_column")]
    pub group_column: String,
    /// Numeric columns to summarize, in output order.
    pub columns: Vec<String>,
    /// Layout of each cell.
    #[serde(default = "default_summary_kind")]
    pub kind: SummaryKind,
    /// Digits after the decimal point.
    #[serde(default = "default_decimals")]
    pub decimals: usize,
    /// Only use samples inside the mixed layer.
    #[serde(default = "default_true")]
    pub mixed_layer: bool,
    /// Replace station codes with latitude labels before grouping.
    #[serde(default = "default_true")]
    pub relabel_stations: bool,
    /// Derivations applied in order after the mixed layer selection.
    #[serde(default)]
    pub derive: Vec<Derivation>,
}

/// Kendall rank correlations between the numeric columns of a table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CorrelationConfig {
    /// Name used in log messages.
    pub name: String,
    /// Corrected table to correlate.
    pub input: PathBuf,
    /// First column of the range to correlate.
    pub first_column: String,
    /// Last column of the range to correlate.
    pub last_column: String,
    /// Rows missing this column are dropped first.
    #[serde(default)]
    pub require: Option<String>,
    /// Derivations applied in order after loading.
    #[serde(default)]
    pub derive: Vec<Derivation>,
    /// Restrict the written tables to these row variables.
    #[serde(default)]
    pub rows: Option<Vec<String>>,
    /// Restrict the written tables to these column variables.
    #[serde(default)]
    pub cols: Option<Vec<String>>,
    /// Where the tau matrix is written.
    pub tau_output: PathBuf,
    /// Where the p-value matrix is written.
    pub p_value_output: PathBuf,
    /// Where the pairwise sample counts are written.
    #[serde(default)]
    pub count_output: Option<PathBuf>,
    /// Where the one-row-per-pair table is written.
    #[serde(default)]
    pub long_output: Option<PathBuf>,
}

/// Everything the pipeline runs, in order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PipelineConfig {
    /// Datasets to correct.
    #[serde(default, rename = "dataset")]
    pub datasets: Vec<DatasetConfig>,
    /// Summary tables to build.
    #[serde(default, rename = "summary")]
    pub summaries: Vec<SummaryConfig>,
    /// Correlation tables to build.
    #[serde(default, rename = "correlation")]
    pub correlations: Vec<CorrelationConfig>,
}

fn default_correction() -> Correction {
    Correction::Full
}

fn default_metals() -> Vec<Metal> {
    Metal::iter().collect()
}

fn default_group_column() -> String {
    STATION_COLUMN.to_owned()
}

fn default_summary_kind() -> SummaryKind {
    SummaryKind::Median
}

fn default_decimals() -> usize {
    2
}

fn default_true() -> bool {
    true
}

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|&n| n.to_owned()).collect()
}

impl DatasetConfig {
    /// The trace metal sheet of the upper 250 m.
    pub fn trace_metal_250m() -> Self {
        DatasetConfig {
            name: "WC17_TM_Data_250m".to_owned(),
            input: PathBuf::from("WC17_TM_Data_250m.csv"),
            sheet: Some("WC17_TM_Data_250m".to_owned()),
            output: PathBuf::from("WC17_TM_Comp_update.csv"),
            correction: Correction::Full,
            metals: default_metals(),
        }
    }

    /// The combined hydrography, pigment and trace metal sheet.
    pub fn data_comp_150m() -> Self {
        DatasetConfig {
            name: "WC17_Data_150m".to_owned(),
            input: PathBuf::from("WC17_Data_150m.csv"),
            sheet: Some("WC17_Data_150m".to_owned()),
            output: PathBuf::from("WC17_DataComp_update.csv"),
            correction: Correction::Full,
            metals: default_metals(),
        }
    }
}

impl SummaryConfig {
    fn trace_metal(
        name: &str,
        output: &str,
        columns: &[&str],
        kind: SummaryKind,
        decimals: usize,
    ) -> Self {
        SummaryConfig {
            name: name.to_owned(),
            input: PathBuf::from("WC17_TM_Comp_update.csv"),
            output: PathBuf::from(output),
            group_column: default_group_column(),
            columns: labels(columns),
            kind,
            decimals,
            mixed_layer: true,
            relabel_stations: true,
            derive: vec![
                Derivation::Convert {
                    column: "dCd".to_owned(),
                    conversion: UnitConversion::PicomolToNanomol,
                },
                Derivation::Convert {
                    column: "pMn".to_owned(),
                    conversion: UnitConversion::NanomolToPicomol,
                },
            ],
        }
    }

    /// Mixed layer tables of the trace metal dataset.
    pub fn trace_metal_tables() -> Vec<Self> {
        vec![
            SummaryConfig::trace_metal(
                "pTM medians",
                "WC17_TM_pTM_median.csv",
                &["pFe", "pMn", "pCo", "pNi", "pCu", "pZn", "pCd", "pP"],
                SummaryKind::MedianN,
                2,
            ),
            SummaryConfig::trace_metal(
                "dTM medians",
                "WC17_TM_dTM_median.csv",
                &["dFe", "dMn", "dCo", "dNi", "dCu", "dZn", "dCd"],
                SummaryKind::MedianN,
                2,
            ),
            SummaryConfig::trace_metal(
                "lithogenic percentages",
                "WC17_TM_pTM_Lith%_median.csv",
                &[
                    "%pFe_lith",
                    "%pMn_lith",
                    "%pCo_lith",
                    "%pNi_lith",
                    "%pCu_lith",
                    "%pZn_lith",
                    "%pCd_lith",
                ],
                SummaryKind::Median,
                0,
            ),
        ]
    }

    fn data_comp(name: &str, output: &str, columns: &[&str], derive: Vec<Derivation>) -> Self {
        SummaryConfig {
            name: name.to_owned(),
            input: PathBuf::from("WC17_DataComp_update.csv"),
            output: PathBuf::from(output),
            group_column: default_group_column(),
            columns: labels(columns),
            kind: SummaryKind::Median,
            decimals: default_decimals(),
            mixed_layer: true,
            relabel_stations: true,
            derive,
        }
    }

    /// Mixed layer hydrography, chlorophyll and nutrients of the combined dataset.
    pub fn data_comp_table1() -> Self {
        SummaryConfig::data_comp(
            "hydrography and nutrients",
            "WC17_DataComp_Table1_median.csv",
            &["Temp", "Tchla", "POC", "Nitrate", "Phosphate", "Silica"],
            vec![],
        )
    }

    /// Mixed layer total and fluorometric chlorophyll a, and the phaeopigment ratio.
    pub fn data_comp_chlorophyll() -> Self {
        SummaryConfig::data_comp(
            "chlorophyll",
            "WC17_DataComp_TchlaFchla_median.csv",
            &["Tchla", "Fl_Chla", "Phaeo_Chla"],
            vec![Derivation::Phaeopigments],
        )
    }

    /// Mixed layer phytoplankton composition of the combined dataset.
    pub fn phyto_percent() -> Self {
        SummaryConfig {
            name: "phytoplankton shares".to_owned(),
            input: PathBuf::from("WC17_DataComp_update.csv"),
            output: PathBuf::from("WC17_ML_Phyto_P_median.csv"),
            group_column: default_group_column(),
            columns: PHYTO_GROUPS.iter().map(|g| format!("{}_P", g)).collect(),
            kind: SummaryKind::Median,
            decimals: 1,
            mixed_layer: true,
            relabel_stations: true,
            derive: vec![Derivation::Cyanobacteria, Derivation::PhytoPercent],
        }
    }
}

impl CorrelationConfig {
    /// Nutrients and trace metals against total chlorophyll and the phytoplankton groups.
    pub fn data_comp_kendall() -> Self {
        let mut cols = vec![TOTAL_CHLA_COLUMN.to_owned()];
        cols.extend(PHYTO_GROUPS.iter().map(|&g| g.to_owned()));

        CorrelationConfig {
            name: "Kendall 150m".to_owned(),
            input: PathBuf::from("WC17_DataComp_update.csv"),
            first_column: "Temp".to_owned(),
            last_column: "pAl".to_owned(),
            require: Some(TOTAL_CHLA_COLUMN.to_owned()),
            derive: vec![Derivation::Cyanobacteria],
            rows: Some(labels(&[
                "Nitrate", "Phosphate", "Silica", "dFe", "pFe", "dMn", "pMn", "dCo", "pCo", "dZn",
                "pZn", "dCd", "pCd", "dNi", "pNi", "dCu", "pCu", "pP",
            ])),
            cols: Some(cols),
            tau_output: PathBuf::from("WC17_corr_kendall_matrix.csv"),
            p_value_output: PathBuf::from("WC17_corr_kendall_P_values.csv"),
            count_output: Some(PathBuf::from("sample_count.csv")),
            long_output: None,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            datasets: vec![
                DatasetConfig::trace_metal_250m(),
                DatasetConfig::data_comp_150m(),
            ],
            summaries: SummaryConfig::trace_metal_tables()
                .into_iter()
                .chain(vec![
                    SummaryConfig::data_comp_table1(),
                    SummaryConfig::data_comp_chlorophyll(),
                    SummaryConfig::phyto_percent(),
                ])
                .collect(),
            correlations: vec![CorrelationConfig::data_comp_kendall()],
        }
    }
}

impl PipelineConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        PipelineConfig::from_toml_str(&text)
    }
}
