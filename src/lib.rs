#![warn(missing_docs)]
//! Functions and data types for analyzing the Winter 2017 (WC17) Southern Ocean trace metal and
//! phytoplankton pigment dataset.
//!
//! The core is the lithogenic correction of particulate trace metals: using particulate
//! aluminium as a proxy for mineral dust, the share of each metal that came from crustal material
//! is estimated from its crustal abundance ratio and removed from the measured total.
//!
//! ```rust
//! use optional::some;
//! use trace_metal_analysis::{lithogenic_fraction, LithogenicMode, Metal};
//!
//! let pct = lithogenic_fraction(some(0.1), Metal::Cu, some(0.05), LithogenicMode::Percent);
//! assert!((pct.unpack() - 0.068).abs() < 1.0e-9);
//! ```
//!
//! Whole tables are corrected with [`correct_table`](fn.correct_table.html), and the
//! [`pipeline`](pipeline/index.html) module strings the loading, correction, summary and rank
//! correlation steps together as configured by a [`PipelineConfig`](config/struct.PipelineConfig.html).

//
// API
//
pub use crate::{
    correction::{
        apply_corrections, correct_table, derive_corrections, recompute_non_lithogenic,
        MetalCorrection, ALUMINIUM_COLUMN,
    },
    derive::convert_units,
    error::{AnalysisError, Result},
    export::write_csv,
    keys::{CorrelationStat, LithogenicMode, SummaryKind, UnitConversion},
    lithogenic::{lithogenic_fraction, lithogenic_fraction_by_name, LithogenicSplit},
    loader::load_csv,
    metal::Metal,
    table::{Column, SampleTable},
};

pub mod config;
pub mod derive;
pub mod export;
pub mod kendall;
pub mod loader;
pub mod pipeline;
pub mod stats;

//
// Internal use only
//
mod correction;
mod error;
mod keys;
mod lithogenic;
mod metal;
mod table;
mod utility;
