use std::path::PathBuf;

use trace_metal_analysis::{load_csv, SampleTable};

pub mod correction_tests;

pub fn test_data_path(fname: &str) -> PathBuf {
    let mut path = PathBuf::new();
    path.push("test_data");
    path.push(fname);
    path
}

pub fn load_test_file(fname: &str) -> SampleTable {
    let path = test_data_path(fname);
    load_csv(&path).unwrap_or_else(|err| panic!("Error loading {:#?}: {}", path, err))
}

#[allow(unused_macros)] // False alarm
macro_rules! test_file {
    ($test_mod_name:ident, $fname:expr) => {
        mod $test_mod_name {
            use crate::utils::{self, correction_tests};
            use trace_metal_analysis::SampleTable;

            fn load_data() -> SampleTable {
                utils::load_test_file($fname)
            }

            #[test]
            fn headers_cleaned() {
                correction_tests::test_headers_cleaned(&load_data());
            }

            #[test]
            fn corrected_layout() {
                correction_tests::test_corrected_layout(&load_data());
            }

            #[test]
            fn lithogenic_bounds() {
                correction_tests::test_lithogenic_bounds(&load_data());
            }

            #[test]
            fn total_recovered() {
                correction_tests::test_total_recovered(&load_data());
            }

            #[test]
            fn rows_unchanged() {
                correction_tests::test_rows_unchanged(&load_data());
            }

            #[test]
            fn export_round_trip() {
                correction_tests::test_export_round_trip(&load_data());
            }
        }
    };
}
