use std::path::PathBuf;
use trace_metal_analysis::{load_csv, SampleTable};

pub fn load_all_test_files() -> [SampleTable; 2] {
    let tbl1 = load_test_file("wc17_data_150m.csv");
    let tbl2 = load_test_file("wc17_tm_250m.csv");

    [tbl1, tbl2]
}

fn load_test_file(fname: &str) -> SampleTable {
    let mut test_path = PathBuf::new();
    test_path.push("test_data");
    test_path.push(fname);

    load_csv(&test_path).unwrap_or_else(|_| panic!("Error loading file: {:#?}", test_path))
}

/// Stack copies of a table so the benches work on a realistically sized cruise.
pub fn repeat_rows(tbl: &SampleTable, times: usize) -> SampleTable {
    let mut out = tbl.clone();
    for _ in 1..times {
        out = stack(&out, tbl);
    }
    out
}

fn stack(top: &SampleTable, bottom: &SampleTable) -> SampleTable {
    use trace_metal_analysis::Column;

    let mut out = SampleTable::new();
    for (name, col) in top.iter() {
        let combined = match (col, bottom.column(name)) {
            (Column::Numeric(a), Some(Column::Numeric(b))) => {
                Column::Numeric(a.iter().chain(b.iter()).cloned().collect())
            }
            (Column::Text(a), Some(Column::Text(b))) => {
                Column::Text(a.iter().chain(b.iter()).cloned().collect())
            }
            _ => panic!("column {} does not match", name),
        };
        out.set_column(name, combined);
    }
    out
}
