#[macro_use]
mod utils;

test_file!(data_comp_150m, "wc17_data_150m.csv");
test_file!(trace_metal_250m, "wc17_tm_250m.csv");
