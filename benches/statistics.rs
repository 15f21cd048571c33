//! Run these benches with `cargo bench --bench statistics -- --verbose`
use criterion::{criterion_group, criterion_main, Criterion};
use trace_metal_analysis::{
    kendall::{correlation_matrix, kendall_tau},
    stats::{describe, summarize_by},
};

mod utils;

fn build_tester() -> Criterion {
    Criterion::default()
        .sample_size(200)
        .measurement_time(std::time::Duration::from_secs(10))
        .noise_threshold(0.03)
        .significance_level(0.01)
}

criterion_main!(statistics_benches);

criterion_group!(
    name = statistics_benches;
    config = build_tester();
    targets = describe_bench, summarize_by_bench, kendall_tau_bench, correlation_matrix_bench
);

const METAL_COLUMNS: [&str; 7] = ["pFe", "pMn", "pCo", "pZn", "pCd", "pNi", "pCu"];

fn describe_bench(c: &mut Criterion) {
    let tbls = utils::load_all_test_files();

    c.bench_function("describe", |b| {
        b.iter(|| {
            for tbl in &tbls {
                for &name in &METAL_COLUMNS {
                    let _x = describe(tbl.numeric(name).unwrap());
                }
            }
        });
    });
}

fn summarize_by_bench(c: &mut Criterion) {
    let tbls = utils::load_all_test_files();

    c.bench_function("summarize_by", |b| {
        b.iter(|| {
            for tbl in &tbls {
                let _x = summarize_by(tbl, "Station", &METAL_COLUMNS);
            }
        });
    });
}

fn kendall_tau_bench(c: &mut Criterion) {
    let tbls = utils::load_all_test_files();
    let big = utils::repeat_rows(&tbls[0], 10);
    let x = big.numeric("Tchla").unwrap();
    let y = big.numeric("pFe").unwrap();

    c.bench_function("kendall_tau", |b| {
        b.iter(|| {
            let _x = kendall_tau(x, y);
        });
    });
}

fn correlation_matrix_bench(c: &mut Criterion) {
    let tbls = utils::load_all_test_files();
    let tbl = &tbls[0];
    let columns = tbl.labels_between("Temp", "pAl").unwrap();

    c.bench_function("correlation_matrix", |b| {
        b.iter(|| {
            let _x = correlation_matrix(tbl, &columns);
        });
    });
}
