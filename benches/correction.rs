//! Run these benches with `cargo bench --bench correction -- --verbose`
use criterion::{criterion_group, criterion_main, Criterion};
use optional::some;
use strum::IntoEnumIterator;
use trace_metal_analysis::{
    correct_table, derive_corrections, lithogenic_fraction, LithogenicMode, Metal,
};

mod utils;

fn build_tester() -> Criterion {
    Criterion::default()
        .sample_size(200)
        .measurement_time(std::time::Duration::from_secs(10))
        .noise_threshold(0.03)
        .significance_level(0.01)
}

criterion_main!(correction_benches);

criterion_group!(
    name = correction_benches;
    config = build_tester();
    targets = lithogenic_fraction_bench, derive_corrections_bench, correct_table_bench
);

fn lithogenic_fraction_bench(c: &mut Criterion) {
    c.bench_function("lithogenic_fraction", |b| {
        b.iter(|| {
            for metal in Metal::iter() {
                let _x = lithogenic_fraction(some(1.5), metal, some(0.2), LithogenicMode::Percent);
                let _y = lithogenic_fraction(some(1.5), metal, some(0.2), LithogenicMode::Absolute);
            }
        });
    });
}

fn derive_corrections_bench(c: &mut Criterion) {
    let tbls = utils::load_all_test_files();
    let big = utils::repeat_rows(&tbls[0], 50);

    c.bench_function("derive_corrections", |b| {
        b.iter(|| {
            let _x = derive_corrections(&big);
        });
    });
}

fn correct_table_bench(c: &mut Criterion) {
    let tbls = utils::load_all_test_files();

    c.bench_function("correct_table", |b| {
        b.iter(|| {
            for tbl in &tbls {
                let _x = correct_table(tbl.clone());
            }
        });
    });
}
