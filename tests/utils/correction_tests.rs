use itertools::izip;
use strum::IntoEnumIterator;
use tempfile::TempDir;
use trace_metal_analysis::{correct_table, load_csv, write_csv, Metal, SampleTable};

fn correct(tbl: &SampleTable) -> SampleTable {
    correct_table(tbl.clone()).expect("correction failed")
}

pub fn test_headers_cleaned(tbl: &SampleTable) {
    for name in tbl.column_names() {
        assert!(!name.contains('(') && !name.contains(')'), "{}", name);
        assert_eq!(name, name.trim());
    }

    for &name in &["Station", "Depth", "ML", "Temp", "pAl"] {
        assert!(tbl.has_column(name), "missing {}", name);
    }

    assert!(tbl.text("Station").is_ok());
    assert!(tbl.numeric("Depth").is_ok());
}

pub fn test_corrected_layout(tbl: &SampleTable) {
    let corrected = correct(tbl);

    // New columns are appended unless the table already had them.
    let mut expected: Vec<String> = tbl.column_names().map(str::to_owned).collect();
    let derived = Metal::iter()
        .map(Metal::percent_lith_column)
        .chain(Metal::iter().map(Metal::lith_column))
        .chain(Metal::iter().map(Metal::total_column));
    for name in derived {
        if !expected.iter().any(|n| n == name) {
            expected.push(name.to_owned());
        }
    }

    assert_eq!(
        corrected.column_names().collect::<Vec<_>>(),
        expected.iter().map(String::as_str).collect::<Vec<_>>()
    );
}

pub fn test_lithogenic_bounds(tbl: &SampleTable) {
    let corrected = correct(tbl);

    for metal in Metal::iter() {
        let total = corrected.numeric(metal.total_column()).unwrap();
        let lith = corrected.numeric(metal.lith_column()).unwrap();
        let pct = corrected.numeric(metal.percent_lith_column()).unwrap();

        for (t, l, p) in izip!(total, lith, pct) {
            if let (Some(t), Some(l)) = (t.into_option(), l.into_option()) {
                assert!(l >= 0.0, "{}: negative lithogenic value", metal);
                assert!(l <= t, "{}: lithogenic value above total", metal);
            }
            if let Some(p) = p.into_option() {
                assert!(p <= 100.0, "{}: percent above 100", metal);
            }
        }
    }
}

pub fn test_total_recovered(tbl: &SampleTable) {
    let corrected = correct(tbl);

    for metal in Metal::iter() {
        let total = corrected.numeric(metal.total_column()).unwrap();
        let non_lith = corrected.numeric(metal.column()).unwrap();
        let lith = corrected.numeric(metal.lith_column()).unwrap();

        for (t, n, l) in izip!(total, non_lith, lith) {
            match (t.into_option(), n.into_option(), l.into_option()) {
                (Some(t), Some(n), Some(l)) => assert!((t - (n + l)).abs() < 1.0e-12),
                (_, None, None) => {}
                other => panic!("{}: inconsistent missing values {:?}", metal, other),
            }
        }
    }
}

pub fn test_rows_unchanged(tbl: &SampleTable) {
    let corrected = correct(tbl);

    assert_eq!(corrected.num_rows(), tbl.num_rows());

    for metal in Metal::iter() {
        assert_eq!(
            corrected.numeric(metal.total_column()).unwrap(),
            tbl.numeric(metal.column()).unwrap()
        );
    }

    let touched: Vec<&str> = Metal::iter()
        .flat_map(|m| {
            vec![
                m.column(),
                m.total_column(),
                m.lith_column(),
                m.percent_lith_column(),
            ]
        })
        .collect();

    for (name, col) in tbl.iter().filter(|(name, _)| !touched.contains(name)) {
        assert_eq!(corrected.column(name), Some(col), "{} changed", name);
    }
}

pub fn test_export_round_trip(tbl: &SampleTable) {
    let corrected = correct(tbl);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("corrected.csv");

    write_csv(&corrected, &path).unwrap();
    let reloaded = load_csv(&path).unwrap();

    assert_eq!(reloaded, corrected);

    // Writing again replaces the file.
    write_csv(&corrected, &path).unwrap();
    assert_eq!(load_csv(&path).unwrap(), corrected);
}
