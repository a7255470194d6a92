//! Integration tests for the full analysis workflow
//!
//! These tests run the complete pipeline on fixture files under
//! `testdata/` and verify the end-to-end results.

#![expect(clippy::unwrap_used, clippy::indexing_slicing)]

use polars::prelude::DataType;
use std::path::{Path, PathBuf};
use stock_sampler::analyser::logic::{SigmaPolicy, load_df};
use stock_sampler::analyser::{analyse_records, run_analysis};
use stock_sampler::config::AnalysisConfig;
use stock_sampler::error::AnalysisError;

fn config_for(file: &str) -> AnalysisConfig {
    AnalysisConfig {
        input: PathBuf::from("testdata").join(file),
        ..Default::default()
    }
}

#[test]
fn test_three_stores_58_days_each() {
    let report = run_analysis(&config_for("estoque.csv")).unwrap();

    assert_eq!(report.store_count, 3);
    assert_eq!(report.stores.len(), 3, "one aggregate row per store");
    for stats in &report.stores {
        assert_eq!(stats.count, 58, "store {}", stats.store_id);
        assert_eq!(stats.date_range.0.to_string(), "2023-01-02");
        assert_eq!(stats.date_range.1.to_string(), "2023-02-28");
    }

    let overview = report.overview.as_ref().unwrap();
    assert_eq!(overview.row_count, 174);
    assert_eq!(overview.head.len(), 10);
    assert_eq!(overview.columns.len(), 3);
    let dtypes: Vec<&str> = overview.columns.iter().map(|c| c.dtype.as_str()).collect();
    assert_eq!(dtypes, vec!["date", "u32", "f64"]);
    let described: Vec<&str> = overview.describe.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(described, vec!["id_loja", "estoque"]);
}

#[test]
fn test_store_statistics_match_fixture() {
    let report = run_analysis(&config_for("estoque.csv")).unwrap();
    let s1 = &report.stores[0];
    assert_eq!(s1.store_id, 1);
    assert!((s1.mean - 209.620_689_655_172_4).abs() < 1e-9, "mean {}", s1.mean);
    assert!((s1.min - 169.0).abs() < f64::EPSILON);
    assert!((s1.max - 252.0).abs() < f64::EPSILON);
    assert!((s1.std_dev - 17.491_679_812_811_753).abs() < 1e-9);

    // Store 3 holds the most stock, store 2 the least
    let means: Vec<f64> = report.stores.iter().map(|s| s.mean).collect();
    assert!(means[2] > means[0] && means[0] > means[1]);
}

#[test]
fn test_sample_sizes_per_store() {
    let report = run_analysis(&config_for("estoque.csv")).unwrap();
    assert_eq!(report.estimates.len(), 3 * 2 * 2);
    assert!((report.z_critical - 1.959_963_984_540_054).abs() < 1e-12);

    let size = |store: u32, policy: SigmaPolicy, margin: f64| {
        report
            .estimates
            .iter()
            .find(|e| {
                e.store_id == store
                    && e.policy == policy
                    && (e.margin_of_error - margin).abs() < 1e-12
            })
            .and_then(|e| e.sample_size)
            .unwrap()
    };

    assert_eq!(size(1, SigmaPolicy::RangeRule, 0.02), 4_134_970);
    assert_eq!(size(1, SigmaPolicy::RangeRule, 0.10), 165_399);
    assert_eq!(size(1, SigmaPolicy::SampleStdDev, 0.02), 2_938_321);
    assert_eq!(size(2, SigmaPolicy::RangeRule, 0.10), 53_036);
    assert_eq!(size(2, SigmaPolicy::SampleStdDev, 0.10), 47_125);
    assert_eq!(size(3, SigmaPolicy::RangeRule, 0.02), 15_947_456);
    assert_eq!(size(3, SigmaPolicy::SampleStdDev, 0.10), 395_892);
}

#[test]
fn test_text_report_has_sentence_per_estimate() {
    let report = run_analysis(&config_for("estoque.csv")).unwrap();
    let mut out = Vec::new();
    report.write_text(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains(
        "Store 2 (range rule): sample size of 53036 for a 10% margin of error at 95% confidence (sigma = 11.7500)."
    ));
    assert_eq!(text.matches("margin of error at 95% confidence").count(), 12);
    assert!(text.contains("== Store 3 distribution =="));
    assert!(text.contains(" kde\n"), "per-store histograms carry a density column");
    assert!(text.contains("== Stock distribution, all stores (40 bins) =="));
}

#[test]
fn test_json_report_round_trips_through_serde() {
    let report = run_analysis(&config_for("estoque.csv")).unwrap();
    let mut out = Vec::new();
    report.write_json(&mut out).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(value["store_count"], 3);
    assert_eq!(value["estimates"].as_array().unwrap().len(), 12);
    assert_eq!(value["estimates"][0]["policy"], "range_rule");
    assert_eq!(value["stores"][0]["date_range"][0], "2023-01-02");
}

#[test]
fn test_comma_separated_month_first_dates() {
    let config = AnalysisConfig {
        separator: ',',
        ..config_for("comma.csv")
    };
    let report = run_analysis(&config).unwrap();
    let stats = &report.stores[0];
    assert_eq!(stats.date_range.0.to_string(), "2023-01-02");
    assert_eq!(stats.date_range.1.to_string(), "2023-01-05");

    let range_2pct = report
        .estimates
        .iter()
        .find(|e| e.policy == SigmaPolicy::RangeRule && (e.margin_of_error - 0.02).abs() < 1e-12)
        .unwrap();
    assert!((range_2pct.sigma_estimate - 7.5).abs() < 1e-12);
    assert_eq!(range_2pct.sample_size, Some(540_205));
}

#[test]
fn test_wrong_separator_reports_missing_column() {
    let config = AnalysisConfig {
        separator: ',',
        ..config_for("estoque.csv")
    };
    let err = run_analysis(&config).unwrap_err();
    assert!(matches!(err, AnalysisError::MissingColumn(_)), "{err}");
}

#[test]
fn test_non_numeric_stock_fails_fast() {
    let err = run_analysis(&config_for("bad_stock.csv")).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("row 2"), "{msg}");
    assert!(msg.contains("estoque"), "{msg}");
    assert!(msg.contains("abc"), "{msg}");
}

#[test]
fn test_bad_date_fails_fast() {
    let err = run_analysis(&config_for("bad_date.csv")).unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidRecord { row: 1, .. }), "{err}");
}

#[test]
fn test_missing_store_column_fails() {
    let err = run_analysis(&config_for("missing_column.csv")).unwrap_err();
    assert_eq!(err.to_string(), "Missing required column 'id_loja'");
}

#[test]
fn test_header_only_file_is_empty_dataset() {
    let err = run_analysis(&config_for("header_only.csv")).unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyDataset), "{err}");
}

#[test]
fn test_nonexistent_file_returns_error() {
    let err = run_analysis(&config_for("does_not_exist.csv")).unwrap_err();
    assert!(err.to_string().contains("does_not_exist.csv"), "{err}");
}

#[test]
fn test_invalid_config_rejected_before_loading() {
    let config = AnalysisConfig {
        margins: vec![],
        ..config_for("estoque.csv")
    };
    assert!(matches!(run_analysis(&config), Err(AnalysisError::Config(_))));
}

#[test]
fn test_analyse_records_without_file() {
    assert!(matches!(
        analyse_records(&[], &AnalysisConfig::default()),
        Err(AnalysisError::EmptyDataset)
    ));
}

#[test]
fn test_load_df_reads_raw_frame() {
    let df = load_df(&PathBuf::from("testdata/estoque.csv"), b';').unwrap();
    assert_eq!(df.height(), 174);
    assert_eq!(df.width(), 3);
    assert!(df.dtypes().iter().all(|dtype| *dtype == DataType::String));
}

/// Writes 10,000 whole-number rows followed by `last_stock`.
fn write_long_file(dir: &Path, last_stock: &str) -> PathBuf {
    let mut content = String::from("data;id_loja;estoque\n");
    for _ in 0..10_000 {
        content.push_str("2023-01-02;1;10\n");
    }
    content.push_str(&format!("2023-01-03;1;{last_stock}\n"));
    let path = dir.join("long.csv");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_decimal_stock_after_many_whole_rows() {
    let dir = tempfile::tempdir().unwrap();
    let config = AnalysisConfig {
        input: write_long_file(dir.path(), "12.5"),
        ..Default::default()
    };
    let report = run_analysis(&config).unwrap();
    assert_eq!(report.stores[0].count, 10_001);
    assert!((report.stores[0].max - 12.5).abs() < f64::EPSILON);
}

#[test]
fn test_bad_stock_after_many_rows_names_row() {
    let dir = tempfile::tempdir().unwrap();
    let config = AnalysisConfig {
        input: write_long_file(dir.path(), "abc"),
        ..Default::default()
    };
    let err = run_analysis(&config).unwrap_err();
    assert!(
        matches!(err, AnalysisError::InvalidRecord { row: 10_001, ref column, .. } if column == "estoque"),
        "{err}"
    );
}
