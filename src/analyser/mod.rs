pub mod logic;
pub mod report;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use logic::types::Record;
use report::{AnalysisReport, StoreHistogram};

/// Full pipeline: load the configured file, then analyse it.
///
/// # Errors
///
/// Fails on the first problem: unreadable file, missing column, invalid
/// cell, empty dataset or invalid configuration.
pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisReport> {
    config.validate()?;
    let start = std::time::Instant::now();

    let (df, records) = logic::load_records(config)?;
    let overview = logic::overview(&df, &records, config.head_rows)?;
    let mut report = analyse_records(&records, config)?;
    report.overview = Some(overview);

    tracing::info!(
        stores = report.store_count,
        estimates = report.estimates.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "analysis complete"
    );
    Ok(report)
}

/// Per-store statistics, distributions and sample sizes for loaded records.
///
/// # Errors
///
/// Returns [`AnalysisError::EmptyDataset`] for an empty slice, or a config
/// error for an invalid significance level or margin.
pub fn analyse_records(records: &[Record], config: &AnalysisConfig) -> Result<AnalysisReport> {
    if records.is_empty() {
        return Err(AnalysisError::EmptyDataset);
    }

    let stores = logic::group_by_store(records);
    tracing::info!(stores = stores.len(), "grouped records by store");
    for stats in stores.values() {
        tracing::debug!(
            store_id = stats.store_id,
            count = stats.count,
            mean = stats.mean,
            std_dev = stats.std_dev,
            "store statistics"
        );
    }

    let plan = config.sampling_plan();
    let estimates = logic::estimate_sample_sizes(&stores, &plan)?;
    let z_critical = logic::z_critical(plan.alpha)?;

    let distributions = logic::summarise_by_store(records, &stores, config.store_histogram_bins);
    let combined_histogram = logic::combined_histogram(records, config.histogram_bins)
        .into_iter()
        .map(|(store_id, bins)| StoreHistogram { store_id, bins })
        .collect();

    Ok(AnalysisReport {
        source: config.input.display().to_string(),
        overview: None,
        store_count: logic::store_count(records),
        stores: stores.into_values().collect(),
        distributions,
        combined_histogram,
        alpha: plan.alpha,
        z_critical,
        estimates,
    })
}
