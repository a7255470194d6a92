//! Distribution shape of stock levels: histograms, boxplot summaries and skew.
//!
//! These are the numbers behind the histogram and boxplot views of the
//! data. Nothing here draws; the report module prints them as text.

use super::aggregate::stock_values;
use super::types::{
    Bin, BoxplotSummary, DensityPoint, DistributionSummary, Record, StoreStatistics,
};
use polars::prelude::{ChunkQuantile as _, Float64Chunked, NewChunkedArray as _, PlSmallStr, QuantileMethod};
use std::collections::{BTreeMap, BTreeSet};

/// First quartile, median and third quartile, linearly interpolated.
/// `None` for empty input.
pub fn quartiles(values: &[f64]) -> Option<(f64, f64, f64)> {
    let ca = Float64Chunked::from_slice(PlSmallStr::from_static("stock"), values);
    let quantile = |q| ca.quantile(q, QuantileMethod::Linear).unwrap_or(None);
    Some((quantile(0.25)?, ca.median()?, quantile(0.75)?))
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let min_v = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max_v = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min_v, max_v))
}

/// Freedman–Diaconis bin count, falling back to a square-root rule when the
/// IQR is zero, clamped to 5..=50.
pub fn auto_bin_count(values: &[f64]) -> usize {
    let Some((min_v, max_v)) = min_max(values) else {
        return 0;
    };
    if (max_v - min_v).abs() < f64::EPSILON {
        return 1;
    }
    let n = values.len() as f64;
    let iqr = quartiles(values).map_or(0.0, |(q1, _, q3)| q3 - q1);
    let h = if iqr > 0.0 {
        2.0 * iqr / n.cbrt()
    } else {
        (max_v - min_v) / n.sqrt()
    };
    (((max_v - min_v) / h).ceil() as usize).clamp(5, 50)
}

/// Equal-width histogram over `[min, max]` with `bins` bins.
///
/// The last bin is closed so `max` is counted. If every value is equal the
/// result is a single bin holding all of them.
pub fn histogram(values: &[f64], bins: usize) -> Vec<Bin> {
    let Some((min_v, max_v)) = min_max(values) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    if (max_v - min_v).abs() < f64::EPSILON {
        return vec![Bin {
            lower: min_v,
            upper: max_v,
            count: values.len(),
        }];
    }

    let width = (max_v - min_v) / bins as f64;
    let mut counts = vec![0_usize; bins];
    for &val in values {
        let idx = (((val - min_v) / width).floor() as usize).min(bins - 1);
        if let Some(count) = counts.get_mut(idx) {
            *count += 1;
        }
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            lower: min_v + i as f64 * width,
            upper: if i + 1 == bins {
                max_v
            } else {
                min_v + (i + 1) as f64 * width
            },
            count,
        })
        .collect()
}

/// Quartiles, 1.5·IQR whiskers and outliers. `None` for empty input.
pub fn boxplot(values: &[f64]) -> Option<BoxplotSummary> {
    let (q1, median, q3) = quartiles(values)?;
    let iqr = q3 - q1;
    let low_fence = q1 - 1.5 * iqr;
    let high_fence = q3 + 1.5 * iqr;
    let within = |v: &f64| *v >= low_fence && *v <= high_fence;

    let inside: Vec<f64> = values.iter().copied().filter(within).collect();
    let (lower_whisker, upper_whisker) = min_max(&inside).unwrap_or((q1, q3));
    let mut outliers: Vec<f64> = values.iter().copied().filter(|v| !within(v)).collect();
    outliers.sort_by(f64::total_cmp);

    Some(BoxplotSummary {
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Skew signal blending Pearson's second coefficient with Bowley's
/// quartile skew. `None` when the spread is zero or undefined.
pub fn calculate_skew(mean: f64, std_dev: f64, boxplot: &BoxplotSummary) -> Option<f64> {
    if !(std_dev.is_finite() && std_dev > 0.0) {
        return None;
    }
    let pearson_skew = 3.0 * (mean - boxplot.median) / std_dev;
    let iqr = boxplot.iqr();
    if iqr > 0.0 {
        let bowley_skew = (boxplot.q3 + boxplot.q1 - 2.0 * boxplot.median) / iqr;
        return Some(f64::midpoint(pearson_skew, bowley_skew));
    }
    Some(pearson_skew)
}

/// Gaussian kernel density of `values` at each of `points`.
///
/// Bandwidth follows Scott's rule, `std_dev * n^(-1/5)`. Empty when that
/// bandwidth is zero or undefined.
pub fn kernel_density(values: &[f64], std_dev: f64, points: &[f64]) -> Vec<DensityPoint> {
    let n = values.len() as f64;
    let bandwidth = std_dev * n.powf(-0.2);
    if values.is_empty() || !(bandwidth.is_finite() && bandwidth > 0.0) {
        return Vec::new();
    }
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());

    points
        .iter()
        .map(|&x| {
            let sum: f64 = values
                .iter()
                .map(|v| {
                    let u = (x - v) / bandwidth;
                    (-0.5 * u * u).exp()
                })
                .sum();
            DensityPoint {
                x,
                density: sum * norm,
            }
        })
        .collect()
}

/// Per-store distribution summaries in ascending store order.
///
/// Mean and sd come from the grouped `stores`. `bins` of `None` picks a bin
/// count per store with [`auto_bin_count`].
pub fn summarise_by_store(
    records: &[Record],
    stores: &BTreeMap<u32, StoreStatistics>,
    bins: Option<usize>,
) -> Vec<DistributionSummary> {
    stores
        .values()
        .filter_map(|stats| {
            let values = stock_values(records, stats.store_id);
            let boxplot = boxplot(&values)?;
            let bin_count = bins.unwrap_or_else(|| auto_bin_count(&values));
            let histogram = histogram(&values, bin_count);
            let midpoints: Vec<f64> = histogram
                .iter()
                .map(|b| f64::midpoint(b.lower, b.upper))
                .collect();
            Some(DistributionSummary {
                store_id: stats.store_id,
                density: kernel_density(&values, stats.std_dev, &midpoints),
                skew: calculate_skew(stats.mean, stats.std_dev, &boxplot),
                histogram,
                boxplot,
            })
        })
        .collect()
}

/// Histogram of stock across every store, split by store.
///
/// Every store gets the same bin edges, spanning the global `[min, max]`,
/// so their distributions can be compared side by side.
pub fn combined_histogram(records: &[Record], bins: usize) -> Vec<(u32, Vec<Bin>)> {
    let all: Vec<f64> = records.iter().map(|r| r.stock).collect();
    let edges = histogram(&all, bins);
    let Some(first) = edges.first() else {
        return Vec::new();
    };
    let min_v = first.lower;
    let width = first.upper - first.lower;
    let last_idx = edges.len() - 1;

    let stores: BTreeSet<u32> = records.iter().map(|r| r.store_id).collect();
    stores
        .into_iter()
        .map(|store_id| {
            let mut store_bins: Vec<Bin> = edges.iter().map(|b| Bin { count: 0, ..*b }).collect();
            for value in stock_values(records, store_id) {
                let idx = if width > 0.0 {
                    (((value - min_v) / width).floor() as usize).min(last_idx)
                } else {
                    0
                };
                if let Some(bin) = store_bins.get_mut(idx) {
                    bin.count += 1;
                }
            }
            (store_id, store_bins)
        })
        .collect()
}
