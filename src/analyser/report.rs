//! Console and JSON rendering of a finished analysis.

use super::logic::types::{
    Bin, ColumnDescription, DatasetOverview, DistributionSummary, SampleSizeEstimate,
    StoreStatistics,
};
use crate::utils::{bar, fmt_opt, fmt_pct};
use serde::Serialize;
use std::io::{self, Write};

const BAR_WIDTH: usize = 40;

#[derive(Clone, Debug, Serialize)]
pub struct StoreHistogram {
    pub store_id: u32,
    pub bins: Vec<Bin>,
}

/// Everything one run produces, in presentation order.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisReport {
    pub source: String,
    /// Absent when the report was built from records rather than a file
    pub overview: Option<DatasetOverview>,
    pub store_count: usize,
    pub stores: Vec<StoreStatistics>,
    pub distributions: Vec<DistributionSummary>,
    pub combined_histogram: Vec<StoreHistogram>,
    pub alpha: f64,
    pub z_critical: f64,
    pub estimates: Vec<SampleSizeEstimate>,
}

impl AnalysisReport {
    /// One sentence per estimate, e.g.
    /// `Store 1 (range rule): sample size of 21608 for a 10% margin of error at 95% confidence (sigma = 7.5000).`
    pub fn estimate_sentence(estimate: &SampleSizeEstimate) -> String {
        let size = estimate
            .sample_size
            .map_or_else(|| "undefined".to_owned(), |n| n.to_string());
        format!(
            "Store {} ({}): sample size of {} for a {}% margin of error at {}% confidence (sigma = {}).",
            estimate.store_id,
            estimate.policy,
            size,
            fmt_pct(estimate.margin_of_error),
            fmt_pct(estimate.confidence_level),
            fmt_opt(Some(estimate.sigma_estimate)),
        )
    }

    pub fn write_json<W: Write>(&self, out: &mut W) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut *out, self)?;
        writeln!(out)
    }

    pub fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Stock analysis of {}", self.source)?;
        if let Some(overview) = &self.overview {
            write_overview(out, overview)?;
        }
        self.write_store_table(out)?;
        for dist in &self.distributions {
            write_distribution(out, dist)?;
        }
        self.write_combined_histogram(out)?;
        self.write_estimates(out)
    }

    fn write_store_table<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\n== Stock by store ({} stores) ==", self.store_count)?;
        writeln!(
            out,
            "{:>6} {:>6} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
            "store", "count", "mean", "min", "max", "std", "first", "last"
        )?;
        for s in &self.stores {
            writeln!(
                out,
                "{:>6} {:>6} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
                s.store_id,
                s.count,
                fmt_opt(Some(s.mean)),
                fmt_opt(Some(s.min)),
                fmt_opt(Some(s.max)),
                fmt_opt(Some(s.std_dev)),
                s.date_range.0,
                s.date_range.1,
            )?;
        }
        Ok(())
    }

    fn write_combined_histogram<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let Some(first) = self.combined_histogram.first() else {
            return Ok(());
        };
        writeln!(
            out,
            "\n== Stock distribution, all stores ({} bins) ==",
            first.bins.len()
        )?;
        write!(out, "{:>25}", "range")?;
        for store in &self.combined_histogram {
            write!(out, " {:>8}", format!("store {}", store.store_id))?;
        }
        writeln!(out)?;

        for (idx, edge) in first.bins.iter().enumerate() {
            let counts: Vec<usize> = self
                .combined_histogram
                .iter()
                .map(|store| store.bins.get(idx).map_or(0, |b| b.count))
                .collect();
            if counts.iter().all(|c| *c == 0) {
                continue;
            }
            write!(out, "{:>12}..{:<11}", format!("{:.2}", edge.lower), format!("{:.2}", edge.upper))?;
            for count in counts {
                write!(out, " {count:>8}")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn write_estimates<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "\n== Required sample sizes (alpha = {}, z = {:.6}) ==",
            self.alpha, self.z_critical
        )?;
        for estimate in &self.estimates {
            writeln!(out, "{}", Self::estimate_sentence(estimate))?;
        }
        Ok(())
    }
}

fn write_overview<W: Write>(out: &mut W, overview: &DatasetOverview) -> io::Result<()> {
    writeln!(out, "\n== First {} rows ==", overview.head.len())?;
    writeln!(out, "{:>12} {:>6} {:>12}", "date", "store", "stock")?;
    for r in &overview.head {
        writeln!(out, "{:>12} {:>6} {:>12}", r.date, r.store_id, r.stock)?;
    }

    writeln!(out, "\n== Columns ({} rows) ==", overview.row_count)?;
    for c in &overview.columns {
        writeln!(out, "{:<16} {:<10} {} non-null", c.name, c.dtype, c.non_null)?;
    }

    if overview.describe.is_empty() {
        return Ok(());
    }
    writeln!(out, "\n== Describe ==")?;
    write!(out, "{:<6}", "")?;
    for d in &overview.describe {
        write!(out, " {:>14}", d.name)?;
    }
    writeln!(out)?;
    let rows: [(&str, fn(&ColumnDescription) -> Option<f64>); 8] = [
        ("count", |d| Some(d.count as f64)),
        ("mean", |d| d.mean),
        ("std", |d| d.std_dev),
        ("min", |d| d.min),
        ("25%", |d| d.q1),
        ("50%", |d| d.median),
        ("75%", |d| d.q3),
        ("max", |d| d.max),
    ];
    for (label, get) in rows {
        write!(out, "{label:<6}")?;
        for d in &overview.describe {
            write!(out, " {:>14}", fmt_opt(get(d)))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_distribution<W: Write>(out: &mut W, dist: &DistributionSummary) -> io::Result<()> {
    writeln!(out, "\n== Store {} distribution ==", dist.store_id)?;
    let max = dist.histogram.iter().map(|b| b.count).max().unwrap_or(0);
    let total: usize = dist.histogram.iter().map(|b| b.count).sum();
    writeln!(out, "{:>25} {:>5} {:>9}", "range", "count", "kde")?;
    for (idx, b) in dist.histogram.iter().enumerate() {
        // Density scaled to the bin's expected count
        let kde = dist
            .density
            .get(idx)
            .map(|p| p.density * total as f64 * (b.upper - b.lower));
        writeln!(
            out,
            "{:>12}..{:<11} {:>5} {:>9} {}",
            format!("{:.2}", b.lower),
            format!("{:.2}", b.upper),
            b.count,
            fmt_opt(kde),
            bar(b.count, max, BAR_WIDTH)
        )?;
    }
    let bp = &dist.boxplot;
    writeln!(
        out,
        "boxplot: whiskers {} / {}, q1 {}, median {}, q3 {}, {} outlier(s)",
        fmt_opt(Some(bp.lower_whisker)),
        fmt_opt(Some(bp.upper_whisker)),
        fmt_opt(Some(bp.q1)),
        fmt_opt(Some(bp.median)),
        fmt_opt(Some(bp.q3)),
        bp.outliers.len()
    )?;
    writeln!(out, "skew: {}", fmt_opt(dist.skew))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyser::logic::types::SigmaPolicy;

    fn estimate(sample_size: Option<u64>, sigma: f64) -> SampleSizeEstimate {
        SampleSizeEstimate {
            store_id: 2,
            policy: SigmaPolicy::SampleStdDev,
            margin_of_error: 0.02,
            confidence_level: 0.95,
            sigma_estimate: sigma,
            sample_size,
        }
    }

    #[test]
    fn test_estimate_sentence() {
        assert_eq!(
            AnalysisReport::estimate_sentence(&estimate(Some(1234), 3.25)),
            "Store 2 (sample std dev): sample size of 1234 for a 2% margin of error at 95% confidence (sigma = 3.2500)."
        );
    }

    #[test]
    fn test_undefined_estimate_sentence() {
        let sentence = AnalysisReport::estimate_sentence(&estimate(None, f64::NAN));
        assert!(sentence.contains("sample size of undefined"), "{sentence}");
        assert!(sentence.contains("sigma = —"), "{sentence}");
    }
}
