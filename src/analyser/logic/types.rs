use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One daily stock observation for one store.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub store_id: u32,
    pub stock: f64,
}

/// Per-store aggregate over the `stock` and `date` columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoreStatistics {
    pub store_id: u32,
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation (n - 1 denominator); NaN for one observation.
    pub std_dev: f64,
    pub date_range: (NaiveDate, NaiveDate),
}

impl StoreStatistics {
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// How the population standard deviation is approximated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigmaPolicy {
    /// `(max - min) / 4`
    RangeRule,
    /// Sample standard deviation taken as the population value
    SampleStdDev,
}

impl SigmaPolicy {
    pub const ALL: [Self; 2] = [Self::RangeRule, Self::SampleStdDev];
}

impl fmt::Display for SigmaPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RangeRule => write!(f, "range rule"),
            Self::SampleStdDev => write!(f, "sample std dev"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleSizeEstimate {
    pub store_id: u32,
    pub policy: SigmaPolicy,
    pub margin_of_error: f64,
    pub confidence_level: f64,
    pub sigma_estimate: f64,
    /// `None` when sigma is not finite (e.g. a single observation).
    pub sample_size: Option<u64>,
}

/// Inputs shared by every sample-size calculation in a run.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplingPlan {
    pub alpha: f64,
    pub margins: Vec<f64>,
    pub policies: Vec<SigmaPolicy>,
}

impl Default for SamplingPlan {
    fn default() -> Self {
        Self {
            alpha: crate::config::DEFAULT_ALPHA,
            margins: crate::config::DEFAULT_MARGINS.to_vec(),
            policies: SigmaPolicy::ALL.to_vec(),
        }
    }
}

/// Equal-width histogram bin, `[lower, upper)` except the last which is closed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxplotSummary {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxplotSummary {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Kernel density estimate at one point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    pub x: f64,
    pub density: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub store_id: u32,
    pub histogram: Vec<Bin>,
    /// Density at each histogram bin midpoint; empty when sd is zero or undefined
    pub density: Vec<DensityPoint>,
    pub boxplot: BoxplotSummary,
    pub skew: Option<f64>,
}

/// Name, dtype and non-null count of one input column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub dtype: String,
    pub non_null: usize,
}

/// One row of the dataset-wide `describe` table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescription {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub row_count: usize,
    pub columns: Vec<ColumnInfo>,
    pub head: Vec<Record>,
    pub describe: Vec<ColumnDescription>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_display() {
        assert_eq!(SigmaPolicy::RangeRule.to_string(), "range rule");
        assert_eq!(SigmaPolicy::SampleStdDev.to_string(), "sample std dev");
    }

    #[test]
    fn test_policy_serializes_snake_case() -> serde_json::Result<()> {
        let json = serde_json::to_string(&SigmaPolicy::SampleStdDev)?;
        assert_eq!(json, "\"sample_std_dev\"");
        Ok(())
    }

    #[test]
    fn test_boxplot_iqr() {
        let summary = BoxplotSummary {
            q1: 2.0,
            q3: 7.5,
            ..Default::default()
        };
        assert!((summary.iqr() - 5.5).abs() < f64::EPSILON);
    }
}
