//! Required sample size for estimating a store's mean stock level.
//!
//! For a margin of error `m`, significance `a` and sigma estimate `s`:
//!
//! ```text
//! z = Φ⁻¹(1 - a/2)
//! n = round((z · s / m)²)
//! ```
//!
//! `m` is an absolute fraction applied uniformly to every store. It is not
//! scaled to each store's mean, so stores with larger stock levels need far
//! larger samples for the same `m`.

use super::special::inverse_standard_normal_cdf;
use super::types::{SampleSizeEstimate, SamplingPlan, SigmaPolicy, StoreStatistics};
use crate::error::{AnalysisError, Result};
use std::collections::BTreeMap;

/// Two-sided critical value `z(a/2)` for significance level `alpha`.
///
/// # Errors
///
/// Returns [`AnalysisError::Config`] if `alpha` is not strictly inside (0, 1).
pub fn z_critical(alpha: f64) -> Result<f64> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(AnalysisError::Config(format!(
            "significance level must lie strictly between 0 and 1, got {alpha}"
        )));
    }
    Ok(inverse_standard_normal_cdf(1.0 - alpha / 2.0))
}

/// Range rule: sigma ≈ (max - min) / 4.
pub fn range_rule_sigma(stats: &StoreStatistics) -> f64 {
    stats.range() / 4.0
}

/// Plug-in: the sample standard deviation stands in for sigma.
pub fn plug_in_sigma(stats: &StoreStatistics) -> f64 {
    stats.std_dev
}

pub fn sigma_for(policy: SigmaPolicy, stats: &StoreStatistics) -> f64 {
    match policy {
        SigmaPolicy::RangeRule => range_rule_sigma(stats),
        SigmaPolicy::SampleStdDev => plug_in_sigma(stats),
    }
}

/// `round((z · sigma / margin)²)`, rounding half to even.
///
/// Returns `None` if the result is not a finite, representable count
/// (NaN sigma, zero margin, overflow).
pub fn required_sample_size(z: f64, sigma: f64, margin: f64) -> Option<u64> {
    let n = ((z * sigma) / margin).powi(2).round_ties_even();
    if n.is_finite() && n >= 0.0 && n <= u64::MAX as f64 {
        Some(n as u64)
    } else {
        None
    }
}

/// Sample sizes for every store, policy and margin in `plan`.
///
/// Output order is store id ascending, then policy, then margin, each in
/// the order given by the plan.
///
/// # Errors
///
/// Returns an error if the plan's significance level or any margin is
/// invalid.
pub fn estimate_sample_sizes(
    stores: &BTreeMap<u32, StoreStatistics>,
    plan: &SamplingPlan,
) -> Result<Vec<SampleSizeEstimate>> {
    let z = z_critical(plan.alpha)?;
    if let Some(bad) = plan.margins.iter().find(|m| !(m.is_finite() && **m > 0.0)) {
        return Err(AnalysisError::Config(format!(
            "margin of error must be positive, got {bad}"
        )));
    }
    let confidence_level = 1.0 - plan.alpha;

    let mut estimates = Vec::with_capacity(stores.len() * plan.policies.len() * plan.margins.len());
    for stats in stores.values() {
        for &policy in &plan.policies {
            let sigma = sigma_for(policy, stats);
            if !sigma.is_finite() {
                tracing::warn!(
                    store_id = stats.store_id,
                    %policy,
                    "sigma is undefined, sample size cannot be computed"
                );
            }
            for &margin in &plan.margins {
                let sample_size = required_sample_size(z, sigma, margin);
                tracing::debug!(
                    store_id = stats.store_id,
                    %policy,
                    margin,
                    sigma,
                    ?sample_size,
                    "sample size estimated"
                );
                estimates.push(SampleSizeEstimate {
                    store_id: stats.store_id,
                    policy,
                    margin_of_error: margin,
                    confidence_level,
                    sigma_estimate: sigma,
                    sample_size,
                });
            }
        }
    }
    Ok(estimates)
}
