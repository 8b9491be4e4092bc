//! Tail risk: Value at Risk, Expected Shortfall and return histograms
//!
//! Sign convention: VaR and CVaR are loss magnitudes. A 95% VaR of 4.2 on
//! percent returns means a one-period loss of 4.2% is not expected to be
//! exceeded with 95% confidence. The values are in the same unit as the
//! returns passed in.

use crate::stats;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// One histogram bucket of period returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    /// Inclusive lower bound
    pub bin_start: f64,

    /// Exclusive upper bound (inclusive for the last bin)
    pub bin_end: f64,

    /// Number of returns in the bin
    pub count: usize,

    /// The 95% VaR threshold (-VaR95) falls inside this bin
    pub contains_var95: bool,

    /// The 99% VaR threshold (-VaR99) falls inside this bin
    pub contains_var99: bool,
}

/// Historical VaR at the given confidence (e.g. 0.95)
///
/// `-percentile(returns, 100 * (1 - confidence))`; `0.0` for empty input.
pub fn value_at_risk(returns: &[f64], confidence: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    -stats::percentile(returns, 100.0 * (1.0 - confidence))
}

/// Conditional VaR (Expected Shortfall)
///
/// Average loss over the returns strictly below the VaR threshold. When no
/// return lies beyond the threshold the result equals VaR.
pub fn conditional_var(returns: &[f64], confidence: f64) -> f64 {
    let var = value_at_risk(returns, confidence);
    let threshold = -var;

    let tail: Vec<f64> = returns.iter().copied().filter(|r| *r < threshold).collect();
    if tail.is_empty() {
        return var;
    }

    -stats::mean(&tail)
}

/// Gaussian VaR from the sample mean and standard deviation
///
/// VaR = -(μ + σ · Z), with Z the standard normal quantile at 1 - confidence.
pub fn parametric_var(returns: &[f64], confidence: f64) -> f64 {
    if returns.len() < 2 || confidence <= 0.0 || confidence >= 1.0 {
        return 0.0;
    }

    let normal = match Normal::new(0.0, 1.0) {
        Ok(normal) => normal,
        Err(_) => return 0.0,
    };
    let z_score = normal.inverse_cdf(1.0 - confidence);

    -(stats::mean(returns) + z_score * stats::std_dev(returns))
}

/// Equal-width histogram over [min, max] with VaR markers
///
/// Each bin covers `[bin_start, bin_end)`; the last bin also takes `max`.
/// Empty input gives no bins and a constant series gives a single bin.
pub fn return_histogram(returns: &[f64], bins: usize) -> Vec<HistogramBin> {
    if returns.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = returns.iter().copied().fold(f64::INFINITY, f64::min);
    let max = returns.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let var95_threshold = -value_at_risk(returns, 0.95);
    let var99_threshold = -value_at_risk(returns, 0.99);

    if max <= min {
        return vec![HistogramBin {
            bin_start: min,
            bin_end: max,
            count: returns.len(),
            contains_var95: var95_threshold == min,
            contains_var99: var99_threshold == min,
        }];
    }

    let width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for r in returns {
        let index = (((r - min) / width).floor() as usize).min(bins - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let bin_start = min + width * i as f64;
            let is_last = i == bins - 1;
            let bin_end = if is_last { max } else { min + width * (i + 1) as f64 };
            let contains = |t: f64| t >= bin_start && (t < bin_end || (is_last && t <= bin_end));

            HistogramBin {
                bin_start,
                bin_end,
                count,
                contains_var95: contains(var95_threshold),
                contains_var99: contains(var99_threshold),
            }
        })
        .collect()
}
