//! Statistics kernel
//!
//! Sample statistics used by every other module. All functions degrade to
//! `0.0` on empty or too-short input instead of returning `NaN`; a zero here
//! means "not enough data", not "no risk".

use crate::error::{Result, RiskError};
use statrs::statistics::Statistics;

/// Arithmetic mean, `0.0` for an empty slice
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().mean()
}

/// Sample variance (divides by n - 1), `0.0` when fewer than two values
///
/// Two passes around the mean, so a constant series has exactly zero variance.
pub fn variance(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let m = mean(xs);
    let sum_sq: f64 = xs.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (xs.len() - 1) as f64
}

/// Sample standard deviation
pub fn std_dev(xs: &[f64]) -> f64 {
    variance(xs).sqrt()
}

/// Sample covariance of two paired series
///
/// Returns `0.0` if the lengths differ or there are fewer than two pairs.
pub fn covariance(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.len() < 2 {
        return 0.0;
    }
    let (mx, my) = (mean(xs), mean(ys));
    let sum: f64 = xs.iter().zip(ys.iter()).map(|(x, y)| (x - mx) * (y - my)).sum();
    sum / (xs.len() - 1) as f64
}

/// True when a dispersion is indistinguishable from zero at the given scale
///
/// Used in place of `== 0.0` before dividing by a volatility.
pub fn is_negligible(dispersion: f64, scale: f64) -> bool {
    dispersion <= f64::EPSILON * scale.abs().max(1.0)
}

/// Percentile with linear interpolation between closest ranks
///
/// `p` is in percent (0 to 100) and is clamped to that range. The input is
/// not modified; a sorted copy is used.
pub fn percentile(xs: &[f64], p: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }

    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        return sorted[lower];
    }

    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Strict check for paired series
///
/// The two-series functions return a safe default on mismatched input.
/// Callers that would rather fail loudly run this first.
pub fn ensure_paired(xs: &[f64], ys: &[f64]) -> Result<()> {
    if xs.len() != ys.len() {
        return Err(RiskError::MismatchedSeries {
            left: xs.len(),
            right: ys.len(),
        });
    }
    Ok(())
}
