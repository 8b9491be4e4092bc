//! Drawdown analysis on an indexed value series
//!
//! Drawdowns are fractions of the running peak: 0.25 means the series is
//! 25% below its highest prior value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Drawdown state at one point of the series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawdownPoint {
    pub date: NaiveDate,
    pub drawdown: f64,
    pub peak: f64,
    pub value: f64,
}

/// The worst peak-to-trough decline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxDrawdown {
    /// Decline as a fraction of the peak
    pub value: f64,

    /// Index of the peak preceding the worst trough
    pub peak_index: usize,

    /// Index of the worst trough
    pub trough_index: usize,

    pub peak_date: Option<NaiveDate>,
    pub trough_date: Option<NaiveDate>,

    /// First index after the trough where the series regains the peak
    pub recovery_index: Option<usize>,
}

impl MaxDrawdown {
    fn none() -> Self {
        Self {
            value: 0.0,
            peak_index: 0,
            trough_index: 0,
            peak_date: None,
            trough_date: None,
            recovery_index: None,
        }
    }
}

fn drawdown_from_peak(peak: f64, value: f64) -> f64 {
    if peak > 0.0 {
        (peak - value) / peak
    } else {
        0.0
    }
}

/// Running-peak drawdown for every point
///
/// The peak starts at the first value, so the first drawdown is always zero.
/// Only the first `min(values.len(), dates.len())` points are used.
pub fn drawdown_series(values: &[f64], dates: &[NaiveDate]) -> Vec<DrawdownPoint> {
    let mut peak = match values.first() {
        Some(first) => *first,
        None => return Vec::new(),
    };

    values
        .iter()
        .zip(dates.iter())
        .map(|(&value, &date)| {
            peak = peak.max(value);
            DrawdownPoint {
                date,
                drawdown: drawdown_from_peak(peak, value),
                peak,
                value,
            }
        })
        .collect()
}

/// Worst drawdown with the peak that was in force when it was recorded
///
/// A value equal to the running high becomes the new peak, so the reported
/// peak is the most recent high before the trough.
///
/// Dates are attached when `dates` covers the peak and trough indices.
pub fn max_drawdown(values: &[f64], dates: &[NaiveDate]) -> MaxDrawdown {
    let Some(&first) = values.first() else {
        return MaxDrawdown::none();
    };

    let mut result = MaxDrawdown::none();
    let mut peak = first;
    let mut peak_index = 0;

    for (i, &value) in values.iter().enumerate() {
        if value >= peak {
            peak = value;
            peak_index = i;
        }

        let drawdown = drawdown_from_peak(peak, value);
        if drawdown > result.value {
            result.value = drawdown;
            result.peak_index = peak_index;
            result.trough_index = i;
        }
    }

    if result.value > 0.0 {
        let peak_value = values[result.peak_index];
        result.recovery_index = values
            .iter()
            .enumerate()
            .skip(result.trough_index + 1)
            .find(|(_, v)| **v >= peak_value)
            .map(|(i, _)| i);
    }

    result.peak_date = dates.get(result.peak_index).copied();
    result.trough_date = dates.get(result.trough_index).copied();
    result
}

/// Longest consecutive run of periods spent below the prior peak
///
/// The run resets as soon as the series reaches a new peak (`value >= peak`).
/// An unfinished run at the end of the series counts.
pub fn drawdown_duration(values: &[f64]) -> usize {
    let Some(&first) = values.first() else {
        return 0;
    };

    let mut peak = first;
    let mut current = 0usize;
    let mut longest = 0usize;

    for &value in values {
        if value >= peak {
            peak = value;
            longest = longest.max(current);
            current = 0;
        } else {
            current += 1;
        }
    }

    longest.max(current)
}

/// Drawdown at the last point of the series
pub fn current_drawdown(values: &[f64]) -> f64 {
    let Some(&last) = values.last() else {
        return 0.0;
    };
    let peak = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    drawdown_from_peak(peak, last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly_dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        (0..n)
            .map(|i| start.checked_add_months(chrono::Months::new(i as u32)).unwrap())
            .collect()
    }

    #[test]
    fn test_series_first_point_is_zero() {
        let values = vec![100.0, 90.0, 95.0, 110.0];
        let series = drawdown_series(&values, &monthly_dates(4));

        assert_eq!(series.len(), 4);
        assert_eq!(series[0].drawdown, 0.0);
        assert!((series[1].drawdown - 0.10).abs() < 1e-12);
        assert!((series[2].drawdown - 0.05).abs() < 1e-12);
        assert_eq!(series[3].drawdown, 0.0);
        assert_eq!(series[3].peak, 110.0);
    }

    #[test]
    fn test_series_non_decreasing_has_no_drawdown() {
        let values = vec![100.0, 100.0, 101.0, 105.0, 105.0];
        let series = drawdown_series(&values, &monthly_dates(5));
        assert!(series.iter().all(|p| p.drawdown == 0.0));
    }

    #[test]
    fn test_max_drawdown_v_shape() {
        let dates = monthly_dates(3);
        let dd = max_drawdown(&[100.0, 50.0, 100.0], &dates);

        assert!((dd.value - 0.5).abs() < 1e-12);
        assert_eq!(dd.peak_index, 0);
        assert_eq!(dd.trough_index, 1);
        assert_eq!(dd.peak_date, Some(dates[0]));
        assert_eq!(dd.trough_date, Some(dates[1]));
        assert_eq!(dd.recovery_index, Some(2));
    }

    #[test]
    fn test_max_drawdown_keeps_peak_of_worst_trough() {
        // Worst decline is 120 -> 60; the later peak at 130 must not replace it
        let values = vec![100.0, 120.0, 60.0, 130.0, 110.0];
        let dd = max_drawdown(&values, &monthly_dates(5));

        assert!((dd.value - 0.5).abs() < 1e-12);
        assert_eq!(dd.peak_index, 1);
        assert_eq!(dd.trough_index, 2);
        assert_eq!(dd.recovery_index, Some(3));
    }

    #[test]
    fn test_max_drawdown_equal_high_moves_peak() {
        let dd = max_drawdown(&[100.0, 90.0, 100.0, 80.0], &[]);
        assert!((dd.value - 0.2).abs() < 1e-12);
        assert_eq!(dd.peak_index, 2);
        assert_eq!(dd.trough_index, 3);
        assert_eq!(dd.recovery_index, None);
    }

    #[test]
    fn test_max_drawdown_without_recovery() {
        let dd = max_drawdown(&[100.0, 80.0, 90.0], &[]);
        assert!((dd.value - 0.2).abs() < 1e-12);
        assert_eq!(dd.recovery_index, None);
        assert_eq!(dd.peak_date, None);
    }

    #[test]
    fn test_max_drawdown_empty() {
        let dd = max_drawdown(&[], &[]);
        assert_eq!(dd.value, 0.0);
        assert_eq!(dd.recovery_index, None);
    }

    #[test]
    fn test_drawdown_duration() {
        // Below peak for 2 periods, new peak, then 3 periods below at the end
        let values = vec![100.0, 95.0, 97.0, 101.0, 99.0, 98.0, 100.0];
        assert_eq!(drawdown_duration(&values), 3);

        let values = vec![100.0, 90.0, 91.0, 92.0, 100.0, 99.0];
        assert_eq!(drawdown_duration(&values), 3);
    }

    #[test]
    fn test_drawdown_duration_resets_on_equal_peak() {
        let values = vec![100.0, 99.0, 100.0, 99.0, 100.0];
        assert_eq!(drawdown_duration(&values), 1);
        assert_eq!(drawdown_duration(&[]), 0);
    }

    #[test]
    fn test_current_drawdown() {
        assert!((current_drawdown(&[100.0, 120.0, 90.0]) - 0.25).abs() < 1e-12);
        assert_eq!(current_drawdown(&[100.0, 120.0]), 0.0);
        assert_eq!(current_drawdown(&[]), 0.0);
    }
}
