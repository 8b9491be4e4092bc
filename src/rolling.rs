//! Fixed-window rolling metrics
//!
//! The window slides one period at a time. A series of length `n` with
//! window `w` yields `n - w + 1` points, each dated at the last period of
//! its window. A series shorter than the window yields nothing.

use crate::drawdown;
use crate::metrics;
use crate::var;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Twelve months
pub const DEFAULT_ROLLING_WINDOW: usize = 12;

/// One value of a rolling series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollingPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Apply `calculator` to every trailing window of `values`
///
/// `dates` must be aligned with `values`; only the first
/// `min(values.len(), dates.len())` entries are considered.
pub fn rolling_metric<T, F>(values: &[T], dates: &[NaiveDate], window: usize, calculator: F) -> Vec<RollingPoint>
where
    F: Fn(&[T]) -> f64,
{
    let len = values.len().min(dates.len());
    if window == 0 || len < window {
        return Vec::new();
    }

    (window - 1..len)
        .map(|i| RollingPoint {
            date: dates[i],
            value: calculator(&values[i + 1 - window..=i]),
        })
        .collect()
}

/// Rolling beta over paired (portfolio, benchmark) returns
pub fn rolling_beta(pairs: &[(f64, f64)], dates: &[NaiveDate], window: usize) -> Vec<RollingPoint> {
    rolling_metric(pairs, dates, window, |w| {
        let (portfolio, benchmark): (Vec<f64>, Vec<f64>) = w.iter().copied().unzip();
        metrics::beta(&portfolio, &benchmark)
    })
}

/// Rolling annualized Sharpe Ratio over decimal returns
pub fn rolling_sharpe(
    returns: &[f64],
    dates: &[NaiveDate],
    window: usize,
    risk_free_rate: f64,
    periods_per_year: f64,
) -> Vec<RollingPoint> {
    rolling_metric(returns, dates, window, |w| {
        metrics::sharpe_ratio(w, risk_free_rate, periods_per_year)
    })
}

/// Rolling 95% historical VaR
pub fn rolling_var(returns: &[f64], dates: &[NaiveDate], window: usize) -> Vec<RollingPoint> {
    rolling_metric(returns, dates, window, |w| var::value_at_risk(w, 0.95))
}

/// Rolling maximum drawdown of the index values in each window (fraction)
pub fn rolling_max_drawdown(values: &[f64], dates: &[NaiveDate], window: usize) -> Vec<RollingPoint> {
    rolling_metric(values, dates, window, |w| drawdown::max_drawdown(w, &[]).value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monthly_dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2021, 1, 31).unwrap();
        (0..n)
            .map(|i| start.checked_add_months(chrono::Months::new(i as u32)).unwrap())
            .collect()
    }

    #[test]
    fn test_output_length() {
        let values: Vec<f64> = (0..36).map(|i| i as f64).collect();
        let dates = monthly_dates(36);

        let rolled = rolling_metric(&values, &dates, 12, |w| w.iter().sum());
        assert_eq!(rolled.len(), 25);

        let short = rolling_metric(&values[..11], &dates[..11], 12, |w| w.iter().sum());
        assert!(short.is_empty());
    }

    #[test]
    fn test_windows_slide_by_one() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let dates = monthly_dates(5);

        let sums = rolling_metric(&values, &dates, 3, |w| w.iter().sum());
        let got: Vec<f64> = sums.iter().map(|p| p.value).collect();
        assert_eq!(got, vec![6.0, 9.0, 12.0]);
        assert_eq!(sums[0].date, dates[2]);
        assert_eq!(sums[2].date, dates[4]);
    }

    #[test]
    fn test_zero_window() {
        let values = vec![1.0, 2.0];
        assert!(rolling_metric(&values, &monthly_dates(2), 0, |w| w.len() as f64).is_empty());
    }

    #[test]
    fn test_rolling_beta_identical_series() {
        let returns: Vec<f64> = (0..24).map(|i| if i % 2 == 0 { 0.02 } else { -0.01 }).collect();
        let pairs: Vec<(f64, f64)> = returns.iter().map(|r| (*r, *r)).collect();
        let rolled = rolling_beta(&pairs, &monthly_dates(24), 12);

        assert_eq!(rolled.len(), 13);
        assert!(rolled.iter().all(|p| (p.value - 1.0).abs() < 1e-9));
    }

    #[test]
    fn test_rolling_var_and_sharpe() {
        let returns: Vec<f64> = (0..18).map(|i| ((i as f64) * 0.7).sin() * 0.03).collect();
        let dates = monthly_dates(18);

        let vars = rolling_var(&returns, &dates, 12);
        assert_eq!(vars.len(), 7);
        assert!(vars.iter().all(|p| p.value > 0.0));

        let sharpes = rolling_sharpe(&returns, &dates, 12, 0.0, 12.0);
        assert_eq!(sharpes.len(), 7);
        assert!(sharpes.iter().all(|p| p.value.is_finite()));
    }

    #[test]
    fn test_rolling_max_drawdown() {
        let values = vec![100.0, 90.0, 95.0, 100.0, 100.0];
        let rolled = rolling_max_drawdown(&values, &monthly_dates(5), 2);
        let got: Vec<f64> = rolled.iter().map(|p| p.value).collect();

        assert_eq!(got.len(), 4);
        assert!((got[0] - 0.1).abs() < 1e-12);
        assert_eq!(got[1], 0.0);
        assert_eq!(got[3], 0.0);
    }
}
