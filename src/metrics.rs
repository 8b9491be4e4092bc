//! Risk-adjusted return metrics
//!
//! Implements:
//! - Beta: Cov(Portfolio, Benchmark) / Var(Benchmark)
//! - Sharpe Ratio: annualized excess return / annualized volatility
//! - Sortino Ratio: uses the deviation of negative returns only
//! - Information Ratio: annualized active return / tracking error
//! - Calmar Ratio: annualized return / maximum drawdown
//!
//! Inputs are period returns in decimal form (0.02 = 2%). Means are
//! annualized linearly (`mean * periods_per_year`) and volatilities with
//! `sqrt(periods_per_year)`. Ratios fall back to `0.0` instead of dividing
//! by zero, and beta falls back to `1.0`.

use crate::stats;
use tracing::warn;

/// Monthly data
pub const DEFAULT_PERIODS_PER_YEAR: f64 = 12.0;

/// Beta of the portfolio against the benchmark
///
/// Returns `1.0` on mismatched lengths or a flat benchmark.
pub fn beta(portfolio_returns: &[f64], benchmark_returns: &[f64]) -> f64 {
    if portfolio_returns.len() != benchmark_returns.len() {
        warn!(
            portfolio = portfolio_returns.len(),
            benchmark = benchmark_returns.len(),
            "beta: paired series differ in length, defaulting to 1"
        );
        return 1.0;
    }

    let benchmark_variance = stats::variance(benchmark_returns);
    if stats::is_negligible(benchmark_variance.sqrt(), stats::mean(benchmark_returns)) {
        return 1.0;
    }

    stats::covariance(portfolio_returns, benchmark_returns) / benchmark_variance
}

/// Linearly annualized mean return
pub fn annualized_return(returns: &[f64], periods_per_year: f64) -> f64 {
    stats::mean(returns) * periods_per_year
}

/// Annualized sample volatility
pub fn annualized_volatility(returns: &[f64], periods_per_year: f64) -> f64 {
    stats::std_dev(returns) * periods_per_year.sqrt()
}

/// Annualized standard deviation of the negative returns only
pub fn downside_volatility(returns: &[f64], periods_per_year: f64) -> f64 {
    let negative: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    stats::std_dev(&negative) * periods_per_year.sqrt()
}

fn annualized_excess_return(returns: &[f64], risk_free_rate: f64, periods_per_year: f64) -> f64 {
    let period_rf = risk_free_rate / periods_per_year;
    let excess: Vec<f64> = returns.iter().map(|r| r - period_rf).collect();
    stats::mean(&excess) * periods_per_year
}

/// Annualized Sharpe Ratio
///
/// `risk_free_rate` is an annual decimal rate.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64, periods_per_year: f64) -> f64 {
    if stats::is_negligible(stats::std_dev(returns), stats::mean(returns)) {
        return 0.0;
    }
    let volatility = annualized_volatility(returns, periods_per_year);

    annualized_excess_return(returns, risk_free_rate, periods_per_year) / volatility
}

/// Annualized Sortino Ratio
///
/// The denominator is the sample standard deviation of the negative returns.
/// With no negative returns the ratio is `+inf` for a positive excess return
/// and `0.0` otherwise.
pub fn sortino_ratio(returns: &[f64], risk_free_rate: f64, periods_per_year: f64) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    let excess = annualized_excess_return(returns, risk_free_rate, periods_per_year);

    if !returns.iter().any(|r| *r < 0.0) {
        return if excess > 0.0 { f64::INFINITY } else { 0.0 };
    }

    let negative: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    if stats::is_negligible(stats::std_dev(&negative), stats::mean(&negative)) {
        return 0.0;
    }
    let downside = downside_volatility(returns, periods_per_year);

    excess / downside
}

fn active_returns(portfolio_returns: &[f64], benchmark_returns: &[f64]) -> Vec<f64> {
    portfolio_returns
        .iter()
        .zip(benchmark_returns.iter())
        .map(|(p, b)| p - b)
        .collect()
}

/// Annualized standard deviation of active returns
///
/// `0.0` on mismatched lengths.
pub fn tracking_error(portfolio_returns: &[f64], benchmark_returns: &[f64], periods_per_year: f64) -> f64 {
    if portfolio_returns.len() != benchmark_returns.len() {
        warn!(
            portfolio = portfolio_returns.len(),
            benchmark = benchmark_returns.len(),
            "tracking_error: paired series differ in length"
        );
        return 0.0;
    }

    annualized_volatility(&active_returns(portfolio_returns, benchmark_returns), periods_per_year)
}

/// Information Ratio: annualized active return over tracking error
pub fn information_ratio(portfolio_returns: &[f64], benchmark_returns: &[f64], periods_per_year: f64) -> f64 {
    if portfolio_returns.len() != benchmark_returns.len() {
        warn!(
            portfolio = portfolio_returns.len(),
            benchmark = benchmark_returns.len(),
            "information_ratio: paired series differ in length"
        );
        return 0.0;
    }

    let active = active_returns(portfolio_returns, benchmark_returns);
    if stats::is_negligible(stats::std_dev(&active), stats::mean(&active)) {
        return 0.0;
    }
    let te = annualized_volatility(&active, periods_per_year);

    annualized_return(&active, periods_per_year) / te
}

/// Calmar Ratio
///
/// Both arguments are decimals; `max_drawdown` is a positive fraction.
pub fn calmar_ratio(annualized_return: f64, max_drawdown: f64) -> f64 {
    if max_drawdown == 0.0 {
        return 0.0;
    }
    annualized_return / max_drawdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn create_test_returns() -> Vec<f64> {
        vec![
            0.01, 0.02, -0.01, 0.015, -0.005,
            0.03, -0.02, 0.01, 0.005, -0.01,
            0.02, 0.01, -0.015, 0.025, 0.01,
            -0.005, 0.015, 0.02, -0.01, 0.005,
        ]
    }

    fn create_market_returns() -> Vec<f64> {
        vec![
            0.008, 0.015, -0.012, 0.01, -0.008,
            0.025, -0.018, 0.012, 0.003, -0.015,
            0.018, 0.009, -0.02, 0.022, 0.012,
            -0.007, 0.013, 0.017, -0.012, 0.004,
        ]
    }

    #[test]
    fn test_beta() {
        let beta = beta(&create_test_returns(), &create_market_returns());

        // Correlated series with similar volatility
        assert!(beta > 0.5 && beta < 2.0);
    }

    #[test]
    fn test_beta_of_scaled_series() {
        let market = create_market_returns();
        let levered: Vec<f64> = market.iter().map(|r| 2.0 * r).collect();
        assert_abs_diff_eq!(beta(&levered, &market), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_beta_defaults_to_one() {
        assert_eq!(beta(&[0.01, 0.02], &[0.01]), 1.0);
        assert_eq!(beta(&[0.01, 0.02, 0.03], &[0.01, 0.01, 0.01]), 1.0);
        assert_eq!(beta(&[], &[]), 1.0);
    }

    #[test]
    fn test_sharpe_ratio() {
        let returns = create_test_returns();
        let sharpe = sharpe_ratio(&returns, 0.0, DEFAULT_PERIODS_PER_YEAR);

        let expected = stats::mean(&returns) * 12.0 / (stats::std_dev(&returns) * 12.0_f64.sqrt());
        assert_abs_diff_eq!(sharpe, expected, epsilon = 1e-12);
        assert!(sharpe > 0.0);
    }

    #[test]
    fn test_sharpe_with_risk_free_rate() {
        let returns = create_test_returns();
        let without = sharpe_ratio(&returns, 0.0, DEFAULT_PERIODS_PER_YEAR);
        let with = sharpe_ratio(&returns, 0.02, DEFAULT_PERIODS_PER_YEAR);
        assert!(with < without);
    }

    #[test]
    fn test_zero_volatility() {
        let returns = vec![0.01; 20];
        assert_eq!(sharpe_ratio(&returns, 0.0, DEFAULT_PERIODS_PER_YEAR), 0.0);
        assert_eq!(information_ratio(&[0.03; 20], &[0.01; 20], DEFAULT_PERIODS_PER_YEAR), 0.0);
        assert_eq!(sortino_ratio(&[0.02, -0.01, 0.02, -0.01], 0.0, DEFAULT_PERIODS_PER_YEAR), 0.0);
        assert_eq!(beta(&create_test_returns(), &[0.004; 20]), 1.0);
    }

    #[test]
    fn test_sortino_ratio() {
        let returns = create_test_returns();
        let sortino = sortino_ratio(&returns, 0.0, DEFAULT_PERIODS_PER_YEAR);

        assert!(sortino > 0.0);
        // Only penalizes downside
        assert!(sortino >= sharpe_ratio(&returns, 0.0, DEFAULT_PERIODS_PER_YEAR));
    }

    #[test]
    fn test_sortino_without_losses() {
        assert_eq!(sortino_ratio(&[0.01, 0.02], 0.0, 12.0), f64::INFINITY);
        assert_eq!(sortino_ratio(&[0.0, 0.0], 0.0, 12.0), 0.0);
        assert_eq!(sortino_ratio(&[], 0.0, 12.0), 0.0);
    }

    #[test]
    fn test_sortino_single_loss() {
        // One negative return has no sample deviation
        assert_eq!(sortino_ratio(&[0.02, -0.01, 0.03], 0.0, 12.0), 0.0);
    }

    #[test]
    fn test_tracking_error() {
        let te = tracking_error(&create_test_returns(), &create_market_returns(), 12.0);
        assert!(te > 0.0);
        assert!(te < 1.0);

        let same = create_market_returns();
        assert_abs_diff_eq!(tracking_error(&same, &same, 12.0), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_information_ratio() {
        let portfolio = vec![0.02, 0.01, 0.03, 0.00];
        let benchmark = vec![0.01, 0.01, 0.01, 0.01];

        // Active: 0.01, 0.00, 0.02, -0.01
        let active = vec![0.01, 0.0, 0.02, -0.01];
        let expected = stats::mean(&active) * 12.0 / (stats::std_dev(&active) * 12.0_f64.sqrt());
        assert_abs_diff_eq!(information_ratio(&portfolio, &benchmark, 12.0), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_information_ratio_degenerate() {
        assert_eq!(information_ratio(&[0.01], &[0.01, 0.02], 12.0), 0.0);
        let same = create_market_returns();
        assert_eq!(information_ratio(&same, &same, 12.0), 0.0);
    }

    #[test]
    fn test_calmar_ratio() {
        assert_abs_diff_eq!(calmar_ratio(0.12, 0.24), 0.5, epsilon = 1e-12);
        assert_eq!(calmar_ratio(0.12, 0.0), 0.0);
    }

    #[test]
    fn test_downside_volatility() {
        let returns = vec![0.02, -0.01, -0.03, 0.01];
        let expected = stats::std_dev(&[-0.01, -0.03]) * 12.0_f64.sqrt();
        assert_abs_diff_eq!(downside_volatility(&returns, 12.0), expected, epsilon = 1e-12);
    }
}
