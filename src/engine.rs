//! Risk analytics engine
//!
//! Assembles the individual calculators into the results consumed by
//! callers. Every method is a pure function of its inputs and the engine's
//! configuration.

use crate::concentration::{self, ConcentrationMetrics};
use crate::config::RiskConfig;
use crate::drawdown::{self, DrawdownPoint};
use crate::error::Result;
use crate::factor::{self, FactorRiskDecomposition};
use crate::metrics;
use crate::rolling::{self, RollingPoint};
use crate::stress::{StressScenario, StressTestEngine, StressTestReport, StressTestResult};
use crate::types::{FactorHolding, FactorSnapshot, ReturnPoint};
use crate::var::{self, HistogramBin};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Return-series risk metrics
///
/// Return-like values (VaR, CVaR, drawdowns, volatilities, tracking error,
/// annualized return) are in percent points. VaR and CVaR are loss
/// magnitudes: positive means a loss. Ratios and beta are unit-free.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetrics {
    /// Number of periods with a portfolio return
    pub observations: usize,

    pub var95: f64,
    pub var99: f64,
    pub cvar95: f64,
    pub cvar99: f64,
    pub parametric_var95: f64,

    pub max_drawdown: f64,
    pub max_drawdown_peak_date: Option<NaiveDate>,
    pub max_drawdown_trough_date: Option<NaiveDate>,
    pub max_drawdown_recovery_date: Option<NaiveDate>,
    /// Longest stretch below a prior peak, in periods
    pub drawdown_duration: usize,
    pub current_drawdown: f64,

    pub beta: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub information_ratio: f64,
    pub calmar_ratio: f64,

    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub downside_volatility: f64,
    pub tracking_error: f64,

    /// Drawdown at every point (percent)
    pub drawdown_series: Vec<DrawdownPoint>,
    /// 95% VaR per trailing window (percent)
    pub rolling_var: Vec<RollingPoint>,
    pub rolling_beta: Vec<RollingPoint>,
    /// Maximum drawdown per trailing window (percent)
    pub rolling_drawdown: Vec<RollingPoint>,
    pub rolling_sharpe: Vec<RollingPoint>,

    pub histogram: Vec<HistogramBin>,
}

/// Portfolio risk engine
pub struct RiskEngine {
    config: RiskConfig,
    stress: StressTestEngine,
}

impl RiskEngine {
    /// Create an engine from a validated configuration
    pub fn new(config: RiskConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            stress: StressTestEngine::with_historical_scenarios(),
        })
    }

    /// Replace the scenario catalogue used by [`RiskEngine::run_default_stress_tests`]
    pub fn with_stress_engine(mut self, stress: StressTestEngine) -> Self {
        self.stress = stress;
        self
    }

    /// Load configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::new(RiskConfig::from_yaml(yaml)?)
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(RiskConfig::from_json(json)?)
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Compute VaR, drawdown, ratio and rolling metrics for a return series
    ///
    /// Points without a portfolio return are skipped for return statistics;
    /// benchmark-relative metrics use the periods where both returns exist.
    pub fn compute_core_risk_metrics(&self, points: &[ReturnPoint]) -> RiskMetrics {
        let cfg = &self.config;
        let ppy = cfg.periods_per_year;

        let (return_dates, returns_pct): (Vec<NaiveDate>, Vec<f64>) = points
            .iter()
            .filter_map(|p| p.valid_portfolio_return().map(|r| (p.date, r)))
            .unzip();
        let returns: Vec<f64> = returns_pct.iter().map(|r| r / 100.0).collect();

        let (pair_dates, pairs): (Vec<NaiveDate>, Vec<(f64, f64)>) = points
            .iter()
            .filter_map(|p| p.valid_return_pair().map(|(a, b)| (p.date, (a / 100.0, b / 100.0))))
            .unzip();
        let (paired_portfolio, paired_benchmark): (Vec<f64>, Vec<f64>) = pairs.iter().copied().unzip();

        let (value_dates, values): (Vec<NaiveDate>, Vec<f64>) = points
            .iter()
            .filter(|p| p.portfolio_value.is_finite())
            .map(|p| (p.date, p.portfolio_value))
            .unzip();

        debug!(
            points = points.len(),
            returns = returns.len(),
            pairs = pairs.len(),
            "computing core risk metrics"
        );
        if returns.len() < 2 {
            warn!(returns = returns.len(), "too few returns, risk metrics degrade to zero");
        }

        let max_dd = drawdown::max_drawdown(&values, &value_dates);
        let annualized_return = metrics::annualized_return(&returns, ppy);

        let drawdown_series = drawdown::drawdown_series(&values, &value_dates)
            .into_iter()
            .map(|p| DrawdownPoint { drawdown: p.drawdown * 100.0, ..p })
            .collect();

        let to_percent = |series: Vec<RollingPoint>| -> Vec<RollingPoint> {
            series
                .into_iter()
                .map(|p| RollingPoint { value: p.value * 100.0, ..p })
                .collect()
        };

        RiskMetrics {
            observations: returns.len(),
            var95: var::value_at_risk(&returns_pct, cfg.var_confidence),
            var99: var::value_at_risk(&returns_pct, cfg.var_confidence_high),
            cvar95: var::conditional_var(&returns_pct, cfg.var_confidence),
            cvar99: var::conditional_var(&returns_pct, cfg.var_confidence_high),
            parametric_var95: var::parametric_var(&returns_pct, cfg.var_confidence),
            max_drawdown: max_dd.value * 100.0,
            max_drawdown_peak_date: max_dd.peak_date,
            max_drawdown_trough_date: max_dd.trough_date,
            max_drawdown_recovery_date: max_dd.recovery_index.and_then(|i| value_dates.get(i).copied()),
            drawdown_duration: drawdown::drawdown_duration(&values),
            current_drawdown: drawdown::current_drawdown(&values) * 100.0,
            beta: metrics::beta(&paired_portfolio, &paired_benchmark),
            sharpe_ratio: metrics::sharpe_ratio(&returns, cfg.risk_free_rate, ppy),
            sortino_ratio: metrics::sortino_ratio(&returns, cfg.risk_free_rate, ppy),
            information_ratio: metrics::information_ratio(&paired_portfolio, &paired_benchmark, ppy),
            calmar_ratio: metrics::calmar_ratio(annualized_return, max_dd.value),
            annualized_return: annualized_return * 100.0,
            annualized_volatility: metrics::annualized_volatility(&returns, ppy) * 100.0,
            downside_volatility: metrics::downside_volatility(&returns, ppy) * 100.0,
            tracking_error: metrics::tracking_error(&paired_portfolio, &paired_benchmark, ppy) * 100.0,
            drawdown_series,
            rolling_var: rolling::rolling_var(&returns_pct, &return_dates, cfg.rolling_window),
            rolling_beta: rolling::rolling_beta(&pairs, &pair_dates, cfg.rolling_window),
            rolling_drawdown: to_percent(rolling::rolling_max_drawdown(&values, &value_dates, cfg.rolling_window)),
            rolling_sharpe: rolling::rolling_sharpe(&returns, &return_dates, cfg.rolling_window, cfg.risk_free_rate, ppy),
            histogram: var::return_histogram(&returns_pct, cfg.histogram_bins),
        }
    }

    /// Split portfolio risk into factor and stock-specific parts
    ///
    /// `portfolio_volatility` is annualized, in percent points, such as
    /// [`RiskMetrics::annualized_volatility`].
    pub fn compute_factor_risk(&self, snapshot: &FactorSnapshot, portfolio_volatility: f64) -> FactorRiskDecomposition {
        debug!(
            holdings = snapshot.holdings.len(),
            portfolio_volatility,
            "computing factor risk decomposition"
        );
        factor::decompose_snapshot(snapshot, portfolio_volatility, &self.config.factor_volatilities)
    }

    /// Concentration and active share for a holdings snapshot
    pub fn compute_concentration_risk(&self, holdings: &[FactorHolding]) -> ConcentrationMetrics {
        debug!(holdings = holdings.len(), "computing concentration metrics");
        concentration::concentration_metrics(holdings)
    }

    /// Run the given scenarios against a return series
    pub fn run_stress_tests(&self, points: &[ReturnPoint], scenarios: &[StressScenario]) -> Vec<StressTestResult> {
        debug!(points = points.len(), scenarios = scenarios.len(), "running stress tests");
        self.stress.run_scenarios(points, scenarios)
    }

    /// Run the engine's scenario catalogue against a return series
    pub fn run_default_stress_tests(&self, points: &[ReturnPoint]) -> Vec<StressTestResult> {
        self.run_stress_tests(points, self.stress.scenarios())
    }

    /// Run the engine's scenario catalogue and summarise the outcome
    pub fn stress_report(&self, points: &[ReturnPoint]) -> Result<StressTestReport> {
        let results = self.run_default_stress_tests(points);
        self.stress.generate_report(&results)
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self {
            config: RiskConfig::default(),
            stress: StressTestEngine::with_historical_scenarios(),
        }
    }
}
