//! # ag-portfolio-risk: Portfolio Risk Analytics
//!
//! This library turns a series of portfolio/benchmark returns and a snapshot
//! of factor-tagged holdings into risk metrics. It performs no I/O: every
//! calculation is a pure function of in-memory data.
//!
//! ## Core Components
//!
//! - **RiskEngine**: Orchestrates all calculations under a [`RiskConfig`]
//! - **Tail risk**: Historical and parametric VaR, CVaR, return histograms
//! - **Drawdowns**: Drawdown series, maximum drawdown, duration
//! - **Ratios**: Beta, Sharpe, Sortino, Information and Calmar ratios
//! - **Rolling metrics**: Trailing-window beta, Sharpe, VaR and drawdown
//! - **Factor risk**: Systematic vs idiosyncratic variance by style factor
//! - **Concentration**: HHI, top-N weights, group breakdowns, active share
//! - **Stress tests**: Historical crisis windows, realized or beta-estimated
//!
//! Insufficient data never fails a calculation. Results degrade to zero (or
//! a beta of 1), so a zero VaR can mean "not enough history".
//!
//! ## Example Usage
//!
//! ```rust
//! use ag_portfolio_risk::{ReturnPoint, RiskEngine};
//! use chrono::NaiveDate;
//!
//! let returns = [2.0, -1.0, 1.5, -3.0, 2.5, 0.5];
//! let mut value = 100.0;
//! let points: Vec<ReturnPoint> = returns
//!     .iter()
//!     .enumerate()
//!     .map(|(i, r)| {
//!         value *= 1.0 + r / 100.0;
//!         let date = NaiveDate::from_ymd_opt(2024, i as u32 + 1, 28).unwrap();
//!         ReturnPoint::new(date, value, value, Some(*r), Some(*r))
//!     })
//!     .collect();
//!
//! let engine = RiskEngine::default();
//! let metrics = engine.compute_core_risk_metrics(&points);
//!
//! assert!(metrics.var95 > 0.0);
//! assert!((metrics.beta - 1.0).abs() < 1e-9);
//! ```

pub mod concentration;
pub mod config;
pub mod drawdown;
pub mod engine;
pub mod error;
pub mod factor;
pub mod metrics;
pub mod rolling;
pub mod stats;
pub mod stress;
pub mod types;
pub mod var;

pub use concentration::{ConcentrationMetrics, GroupConcentration};
pub use config::RiskConfig;
pub use drawdown::{DrawdownPoint, MaxDrawdown};
pub use engine::{RiskEngine, RiskMetrics};
pub use error::{Result, RiskError};
pub use factor::{FactorRiskContribution, FactorRiskDecomposition, FactorVolatilities};
pub use rolling::RollingPoint;
pub use stress::{
    ScenarioCatalogue, StressMethod, StressScenario, StressTestEngine, StressTestReport, StressTestResult,
    SCENARIO_CATALOGUE_VERSION,
};
pub use types::{Factor, FactorExposure, FactorHolding, FactorSnapshot, ReturnPoint};
pub use var::HistogramBin;

/// Core return-series metrics with the default configuration
pub fn compute_core_risk_metrics(points: &[ReturnPoint]) -> RiskMetrics {
    RiskEngine::default().compute_core_risk_metrics(points)
}

/// Factor risk decomposition with the default volatility table
pub fn compute_factor_risk(snapshot: &FactorSnapshot, portfolio_volatility: f64) -> FactorRiskDecomposition {
    RiskEngine::default().compute_factor_risk(snapshot, portfolio_volatility)
}

/// Concentration metrics for a holdings snapshot
pub fn compute_concentration_risk(holdings: &[FactorHolding]) -> ConcentrationMetrics {
    concentration::concentration_metrics(holdings)
}

/// Run the given stress scenarios against a return series
pub fn run_stress_tests(points: &[ReturnPoint], scenarios: &[StressScenario]) -> Vec<StressTestResult> {
    StressTestEngine::new(Vec::new()).run_scenarios(points, scenarios)
}

/// Initialize tracing with an `EnvFilter` read from `RUST_LOG`
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();
}
