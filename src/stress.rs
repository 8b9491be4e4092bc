//! Historical stress testing
//!
//! Maps named crisis windows onto the portfolio's own return history:
//! - Realized: the window is covered by data, so returns, drawdown, beta and
//!   recovery come from the actual index values
//! - Estimated: no data spans the window, so the portfolio return is the
//!   whole-history beta times the scenario's benchmark return
//!
//! Scenario benchmark returns and all reported returns are in percent.

use crate::drawdown;
use crate::error::{Result, RiskError};
use crate::metrics;
use crate::types::ReturnPoint;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Version of the built-in scenario catalogue
pub const SCENARIO_CATALOGUE_VERSION: &str = "2024.1";

/// A named historical crisis window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressScenario {
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Benchmark return over the window, used for estimation (percent)
    pub benchmark_return: f64,
}

impl StressScenario {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        benchmark_return: f64,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            start_date,
            end_date,
            benchmark_return,
        }
    }
}

/// A versioned list of scenarios, as stored in YAML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioCatalogue {
    pub version: String,
    pub scenarios: Vec<StressScenario>,
}

impl ScenarioCatalogue {
    /// Load and validate a catalogue from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let catalogue: ScenarioCatalogue = serde_yaml::from_str(yaml)?;
        catalogue.validate()?;
        Ok(catalogue)
    }

    /// Every scenario needs a name and a window that does not run backwards
    pub fn validate(&self) -> Result<()> {
        for scenario in &self.scenarios {
            if scenario.name.trim().is_empty() {
                return Err(RiskError::InvalidScenario("scenario without a name".to_string()));
            }
            if scenario.start_date > scenario.end_date {
                return Err(RiskError::InvalidScenario(format!(
                    "{}: start {} is after end {}",
                    scenario.name, scenario.start_date, scenario.end_date
                )));
            }
            if !scenario.benchmark_return.is_finite() {
                return Err(RiskError::InvalidScenario(format!(
                    "{}: benchmark return is not a number",
                    scenario.name
                )));
            }
        }
        Ok(())
    }
}

/// How a stress result was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StressMethod {
    Realized,
    Estimated,
}

/// Outcome of one scenario
///
/// Estimated results carry no window dates and no recovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressTestResult {
    pub scenario: StressScenario,
    pub method: StressMethod,
    pub portfolio_return: f64,
    pub benchmark_return: f64,
    pub excess_return: f64,

    /// Maximum drawdown within the window (percent)
    pub max_drawdown: f64,
    pub beta: f64,

    /// Periods after the window until the pre-crisis value is regained
    ///
    /// `Some(0)` when the window already ends at or above its start value,
    /// `None` when the value is never regained or the result is estimated.
    pub recovery_months: Option<usize>,

    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub data_points: usize,
}

impl StressTestResult {
    pub fn is_estimated(&self) -> bool {
        self.method == StressMethod::Estimated
    }
}

/// Summary across all scenario results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StressTestReport {
    pub results: Vec<StressTestResult>,
    pub worst_scenario: String,
    pub max_loss: f64,
    pub best_scenario: String,
    pub max_gain: f64,
    pub average_return: f64,
    pub estimated_count: usize,
}

/// Stress testing engine
pub struct StressTestEngine {
    scenarios: Vec<StressScenario>,
}

impl StressTestEngine {
    /// Create a new stress test engine with the given scenarios
    pub fn new(scenarios: Vec<StressScenario>) -> Self {
        Self { scenarios }
    }

    /// Create an engine from a validated catalogue
    pub fn from_catalogue(catalogue: ScenarioCatalogue) -> Self {
        Self::new(catalogue.scenarios)
    }

    /// Create engine with the built-in historical scenarios
    pub fn with_historical_scenarios() -> Self {
        Self::new(historical_scenarios())
    }

    /// Run one scenario against a return series
    pub fn run_stress_test(&self, points: &[ReturnPoint], scenario: &StressScenario) -> StressTestResult {
        evaluate_scenario(points, scenario, overall_beta(points))
    }

    /// Run the given scenarios; the whole-history beta is computed once
    pub fn run_scenarios(&self, points: &[ReturnPoint], scenarios: &[StressScenario]) -> Vec<StressTestResult> {
        let beta = overall_beta(points);
        scenarios
            .iter()
            .map(|scenario| evaluate_scenario(points, scenario, beta))
            .collect()
    }

    /// Run every scenario held by the engine
    pub fn run_all_scenarios(&self, points: &[ReturnPoint]) -> Vec<StressTestResult> {
        self.run_scenarios(points, &self.scenarios)
    }

    /// Summarise results into worst, best and average outcomes
    pub fn generate_report(&self, results: &[StressTestResult]) -> Result<StressTestReport> {
        let Some(first) = results.first() else {
            return Err(RiskError::InsufficientData(
                "No stress test results provided".to_string(),
            ));
        };

        let mut worst = first;
        let mut best = first;
        let mut total = 0.0;

        for result in results {
            total += result.portfolio_return;
            if result.portfolio_return < worst.portfolio_return {
                worst = result;
            }
            if result.portfolio_return > best.portfolio_return {
                best = result;
            }
        }

        Ok(StressTestReport {
            results: results.to_vec(),
            worst_scenario: worst.scenario.name.clone(),
            max_loss: worst.portfolio_return,
            best_scenario: best.scenario.name.clone(),
            max_gain: best.portfolio_return,
            average_return: total / results.len() as f64,
            estimated_count: results.iter().filter(|r| r.is_estimated()).count(),
        })
    }

    /// Add custom scenario
    pub fn add_scenario(&mut self, scenario: StressScenario) {
        self.scenarios.push(scenario);
    }

    /// Get all scenarios
    pub fn scenarios(&self) -> &[StressScenario] {
        &self.scenarios
    }
}

impl Default for StressTestEngine {
    fn default() -> Self {
        Self::with_historical_scenarios()
    }
}

/// Beta over every period with both returns present
pub fn overall_beta(points: &[ReturnPoint]) -> f64 {
    let (portfolio, benchmark): (Vec<f64>, Vec<f64>) =
        points.iter().filter_map(ReturnPoint::valid_return_pair).unzip();
    metrics::beta(&portfolio, &benchmark)
}

fn day_distance(a: NaiveDate, b: NaiveDate) -> i64 {
    a.signed_duration_since(b).num_days().abs()
}

/// Closest point in either direction; ties go to the earlier point
fn closest_index(points: &[ReturnPoint], date: NaiveDate) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .min_by_key(|(i, p)| (day_distance(p.date, date), *i))
        .map(|(i, _)| i)
}

fn index_on_or_before(points: &[ReturnPoint], date: NaiveDate) -> Option<usize> {
    points.iter().rposition(|p| p.date <= date)
}

fn index_on_or_after(points: &[ReturnPoint], date: NaiveDate) -> Option<usize> {
    points.iter().position(|p| p.date >= date)
}

fn period_return(start: f64, end: f64) -> f64 {
    if start > 0.0 {
        (end / start - 1.0) * 100.0
    } else {
        0.0
    }
}

fn estimated(scenario: &StressScenario, beta: f64) -> StressTestResult {
    let portfolio_return = beta * scenario.benchmark_return;
    StressTestResult {
        scenario: scenario.clone(),
        method: StressMethod::Estimated,
        portfolio_return,
        benchmark_return: scenario.benchmark_return,
        excess_return: portfolio_return - scenario.benchmark_return,
        max_drawdown: portfolio_return.abs(),
        beta,
        recovery_months: None,
        start_date: None,
        end_date: None,
        data_points: 0,
    }
}

/// Evaluate one scenario with a precomputed whole-history beta
pub fn evaluate_scenario(points: &[ReturnPoint], scenario: &StressScenario, overall_beta: f64) -> StressTestResult {
    let start = index_on_or_before(points, scenario.start_date).or_else(|| closest_index(points, scenario.start_date));
    let end = index_on_or_after(points, scenario.end_date).or_else(|| closest_index(points, scenario.end_date));

    let (mut start, mut end) = match (start, end) {
        (Some(s), Some(e)) => (s, e),
        _ => {
            debug!(scenario = %scenario.name, "no data points, estimating from beta");
            return estimated(scenario, overall_beta);
        }
    };

    if start > end {
        std::mem::swap(&mut start, &mut end);
    }

    if start == end {
        debug!(scenario = %scenario.name, "window not covered by data, estimating from beta");
        return estimated(scenario, overall_beta);
    }

    let window = &points[start..=end];
    let values: Vec<f64> = window.iter().map(|p| p.portfolio_value).collect();

    let portfolio_return = period_return(points[start].portfolio_value, points[end].portfolio_value);
    let benchmark_return = period_return(points[start].benchmark_value, points[end].benchmark_value);
    let max_drawdown = drawdown::max_drawdown(&values, &[]).value * 100.0;

    let (portfolio, benchmark): (Vec<f64>, Vec<f64>) = window
        .iter()
        .filter_map(ReturnPoint::valid_return_pair)
        .unzip();
    let beta = if portfolio.len() >= 2 {
        metrics::beta(&portfolio, &benchmark)
    } else {
        overall_beta
    };

    let start_value = points[start].portfolio_value;
    let recovery_months = if points[end].portfolio_value >= start_value {
        Some(0)
    } else {
        points[end + 1..]
            .iter()
            .position(|p| p.portfolio_value >= start_value)
            .map(|offset| offset + 1)
    };

    StressTestResult {
        scenario: scenario.clone(),
        method: StressMethod::Realized,
        portfolio_return,
        benchmark_return,
        excess_return: portfolio_return - benchmark_return,
        max_drawdown,
        beta,
        recovery_months,
        start_date: Some(points[start].date),
        end_date: Some(points[end].date),
        data_points: window.len(),
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// The built-in catalogue of historical equity crises
///
/// Benchmark returns are approximate peak-to-trough moves of a broad
/// developed-market equity index.
pub fn historical_scenarios() -> Vec<StressScenario> {
    vec![
        StressScenario::new(
            "Dot-com Bust",
            "Collapse of technology valuations",
            ymd(2000, 3, 24),
            ymd(2002, 10, 9),
            -49.1,
        ),
        StressScenario::new(
            "Global Financial Crisis",
            "Lehman Brothers collapse and credit crisis",
            ymd(2007, 10, 9),
            ymd(2009, 3, 9),
            -56.8,
        ),
        StressScenario::new(
            "European Debt Crisis",
            "Sovereign debt stress and US downgrade",
            ymd(2011, 4, 29),
            ymd(2011, 10, 3),
            -19.4,
        ),
        StressScenario::new(
            "Taper Tantrum",
            "Bond selloff on Fed tapering signals",
            ymd(2013, 5, 21),
            ymd(2013, 6, 24),
            -5.8,
        ),
        StressScenario::new(
            "China Devaluation",
            "Yuan devaluation and growth scare",
            ymd(2015, 8, 10),
            ymd(2015, 8, 25),
            -12.4,
        ),
        StressScenario::new(
            "Q4 2018 Selloff",
            "Rate hikes and trade war fears",
            ymd(2018, 9, 20),
            ymd(2018, 12, 24),
            -19.8,
        ),
        StressScenario::new(
            "COVID-19 Crash",
            "Pandemic-induced market crash",
            ymd(2020, 2, 19),
            ymd(2020, 3, 23),
            -33.9,
        ),
        StressScenario::new(
            "2022 Rate Shock",
            "Inflation and aggressive rate hikes",
            ymd(2022, 1, 3),
            ymd(2022, 10, 12),
            -25.4,
        ),
    ]
}
