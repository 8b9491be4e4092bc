//! Example: full risk report for a small equity portfolio
//!
//! Run with: RUST_LOG=debug cargo run --example portfolio_report

use ag_portfolio_risk::*;
use chrono::{Months, NaiveDate};

fn main() -> Result<()> {
    init_tracing();

    println!("=== Portfolio Risk Report ===\n");

    let engine = RiskEngine::from_yaml(
        r#"
risk_free_rate: 0.02
rolling_window: 12
"#,
    )?;

    // Three years of monthly returns around the 2020 drawdown
    let portfolio = [
        1.8, 2.4, -0.6, 3.1, -5.9, 6.2, 1.1, -1.4, 1.9, 2.2, 3.0, 2.7,
        -0.4, -7.8, -13.1, 11.9, 4.6, 2.1, 5.2, 6.8, -3.6, -2.4, 10.5, 3.9,
        -0.9, 2.8, 4.1, 5.0, 0.4, 2.0, 2.6, 2.7, -4.5, 6.6, -0.9, 4.2,
    ];
    let benchmark = [
        1.5, 2.0, -0.2, 2.8, -6.4, 5.9, 0.9, -1.1, 1.7, 2.0, 2.8, 2.4,
        -0.2, -8.4, -12.5, 12.7, 4.5, 1.8, 5.5, 7.0, -3.9, -2.7, 10.8, 3.7,
        -1.0, 2.6, 4.2, 5.2, 0.5, 2.2, 2.3, 2.9, -4.8, 6.9, -0.8, 4.4,
    ];

    let start = NaiveDate::from_ymd_opt(2018, 12, 31).unwrap_or_default();
    let mut points = vec![ReturnPoint::new(start, 100.0, 100.0, None, None)];
    let (mut pv, mut bv) = (100.0, 100.0);
    for (i, (p, b)) in portfolio.iter().zip(benchmark.iter()).enumerate() {
        pv *= 1.0 + p / 100.0;
        bv *= 1.0 + b / 100.0;
        let date = start
            .checked_add_months(Months::new(i as u32 + 1))
            .unwrap_or(start);
        points.push(ReturnPoint::new(date, pv, bv, Some(*p), Some(*b)));
    }

    let metrics = engine.compute_core_risk_metrics(&points);
    println!("## Return Series");
    println!("  Observations:        {}", metrics.observations);
    println!("  VaR 95% / 99%:       {:.2}% / {:.2}%", metrics.var95, metrics.var99);
    println!("  CVaR 95%:            {:.2}%", metrics.cvar95);
    println!("  Max drawdown:        {:.2}%", metrics.max_drawdown);
    println!("  Drawdown duration:   {} months", metrics.drawdown_duration);
    println!("  Beta:                {:.3}", metrics.beta);
    println!("  Sharpe / Sortino:    {:.2} / {:.2}", metrics.sharpe_ratio, metrics.sortino_ratio);
    println!("  Information ratio:   {:.2}", metrics.information_ratio);
    println!("  Volatility:          {:.2}%", metrics.annualized_volatility);
    println!("  Tracking error:      {:.2}%", metrics.tracking_error);
    println!();

    let holdings = vec![
        FactorHolding::new("MSFT", "Technology", "US", "North America", 0.22, 0.08)
            .with_factors(FactorExposure { growth: 1.1, quality: 1.3, momentum: 0.9, ..Default::default() }),
        FactorHolding::new("ASML", "Technology", "NL", "Europe", 0.18, 0.04)
            .with_factors(FactorExposure { growth: 1.4, momentum: 1.2, volatility: 0.6, ..Default::default() }),
        FactorHolding::new("JPM", "Financials", "US", "North America", 0.15, 0.12)
            .with_factors(FactorExposure { value: 0.8, size: 0.9, ..Default::default() }),
        FactorHolding::new("NOVN", "Health Care", "CH", "Europe", 0.25, 0.16)
            .with_factors(FactorExposure { quality: 0.9, volatility: -0.7, ..Default::default() }),
        FactorHolding::new("TTE", "Energy", "FR", "Europe", 0.20, 0.20)
            .with_factors(FactorExposure { value: 1.3, debt: 0.4, ..Default::default() }),
        FactorHolding::new("XOM", "Energy", "US", "North America", 0.0, 0.40)
            .with_factors(FactorExposure { value: 1.1, sentiment: -0.3, ..Default::default() }),
    ];

    let snapshot = FactorSnapshot::from_holdings(holdings.clone());
    let factor_risk = engine.compute_factor_risk(&snapshot, metrics.annualized_volatility);
    println!("## Factor Risk");
    for factor in factor_risk.factors.iter().take(4) {
        println!(
            "  {:<12} active {:+.2}  contribution {:6.2}  ({:.1}% of risk)",
            factor.name, factor.exposure, factor.contribution, factor.percent_of_risk
        );
    }
    println!(
        "  Systematic {:.1}% / idiosyncratic {:.1}%",
        factor_risk.systematic_percent, factor_risk.idiosyncratic_percent
    );
    println!();

    let concentration = engine.compute_concentration_risk(&holdings);
    println!("## Concentration");
    println!("  HHI:                 {:.0}", concentration.hhi);
    println!("  Effective holdings:  {:.1}", concentration.effective_stocks);
    println!("  Top 5 weight:        {:.1}%", concentration.top5_weight);
    println!("  Active share:        {:.1}%", concentration.active_share);
    println!();

    let report = engine.stress_report(&points)?;
    println!("## Stress Tests");
    for result in &report.results {
        let recovery = result
            .recovery_months
            .map(|m| format!("{m} months"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<24} {:?}  portfolio {:+.1}%  benchmark {:+.1}%  recovery {}",
            result.scenario.name, result.method, result.portfolio_return, result.benchmark_return, recovery
        );
    }
    println!("  Worst: {} ({:+.1}%)", report.worst_scenario, report.max_loss);

    Ok(())
}
