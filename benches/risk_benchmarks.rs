//! Benchmarks for the risk analytics engine
//!
//! Run with: cargo bench

use ag_portfolio_risk::*;
use chrono::{Months, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

fn main() {
    println!("=== Portfolio Risk Analytics Benchmarks ===\n");

    benchmark_core_metrics();
    benchmark_factor_and_concentration();
    benchmark_stress_testing();
}

/// Monthly series of correlated portfolio/benchmark returns (percent)
fn synthetic_series(rng: &mut StdRng, months: usize) -> Vec<ReturnPoint> {
    let market = Normal::new(0.7, 4.5).unwrap();
    let noise = Normal::new(0.1, 2.0).unwrap();
    let start = NaiveDate::from_ymd_opt(1995, 1, 31).unwrap();

    let (mut pv, mut bv) = (100.0, 100.0);
    (0..months)
        .map(|i| {
            let b: f64 = market.sample(rng);
            let p = 1.1 * b + noise.sample(rng);
            pv *= 1.0 + p / 100.0;
            bv *= 1.0 + b / 100.0;
            let date = start.checked_add_months(Months::new(i as u32)).unwrap();
            ReturnPoint::new(date, pv, bv, Some(p), Some(b))
        })
        .collect()
}

fn synthetic_holdings(rng: &mut StdRng, n: usize) -> Vec<FactorHolding> {
    let sectors = ["Technology", "Energy", "Financials", "Health Care", "Industrials"];
    let countries = [("US", "North America"), ("GB", "Europe"), ("JP", "Asia"), ("DE", "Europe")];

    let raw: Vec<(f64, f64)> = (0..n).map(|_| (rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0))).collect();
    let p_total: f64 = raw.iter().map(|r| r.0).sum();
    let b_total: f64 = raw.iter().map(|r| r.1).sum();

    raw.iter()
        .enumerate()
        .map(|(i, (p, b))| {
            let (country, region) = countries[i % countries.len()];
            let factors = FactorExposure {
                value: rng.gen_range(-2.0..2.0),
                growth: rng.gen_range(-2.0..2.0),
                quality: rng.gen_range(-2.0..2.0),
                momentum: rng.gen_range(-2.0..2.0),
                ..Default::default()
            };
            FactorHolding::new(format!("T{i}"), sectors[i % sectors.len()], country, region, p / p_total, b / b_total)
                .with_factors(factors)
        })
        .collect()
}

fn benchmark_core_metrics() {
    println!("## Core Risk Metrics");

    let mut rng = StdRng::seed_from_u64(42);
    let engine = RiskEngine::default();

    for months in [60, 240, 1200] {
        let points = synthetic_series(&mut rng, months);

        let start = std::time::Instant::now();
        for _ in 0..100 {
            let _ = engine.compute_core_risk_metrics(&points);
        }
        let elapsed = start.elapsed();
        println!("  {} months (100 iterations): {:?}", months, elapsed);
        println!("  Average: {:?}", elapsed / 100);
    }

    println!();
}

fn benchmark_factor_and_concentration() {
    println!("## Factor Risk and Concentration");

    let mut rng = StdRng::seed_from_u64(7);
    let holdings = synthetic_holdings(&mut rng, 500);
    let snapshot = FactorSnapshot::from_holdings(holdings.clone());
    let engine = RiskEngine::default();

    let start = std::time::Instant::now();
    for _ in 0..1000 {
        let _ = engine.compute_factor_risk(&snapshot, 18.0);
    }
    let elapsed = start.elapsed();
    println!("  Factor decomposition (1000 iterations): {:?}", elapsed);
    println!("  Average: {:?}", elapsed / 1000);

    let start = std::time::Instant::now();
    for _ in 0..1000 {
        let _ = engine.compute_concentration_risk(&holdings);
    }
    let elapsed = start.elapsed();
    println!("  Concentration, 500 holdings (1000 iterations): {:?}", elapsed);
    println!("  Average: {:?}", elapsed / 1000);

    println!();
}

fn benchmark_stress_testing() {
    println!("## Stress Testing");

    let mut rng = StdRng::seed_from_u64(1);
    let points = synthetic_series(&mut rng, 360);
    let engine = StressTestEngine::with_historical_scenarios();

    let start = std::time::Instant::now();
    for _ in 0..1000 {
        let _ = engine.run_all_scenarios(&points);
    }
    let elapsed = start.elapsed();
    println!("  {} scenarios, 360 months (1000 iterations): {:?}", engine.scenarios().len(), elapsed);
    println!("  Average: {:?}", elapsed / 1000);

    println!();
}
