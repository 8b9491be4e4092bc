//! Holdings concentration and active share
//!
//! Every measure except active share only considers holdings the portfolio
//! actually owns (`portfolio_weight > 0`), including the sector, country and
//! region breakdowns. Active share runs over every holding so benchmark-only
//! names count toward it; a portfolio disjoint from its benchmark scores 100%.

use crate::types::FactorHolding;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Aggregated weights for one sector, country or region (percent)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupConcentration {
    pub name: String,
    pub portfolio_weight: f64,
    pub benchmark_weight: f64,
    pub active_weight: f64,
}

/// Concentration metrics for a holdings snapshot
///
/// Weights and active share are in percent, HHI on the 0–10000 scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcentrationMetrics {
    pub hhi: f64,
    pub effective_stocks: f64,
    pub holdings_count: usize,
    pub top5_weight: f64,
    pub top10_weight: f64,
    pub max_stock: Option<String>,
    pub max_stock_weight: f64,
    pub max_sector: Option<String>,
    pub max_sector_weight: f64,
    pub max_country: Option<String>,
    pub max_country_weight: f64,
    pub max_region: Option<String>,
    pub max_region_weight: f64,
    pub active_share: f64,
    pub sector_concentration: Vec<GroupConcentration>,
    pub country_concentration: Vec<GroupConcentration>,
    pub region_concentration: Vec<GroupConcentration>,
}

/// Herfindahl-Hirschman Index of fractional weights, scaled to 0–10000
pub fn herfindahl_index(weights: &[f64]) -> f64 {
    weights.iter().map(|w| w * w).sum::<f64>() * 10_000.0
}

/// Number of equally weighted holdings with the same HHI
pub fn effective_holdings(weights: &[f64]) -> f64 {
    let sum_sq: f64 = weights.iter().map(|w| w * w).sum();
    if sum_sq > 0.0 {
        1.0 / sum_sq
    } else {
        0.0
    }
}

/// Half the sum of absolute active weights, in percent
///
/// Takes the full holdings list, benchmark-only names included.
pub fn active_share(holdings: &[FactorHolding]) -> f64 {
    holdings.iter().map(|h| h.active_weight.abs()).sum::<f64>() / 2.0 * 100.0
}

/// Combined weight of the `n` largest weights, in percent
fn top_n_weight(sorted_desc: &[f64], n: usize) -> f64 {
    sorted_desc.iter().take(n).sum::<f64>() * 100.0
}

fn group_by<'a, F>(holdings: &[&'a FactorHolding], key: F) -> Vec<GroupConcentration>
where
    F: Fn(&'a FactorHolding) -> &'a str,
{
    let mut groups: HashMap<&str, (f64, f64)> = HashMap::new();
    for &holding in holdings {
        let entry = groups.entry(key(holding)).or_insert((0.0, 0.0));
        entry.0 += holding.portfolio_weight;
        entry.1 += holding.benchmark_weight;
    }

    let mut result: Vec<GroupConcentration> = groups
        .into_iter()
        .filter(|(_, (p, b))| *p != 0.0 || *b != 0.0)
        .map(|(name, (p, b))| GroupConcentration {
            name: name.to_string(),
            portfolio_weight: p * 100.0,
            benchmark_weight: b * 100.0,
            active_weight: (p - b) * 100.0,
        })
        .collect();

    result.sort_by(|a, b| {
        b.portfolio_weight
            .total_cmp(&a.portfolio_weight)
            .then_with(|| a.name.cmp(&b.name))
    });
    result
}

fn leader(groups: &[GroupConcentration]) -> (Option<String>, f64) {
    match groups.first() {
        Some(g) if g.portfolio_weight > 0.0 => (Some(g.name.clone()), g.portfolio_weight),
        _ => (None, 0.0),
    }
}

/// Compute concentration metrics for a holdings snapshot
pub fn concentration_metrics(holdings: &[FactorHolding]) -> ConcentrationMetrics {
    let mut owned: Vec<&FactorHolding> = holdings.iter().filter(|h| h.portfolio_weight > 0.0).collect();
    if owned.is_empty() {
        return ConcentrationMetrics {
            active_share: active_share(holdings),
            ..Default::default()
        };
    }

    owned.sort_by(|a, b| {
        b.portfolio_weight
            .total_cmp(&a.portfolio_weight)
            .then_with(|| a.ticker.cmp(&b.ticker))
    });
    let weights: Vec<f64> = owned.iter().map(|h| h.portfolio_weight).collect();

    let sector_concentration = group_by(&owned, |h| h.sector.as_str());
    let country_concentration = group_by(&owned, |h| h.country.as_str());
    let region_concentration = group_by(&owned, |h| h.region.as_str());

    let (max_sector, max_sector_weight) = leader(&sector_concentration);
    let (max_country, max_country_weight) = leader(&country_concentration);
    let (max_region, max_region_weight) = leader(&region_concentration);

    ConcentrationMetrics {
        hhi: herfindahl_index(&weights),
        effective_stocks: effective_holdings(&weights),
        holdings_count: owned.len(),
        top5_weight: top_n_weight(&weights, 5),
        top10_weight: top_n_weight(&weights, 10),
        max_stock: Some(owned[0].ticker.clone()),
        max_stock_weight: weights[0] * 100.0,
        max_sector,
        max_sector_weight,
        max_country,
        max_country_weight,
        max_region,
        max_region_weight,
        active_share: active_share(holdings),
        sector_concentration,
        country_concentration,
        region_concentration,
    }
}
