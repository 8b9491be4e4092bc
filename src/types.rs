//! Input data model: return series points, factor exposures and holdings

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One period of portfolio and benchmark performance
///
/// Index values start from a common base of 100. Returns are in percent
/// units (2.5 means +2.5%). A missing return excludes the point from all
/// return statistics; its index values are still used for drawdowns and
/// stress-window lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub portfolio_value: f64,
    pub benchmark_value: f64,
    #[serde(default)]
    pub portfolio_return: Option<f64>,
    #[serde(default)]
    pub benchmark_return: Option<f64>,
    #[serde(default)]
    pub alpha: Option<f64>,
}

impl ReturnPoint {
    /// Create a point, deriving alpha from the two returns when both exist
    pub fn new(
        date: NaiveDate,
        portfolio_value: f64,
        benchmark_value: f64,
        portfolio_return: Option<f64>,
        benchmark_return: Option<f64>,
    ) -> Self {
        let alpha = match (portfolio_return, benchmark_return) {
            (Some(p), Some(b)) => Some(p - b),
            _ => None,
        };

        Self {
            date,
            portfolio_value,
            benchmark_value,
            portfolio_return,
            benchmark_return,
            alpha,
        }
    }

    /// Portfolio return if present and finite
    pub fn valid_portfolio_return(&self) -> Option<f64> {
        self.portfolio_return.filter(|r| r.is_finite())
    }

    /// Portfolio and benchmark returns if both are present and finite
    pub fn valid_return_pair(&self) -> Option<(f64, f64)> {
        match (self.portfolio_return, self.benchmark_return) {
            (Some(p), Some(b)) if p.is_finite() && b.is_finite() => Some((p, b)),
            _ => None,
        }
    }
}

/// The decomposable style factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Factor {
    Value,
    Growth,
    Quality,
    Debt,
    Volatility,
    Momentum,
    Size,
    Sentiment,
}

impl Factor {
    /// Every factor, in reporting order
    pub const ALL: [Factor; 8] = [
        Factor::Value,
        Factor::Growth,
        Factor::Quality,
        Factor::Debt,
        Factor::Volatility,
        Factor::Momentum,
        Factor::Size,
        Factor::Sentiment,
    ];

    /// Human-readable factor name
    pub fn name(&self) -> &'static str {
        match self {
            Factor::Value => "Value",
            Factor::Growth => "Growth",
            Factor::Quality => "Quality",
            Factor::Debt => "Debt",
            Factor::Volatility => "Volatility",
            Factor::Momentum => "Momentum",
            Factor::Size => "Size",
            Factor::Sentiment => "Sentiment",
        }
    }
}

/// Factor scores in standard-deviation units relative to a reference universe
///
/// `mfm_score` is the composite multi-factor score. It travels with the
/// record but is not one of the decomposed factors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorExposure {
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub growth: f64,
    #[serde(default)]
    pub quality: f64,
    #[serde(default)]
    pub debt: f64,
    #[serde(default)]
    pub volatility: f64,
    #[serde(default)]
    pub momentum: f64,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub sentiment: f64,
    #[serde(default)]
    pub mfm_score: f64,
}

impl FactorExposure {
    /// Exposure to a single factor
    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Value => self.value,
            Factor::Growth => self.growth,
            Factor::Quality => self.quality,
            Factor::Debt => self.debt,
            Factor::Volatility => self.volatility,
            Factor::Momentum => self.momentum,
            Factor::Size => self.size,
            Factor::Sentiment => self.sentiment,
        }
    }

    fn get_mut(&mut self, factor: Factor) -> &mut f64 {
        match factor {
            Factor::Value => &mut self.value,
            Factor::Growth => &mut self.growth,
            Factor::Quality => &mut self.quality,
            Factor::Debt => &mut self.debt,
            Factor::Volatility => &mut self.volatility,
            Factor::Momentum => &mut self.momentum,
            Factor::Size => &mut self.size,
            Factor::Sentiment => &mut self.sentiment,
        }
    }

    /// Weighted average exposure across holdings
    ///
    /// `weight` selects the weight to average with, usually
    /// `|h| h.portfolio_weight` or `|h| h.benchmark_weight`. Weights are
    /// normalised by their sum; a zero total gives the all-zero exposure.
    pub fn weighted_average<F>(holdings: &[FactorHolding], weight: F) -> Self
    where
        F: Fn(&FactorHolding) -> f64,
    {
        let total: f64 = holdings.iter().map(&weight).filter(|w| *w > 0.0).sum();
        if total <= 0.0 {
            return Self::default();
        }

        let mut avg = Self::default();
        for holding in holdings {
            let w = weight(holding);
            if w <= 0.0 {
                continue;
            }
            let share = w / total;
            for factor in Factor::ALL {
                *avg.get_mut(factor) += share * holding.factors.get(factor);
            }
            avg.mfm_score += share * holding.factors.mfm_score;
        }
        avg
    }
}

/// A single holding with its classification, weights and factor scores
///
/// Weights are fractions (0.05 = 5%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorHolding {
    pub ticker: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub portfolio_weight: f64,
    #[serde(default)]
    pub benchmark_weight: f64,
    #[serde(default)]
    pub active_weight: f64,
    #[serde(default)]
    pub factors: FactorExposure,
}

impl FactorHolding {
    /// Create a holding; the active weight is derived from the two weights
    pub fn new(
        ticker: impl Into<String>,
        sector: impl Into<String>,
        country: impl Into<String>,
        region: impl Into<String>,
        portfolio_weight: f64,
        benchmark_weight: f64,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            sector: sector.into(),
            country: country.into(),
            region: region.into(),
            portfolio_weight,
            benchmark_weight,
            active_weight: portfolio_weight - benchmark_weight,
            factors: FactorExposure::default(),
        }
    }

    /// Attach factor scores
    pub fn with_factors(mut self, factors: FactorExposure) -> Self {
        self.factors = factors;
        self
    }
}

/// Holdings snapshot plus the two aggregate exposures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorSnapshot {
    /// Portfolio-weighted average exposure
    pub portfolio: FactorExposure,

    /// Benchmark-weighted average exposure
    pub benchmark: FactorExposure,

    #[serde(default)]
    pub holdings: Vec<FactorHolding>,
}

impl FactorSnapshot {
    /// Build a snapshot whose aggregates are derived from the holdings
    pub fn from_holdings(holdings: Vec<FactorHolding>) -> Self {
        let portfolio = FactorExposure::weighted_average(&holdings, |h| h.portfolio_weight);
        let benchmark = FactorExposure::weighted_average(&holdings, |h| h.benchmark_weight);
        Self {
            portfolio,
            benchmark,
            holdings,
        }
    }
}
