//! Factor risk decomposition
//!
//! Splits portfolio variance into a systematic part explained by active
//! factor exposures and an idiosyncratic remainder:
//!
//! - Active exposure a = portfolio exposure − benchmark exposure
//! - Factor covariance Σ = diag(σ²) from a fixed volatility table
//! - Contribution of factor i = aᵢ · (Σa)ᵢ = (aᵢσᵢ)²
//! - Idiosyncratic variance = max(0, σ²_total − aᵀΣa)
//!
//! Percentages are shares of *variance*, so the systematic and
//! idiosyncratic percentages add up to 100. Volatilities and risks are
//! reported in percent points.

use crate::types::{Factor, FactorExposure, FactorSnapshot};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Annualized volatility per factor, in decimals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorVolatilities {
    pub value: f64,
    pub growth: f64,
    pub quality: f64,
    pub debt: f64,
    pub volatility: f64,
    pub momentum: f64,
    pub size: f64,
    pub sentiment: f64,
}

impl Default for FactorVolatilities {
    fn default() -> Self {
        Self {
            value: 0.15,
            growth: 0.18,
            quality: 0.12,
            debt: 0.10,
            volatility: 0.22,
            momentum: 0.20,
            size: 0.14,
            sentiment: 0.16,
        }
    }
}

impl FactorVolatilities {
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

    /// Diagonal factor covariance matrix in percent-point² units
    fn covariance_matrix(&self) -> DMatrix<f64> {
        let variances = DVector::from_iterator(
            Factor::ALL.len(),
            Factor::ALL.iter().map(|f| (self.get(*f) * 100.0).powi(2)),
        );
        DMatrix::from_diagonal(&variances)
    }
}

/// Risk attributed to a single factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorRiskContribution {
    pub factor: Factor,
    pub name: String,
    pub portfolio_exposure: f64,
    pub benchmark_exposure: f64,

    /// Active exposure (portfolio − benchmark)
    pub exposure: f64,

    /// Factor volatility in percent points
    pub volatility: f64,

    /// Variance contribution in percent-point²
    pub contribution: f64,

    /// Share of total variance, in percent
    pub percent_of_risk: f64,
}

/// Systematic vs idiosyncratic breakdown of portfolio risk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorRiskDecomposition {
    /// Sorted by contribution, largest first
    pub factors: Vec<FactorRiskContribution>,
    pub systematic_risk: f64,
    pub idiosyncratic_risk: f64,
    pub total_risk: f64,
    pub systematic_percent: f64,
    pub idiosyncratic_percent: f64,
}

/// Decompose risk given the two aggregate exposures
///
/// `total_volatility` is the annualized portfolio volatility in percent
/// points (e.g. 18.5).
pub fn decompose(
    portfolio: &FactorExposure,
    benchmark: &FactorExposure,
    total_volatility: f64,
    volatilities: &FactorVolatilities,
) -> FactorRiskDecomposition {
    let active = DVector::from_iterator(
        Factor::ALL.len(),
        Factor::ALL.iter().map(|f| portfolio.get(*f) - benchmark.get(*f)),
    );
    let covariance = volatilities.covariance_matrix();

    let marginal = &covariance * &active;
    let contributions = active.component_mul(&marginal);
    let factor_variance = contributions.sum().max(0.0);

    let total_volatility = if total_volatility.is_finite() { total_volatility } else { 0.0 };
    let idiosyncratic_variance = (total_volatility.powi(2) - factor_variance).max(0.0);
    let total_variance = factor_variance + idiosyncratic_variance;

    let share = |variance: f64| {
        if total_variance > 0.0 {
            variance / total_variance * 100.0
        } else {
            0.0
        }
    };

    let mut factors: Vec<FactorRiskContribution> = Factor::ALL
        .iter()
        .enumerate()
        .map(|(i, factor)| FactorRiskContribution {
            factor: *factor,
            name: factor.name().to_string(),
            portfolio_exposure: portfolio.get(*factor),
            benchmark_exposure: benchmark.get(*factor),
            exposure: active[i],
            volatility: volatilities.get(*factor) * 100.0,
            contribution: contributions[i],
            percent_of_risk: share(contributions[i]),
        })
        .collect();

    factors.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));

    FactorRiskDecomposition {
        factors,
        systematic_risk: factor_variance.sqrt(),
        idiosyncratic_risk: idiosyncratic_variance.sqrt(),
        total_risk: total_variance.sqrt(),
        systematic_percent: share(factor_variance),
        idiosyncratic_percent: share(idiosyncratic_variance),
    }
}

/// Decompose risk for a holdings snapshot
pub fn decompose_snapshot(
    snapshot: &FactorSnapshot,
    total_volatility: f64,
    volatilities: &FactorVolatilities,
) -> FactorRiskDecomposition {
    decompose(&snapshot.portfolio, &snapshot.benchmark, total_volatility, volatilities)
}
