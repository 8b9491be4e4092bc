//! Engine configuration loaded from YAML or JSON

use crate::error::{Result, RiskError};
use crate::factor::FactorVolatilities;
use crate::metrics::DEFAULT_PERIODS_PER_YEAR;
use crate::rolling::DEFAULT_ROLLING_WINDOW;
use serde::{Deserialize, Serialize};

/// Risk engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Periods per year used for annualization (12 for monthly data)
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: f64,

    /// Annual risk-free rate as a decimal (0.03 = 3%)
    #[serde(default)]
    pub risk_free_rate: f64,

    /// Window length for rolling metrics, in periods
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,

    /// Number of bins in the return histogram
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,

    /// Primary VaR confidence level
    #[serde(default = "default_var_confidence")]
    pub var_confidence: f64,

    /// Tail VaR confidence level
    #[serde(default = "default_var_confidence_high")]
    pub var_confidence_high: f64,

    /// Annualized volatility per factor
    #[serde(default)]
    pub factor_volatilities: FactorVolatilities,
}

impl RiskConfig {
    /// Parse configuration from YAML and validate it
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: RiskConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: RiskConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.periods_per_year.is_finite() && self.periods_per_year > 0.0) {
            return Err(RiskError::InvalidConfig(format!(
                "periods_per_year must be positive, got {}",
                self.periods_per_year
            )));
        }

        if !self.risk_free_rate.is_finite() {
            return Err(RiskError::InvalidConfig("risk_free_rate must be finite".to_string()));
        }

        if self.rolling_window < 2 {
            return Err(RiskError::InvalidConfig(format!(
                "rolling_window must be at least 2, got {}",
                self.rolling_window
            )));
        }

        if self.histogram_bins == 0 {
            return Err(RiskError::InvalidConfig("histogram_bins must be positive".to_string()));
        }

        for confidence in [self.var_confidence, self.var_confidence_high] {
            if confidence <= 0.0 || confidence >= 1.0 || confidence.is_nan() {
                return Err(RiskError::InvalidConfidenceLevel(confidence));
            }
        }

        let vols = &self.factor_volatilities;
        let all_vols = [
            vols.value,
            vols.growth,
            vols.quality,
            vols.debt,
            vols.volatility,
            vols.momentum,
            vols.size,
            vols.sentiment,
        ];
        if all_vols.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(RiskError::InvalidConfig(
                "factor volatilities must be finite and non-negative".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            periods_per_year: default_periods_per_year(),
            risk_free_rate: 0.0,
            rolling_window: default_rolling_window(),
            histogram_bins: default_histogram_bins(),
            var_confidence: default_var_confidence(),
            var_confidence_high: default_var_confidence_high(),
            factor_volatilities: FactorVolatilities::default(),
        }
    }
}

fn default_periods_per_year() -> f64 {
    DEFAULT_PERIODS_PER_YEAR
}

fn default_rolling_window() -> usize {
    DEFAULT_ROLLING_WINDOW
}

fn default_histogram_bins() -> usize {
    20
}

fn default_var_confidence() -> f64 {
    0.95
}

fn default_var_confidence_high() -> f64 {
    0.99
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config = RiskConfig::from_yaml("{}").unwrap();
        assert_eq!(config, RiskConfig::default());
        assert_eq!(config.periods_per_year, 12.0);
        assert_eq!(config.rolling_window, 12);
        assert_eq!(config.histogram_bins, 20);
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
risk_free_rate: 0.03
rolling_window: 24
factor_volatilities:
  momentum: 0.25
"#;
        let config = RiskConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.risk_free_rate, 0.03);
        assert_eq!(config.rolling_window, 24);
        assert_eq!(config.factor_volatilities.momentum, 0.25);
        assert_eq!(config.factor_volatilities.quality, 0.12);
    }

    #[test]
    fn test_json() {
        let json = r#"{ "periods_per_year": 52.0, "var_confidence": 0.9 }"#;
        let config = RiskConfig::from_json(json).unwrap();
        assert_eq!(config.periods_per_year, 52.0);
        assert_eq!(config.var_confidence, 0.9);
    }

    #[test]
    fn test_invalid_confidence() {
        let result = RiskConfig::from_yaml("var_confidence: 1.5");
        assert!(matches!(result, Err(RiskError::InvalidConfidenceLevel(_))));
    }

    #[test]
    fn test_invalid_window() {
        let result = RiskConfig::from_yaml("rolling_window: 1");
        assert!(matches!(result, Err(RiskError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_yaml() {
        let result = RiskConfig::from_yaml("rolling_window: [not, a, number]");
        assert!(matches!(result, Err(RiskError::Yaml(_))));
    }

    #[test]
    fn test_negative_factor_volatility() {
        let result = RiskConfig::from_yaml("factor_volatilities:\n  size: -0.1");
        assert!(result.is_err());
    }
}
