//! Scoring configuration.

use invest_core::{InvestError, Result};
use invest_metrics::Category;
use serde::{Deserialize, Serialize};

/// Default BUY cutoff.
pub const DEFAULT_BUY_CUTOFF: f64 = 70.0;
/// Default HOLD cutoff.
pub const DEFAULT_HOLD_CUTOFF: f64 = 60.0;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Base weight of each category in the total score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    /// Profitability weight.
    pub profitability: f64,
    /// Growth weight.
    pub growth: f64,
    /// Valuation weight.
    pub valuation: f64,
    /// Quality weight.
    pub quality: f64,
    /// Financial health weight.
    pub financial_health: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            profitability: 0.25,
            growth: 0.20,
            valuation: 0.20,
            quality: 0.20,
            financial_health: 0.15,
        }
    }
}

impl CategoryWeights {
    /// Weight of one category.
    #[must_use]
    pub const fn get(&self, category: Category) -> f64 {
        match category {
            Category::Profitability => self.profitability,
            Category::Growth => self.growth,
            Category::Valuation => self.valuation,
            Category::Quality => self.quality,
            Category::FinancialHealth => self.financial_health,
        }
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }

    /// Checks every weight is finite and non-negative and that they sum to 1.
    ///
    /// # Errors
    ///
    /// Returns [`InvestError::Config`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        for category in Category::ALL {
            let weight = self.get(category);
            if !weight.is_finite() || weight < 0.0 {
                return Err(InvestError::Config(format!(
                    "weight for {} must be a non-negative number, got {weight}",
                    category.key()
                )));
            }
        }
        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(InvestError::Config(format!("category weights must sum to 1, got {total}")));
        }
        Ok(())
    }
}

/// Immutable configuration for [`InvestmentScorer`](crate::InvestmentScorer).
///
/// Deserialization goes through [`ScoringConfig::new`], so a loaded config is
/// validated the same way as one built in code.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ScoringConfigFields")]
pub struct ScoringConfig {
    weights: CategoryWeights,
    buy_cutoff: f64,
    hold_cutoff: f64,
}

/// Unvalidated wire form of [`ScoringConfig`].
#[derive(Debug, Deserialize)]
struct ScoringConfigFields {
    weights: CategoryWeights,
    buy_cutoff: f64,
    hold_cutoff: f64,
}

impl TryFrom<ScoringConfigFields> for ScoringConfig {
    type Error = InvestError;

    fn try_from(fields: ScoringConfigFields) -> Result<Self> {
        Self::new(fields.weights, fields.buy_cutoff, fields.hold_cutoff)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: CategoryWeights::default(),
            buy_cutoff: DEFAULT_BUY_CUTOFF,
            hold_cutoff: DEFAULT_HOLD_CUTOFF,
        }
    }
}

impl ScoringConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`InvestError::Config`] if the weights do not sum to 1, a cutoff is
    /// not positive, or the BUY cutoff is not above the HOLD cutoff.
    pub fn new(weights: CategoryWeights, buy_cutoff: f64, hold_cutoff: f64) -> Result<Self> {
        let config = Self { weights, buy_cutoff, hold_cutoff };
        config.validate()?;
        Ok(config)
    }

    /// Default weights with custom cutoffs.
    ///
    /// # Errors
    ///
    /// See [`ScoringConfig::new`].
    pub fn with_cutoffs(buy_cutoff: f64, hold_cutoff: f64) -> Result<Self> {
        Self::new(CategoryWeights::default(), buy_cutoff, hold_cutoff)
    }

    /// Base category weights.
    #[must_use]
    pub const fn weights(&self) -> &CategoryWeights {
        &self.weights
    }

    /// Minimum total for BUY.
    #[must_use]
    pub const fn buy_cutoff(&self) -> f64 {
        self.buy_cutoff
    }

    /// Minimum total for HOLD.
    #[must_use]
    pub const fn hold_cutoff(&self) -> f64 {
        self.hold_cutoff
    }

    /// Validates weights and cutoffs.
    ///
    /// # Errors
    ///
    /// See [`ScoringConfig::new`].
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        for (name, cutoff) in [("buy", self.buy_cutoff), ("hold", self.hold_cutoff)] {
            if !cutoff.is_finite() || cutoff <= 0.0 {
                return Err(InvestError::Config(format!(
                    "{name} cutoff must be a positive number, got {cutoff}"
                )));
            }
        }
        if self.buy_cutoff <= self.hold_cutoff {
            return Err(InvestError::Config(format!(
                "buy cutoff ({}) must be greater than hold cutoff ({})",
                self.buy_cutoff, self.hold_cutoff
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ScoringConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.weights().total() - 1.0).abs() < 1e-12);
        assert_eq!(config.weights().get(Category::FinancialHealth), 0.15);
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let weights = CategoryWeights { growth: 0.30, ..Default::default() };
        let err = ScoringConfig::new(weights, 70.0, 60.0).unwrap_err();
        assert!(matches!(err, InvestError::Config(_)));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let weights = CategoryWeights {
            profitability: -0.05,
            growth: 0.50,
            ..Default::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_cutoff_validation() {
        assert!(ScoringConfig::with_cutoffs(80.0, 60.0).is_ok());
        assert!(ScoringConfig::with_cutoffs(60.0, 60.0).is_err());
        assert!(ScoringConfig::with_cutoffs(50.0, 60.0).is_err());
        assert!(ScoringConfig::with_cutoffs(70.0, 0.0).is_err());
        assert!(ScoringConfig::with_cutoffs(f64::NAN, 60.0).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let json = serde_json::to_string(&ScoringConfig::default()).unwrap();
        let config: ScoringConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, ScoringConfig::default());

        let inverted = json.replace("\"buy_cutoff\":70.0", "\"buy_cutoff\":50.0");
        let err = serde_json::from_str::<ScoringConfig>(&inverted).unwrap_err();
        assert!(err.to_string().contains("buy cutoff"));

        let heavy = json.replace("\"growth\":0.2", "\"growth\":0.9");
        let err = serde_json::from_str::<ScoringConfig>(&heavy).unwrap_err();
        assert!(err.to_string().contains("sum to 1"));
    }
}
