//! Runs the classifier on one vector and derives expected loss and the risk tier.

use crate::config::RiskConfig;
use crate::error::InferenceError;
use crate::features::{Feature, FeatureVector};
use crate::model::Classifier;
use serde::{Deserialize, Serialize};

/// Fraction of exposure assumed lost on default.
pub const LOSS_GIVEN_DEFAULT: f64 = 0.75;

/// `probability × exposure × LGD`
pub fn expected_loss(probability: f64, exposure: f64) -> f64 {
    probability * exposure * LOSS_GIVEN_DEFAULT
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// HIGH needs a probability strictly above its threshold; MEDIUM starts at its threshold.
    pub fn from_probability(probability: f64, config: &RiskConfig) -> Self {
        if probability > config.high_threshold {
            RiskTier::High
        } else if probability >= config.medium_threshold {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            RiskTier::Low => "green",
            RiskTier::Medium => "orange",
            RiskTier::High => "red",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Scored view of a single feature vector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub probability: f64,
    pub tier: RiskTier,
    /// TOTAL_BILL_AMOUNT of the scored vector
    pub exposure: f64,
    pub expected_loss: f64,
    pub spending_velocity: f64,
    pub features: FeatureVector,
}

pub struct RiskEngine {
    config: RiskConfig,
}

impl RiskEngine {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn assess(
        &self,
        model: &dyn Classifier,
        features: &FeatureVector,
    ) -> Result<Assessment, InferenceError> {
        let [_, probability] = model.predict_proba(features)?;
        let exposure = features.get(Feature::TotalBillAmount);
        Ok(Assessment {
            probability,
            tier: self.tier(probability),
            exposure,
            expected_loss: expected_loss(probability, exposure),
            spending_velocity: features.get(Feature::SpendingVelocity),
            features: *features,
        })
    }

    pub fn tier(&self, probability: f64) -> RiskTier {
        RiskTier::from_probability(probability, &self.config)
    }
}
