//! Scoring: default probability, expected loss and risk tier.

mod engine;

pub use engine::{expected_loss, Assessment, RiskEngine, RiskTier, LOSS_GIVEN_DEFAULT};
