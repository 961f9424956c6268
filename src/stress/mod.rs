//! Adverse scenarios applied to a base feature vector.
//!
//! A scenario is a pure function of the base row; the scorer and the report
//! never need to know which one produced the vector they receive.

use crate::features::{spending_velocity, Feature, FeatureVector};
use serde::{Deserialize, Serialize};

/// Ceiling for payment-status and delay fields after stress.
pub const MAX_DELINQUENCY: f64 = 8.0;

/// Balance multiplier of the recession scenario (+30%).
pub const RECESSION_BALANCE_FACTOR: f64 = 1.3;

/// Extra months of delinquency in the recession scenario.
pub const RECESSION_DELAY_STEP: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StressScenario {
    /// +30% billed balance, +1 month delinquency
    #[default]
    Recession,
}

impl StressScenario {
    pub fn name(self) -> &'static str {
        match self {
            StressScenario::Recession => "recession",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StressScenario::Recession => "+30% billed balance, +1 month payment delay",
        }
    }

    /// Stressed copy of `base`; fields the scenario does not touch are unchanged.
    pub fn apply(self, base: &FeatureVector) -> FeatureVector {
        match self {
            StressScenario::Recession => recession(base),
        }
    }
}

impl std::fmt::Display for StressScenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn recession(base: &FeatureVector) -> FeatureVector {
    let mut out = *base;
    let total_bill = base.get(Feature::TotalBillAmount) * RECESSION_BALANCE_FACTOR;
    out.set(Feature::TotalBillAmount, total_bill);
    out.set(
        Feature::Pay0,
        (base.get(Feature::Pay0) + RECESSION_DELAY_STEP).min(MAX_DELINQUENCY),
    );
    out.set(
        Feature::MaxDelay,
        (base.get(Feature::MaxDelay) + RECESSION_DELAY_STEP).min(MAX_DELINQUENCY),
    );
    // AVG_BILL is the unstressed six-month average.
    out.set(
        Feature::SpendingVelocity,
        spending_velocity(total_bill, base.get(Feature::AvgBill)),
    );
    out
}
