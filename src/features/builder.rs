//! Borrower profile → model input row.

use super::{Feature, FeatureVector, FEATURE_COUNT};
use crate::input::BorrowerProfile;

/// Value sent for PAY_2..PAY_6. The form only collects the current month's status,
/// so older months are zero-filled to keep the row the width the model expects.
pub const PAYMENT_HISTORY_PROXY: f64 = 0.0;

/// Billed amount relative to the six-month average. The `+ 1` is applied
/// unconditionally, matching the training pipeline.
pub fn spending_velocity(total_bill: f64, avg_bill: f64) -> f64 {
    total_bill / (avg_bill + 1.0)
}

/// Stateless mapping from raw attributes to a [`FeatureVector`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureBuilder;

impl FeatureBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, profile: &BorrowerProfile) -> FeatureVector {
        let mut values = [0.0f64; FEATURE_COUNT];
        let mut put = |f: Feature, v: f64| values[f.index()] = v;

        put(Feature::LimitBal, profile.limit_bal);
        put(Feature::Age, f64::from(profile.age));
        put(Feature::Sex, f64::from(profile.sex));
        put(Feature::Education, f64::from(profile.education));
        put(Feature::Marriage, f64::from(profile.marriage));
        put(Feature::Pay0, f64::from(profile.pay_0));
        for f in Feature::PAYMENT_HISTORY {
            put(f, PAYMENT_HISTORY_PROXY);
        }
        put(Feature::TotalBillAmount, profile.total_bill);
        put(Feature::MaxDelay, f64::from(profile.max_delay));
        put(Feature::UtilizationRatio, profile.utilization);
        put(Feature::PaymentToBillRatio, profile.pay_ratio);
        put(Feature::AvgBill, profile.avg_bill);
        put(
            Feature::SpendingVelocity,
            spending_velocity(profile.total_bill, profile.avg_bill),
        );

        FeatureVector::from_values(values)
    }
}
