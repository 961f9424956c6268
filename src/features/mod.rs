//! Feature schema and vector construction.
//!
//! The classifier sees an unnamed row of 17 numbers, so the order of
//! [`FEATURE_ORDER`] is the contract: it must match the column order the
//! model was trained on.

mod builder;

pub use builder::{spending_velocity, FeatureBuilder, PAYMENT_HISTORY_PROXY};

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Number of model inputs.
pub const FEATURE_COUNT: usize = 17;

/// Column names in training order.
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] = [
    "LIMIT_BAL",
    "AGE",
    "SEX",
    "EDUCATION",
    "MARRIAGE",
    "PAY_0",
    "PAY_2",
    "PAY_3",
    "PAY_4",
    "PAY_5",
    "PAY_6",
    "TOTAL_BILL_AMOUNT",
    "MAX_DELAY",
    "UTILIZATION_RATIO",
    "PAYMENT_TO_BILL_RATIO",
    "AVG_BILL",
    "SPENDING_VELOCITY",
];

/// One model input column. Discriminants are positions in [`FEATURE_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    LimitBal = 0,
    Age,
    Sex,
    Education,
    Marriage,
    Pay0,
    Pay2,
    Pay3,
    Pay4,
    Pay5,
    Pay6,
    TotalBillAmount,
    MaxDelay,
    UtilizationRatio,
    PaymentToBillRatio,
    AvgBill,
    SpendingVelocity,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::LimitBal,
        Feature::Age,
        Feature::Sex,
        Feature::Education,
        Feature::Marriage,
        Feature::Pay0,
        Feature::Pay2,
        Feature::Pay3,
        Feature::Pay4,
        Feature::Pay5,
        Feature::Pay6,
        Feature::TotalBillAmount,
        Feature::MaxDelay,
        Feature::UtilizationRatio,
        Feature::PaymentToBillRatio,
        Feature::AvgBill,
        Feature::SpendingVelocity,
    ];

    /// Payment-status months the form does not collect.
    pub const PAYMENT_HISTORY: [Feature; 5] = [
        Feature::Pay2,
        Feature::Pay3,
        Feature::Pay4,
        Feature::Pay5,
        Feature::Pay6,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        FEATURE_ORDER[self as usize]
    }
}

/// Ordered model input row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.values[feature.index()]
    }

    pub fn set(&mut self, feature: Feature, value: f64) {
        self.values[feature.index()] = value;
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Single-precision copy for tensor input.
    pub fn to_f32(&self) -> Vec<f32> {
        self.values.iter().map(|&v| v as f32).collect()
    }

    /// `(name, value)` pairs in schema order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Feature::ALL.iter().map(move |&f| (f.name(), self.get(f)))
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in self.named() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_names_follow_schema_order() {
        for (i, f) in Feature::ALL.iter().enumerate() {
            assert_eq!(f.index(), i);
            assert_eq!(f.name(), FEATURE_ORDER[i]);
        }
        assert_eq!(Feature::SpendingVelocity.name(), "SPENDING_VELOCITY");
    }

    #[test]
    fn serializes_as_ordered_map() {
        let mut values = [0.0; FEATURE_COUNT];
        values[0] = 50000.0;
        let json = serde_json::to_string(&FeatureVector::from_values(values)).unwrap();
        assert!(json.starts_with(r#"{"LIMIT_BAL":50000.0,"AGE":0.0"#));
        assert!(json.ends_with(r#""SPENDING_VELOCITY":0.0}"#));
    }
}
