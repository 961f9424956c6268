//! Borrower attributes as collected from the user, with the accepted domain of each.

mod args;

pub use args::ProfileArgs;

use crate::error::InputError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Closed numeric interval for a scalar input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn check(&self, field: &'static str, value: f64) -> Result<(), InputError> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(InputError::OutOfRange {
                field,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

pub const LIMIT_BAL_BOUNDS: Bounds = Bounds::new(1000.0, 1_000_000.0);
pub const AGE_BOUNDS: Bounds = Bounds::new(18.0, 100.0);
pub const PAY_0_BOUNDS: Bounds = Bounds::new(-1.0, 8.0);
pub const MAX_DELAY_BOUNDS: Bounds = Bounds::new(0.0, 8.0);
pub const BILL_BOUNDS: Bounds = Bounds::new(0.0, 1_000_000.0);
pub const UTILIZATION_BOUNDS: Bounds = Bounds::new(0.0, 1.5);
pub const PAY_RATIO_BOUNDS: Bounds = Bounds::new(0.0, 1.0);

pub const SEX_CODES: &[u8] = &[1, 2];
pub const EDUCATION_CODES: &[u8] = &[1, 2, 3, 4];
pub const MARRIAGE_CODES: &[u8] = &[1, 2, 3];

/// Raw borrower attributes. Field defaults match the form defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorrowerProfile {
    /// Credit limit (USD)
    pub limit_bal: f64,
    pub age: u8,
    /// 1 = male, 2 = female
    pub sex: u8,
    /// 1 = graduate school, 2 = university, 3 = high school, 4 = other
    pub education: u8,
    /// 1 = married, 2 = single, 3 = other
    pub marriage: u8,
    /// Repayment status of the current month (-1 = paid duly, n = n months late)
    pub pay_0: i8,
    /// Longest delay observed (months)
    pub max_delay: u8,
    /// Current month billed balance (USD)
    pub total_bill: f64,
    /// Average billed balance over the last six months (USD)
    pub avg_bill: f64,
    pub utilization: f64,
    /// Paid / billed
    pub pay_ratio: f64,
}

impl Default for BorrowerProfile {
    fn default() -> Self {
        Self {
            limit_bal: 50_000.0,
            age: 30,
            sex: 1,
            education: 1,
            marriage: 1,
            pay_0: 0,
            max_delay: 0,
            total_bill: 5_000.0,
            avg_bill: 5_000.0,
            utilization: 0.3,
            pay_ratio: 0.5,
        }
    }
}

fn check_code(field: &'static str, value: u8, allowed: &'static [u8]) -> Result<(), InputError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(InputError::InvalidCode {
            field,
            value,
            allowed,
        })
    }
}

impl BorrowerProfile {
    /// Reject any attribute outside its accepted domain.
    pub fn validate(&self) -> Result<(), InputError> {
        LIMIT_BAL_BOUNDS.check("LIMIT_BAL", self.limit_bal)?;
        AGE_BOUNDS.check("AGE", f64::from(self.age))?;
        check_code("SEX", self.sex, SEX_CODES)?;
        check_code("EDUCATION", self.education, EDUCATION_CODES)?;
        check_code("MARRIAGE", self.marriage, MARRIAGE_CODES)?;
        PAY_0_BOUNDS.check("PAY_0", f64::from(self.pay_0))?;
        MAX_DELAY_BOUNDS.check("MAX_DELAY", f64::from(self.max_delay))?;
        BILL_BOUNDS.check("TOTAL_BILL_AMOUNT", self.total_bill)?;
        BILL_BOUNDS.check("AVG_BILL", self.avg_bill)?;
        UTILIZATION_BOUNDS.check("UTILIZATION_RATIO", self.utilization)?;
        PAY_RATIO_BOUNDS.check("PAYMENT_TO_BILL_RATIO", self.pay_ratio)?;
        Ok(())
    }

    /// Read a profile from JSON. Missing fields take form defaults; the result is validated.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let data = std::fs::read_to_string(path)?;
        let profile: BorrowerProfile = serde_json::from_str(&data)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn sex_label(&self) -> &'static str {
        match self.sex {
            1 => "Male",
            2 => "Female",
            _ => "Unknown",
        }
    }

    pub fn education_label(&self) -> &'static str {
        match self.education {
            1 => "Graduate school",
            2 => "University",
            3 => "High school",
            4 => "Other",
            _ => "Unknown",
        }
    }

    pub fn marriage_label(&self) -> &'static str {
        match self.marriage {
            1 => "Married",
            2 => "Single",
            3 => "Other",
            _ => "Unknown",
        }
    }
}
