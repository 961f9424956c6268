//! Command-line form for a borrower profile. Bounds mirror [`super::BorrowerProfile::validate`].

use super::{
    BorrowerProfile, Bounds, BILL_BOUNDS, LIMIT_BAL_BOUNDS, PAY_RATIO_BOUNDS, UTILIZATION_BOUNDS,
};
use clap::Args;
use std::path::PathBuf;

fn parse_bounded(s: &str, bounds: Bounds) -> Result<f64, String> {
    let value: f64 = s.trim().parse().map_err(|_| format!("'{s}' is not a number"))?;
    if bounds.contains(value) {
        Ok(value)
    } else {
        Err(format!("{value} is outside [{}, {}]", bounds.min, bounds.max))
    }
}

fn parse_limit_bal(s: &str) -> Result<f64, String> {
    parse_bounded(s, LIMIT_BAL_BOUNDS)
}

fn parse_bill(s: &str) -> Result<f64, String> {
    parse_bounded(s, BILL_BOUNDS)
}

fn parse_utilization(s: &str) -> Result<f64, String> {
    parse_bounded(s, UTILIZATION_BOUNDS)
}

fn parse_pay_ratio(s: &str) -> Result<f64, String> {
    parse_bounded(s, PAY_RATIO_BOUNDS)
}

#[derive(Debug, Clone, Args)]
pub struct ProfileArgs {
    /// Read the profile from a JSON file instead of the flags below
    #[arg(long, value_name = "FILE")]
    pub profile: Option<PathBuf>,

    /// Credit limit (USD)
    #[arg(long, default_value = "50000", value_parser = parse_limit_bal)]
    pub limit_bal: f64,

    /// Age in years
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u8).range(18..=100))]
    pub age: u8,

    /// 1 = male, 2 = female
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub sex: u8,

    /// 1 = graduate school, 2 = university, 3 = high school, 4 = other
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=4))]
    pub education: u8,

    /// 1 = married, 2 = single, 3 = other
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub marriage: u8,

    /// Repayment status of the current month (-1 = paid duly)
    #[arg(
        long = "pay-0",
        default_value_t = 0,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i8).range(-1..=8)
    )]
    pub pay_0: i8,

    /// Longest payment delay observed (months)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=8))]
    pub max_delay: u8,

    /// Current month billed balance (USD)
    #[arg(long, default_value = "5000", value_parser = parse_bill)]
    pub total_bill: f64,

    /// Six-month average billed balance (USD)
    #[arg(long, default_value = "5000", value_parser = parse_bill)]
    pub avg_bill: f64,

    /// Utilization ratio (0 to 1.5)
    #[arg(long, default_value = "0.3", value_parser = parse_utilization)]
    pub utilization: f64,

    /// Paid / billed ratio (0 to 1)
    #[arg(long, default_value = "0.5", value_parser = parse_pay_ratio)]
    pub pay_ratio: f64,
}

impl ProfileArgs {
    /// Profile from `--profile` when given, otherwise from the individual flags.
    pub fn into_profile(self) -> Result<BorrowerProfile, Box<dyn std::error::Error + Send + Sync>> {
        if let Some(path) = self.profile {
            return BorrowerProfile::from_json_file(&path);
        }
        let profile = BorrowerProfile {
            limit_bal: self.limit_bal,
            age: self.age,
            sex: self.sex,
            education: self.education,
            marriage: self.marriage,
            pay_0: self.pay_0,
            max_delay: self.max_delay,
            total_bill: self.total_bill,
            avg_bill: self.avg_bill,
            utilization: self.utilization,
            pay_ratio: self.pay_ratio,
        };
        profile.validate()?;
        Ok(profile)
    }
}
