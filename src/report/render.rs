//! Text and JSON renderers. Formatting only; all figures come from the report.

use super::format::{
    format_currency, format_percent, format_signed_currency, format_signed_percent, progress_bar,
};
use super::RiskReport;
use crate::config::OutputConfig;
use crate::features::FeatureVector;
use crate::pipeline::Mode;
use crate::risk::{Assessment, RiskTier};
use serde::Serialize;
use std::io::{self, Write};

pub const AUDIT_NOTE: &str =
    "Note: PAY_2 to PAY_6 are filled with 0 to keep the model input width.";

const RESET: &str = "\x1b[0m";

fn ansi(tier: RiskTier) -> &'static str {
    match tier {
        RiskTier::High => "\x1b[1;31m",
        RiskTier::Medium => "\x1b[1;38;5;208m",
        RiskTier::Low => "\x1b[1;32m",
    }
}

fn with_delta(value: String, delta: Option<String>) -> String {
    match delta {
        Some(d) => format!("{value:<14} ({d})"),
        None => value,
    }
}

pub fn render_text(report: &RiskReport, output: &OutputConfig, w: &mut impl Write) -> io::Result<()> {
    let headline = report.headline();
    let p = &report.profile;

    writeln!(w, "Credit Risk Assessment")?;
    match report.mode {
        Mode::Normal => writeln!(w, "Scenario: base")?,
        Mode::Stressed(s) => writeln!(w, "Scenario: {} stress ({})", s, s.description())?,
    }
    writeln!(
        w,
        "Borrower: age {}, {}, {}, {}; credit limit {}",
        p.age,
        p.sex_label(),
        p.education_label(),
        p.marriage_label(),
        format_currency(p.limit_bal)
    )?;
    writeln!(w)?;

    writeln!(
        w,
        "Default probability   {}",
        with_delta(
            format_percent(headline.probability),
            report.probability_delta().map(format_signed_percent)
        )
    )?;
    let tier = headline.tier;
    if output.color {
        writeln!(w, "Risk rating           {}{}{} ({})", ansi(tier), tier, RESET, tier.color())?;
    } else {
        writeln!(w, "Risk rating           {} ({})", tier, tier.color())?;
    }
    writeln!(
        w,
        "Expected loss (EL)    {}",
        with_delta(
            format_currency(headline.expected_loss),
            report.expected_loss_delta().map(format_signed_currency)
        )
    )?;
    writeln!(w)?;

    writeln!(
        w,
        "Spending velocity: {:.2}x relative to the six-month average",
        headline.spending_velocity
    )?;
    writeln!(
        w,
        "{} {}",
        progress_bar(headline.probability.min(1.0), output.progress_width),
        format_percent(headline.probability.min(1.0))
    )?;
    writeln!(w)?;

    writeln!(w, "Model input audit (values sent to the model):")?;
    for (name, value) in headline.features.named() {
        writeln!(w, "  {name:<22} {value}")?;
    }
    writeln!(w, "{AUDIT_NOTE}")?;
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    id: String,
    ts: String,
    mode: Mode,
    probability: f64,
    tier: RiskTier,
    color: &'static str,
    expected_loss: f64,
    spending_velocity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    probability_delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_loss_delta: Option<f64>,
    features: &'a FeatureVector,
    base: &'a Assessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    stressed: Option<&'a Assessment>,
}

/// One JSON object per report, newline-terminated.
pub fn render_json(report: &RiskReport, w: &mut impl Write) -> io::Result<()> {
    let headline = report.headline();
    let view = JsonReport {
        id: report.id.to_string(),
        ts: report.ts.to_rfc3339(),
        mode: report.mode,
        probability: headline.probability,
        tier: headline.tier,
        color: headline.tier.color(),
        expected_loss: headline.expected_loss,
        spending_velocity: headline.spending_velocity,
        probability_delta: report.probability_delta(),
        expected_loss_delta: report.expected_loss_delta(),
        features: &headline.features,
        base: &report.base,
        stressed: report.stressed.as_ref(),
    };
    serde_json::to_writer(&mut *w, &view)?;
    writeln!(w)
}
