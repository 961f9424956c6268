//! Result of one interaction and its presentation (terminal text or JSON).

mod format;
mod render;

pub use format::{format_currency, format_percent, format_signed_currency, format_signed_percent, progress_bar};
pub use render::{render_json, render_text, AUDIT_NOTE};

use crate::input::BorrowerProfile;
use crate::pipeline::Mode;
use crate::risk::Assessment;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct RiskReport {
    pub id: Uuid,
    pub ts: DateTime<Utc>,
    pub mode: Mode,
    pub profile: BorrowerProfile,
    /// Scores of the unstressed vector
    pub base: Assessment,
    /// Scores of the stressed vector; present only in stressed mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stressed: Option<Assessment>,
}

impl RiskReport {
    /// Assessment shown in the headline: stressed when present, base otherwise.
    pub fn headline(&self) -> &Assessment {
        self.stressed.as_ref().unwrap_or(&self.base)
    }

    /// Stressed minus base probability.
    pub fn probability_delta(&self) -> Option<f64> {
        self.stressed
            .as_ref()
            .map(|s| s.probability - self.base.probability)
    }

    /// Stressed minus base expected loss.
    pub fn expected_loss_delta(&self) -> Option<f64> {
        self.stressed
            .as_ref()
            .map(|s| s.expected_loss - self.base.expected_loss)
    }
}
