//! One interaction: profile → base vector → (optional stress) → scores → report.
//! Every call recomputes everything; nothing carries over between calls.

use crate::config::RiskConfig;
use crate::error::ScoringError;
use crate::features::FeatureBuilder;
use crate::input::BorrowerProfile;
use crate::model::Classifier;
use crate::report::RiskReport;
use crate::risk::RiskEngine;
use crate::stress::StressScenario;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

/// Which vector drives the headline figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "scenario", rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Normal,
    Stressed(StressScenario),
}

impl Mode {
    /// The stress toggle: on selects `scenario`, off selects NORMAL.
    pub fn from_toggle(stress: bool, scenario: StressScenario) -> Self {
        if stress {
            Mode::Stressed(scenario)
        } else {
            Mode::Normal
        }
    }

    pub fn scenario(self) -> Option<StressScenario> {
        match self {
            Mode::Normal => None,
            Mode::Stressed(s) => Some(s),
        }
    }
}

pub struct Pipeline {
    builder: FeatureBuilder,
    engine: RiskEngine,
}

impl Pipeline {
    pub fn new(risk: RiskConfig) -> Self {
        Self {
            builder: FeatureBuilder::new(),
            engine: RiskEngine::new(risk),
        }
    }

    pub fn assess(
        &self,
        model: &dyn Classifier,
        profile: &BorrowerProfile,
        mode: Mode,
    ) -> Result<RiskReport, ScoringError> {
        let id = Uuid::new_v4();
        let base_features = self.builder.build(profile);
        let base = self.engine.assess(model, &base_features)?;
        debug!(interaction = %id, probability = base.probability, "base scored");

        let stressed = match mode.scenario() {
            Some(scenario) => {
                let features = scenario.apply(&base_features);
                let assessment = self.engine.assess(model, &features)?;
                debug!(
                    interaction = %id,
                    scenario = scenario.name(),
                    probability = assessment.probability,
                    "stressed scored"
                );
                Some(assessment)
            }
            None => None,
        };

        let report = RiskReport {
            id,
            ts: Utc::now(),
            mode,
            profile: profile.clone(),
            base,
            stressed,
        };
        let headline = report.headline();
        info!(
            interaction = %id,
            backend = model.backend(),
            mode = ?mode,
            probability = headline.probability,
            tier = %headline.tier,
            expected_loss = headline.expected_loss,
            "interaction scored"
        );
        Ok(report)
    }
}
