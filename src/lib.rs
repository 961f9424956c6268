//! Credit default risk scorer with expected-loss and stress-test views.
//!
//! Modular structure:
//! - [`input`] — Borrower attributes and their accepted ranges
//! - [`features`] — Fixed-order model input row
//! - [`model`] — Classifier backends and the process-wide model cache
//! - [`risk`] — Default probability, expected loss, risk tier
//! - [`stress`] — Adverse scenarios over the base row
//! - [`pipeline`] — One full recompute per interaction
//! - [`report`] — Text / JSON presentation and input audit
//! - [`logging`] — Structured tracing setup

pub mod config;
pub mod error;
pub mod input;
pub mod features;
pub mod model;
pub mod risk;
pub mod stress;
pub mod pipeline;
pub mod report;
pub mod logging;

pub use config::AppConfig;
pub use error::{InferenceError, InputError, ModelLoadError, ScoringError};
pub use input::BorrowerProfile;
pub use features::{Feature, FeatureBuilder, FeatureVector, FEATURE_COUNT, FEATURE_ORDER};
pub use model::{Classifier, ModelCache};
pub use risk::{Assessment, RiskEngine, RiskTier};
pub use stress::StressScenario;
pub use pipeline::{Mode, Pipeline};
pub use report::RiskReport;
pub use logging::StructuredLogger;
