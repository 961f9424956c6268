//! Logistic-regression classifier read from a JSON artifact.

use super::{check_probability, Classifier};
use crate::error::{InferenceError, ModelLoadError};
use crate::features::{FeatureVector, FEATURE_COUNT, FEATURE_ORDER};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk form: `feature_names` must repeat the schema order exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticArtifact {
    pub feature_names: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

#[derive(Debug, Clone)]
pub struct LogisticClassifier {
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl LogisticClassifier {
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let data = std::fs::read_to_string(path).map_err(|source| ModelLoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let artifact: LogisticArtifact =
            serde_json::from_str(&data).map_err(|e| ModelLoadError::Corrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Self::from_artifact(artifact).map_err(|reason| ModelLoadError::Incompatible {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Check the artifact against the schema; the error string says what differs.
    pub fn from_artifact(artifact: LogisticArtifact) -> Result<Self, String> {
        if artifact.feature_names.len() != FEATURE_COUNT {
            return Err(format!(
                "expected {FEATURE_COUNT} feature names, found {}",
                artifact.feature_names.len()
            ));
        }
        if let Some((i, name)) = artifact
            .feature_names
            .iter()
            .enumerate()
            .find(|(i, name)| name.as_str() != FEATURE_ORDER[*i])
        {
            return Err(format!(
                "column {i} is '{name}', expected '{}'",
                FEATURE_ORDER[i]
            ));
        }
        let coefficients: [f64; FEATURE_COUNT] =
            artifact.coefficients.as_slice().try_into().map_err(|_| {
                format!(
                    "expected {FEATURE_COUNT} coefficients, found {}",
                    artifact.coefficients.len()
                )
            })?;
        if !artifact.intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err("non-finite parameter".to_string());
        }
        Ok(Self {
            coefficients,
            intercept: artifact.intercept,
        })
    }
}

impl Classifier for LogisticClassifier {
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], InferenceError> {
        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.as_slice())
                .map(|(c, x)| c * x)
                .sum::<f64>();
        let p = check_probability(sigmoid(z))?;
        Ok([1.0 - p, p])
    }

    fn backend(&self) -> &'static str {
        "logistic"
    }
}
