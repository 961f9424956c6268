//! Default-probability classifiers and the process-wide model cache.
//!
//! - [`OnnxClassifier`] — gradient-boosted model exported to ONNX, run with `ort`
//! - [`LogisticClassifier`] — coefficients + intercept from JSON
//!
//! Anything implementing [`Classifier`] can stand in for the trained model.

mod logistic;
mod onnx;

pub use logistic::{LogisticArtifact, LogisticClassifier};
pub use onnx::OnnxClassifier;

use crate::config::ModelConfig;
use crate::error::{InferenceError, ModelLoadError};
use crate::features::FeatureVector;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Scores one feature row.
pub trait Classifier: Send + Sync {
    /// `[P(no default), P(default)]` for the row.
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], InferenceError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

pub(crate) fn check_probability(p: f64) -> Result<f64, InferenceError> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(InferenceError::InvalidProbability(p))
    }
}

/// Load a classifier, picking the backend from the file extension.
pub fn load_model(path: &Path, config: &ModelConfig) -> Result<Arc<dyn Classifier>, ModelLoadError> {
    if !path.exists() {
        return Err(ModelLoadError::Missing {
            path: path.to_path_buf(),
        });
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let started = Instant::now();
    let model: Arc<dyn Classifier> = match ext.as_deref() {
        Some("onnx") => Arc::new(OnnxClassifier::load(path, config)?),
        Some("json") => Arc::new(LogisticClassifier::load(path)?),
        _ => {
            return Err(ModelLoadError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };
    info!(
        path = %path.display(),
        backend = model.backend(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "model loaded"
    );
    Ok(model)
}

struct Loaded {
    path: PathBuf,
    model: Arc<dyn Classifier>,
}

/// Holds the classifier for the lifetime of the process. The first successful
/// [`ModelCache::get_or_load`] wins; later calls return the same instance.
pub struct ModelCache {
    slot: Mutex<Option<Loaded>>,
}

static GLOBAL_CACHE: ModelCache = ModelCache::new();

/// Cache shared by the whole process.
pub fn global_cache() -> &'static ModelCache {
    &GLOBAL_CACHE
}

impl ModelCache {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    pub fn get_or_load(
        &self,
        path: &Path,
        config: &ModelConfig,
    ) -> Result<Arc<dyn Classifier>, ModelLoadError> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(loaded) = slot.as_ref() {
            if loaded.path != path {
                warn!(
                    cached = %loaded.path.display(),
                    requested = %path.display(),
                    "model already loaded; ignoring new path"
                );
            } else {
                debug!(path = %path.display(), "model cache hit");
            }
            return Ok(Arc::clone(&loaded.model));
        }
        let model = load_model(path, config)?;
        *slot = Some(Loaded {
            path: path.to_path_buf(),
            model: Arc::clone(&model),
        });
        Ok(model)
    }

    /// Cached model, if one has been loaded.
    pub fn get(&self) -> Option<Arc<dyn Classifier>> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.as_ref().map(|l| Arc::clone(&l.model))
    }
}

impl Default for ModelCache {
    fn default() -> Self {
        Self::new()
    }
}
