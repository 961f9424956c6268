//! ONNX Runtime inference. Input: [1, 17] f32 in schema order, output: class probabilities.
//! The exported graph must emit a plain tensor (no ZipMap) for the probability output.

use super::{check_probability, Classifier};
use crate::config::ModelConfig;
use crate::error::{InferenceError, ModelLoadError};
use crate::features::{FeatureVector, FEATURE_COUNT};
use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::OnceLock;

/// Overrides where `load-dynamic` looks for the ONNX Runtime library.
const ORT_DYLIB_ENV: &str = "ORT_DYLIB_PATH";

static ORT_ENV: OnceLock<Result<(), String>> = OnceLock::new();

fn init_env() -> Result<(), String> {
    ORT_ENV
        .get_or_init(|| {
            ort::init()
                .with_name("credit-risk")
                .commit()
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .clone()
}

/// An absolute `ORT_DYLIB_PATH` that does not exist fails here instead of inside ort.
fn check_dylib() -> Result<(), String> {
    match std::env::var_os(ORT_DYLIB_ENV) {
        Some(p) if Path::new(&p).is_absolute() && !Path::new(&p).exists() => Err(format!(
            "{ORT_DYLIB_ENV} points to missing file '{}'",
            Path::new(&p).display()
        )),
        _ => Ok(()),
    }
}

fn panic_reason(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "runtime library failed to load".to_string())
}

pub struct OnnxClassifier {
    session: Session,
    input_name: String,
    output_name: String,
    positive_class: usize,
}

impl OnnxClassifier {
    pub fn load(path: &Path, config: &ModelConfig) -> Result<Self, ModelLoadError> {
        let unavailable = |reason: String| ModelLoadError::RuntimeUnavailable {
            path: path.to_path_buf(),
            reason,
        };
        check_dylib().map_err(unavailable)?;

        // With `load-dynamic`, ort panics when the shared library cannot be opened.
        // The panic is turned into a load error, so keep the default hook quiet meanwhile.
        let hook = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        let built = panic::catch_unwind(AssertUnwindSafe(|| -> Result<Session, ModelLoadError> {
            init_env().map_err(unavailable)?;
            Session::builder()
                .and_then(|b| b.commit_from_file(path))
                .map_err(|source| ModelLoadError::Runtime {
                    path: path.to_path_buf(),
                    source,
                })
        }));
        panic::set_hook(hook);
        let session = match built {
            Ok(result) => result?,
            Err(payload) => return Err(unavailable(panic_reason(payload))),
        };

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .ok_or_else(|| ModelLoadError::Incompatible {
                path: path.to_path_buf(),
                reason: "graph has no inputs".to_string(),
            })?;

        // Prefer the configured output; single-output graphs use whatever they have.
        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name == config.probability_output)
            .or_else(|| session.outputs.last())
            .map(|o| o.name.clone())
            .ok_or_else(|| ModelLoadError::Incompatible {
                path: path.to_path_buf(),
                reason: "graph has no outputs".to_string(),
            })?;

        tracing::debug!(input = %input_name, output = %output_name, "onnx session ready");

        Ok(Self {
            session,
            input_name,
            output_name,
            positive_class: config.positive_class,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], InferenceError> {
        let values = features.to_f32();
        let arr = Array2::from_shape_vec((1, FEATURE_COUNT), values).map_err(|_| {
            InferenceError::BadShape {
                len: features.len(),
                class: self.positive_class,
            }
        })?;
        let input = Tensor::from_array(arr)?;
        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => input]?)?;

        let out = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| InferenceError::MissingOutput(self.output_name.clone()))?;
        let view = out.try_extract_tensor::<f32>()?;
        let probs: Vec<f64> = view.iter().map(|&p| f64::from(p)).collect();

        let p = match probs.len() {
            1 => probs[0],
            len if self.positive_class < len => probs[self.positive_class],
            len => {
                return Err(InferenceError::BadShape {
                    len,
                    class: self.positive_class,
                })
            }
        };
        let p = check_probability(p)?;
        Ok([1.0 - p, p])
    }

    fn backend(&self) -> &'static str {
        "onnx"
    }
}
