//! Scorer configuration. Loaded once at startup from JSON; every field has a default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "CREDIT_RISK_CONFIG_PATH";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path to the trained classifier artifact (.onnx or .json)
    pub model_path: PathBuf,
    /// How to read the classifier output
    pub model: ModelConfig,
    /// Risk tier thresholds
    pub risk: RiskConfig,
    /// Logging
    pub log: LogConfig,
    /// Report rendering
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Column of the probability output holding P(default)
    pub positive_class: usize,
    /// Name of the ONNX output carrying class probabilities
    pub probability_output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Probability strictly above this is HIGH
    pub high_threshold: f64,
    /// Probability at or above this is MEDIUM
    pub medium_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// ANSI colour for the risk tier in text mode
    pub color: bool,
    /// Width of the probability bar in characters
    pub progress_width: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model_lgbm_monotonic.onnx"),
            model: ModelConfig::default(),
            risk: RiskConfig::default(),
            log: LogConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            positive_class: 1,
            probability_output: "probabilities".to_string(),
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            high_threshold: 0.30,
            medium_threshold: 0.10,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            progress_width: 40,
        }
    }
}

impl AppConfig {
    /// Load from JSON file if present; otherwise return default.
    /// The second value explains why an existing file was ignored; it is
    /// returned rather than logged because the subscriber depends on this config.
    pub fn load(path: &Path) -> (Self, Option<String>) {
        if !path.exists() {
            return (Self::default(), None);
        }
        match std::fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str::<AppConfig>(&data) {
                Ok(c) => (c, None),
                Err(e) => (
                    Self::default(),
                    Some(format!("invalid config '{}': {e}", path.display())),
                ),
            },
            Err(e) => (
                Self::default(),
                Some(format!("unreadable config '{}': {e}", path.display())),
            ),
        }
    }

    /// Path from `CREDIT_RISK_CONFIG_PATH`, falling back to `config.json`.
    pub fn default_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.json"))
    }
}
