//! Integration test: config load, feature build, stress, scoring with stub models, model loading, rendering.

use clap::Parser;
use credit_risk::{
    config::{AppConfig, ModelConfig, OutputConfig, RiskConfig},
    error::{InputError, ModelLoadError},
    features::{spending_velocity, Feature, FeatureBuilder, FeatureVector, FEATURE_COUNT, FEATURE_ORDER},
    input::{BorrowerProfile, ProfileArgs},
    model::{load_model, Classifier, LogisticArtifact, ModelCache},
    pipeline::{Mode, Pipeline},
    report::{render_json, render_text, AUDIT_NOTE},
    risk::{expected_loss, RiskTier},
    stress::StressScenario,
    InferenceError,
};
use std::path::Path;
use std::sync::Arc;

/// Returns the same probability for every row.
struct FixedModel(f64);

impl Classifier for FixedModel {
    fn predict_proba(&self, _features: &FeatureVector) -> Result<[f64; 2], InferenceError> {
        Ok([1.0 - self.0, self.0])
    }

    fn backend(&self) -> &'static str {
        "fixed"
    }
}

/// 0.05 for the reference base row, 0.12 once the balance is inflated.
struct ScenarioModel;

impl Classifier for ScenarioModel {
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], InferenceError> {
        let p = if features.get(Feature::TotalBillAmount) > 5000.0 {
            0.12
        } else {
            0.05
        };
        Ok([1.0 - p, p])
    }

    fn backend(&self) -> &'static str {
        "scenario"
    }
}

struct FailingModel;

impl Classifier for FailingModel {
    fn predict_proba(&self, _features: &FeatureVector) -> Result<[f64; 2], InferenceError> {
        Err(InferenceError::MissingOutput("probabilities".into()))
    }

    fn backend(&self) -> &'static str {
        "failing"
    }
}

fn reference_profile() -> BorrowerProfile {
    BorrowerProfile {
        limit_bal: 50000.0,
        age: 30,
        sex: 1,
        education: 2,
        marriage: 2,
        pay_0: 0,
        max_delay: 0,
        total_bill: 5000.0,
        avg_bill: 5000.0,
        utilization: 0.3,
        pay_ratio: 0.5,
    }
}

fn logistic_artifact(intercept: f64) -> LogisticArtifact {
    LogisticArtifact {
        feature_names: FEATURE_ORDER.iter().map(|s| s.to_string()).collect(),
        coefficients: vec![0.0; FEATURE_COUNT],
        intercept,
    }
}

fn write_json(dir: &Path, name: &str, value: &impl serde::Serialize) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
    path
}

#[test]
fn config_load_default() {
    let (c, warning) = AppConfig::load(Path::new("nonexistent.json"));
    assert!(warning.is_none());
    assert_eq!(c.risk.high_threshold, 0.30);
    assert_eq!(c.risk.medium_threshold, 0.10);
    assert_eq!(c.model.positive_class, 1);
    assert!(c.output.color);
}

#[test]
fn config_partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"model_path":"m.json","log":{"json":true}}"#).unwrap();
    let (c, warning) = AppConfig::load(&path);
    assert!(warning.is_none());
    assert_eq!(c.model_path, Path::new("m.json"));
    assert!(c.log.json);
    assert_eq!(c.log.level, "warn");
    assert_eq!(c.risk.high_threshold, 0.30);
}

#[test]
fn config_invalid_file_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();
    let (c, warning) = AppConfig::load(&path);
    assert_eq!(c.output.progress_width, 40);
    let warning = warning.expect("fallback is reported");
    assert!(warning.starts_with("invalid config"));
    assert!(warning.contains("config.json"));
}

#[test]
fn feature_vector_has_schema_width_and_order() {
    let fv = FeatureBuilder::new().build(&reference_profile());
    assert_eq!(fv.len(), 17);
    let names: Vec<&str> = fv.named().map(|(n, _)| n).collect();
    assert_eq!(names, FEATURE_ORDER.to_vec());
    let expected = [
        50000.0, 30.0, 1.0, 2.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 5000.0, 0.0, 0.3, 0.5, 5000.0,
        5000.0 / 5001.0,
    ];
    assert_eq!(fv.as_slice(), &expected[..]);
}

#[test]
fn spending_velocity_formula_base_and_stressed() {
    for (bill, avg) in [(5000.0, 5000.0), (0.0, 0.0), (1234.5, 0.0), (999_999.0, 3.0)] {
        let profile = BorrowerProfile {
            total_bill: bill,
            avg_bill: avg,
            ..reference_profile()
        };
        let base = FeatureBuilder::new().build(&profile);
        assert_eq!(base.get(Feature::SpendingVelocity), bill / (avg + 1.0));
        let stressed = StressScenario::Recession.apply(&base);
        assert_eq!(
            stressed.get(Feature::SpendingVelocity),
            stressed.get(Feature::TotalBillAmount) / (avg + 1.0)
        );
    }
}

#[test]
fn stress_transform_laws() {
    for (pay_0, max_delay) in [(-1i8, 0u8), (0, 0), (3, 5), (7, 8), (8, 8)] {
        let profile = BorrowerProfile {
            pay_0,
            max_delay,
            ..reference_profile()
        };
        let base = FeatureBuilder::new().build(&profile);
        let stressed = StressScenario::Recession.apply(&base);

        assert_eq!(
            stressed.get(Feature::TotalBillAmount),
            base.get(Feature::TotalBillAmount) * 1.3
        );
        assert_eq!(stressed.get(Feature::Pay0), (f64::from(pay_0) + 1.0).min(8.0));
        assert_eq!(stressed.get(Feature::MaxDelay), (f64::from(max_delay) + 1.0).min(8.0));

        let touched = [
            Feature::TotalBillAmount,
            Feature::Pay0,
            Feature::MaxDelay,
            Feature::SpendingVelocity,
        ];
        for f in Feature::ALL.iter().filter(|f| !touched.contains(f)) {
            assert_eq!(stressed.get(*f), base.get(*f), "{} changed", f.name());
        }
    }
}

#[test]
fn expected_loss_uses_exposure_of_same_vector() {
    let pipeline = Pipeline::new(RiskConfig::default());
    let report = pipeline
        .assess(&FixedModel(0.2), &reference_profile(), Mode::Stressed(StressScenario::Recession))
        .unwrap();
    assert_eq!(report.base.expected_loss, 0.2 * 5000.0 * 0.75);
    let stressed = report.stressed.as_ref().unwrap();
    assert_eq!(stressed.exposure, 5000.0 * 1.3);
    assert_eq!(stressed.expected_loss, expected_loss(0.2, 5000.0 * 1.3));
}

#[test]
fn end_to_end_normal() {
    let pipeline = Pipeline::new(RiskConfig::default());
    let report = pipeline
        .assess(&ScenarioModel, &reference_profile(), Mode::Normal)
        .unwrap();
    assert!(report.stressed.is_none());
    let h = report.headline();
    assert_eq!(h.probability, 0.05);
    assert_eq!(h.tier, RiskTier::Low);
    assert!((h.expected_loss - 187.50).abs() < 1e-9);
    assert!((h.spending_velocity - 0.9998).abs() < 1e-4);
    assert_eq!(report.probability_delta(), None);
    assert_eq!(report.expected_loss_delta(), None);
}

#[test]
fn end_to_end_stressed() {
    let pipeline = Pipeline::new(RiskConfig::default());
    let report = pipeline
        .assess(
            &ScenarioModel,
            &reference_profile(),
            Mode::from_toggle(true, StressScenario::Recession),
        )
        .unwrap();
    let h = report.headline();
    assert_eq!(h.features.get(Feature::TotalBillAmount), 6500.0);
    assert_eq!(h.features.get(Feature::Pay0), 1.0);
    assert_eq!(h.features.get(Feature::MaxDelay), 1.0);
    assert!((h.spending_velocity - 1.2997).abs() < 1e-4);
    assert_eq!(h.probability, 0.12);
    assert_eq!(h.tier, RiskTier::Medium);
    assert!((h.expected_loss - 585.0).abs() < 1e-9);
    assert!((report.probability_delta().unwrap() - 0.07).abs() < 1e-12);
    assert!((report.expected_loss_delta().unwrap() - 397.5).abs() < 1e-9);
}

#[test]
fn pipeline_is_idempotent() {
    let pipeline = Pipeline::new(RiskConfig::default());
    let profile = reference_profile();
    for mode in [Mode::Normal, Mode::Stressed(StressScenario::Recession)] {
        let a = pipeline.assess(&ScenarioModel, &profile, mode).unwrap();
        let b = pipeline.assess(&ScenarioModel, &profile, mode).unwrap();
        assert_eq!(a.base, b.base);
        assert_eq!(a.stressed, b.stressed);
        assert_eq!(a.mode, b.mode);
    }
}

#[test]
fn classifier_failure_propagates() {
    let pipeline = Pipeline::new(RiskConfig::default());
    let err = pipeline
        .assess(&FailingModel, &reference_profile(), Mode::Normal)
        .unwrap_err();
    assert!(err.to_string().contains("probabilities"));
}

#[test]
fn profile_validation() {
    assert!(BorrowerProfile::default().validate().is_ok());
    let bad_age = BorrowerProfile {
        age: 17,
        ..BorrowerProfile::default()
    };
    assert!(matches!(
        bad_age.validate(),
        Err(InputError::OutOfRange { field: "AGE", .. })
    ));
    let bad_sex = BorrowerProfile {
        sex: 3,
        ..BorrowerProfile::default()
    };
    assert!(matches!(
        bad_sex.validate(),
        Err(InputError::InvalidCode { field: "SEX", value: 3, .. })
    ));
    let bad_util = BorrowerProfile {
        utilization: 1.6,
        ..BorrowerProfile::default()
    };
    assert!(bad_util.validate().is_err());
}

#[test]
fn profile_from_json_file_fills_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile.json");
    std::fs::write(&path, r#"{"age":45,"pay_0":-1,"total_bill":12000}"#).unwrap();
    let p = BorrowerProfile::from_json_file(&path).unwrap();
    assert_eq!(p.age, 45);
    assert_eq!(p.pay_0, -1);
    assert_eq!(p.total_bill, 12000.0);
    assert_eq!(p.limit_bal, 50000.0);

    std::fs::write(&path, r#"{"pay_ratio":2.0}"#).unwrap();
    assert!(BorrowerProfile::from_json_file(&path).is_err());
}

#[derive(Parser)]
struct FormCli {
    #[command(flatten)]
    profile: ProfileArgs,
}

#[test]
fn cli_defaults_match_form() {
    let cli = FormCli::try_parse_from(["credit-risk"]).unwrap();
    let p = cli.profile.into_profile().unwrap();
    assert_eq!(p, BorrowerProfile::default());
}

#[test]
fn cli_enforces_bounds() {
    let cli = FormCli::try_parse_from(["credit-risk", "--pay-0", "-1", "--utilization", "1.5"]).unwrap();
    let p = cli.profile.into_profile().unwrap();
    assert_eq!(p.pay_0, -1);
    assert_eq!(p.utilization, 1.5);

    assert!(FormCli::try_parse_from(["credit-risk", "--age", "101"]).is_err());
    assert!(FormCli::try_parse_from(["credit-risk", "--education", "5"]).is_err());
    assert!(FormCli::try_parse_from(["credit-risk", "--limit-bal", "999"]).is_err());
    assert!(FormCli::try_parse_from(["credit-risk", "--pay-ratio", "1.01"]).is_err());
}

#[test]
fn missing_model_is_load_error() {
    let err = load_model(Path::new("nonexistent.onnx"), &ModelConfig::default())
        .err()
        .unwrap();
    assert!(matches!(err, ModelLoadError::Missing { .. }));
    assert!(err.to_string().contains("nonexistent.onnx"));
}

#[test]
fn corrupt_and_incompatible_artifacts() {
    let dir = tempfile::tempdir().unwrap();

    let corrupt = dir.path().join("model.json");
    std::fs::write(&corrupt, "{ broken").unwrap();
    let err = load_model(&corrupt, &ModelConfig::default()).err().unwrap();
    assert!(matches!(err, ModelLoadError::Corrupt { .. }));

    let mut swapped = logistic_artifact(0.0);
    swapped.feature_names.swap(0, 1);
    let path = write_json(dir.path(), "swapped.json", &swapped);
    let err = load_model(&path, &ModelConfig::default()).err().unwrap();
    assert!(matches!(err, ModelLoadError::Incompatible { .. }));

    let mut short = logistic_artifact(0.0);
    short.coefficients.pop();
    let path = write_json(dir.path(), "short.json", &short);
    let err = load_model(&path, &ModelConfig::default()).err().unwrap();
    assert!(matches!(err, ModelLoadError::Incompatible { .. }));

    let other = dir.path().join("model.pkl");
    std::fs::write(&other, b"\x80\x04").unwrap();
    let err = load_model(&other, &ModelConfig::default()).err().unwrap();
    assert!(matches!(err, ModelLoadError::UnsupportedFormat { .. }));
}

#[test]
fn garbage_onnx_artifact_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.onnx");
    std::fs::write(&path, b"not an onnx graph").unwrap();

    let result = std::panic::catch_unwind(|| load_model(&path, &ModelConfig::default()).err());
    let err = result
        .expect("loading must not panic")
        .expect("garbage graph must not load");
    // No runtime library: RuntimeUnavailable; runtime present: the graph is rejected.
    assert!(matches!(
        err,
        ModelLoadError::RuntimeUnavailable { .. } | ModelLoadError::Runtime { .. }
    ));
    assert_eq!(err.path(), path.as_path());
    assert!(err.to_string().contains("model.onnx"));
}

#[test]
fn logistic_model_scores() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(dir.path(), "model.json", &logistic_artifact(0.0));
    let model = load_model(&path, &ModelConfig::default()).unwrap();
    let fv = FeatureBuilder::new().build(&reference_profile());
    let [p0, p1] = model.predict_proba(&fv).unwrap();
    assert!((p1 - 0.5).abs() < 1e-12);
    assert!((p0 + p1 - 1.0).abs() < 1e-12);

    let mut weighted = logistic_artifact(-3.0);
    weighted.coefficients[Feature::Pay0.index()] = 1.0;
    let path = write_json(dir.path(), "weighted.json", &weighted);
    let model = load_model(&path, &ModelConfig::default()).unwrap();
    let base = FeatureBuilder::new().build(&reference_profile());
    let stressed = StressScenario::Recession.apply(&base);
    let [_, pb] = model.predict_proba(&base).unwrap();
    let [_, ps] = model.predict_proba(&stressed).unwrap();
    assert!(ps > pb);
}

#[test]
fn model_cache_loads_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_json(dir.path(), "model.json", &logistic_artifact(0.0));
    let cache = ModelCache::new();
    assert!(cache.get().is_none());

    let a = cache.get_or_load(&path, &ModelConfig::default()).unwrap();
    // Artifact gone: the cached instance is still served.
    std::fs::remove_file(&path).unwrap();
    let b = cache.get_or_load(&path, &ModelConfig::default()).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert!(cache.get().is_some());
}

#[test]
fn model_cache_does_not_keep_failures() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    let cache = ModelCache::new();
    assert!(cache.get_or_load(&path, &ModelConfig::default()).is_err());
    std::fs::write(&path, serde_json::to_string(&logistic_artifact(1.0)).unwrap()).unwrap();
    assert!(cache.get_or_load(&path, &ModelConfig::default()).is_ok());
}

#[test]
fn text_report_normal() {
    let report = Pipeline::new(RiskConfig::default())
        .assess(&ScenarioModel, &reference_profile(), Mode::Normal)
        .unwrap();
    let output = OutputConfig {
        color: false,
        progress_width: 20,
    };
    let mut buf = Vec::new();
    render_text(&report, &output, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.contains("5.00%"));
    assert!(text.contains("LOW (green)"));
    assert!(text.contains("$187.50"));
    assert!(text.contains("1.00x"));
    assert!(text.contains("[#...................]"));
    assert!(text.contains("SPENDING_VELOCITY"));
    assert!(text.contains(AUDIT_NOTE));
    assert!(!text.contains('\x1b'));
    assert!(!text.contains("(+"));
}

#[test]
fn text_report_stressed_shows_deltas() {
    let report = Pipeline::new(RiskConfig::default())
        .assess(&ScenarioModel, &reference_profile(), Mode::Stressed(StressScenario::Recession))
        .unwrap();
    let mut buf = Vec::new();
    render_text(&report, &OutputConfig::default(), &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.contains("12.00%"));
    assert!(text.contains("(+7.00%)"));
    assert!(text.contains("$585.00"));
    assert!(text.contains("(+$397.50)"));
    assert!(text.contains("MEDIUM"));
    assert!(text.contains("1.30x"));
    assert!(text.contains("recession"));
    assert!(text.contains("\x1b["));
}

#[test]
fn json_report() {
    let report = Pipeline::new(RiskConfig::default())
        .assess(&ScenarioModel, &reference_profile(), Mode::Stressed(StressScenario::Recession))
        .unwrap();
    let mut buf = Vec::new();
    render_json(&report, &mut buf).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(v["tier"], "MEDIUM");
    assert_eq!(v["color"], "orange");
    assert_eq!(v["mode"]["state"], "stressed");
    assert_eq!(v["mode"]["scenario"], "recession");
    assert_eq!(v["features"]["TOTAL_BILL_AMOUNT"], 6500.0);
    assert_eq!(v["base"]["tier"], "LOW");
    assert!(v["probability_delta"].as_f64().is_some());

    let normal = Pipeline::new(RiskConfig::default())
        .assess(&ScenarioModel, &reference_profile(), Mode::Normal)
        .unwrap();
    let mut buf = Vec::new();
    render_json(&normal, &mut buf).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(v["mode"]["state"], "normal");
    assert!(v.get("probability_delta").is_none());
    assert!(v.get("stressed").is_none());
}

#[test]
fn spending_velocity_helper_matches_builder() {
    let p = reference_profile();
    let fv = FeatureBuilder::new().build(&p);
    assert_eq!(
        fv.get(Feature::SpendingVelocity),
        spending_velocity(p.total_bill, p.avg_bill)
    );
}
