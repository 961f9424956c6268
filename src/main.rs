//! Credit risk entrypoint: loads the model once, scores one borrower profile,
//! optionally under a stress scenario, and prints the report.

use clap::{Parser, ValueEnum};
use credit_risk::{
    config::AppConfig,
    input::ProfileArgs,
    logging::StructuredLogger,
    model,
    pipeline::{Mode, Pipeline},
    report::{render_json, render_text},
    stress::StressScenario,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "credit-risk")]
#[command(version, about = "Score a borrower's probability of default and expected loss")]
struct Cli {
    #[command(flatten)]
    profile: ProfileArgs,

    /// Score under the stress scenario and show deltas against the base case
    #[arg(long)]
    stress: bool,

    /// Stress scenario applied with --stress
    #[arg(long, value_enum, default_value_t = StressScenario::Recession)]
    scenario: StressScenario,

    /// Model artifact (.onnx or .json); overrides the config file
    #[arg(long, value_name = "FILE")]
    model: Option<PathBuf>,

    /// Config file (default: $CREDIT_RISK_CONFIG_PATH or config.json)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Disable ANSI colour in text output
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    let (mut config, config_warning) = AppConfig::load(&config_path);
    if let Some(path) = cli.model.clone() {
        config.model_path = path;
    }
    if cli.no_color {
        config.output.color = false;
    }

    StructuredLogger::init(config.log.json, &config.log.level);
    if let Some(reason) = config_warning {
        tracing::warn!(path = %config_path.display(), %reason, "config ignored; using defaults");
    }
    info!(config = %config_path.display(), model = %config.model_path.display(), "credit-risk starting");

    let classifier = match model::global_cache().get_or_load(&config.model_path, &config.model) {
        Ok(m) => m,
        Err(e) => {
            tracing::error!(error = %e, "model load failed");
            eprintln!(
                "error: could not load the risk model: {e}. Make sure '{}' is available.",
                e.path().display()
            );
            std::process::exit(1);
        }
    };

    let profile = cli.profile.into_profile()?;
    let mode = Mode::from_toggle(cli.stress, cli.scenario);
    let report = Pipeline::new(config.risk.clone()).assess(classifier.as_ref(), &profile, mode)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Text => render_text(&report, &config.output, &mut out)?,
        OutputFormat::Json => render_json(&report, &mut out)?,
    }
    Ok(())
}
