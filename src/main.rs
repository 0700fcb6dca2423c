use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use jointwatch::config::{MemorySettings, OutputSettings, Settings};
use jointwatch::runner::{run_cycle, run_until};
use jointwatch_sdk::JointDiagnostics;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "jointwatch")]
#[command(about = "Poll robot joint sensors and publish joint health diagnostics")]
struct Args {
    /// TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read joint values from a JSON memory dump
    #[arg(short, long, conflicts_with = "simulate")]
    memory_file: Option<PathBuf>,

    /// Use the simulated robot
    #[arg(long)]
    simulate: bool,

    /// Output target: stdout, file:<path> or tcp:<host:port> (repeatable)
    #[arg(short, long)]
    output: Vec<OutputSettings>,

    /// Poll interval (e.g., "1s", "500ms")
    #[arg(short, long)]
    interval: Option<String>,

    /// Temperature in °C at which a joint is in error
    #[arg(short, long)]
    error_level: Option<f32>,

    /// Run a single cycle and exit: 0 healthy, 1 unhealthy, 2 failed
    #[arg(long)]
    once: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Command-line flags take precedence over file and environment settings.
    fn apply(&self, settings: &mut Settings) {
        if let Some(path) = &self.memory_file {
            settings.memory = MemorySettings::File { path: path.clone() };
        }
        if self.simulate {
            settings.memory = MemorySettings::Simulated;
        }
        if !self.output.is_empty() {
            settings.outputs = self.output.clone();
        }
        if let Some(interval) = &self.interval {
            settings.interval = interval.clone();
        }
        if let Some(level) = self.error_level {
            settings.temperature_error_level = level;
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr so stdout stays clean for diagnostic arrays.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let mut settings = Settings::load(args.config.as_deref()).with_context(|| match &args.config {
        Some(path) => format!("Failed to load settings from {}", path.display()),
        None => "Failed to load settings".to_string(),
    })?;
    args.apply(&mut settings);

    let interval = settings.interval()?;
    let source = settings.memory.to_source();
    let outputs = settings.outputs();
    info!(
        "Monitoring {} joints from {}, publishing to {}",
        settings.joints.len(),
        source.description(),
        outputs
            .iter()
            .map(|o| o.describe())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let mut diagnostics = JointDiagnostics::connect(
        &source,
        outputs,
        settings.joints.clone(),
        settings.temperature_error_level,
    );

    if args.once {
        return Ok(run_cycle(&mut diagnostics).exit_code());
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    // Ctrl-C errors only if the handler cannot be installed; stop in that case too.
    rt.block_on(run_until(&mut diagnostics, interval, async {
        let _ = tokio::signal::ctrl_c().await;
    }));

    Ok(ExitCode::SUCCESS)
}
