//! Reference host for the Timeflow controller.
//!
//! Replays a session script against a simulated game clock so the
//! controller can be exercised end to end without a game attached.
//!
//! ```text
//! timeflow-host [--json] [SCRIPT]
//! ```
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `TIMEFLOW_CONFIG` or `timeflow-config.yaml`
//! 2. Initialize structured logging (tracing) at the configured level
//! 3. Load the session script (default `scripts/demo-day.yaml`)
//! 4. Replay the script, printing notices to stdout
//! 5. Log the result

mod error;
mod output;
mod runner;
mod script;
mod sim_clock;

use std::io::Write;
use std::path::{Path, PathBuf};

use timeflow_core::config::TimeflowConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::HostError;
use crate::output::ConsoleNotifier;
use crate::runner::Host;
use crate::script::Script;

/// Environment variable naming the config file.
const CONFIG_PATH_ENV: &str = "TIMEFLOW_CONFIG";

/// Config file used when `TIMEFLOW_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "timeflow-config.yaml";

/// Script replayed when none is given on the command line.
const DEFAULT_SCRIPT_PATH: &str = "scripts/demo-day.yaml";

/// Command-line options.
#[derive(Debug, Default)]
struct Args {
    json: bool,
    script: Option<PathBuf>,
}

impl Args {
    fn parse(args: impl Iterator<Item = String>) -> Self {
        let mut parsed = Self::default();
        for arg in args {
            if arg == "--json" {
                parsed.json = true;
            } else {
                parsed.script = Some(PathBuf::from(arg));
            }
        }
        parsed
    }
}

/// Application entry point for the host.
///
/// # Errors
///
/// Returns an error if the configuration or script cannot be loaded, or
/// if output cannot be flushed.
#[tokio::main]
async fn main() -> Result<(), HostError> {
    let args = Args::parse(std::env::args().skip(1));

    // 1. Load configuration.
    let config_path = std::env::var(CONFIG_PATH_ENV)
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, found) = load_config(&config_path)?;

    // 2. Initialize structured logging. Logs go to stderr so stdout stays
    //    clean for notices.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("timeflow-host starting");
    if found {
        info!(
            path = %config_path.display(),
            location_notify = config.location_notify,
            interval_step_ms = config.interval_step_ms,
            festival_days = config.festival_days.len(),
            "Configuration loaded"
        );
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }

    // 3. Load the script.
    let script_path = args
        .script
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPT_PATH));
    let script = Script::from_file(&script_path)?;
    info!(
        path = %script_path.display(),
        steps = script.steps.len(),
        frame_interval_ms = script.frame_interval_ms,
        "Script loaded"
    );

    // 4. Replay.
    let notifier = ConsoleNotifier::new(std::io::stdout().lock(), args.json);
    let mut host = Host::new(config, config_path, &script, notifier);
    let summary = host.run(&script).await;

    // 5. Log results.
    info!(
        auto_cause = %host.controller().auto_cause(),
        manual_override = %host.controller().manual_override(),
        rescale_enabled = host.controller().rescale_enabled(),
        end_time = %summary.time,
        "timeflow-host shutdown complete"
    );
    host.into_notifier().into_inner().flush()?;

    Ok(())
}

/// Load configuration, falling back to defaults when the file is missing.
///
/// Returns whether the file was found.
fn load_config(path: &Path) -> Result<(TimeflowConfig, bool), HostError> {
    if path.exists() {
        Ok((TimeflowConfig::from_file(path)?, true))
    } else {
        let mut config = TimeflowConfig::default();
        config.apply_env_overrides();
        Ok((config, false))
    }
}
