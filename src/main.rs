//! E-Tongue - herb identification from LDR + pH sensor readings
//!
//! # Usage
//!
//! ```bash
//! # One analysis from the board on the default port
//! etongue analyze
//!
//! # Demo mode, no board attached
//! etongue analyze --synthetic
//!
//! # Keep the port open and analyze on demand
//! etongue interactive --port /dev/ttyUSB0
//!
//! # List serial ports / show the sample dataset / herb table
//! etongue ports
//! etongue dataset
//! etongue herbs
//! ```
//!
//! # Environment Variables
//!
//! - `ETONGUE_CONFIG`: Path to a TOML config file (default: ./etongue.toml)
//! - `ETONGUE_PORT`: Serial port override
//! - `RUST_LOG`: Logging level (default: info)
//!
//! Without a config file the classifier is read from
//! `data/herb_classifier.json`, so run from the repository root or set
//! `[model] path` in the config.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use etongue::acquisition::list_ports;
use etongue::config::{AcquisitionMode, AppConfig};
use etongue::model::load_tree_ensemble;
use etongue::{dataset, report, Classifier, Session};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "etongue")]
#[command(about = "E-Tongue herb identification from LDR and pH sensors")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML config file (overrides the standard search order)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Acquire one reading and classify it
    Analyze {
        #[command(flatten)]
        opts: AnalysisOpts,

        /// Print the result as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Keep a session open and analyze on demand (Enter = analyze, q = quit)
    Interactive {
        #[command(flatten)]
        opts: AnalysisOpts,
    },

    /// List serial ports visible to this host
    Ports,

    /// Show the sample dataset
    Dataset {
        /// CSV with LDR_Analog,pH,Herb columns (default: built-in samples)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Show the herb description table
    Herbs,

    /// Load the classifier and report what it expects
    CheckModel {
        #[arg(long)]
        model: Option<PathBuf>,
    },
}

/// Overrides shared by the analysis commands.
#[derive(Args, Debug)]
struct AnalysisOpts {
    /// Fabricate readings instead of reading the board
    #[arg(long)]
    synthetic: bool,

    /// Substitute a synthetic reading when the board sends nothing usable
    #[arg(long)]
    fallback: bool,

    /// Serial port (e.g. COM3, /dev/ttyACM0)
    #[arg(long, env = "ETONGUE_PORT")]
    port: Option<String>,

    #[arg(long)]
    baud: Option<u32>,

    /// Seconds to wait for a line from the board
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Classifier file
    #[arg(long)]
    model: Option<PathBuf>,
}

impl AnalysisOpts {
    fn apply(&self, config: &mut AppConfig) {
        if self.synthetic {
            config.acquisition.mode = AcquisitionMode::Synthetic;
        }
        if self.fallback {
            config.acquisition.fallback_to_synthetic = true;
        }
        if let Some(port) = &self.port {
            config.serial.port = port.clone();
        }
        if let Some(baud) = self.baud {
            config.serial.baud_rate = baud;
        }
        if let Some(timeout) = self.timeout {
            config.serial.read_timeout_secs = timeout;
        }
        if let Some(model) = &self.model {
            config.model.path = model.clone();
        }
    }
}

// ============================================================================
// Setup
// ============================================================================

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    match path {
        Some(p) => AppConfig::load_from_file(p)
            .with_context(|| format!("Failed to load config from {}", p.display())),
        None => Ok(AppConfig::load()),
    }
}

/// Build a session from config: load the classifier and, in device mode,
/// open the port. Failures are logged and left for `analyze` to report.
async fn open_session(config: AppConfig) -> Session {
    let mut session = Session::new(config);

    if let Err(e) = session.load_model() {
        warn!(error = %e, "Classification disabled until a valid model file is supplied");
    }

    if session.config().acquisition.mode == AcquisitionMode::Device {
        if let Err(e) = session.connect().await {
            warn!(error = %e, "Sensor board not connected");
        }
    }

    session
}

// ============================================================================
// Commands
// ============================================================================

async fn run_analyze(config: AppConfig, json: bool) -> Result<()> {
    let mut session = open_session(config).await;
    let outcome = session.analyze().await;
    session.disconnect().await;

    let result = outcome.context("Analysis failed")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", report::render_result(&result));
    }
    Ok(())
}

async fn run_interactive(config: AppConfig) -> Result<()> {
    let mut session = open_session(config).await;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("[Enter] analyze  [c] reconnect  [d] disconnect  [q] quit");
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" | "a" => match session.analyze().await {
                Ok(result) => print!("{}", report::render_result(&result)),
                Err(e) => println!("Error: {e}. Press Enter to retry."),
            },
            "c" => match session.connect().await {
                Ok(()) => println!("Connected to {}", session.config().serial.port),
                Err(e) => println!("Error: {e}"),
            },
            "d" => {
                session.disconnect().await;
                println!("Disconnected");
            }
            "q" => break,
            other => println!("Unknown command '{other}'"),
        }
    }

    session.disconnect().await;
    Ok(())
}

fn run_check_model(config: &AppConfig) -> Result<()> {
    let path = &config.model.path;
    let model = load_tree_ensemble(path)
        .with_context(|| format!("Failed to load classifier from {}", path.display()))?;

    print!("{}", report::render_model_summary(path, &model));
    if model.expected_features() > 2 {
        warn!(
            features = model.expected_features(),
            "Model expects more inputs than the rig measures; extra inputs are zero-filled"
        );
    }
    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    let mut config = load_config(args.config.as_ref())?;

    match args.command {
        Command::Analyze { opts, json } => {
            opts.apply(&mut config);
            config.validate()?;
            info!(mode = %config.acquisition.mode, "Starting analysis");
            run_analyze(config, json).await
        }
        Command::Interactive { opts } => {
            opts.apply(&mut config);
            config.validate()?;
            run_interactive(config).await
        }
        Command::Ports => {
            let ports = list_ports()?;
            print!("{}", report::render_ports(&ports));
            Ok(())
        }
        Command::Dataset { path } => {
            let path = path.or(config.dataset.path);
            let rows = dataset::load_or_demo(path.as_deref())?;
            print!("{}", report::render_dataset(&rows));
            Ok(())
        }
        Command::Herbs => {
            print!("{}", report::render_herbs());
            Ok(())
        }
        Command::CheckModel { model } => {
            if let Some(model) = model {
                config.model.path = model;
            }
            run_check_model(&config)
        }
    }
}
