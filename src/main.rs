//! autoscaler-config
//!
//! Validates, prints and watches cluster autoscaler configuration documents.
//!
//! ```text
//! autoscaler-config validate cluster.yaml        # report every defect, exit 1 if any
//! autoscaler-config show cluster.yaml            # normalized config as JSON
//! autoscaler-config watch cluster.yaml           # hot reload, keep last known-good
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;

use autoscaler_config::config::watcher::ConfigWatcher;
use autoscaler_config::config::{
    load_config_file, ConfigError, ConfigStore, DocumentFormat, LoadedConfig, ReloadOutcome,
    ReportEntry,
};
use autoscaler_config::lifecycle::signals::{SignalEvent, Signals};
use autoscaler_config::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "autoscaler-config", version)]
#[command(about = "Validate and watch cluster autoscaler configuration", long_about = None)]
struct Cli {
    /// Log level for this tool (overridden by RUST_LOG).
    #[arg(long, global = true, default_value = "info", env = "AUTOSCALER_CONFIG_LOG_LEVEL")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a document and report every error and warning
    Validate {
        #[arg(env = "AUTOSCALER_CONFIG")]
        file: PathBuf,

        /// Document format (inferred from the extension when omitted).
        #[arg(long)]
        format: Option<DocumentFormat>,

        #[arg(long, value_enum, default_value_t = Output::Text)]
        output: Output,
    },
    /// Print the normalized configuration as JSON
    Show {
        #[arg(env = "AUTOSCALER_CONFIG")]
        file: PathBuf,

        #[arg(long)]
        format: Option<DocumentFormat>,
    },
    /// Load a document, then reload it whenever it changes
    Watch {
        #[arg(env = "AUTOSCALER_CONFIG")]
        file: PathBuf,

        #[arg(long)]
        format: Option<DocumentFormat>,

        /// Serve Prometheus metrics on this address.
        #[arg(long)]
        metrics_address: Option<SocketAddr>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Output {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_json)?;

    match cli.command {
        Commands::Validate { file, format, output } => {
            let result = load_config_file(&file, format);
            let valid = result.is_ok();
            match output {
                Output::Text => print_text(&result),
                Output::Json => {
                    let entries = match &result {
                        Ok(loaded) => warning_entries(loaded),
                        Err(e) => error_entries(e),
                    };
                    let report = json!({ "valid": valid, "entries": entries });
                    println!("{}", serde_json::to_string_pretty(&report)?);
                }
            }
            if !valid {
                std::process::exit(1);
            }
        }
        Commands::Show { file, format } => match load_config_file(&file, format) {
            Ok(loaded) => println!("{}", serde_json::to_string_pretty(&loaded.config)?),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        },
        Commands::Watch {
            file,
            format,
            metrics_address,
        } => {
            if let Some(addr) = metrics_address {
                metrics::init_metrics(addr)?;
            }
            watch(file, format).await?;
        }
    }

    Ok(())
}

async fn watch(
    file: PathBuf,
    format: Option<DocumentFormat>,
) -> Result<(), Box<dyn std::error::Error>> {
    // The first load must succeed: there is no known-good configuration yet.
    let store = ConfigStore::open(&file, format)?;
    let (watcher, mut updates) = ConfigWatcher::new(&file, format);
    let _watcher = watcher.run()?;
    let mut signals = Signals::new()?;

    tracing::info!(
        path = %file.display(),
        cluster = %store.current().config.name,
        "Watching configuration"
    );

    loop {
        tokio::select! {
            Some(result) = updates.recv() => report_reload(store.apply(result)),
            event = signals.recv() => match event {
                SignalEvent::Reload => {
                    tracing::info!("SIGHUP received, reloading configuration");
                    report_reload(store.reload_from(&file, format));
                }
                SignalEvent::Shutdown => break,
            },
        }
    }

    tracing::info!(generation = store.generation(), "Shutdown complete");
    Ok(())
}

fn report_reload(outcome: Result<ReloadOutcome, ConfigError>) {
    // Failures are already logged by the store; print the full list for the operator.
    if let Err(ConfigError::Invalid(report)) = outcome {
        for entry in report.entries() {
            eprintln!("{}: {} ({})", entry.severity, entry.message, entry.kind);
        }
    }
}

fn print_text(result: &Result<LoadedConfig, ConfigError>) {
    match result {
        Ok(loaded) => {
            let config = &loaded.config;
            println!(
                "ok: cluster '{}' with {} pod type(s), maxWorkers {}",
                config.name,
                config.pod_types.len(),
                config.max_workers
            );
            for warning in &loaded.warnings {
                println!("warning: {warning}");
            }
        }
        Err(ConfigError::Invalid(report)) => {
            for entry in report.entries() {
                let location = if entry.path.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", entry.path)
                };
                println!("{}{}: {}", entry.severity, location, entry.message);
            }
        }
        Err(e) => println!("error: {e}"),
    }
}

fn warning_entries(loaded: &LoadedConfig) -> Vec<ReportEntry> {
    let report = autoscaler_config::config::ValidationReport {
        errors: Vec::new(),
        warnings: loaded.warnings.clone(),
    };
    report.entries()
}

fn error_entries(error: &ConfigError) -> Vec<ReportEntry> {
    match error {
        ConfigError::Invalid(report) => report.entries(),
        ConfigError::Parse(e) => vec![ReportEntry {
            severity: "error",
            kind: "parseError",
            subject: e.format.to_string(),
            message: e.to_string(),
            path: String::new(),
        }],
        ConfigError::Io { path, .. } => vec![ReportEntry {
            severity: "error",
            kind: "ioError",
            subject: "file".to_string(),
            message: error.to_string(),
            path: path.display().to_string(),
        }],
    }
}
