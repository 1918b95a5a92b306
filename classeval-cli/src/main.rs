//! classeval CLI: train, test and compare classifiers on labeled datasets.

mod commands;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// classeval: train/test evaluation for multi-label classifiers
#[derive(Parser, Debug)]
#[command(name = "classeval", version, about, long_about = None)]
struct Cli {
    /// Workspace directory (holds `.classeval/config.toml`)
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress diagnostics; only errors are shown
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Train a baseline on one dataset and evaluate it on another
    Test {
        /// Training dataset (JSON array or JSON lines)
        #[arg(long)]
        train: PathBuf,
        /// Test dataset
        #[arg(long)]
        test: PathBuf,
        /// Baseline classifier (majority, memorize)
        #[arg(long)]
        classifier: Option<String>,
        /// Print the full statistics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Train, then list every test sample the classifier gets wrong
    Lite {
        #[arg(long)]
        train: PathBuf,
        #[arg(long)]
        test: PathBuf,
        #[arg(long)]
        classifier: Option<String>,
        /// Include the classifier's explanations in mismatch lines
        #[arg(long)]
        explain: bool,
    },
    /// Train two baselines and report where they disagree
    Compare {
        #[arg(long)]
        train: PathBuf,
        #[arg(long)]
        test: PathBuf,
        /// First classifier
        #[arg(long)]
        first: String,
        /// Second classifier
        #[arg(long)]
        second: String,
    },
    /// K-fold cross-validation with micro and macro averages
    CrossValidate {
        /// Dataset to split into folds
        #[arg(long)]
        data: PathBuf,
        /// Number of folds
        #[arg(long)]
        folds: Option<usize>,
        /// Shuffle seed
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        classifier: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Print a dataset as a JSON array, one sample per line
    WriteDataset {
        #[arg(long)]
        data: PathBuf,
        /// Text written after every sample but the last
        #[arg(long)]
        separator: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Create default configuration file
    Init,
    /// Show current configuration
    Show,
}

/// Level filter for the stderr layer.
///
/// When stdout carries JSON the evaluator diagnostics travel as INFO events,
/// so INFO stays visible unless `-q` was given.
fn stderr_filter(verbose: u8, quiet: bool, json_output: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 if json_output => "info",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Set up tracing: human-readable stderr + JSON file logging
    let filter = stderr_filter(cli.verbose, cli.quiet, commands::emits_json(&cli.command));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    let log_dir = directories::ProjectDirs::from("dev", "classeval", "classeval")
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."));
    let _ = std::fs::create_dir_all(&log_dir);
    let file_appender = tracing_appender::rolling::daily(&log_dir, "classeval.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let mut config = classeval_core::load_config(Some(&workspace), cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    // Apply CLI overrides
    if cli.quiet {
        config.verbosity = 0;
    } else if cli.verbose > 0 {
        config.verbosity = cli.verbose.saturating_add(1).min(3);
    }

    commands::handle_command(cli.command, &workspace, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_filter_levels() {
        assert_eq!(stderr_filter(0, true, false), "error");
        assert_eq!(stderr_filter(0, false, false), "warn");
        assert_eq!(stderr_filter(1, false, false), "info");
        assert_eq!(stderr_filter(3, false, false), "trace");
    }

    #[test]
    fn test_json_output_keeps_info_on_stderr() {
        assert_eq!(stderr_filter(0, false, true), "info");
        assert_eq!(stderr_filter(2, false, true), "debug");
        assert_eq!(stderr_filter(0, true, true), "error");
    }

    #[test]
    fn test_json_flag_selects_tracing_route() {
        let cli = Cli::parse_from([
            "classeval",
            "cross-validate",
            "--data",
            "all.json",
            "--json",
        ]);
        assert!(commands::emits_json(&cli.command));
        let filter = stderr_filter(cli.verbose, cli.quiet, commands::emits_json(&cli.command));
        assert_eq!(filter, "info");
    }
}
