//! CLI subcommand handlers.

use crate::Commands;
use crate::ConfigAction;
use classeval_core::config::workspace_config_path;
use classeval_core::harness::train_timed;
use classeval_core::{
    Accumulators, BaselineKind, ConsoleReporter, Dataset, EvalConfig, OutcomeRecorder,
    PrecisionRecall, Reporter, TracingReporter, cross_validate, evaluate_lite, train_and_compare,
    train_and_test, write_dataset,
};
use std::io::Write;
use std::path::Path;

/// Handle a CLI subcommand.
///
/// Diagnostics go to stdout, except when stdout carries JSON; then they are
/// routed through `tracing` to stderr and the log file. `main` keeps INFO
/// visible on stderr for that route.
pub fn handle_command(command: Commands, workspace: &Path, config: EvalConfig) -> anyhow::Result<()> {
    let mut reporter: Box<dyn Reporter> = if emits_json(&command) {
        Box::new(TracingReporter)
    } else {
        Box::new(ConsoleReporter)
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(command, workspace, &config, reporter.as_mut(), &mut out)
}

/// Whether stdout is reserved for JSON output.
pub(crate) fn emits_json(command: &Commands) -> bool {
    matches!(
        command,
        Commands::Test { json: true, .. } | Commands::CrossValidate { json: true, .. }
    )
}

/// Dispatch with an injectable reporter and output stream.
fn run(
    command: Commands,
    workspace: &Path,
    config: &EvalConfig,
    reporter: &mut dyn Reporter,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match command {
        Commands::Test {
            train,
            test,
            classifier,
            json,
        } => {
            let kind = resolve_classifier(classifier.as_deref(), config)?;
            let train = load(&train)?;
            let test = load(&test)?;
            let stats: PrecisionRecall = train_and_test(
                || kind.build(),
                &train,
                &test,
                config.verbosity,
                reporter,
                Accumulators::none(),
            )?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&stats.full_stats())?)?;
            }
            Ok(())
        }
        Commands::Lite {
            train,
            test,
            classifier,
            explain,
        } => {
            let kind = resolve_classifier(classifier.as_deref(), config)?;
            let train = load(&train)?;
            let test = load(&test)?;
            let mut model = kind.build();
            train_timed(&mut model, &train, config.verbosity, reporter)?;
            let _: PrecisionRecall =
                evaluate_lite(&model, &test, explain || config.explain, reporter)?;
            Ok(())
        }
        Commands::Compare {
            train,
            test,
            first,
            second,
        } => {
            let first: BaselineKind = first.parse()?;
            let second: BaselineKind = second.parse()?;
            let train = load(&train)?;
            let test = load(&test)?;
            let comparison = train_and_compare(
                || first.build(),
                || second.build(),
                &train,
                &test,
                config.verbosity,
                reporter,
            )?;
            tracing::info!(
                first = %first,
                second = %second,
                samples = comparison.samples,
                divergences = comparison.divergences.len(),
                "comparison finished"
            );
            writeln!(
                out,
                "{first} vs {second}: {} agreements, {} divergences",
                comparison.agreements(),
                comparison.divergences.len()
            )?;
            Ok(())
        }
        Commands::CrossValidate {
            data,
            folds,
            seed,
            classifier,
            json,
        } => {
            let kind = resolve_classifier(classifier.as_deref(), config)?;
            let folds = folds.unwrap_or(config.folds);
            let dataset = load(&data)?.shuffled(seed.unwrap_or(config.seed));
            let result = cross_validate(|| kind.build(), &dataset, folds, config.verbosity, reporter)?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
            }
            Ok(())
        }
        Commands::WriteDataset { data, separator } => {
            let dataset = load(&data)?;
            let separator = separator.as_deref().unwrap_or(&config.separator);
            write_dataset(&dataset, separator, out)?;
            Ok(())
        }
        Commands::Config { action } => handle_config(action, workspace, config, out),
    }
}

fn handle_config(
    action: ConfigAction,
    workspace: &Path,
    config: &EvalConfig,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_path = workspace_config_path(workspace);
            if config_path.exists() {
                writeln!(
                    out,
                    "Configuration file already exists at: {}",
                    config_path.display()
                )?;
                return Ok(());
            }
            if let Some(dir) = config_path.parent() {
                std::fs::create_dir_all(dir)?;
            }

            let toml_str = toml::to_string_pretty(&EvalConfig::default())?;
            std::fs::write(&config_path, &toml_str)?;
            writeln!(
                out,
                "Created default configuration at: {}",
                config_path.display()
            )?;
            Ok(())
        }
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(config)?;
            writeln!(out, "{}", toml_str)?;
            Ok(())
        }
    }
}

fn resolve_classifier(name: Option<&str>, config: &EvalConfig) -> anyhow::Result<BaselineKind> {
    match name {
        Some(name) => Ok(name.parse()?),
        None => Ok(config.classifier),
    }
}

fn load(path: &Path) -> anyhow::Result<Dataset> {
    Dataset::load(path).map_err(|e| anyhow::anyhow!("Failed to load dataset: {}", e))
}
