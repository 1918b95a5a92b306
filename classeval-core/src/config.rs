//! Configuration for evaluation runs.
//!
//! Uses `figment` for layered configuration: defaults -> user config file ->
//! workspace config file -> environment -> explicit overrides.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::baselines::BaselineKind;
use crate::error::EvalResult;

/// Settings shared by every CLI subcommand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Diagnostic verbosity: 0 silent, 1 summaries, 2 per-sample, 3 full stats.
    #[serde(default = "default_verbosity")]
    pub verbosity: u8,
    /// Number of folds for cross-validation.
    #[serde(default = "default_folds")]
    pub folds: usize,
    /// Seed for the dataset shuffle before cross-validation.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Separator written between samples by `write-dataset`.
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Baseline classifier used when none is named on the command line.
    #[serde(default)]
    pub classifier: BaselineKind,
    /// Ask classifiers for explanations in lite evaluation. Comparisons
    /// request them from verbosity alone (`> 1`).
    #[serde(default)]
    pub explain: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            verbosity: default_verbosity(),
            folds: default_folds(),
            seed: default_seed(),
            separator: default_separator(),
            classifier: BaselineKind::default(),
            explain: false,
        }
    }
}

fn default_verbosity() -> u8 {
    1
}

fn default_folds() -> usize {
    5
}

fn default_seed() -> u64 {
    42
}

fn default_separator() -> String {
    ",".to_string()
}

fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "classeval", "classeval")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Workspace-local config location: `<workspace>/.classeval/config.toml`.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".classeval").join("config.toml")
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit config file (`--config`)
/// 2. Environment variables (prefixed with `CLASSEVAL_`)
/// 3. Workspace-local config (`.classeval/config.toml`)
/// 4. User config (`~/.config/classeval/config.toml`)
/// 5. Built-in defaults
pub fn load_config(workspace: Option<&Path>, explicit: Option<&Path>) -> EvalResult<EvalConfig> {
    let mut figment = Figment::from(Serialized::defaults(EvalConfig::default()));

    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    figment = figment.merge(Env::prefixed("CLASSEVAL_").split("__"));

    if let Some(path) = explicit {
        figment = figment.merge(Toml::file(path));
    }

    Ok(figment.extract()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvalConfig::default();
        assert_eq!(config.verbosity, 1);
        assert_eq!(config.folds, 5);
        assert_eq!(config.separator, ",");
        assert_eq!(config.classifier, BaselineKind::Majority);
        assert!(!config.explain);
    }

    #[test]
    fn test_load_from_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let path = workspace_config_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(
            &path,
            r#"
folds = 10
classifier = "memorize"
"#,
        )
        .unwrap();

        let config = load_config(Some(dir.path()), None).unwrap();
        assert_eq!(config.folds, 10);
        assert_eq!(config.classifier, BaselineKind::Memorize);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_explicit_file_wins_over_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let ws = workspace_config_path(dir.path());
        std::fs::create_dir_all(ws.parent().unwrap()).unwrap();
        std::fs::write(&ws, "seed = 1\n").unwrap();
        let explicit = dir.path().join("run.toml");
        std::fs::write(&explicit, "seed = 7\nexplain = true\n").unwrap();

        let config = load_config(Some(dir.path()), Some(&explicit)).unwrap();
        assert_eq!(config.seed, 7);
        assert!(config.explain);
    }

    #[test]
    fn test_bad_value_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("bad.toml");
        std::fs::write(&explicit, "classifier = \"svm\"\n").unwrap();
        let err = load_config(None, Some(&explicit)).unwrap_err();
        assert!(matches!(err, crate::error::EvalError::Config(_)));
    }
}
