use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::Cli;

/// Directory checked when no path is given anywhere.
pub const DEFAULT_TARGET: &str = ".github/workflows";

/// What to do after a file fails to parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failure; later files are not attempted.
    FailFast,
    /// Check every file, then fail if any of them was broken.
    CollectAll,
}

pub struct Config {
    pub target: PathBuf,
    pub policy: FailurePolicy,
}

/// Config file schema (`~/.config/yamlcheck/config.yaml`).
#[derive(serde::Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    path: Option<PathBuf>,
    collect_all: Option<bool>,
}

impl Config {
    pub fn load(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                if !path.is_file() {
                    bail!("Config file '{}' does not exist", path.display());
                }
                read_config_file(path)?
            }
            None => match config_file_path() {
                Some(path) if path.is_file() => read_config_file(&path)?,
                _ => ConfigFile::default(),
            },
        };

        Ok(Self::merge(cli, file))
    }

    // Priority: CLI flag > env var (handled by clap) > config file > default.
    fn merge(cli: &Cli, file: ConfigFile) -> Self {
        let target = cli
            .path
            .clone()
            .or(file.path)
            .unwrap_or_else(|| Path::new(".").join(DEFAULT_TARGET));

        let collect_all = cli.collect_all || file.collect_all.unwrap_or(false);
        let policy = if collect_all {
            FailurePolicy::CollectAll
        } else {
            FailurePolicy::FailFast
        };

        Config { target, policy }
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    debug!(path = %path.display(), "loading config file");
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read config file '{}'", path.display()))?;
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    // A comment-only file is an empty document, i.e. null.
    let file: Option<ConfigFile> = serde_yaml::from_str(&content)
        .with_context(|| format!("Invalid config file '{}'", path.display()))?;
    Ok(file.unwrap_or_default())
}

fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("yamlcheck").join("config.yaml"))
}
