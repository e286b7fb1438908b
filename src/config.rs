//! # Configuration Module
//!
//! Optional `.headerport.toml` settings for the scan roots, extension lists,
//! limits and commit behavior. Command-line flags override anything set
//! here; anything left unset falls back to the built-in defaults.
//!
//! The config file is found via `--config`, the `HEADERPORT_CONFIG`
//! environment variable, or `.headerport.toml` in the current directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".headerport.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "HEADERPORT_CONFIG";

/// Default root of the ported (Slang) shader tree.
pub const DEFAULT_TARGET_ROOT: &str = ".";

/// Default root of the original (Cg/HLSL) shader tree.
pub const DEFAULT_SOURCE_ROOT: &str = "../common-shaders";

/// Default target extensions.
pub const DEFAULT_TARGET_EXTS: &[&str] = &[".slang", ".slangp"];

/// Default source extensions.
pub const DEFAULT_SOURCE_EXTS: &[&str] = &[".cg", ".cgp", ".hlsl"];

/// Default number of leading lines inspected per file.
pub const DEFAULT_HEAD_LINES: usize = 80;

/// Default cap on examined pairs.
pub const DEFAULT_MAX_PAIRS: usize = 30;

/// Default longest diff printed without truncation.
pub const DEFAULT_MAX_DIFF_LINES: usize = 200;

/// Default aggregate patch read by `apply`.
pub const DEFAULT_PATCH_FILE: &str = "tools/license_diffs_all.patch";

/// `[scan]` table.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ScanConfig {
  pub target_root: Option<PathBuf>,
  pub source_root: Option<PathBuf>,
  pub target_exts: Option<Vec<String>>,
  pub source_exts: Option<Vec<String>>,
  pub head_lines: Option<usize>,
  pub max_pairs: Option<usize>,
}

/// `[diff]` table.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DiffConfig {
  /// Longest diff printed in full on the console
  pub max_lines: Option<usize>,
}

/// `[commit]` table.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CommitConfig {
  /// Commit message for applied changes
  pub message: Option<String>,
  /// Set to `false` to leave applied changes uncommitted
  pub enabled: Option<bool>,
}

/// Main configuration struct, loaded from `.headerport.toml`.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
  #[serde(default)]
  pub scan: ScanConfig,

  #[serde(default)]
  pub diff: DiffConfig,

  #[serde(default)]
  pub commit: CommitConfig,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// A value is out of range.
  #[error("Invalid value for '{key}': {message}")]
  InvalidValue { key: String, message: String },
}

impl Config {
  /// Load configuration from a file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;
    Ok(config)
  }

  /// Checks that limits are positive and extension lists are not empty.
  fn validate(&self) -> Result<(), ConfigError> {
    let positive = [
      ("scan.head-lines", self.scan.head_lines),
      ("scan.max-pairs", self.scan.max_pairs),
      ("diff.max-lines", self.diff.max_lines),
    ];
    for (key, value) in positive {
      if value == Some(0) {
        return Err(ConfigError::InvalidValue {
          key: key.to_string(),
          message: "must be greater than zero".to_string(),
        });
      }
    }

    let lists = [
      ("scan.target-exts", &self.scan.target_exts),
      ("scan.source-exts", &self.scan.source_exts),
    ];
    for (key, list) in lists {
      if let Some(list) = list
        && list.iter().all(|ext| ext.trim().is_empty())
      {
        return Err(ConfigError::InvalidValue {
          key: key.to_string(),
          message: "must list at least one extension".to_string(),
        });
      }
    }

    if let Some(ref message) = self.commit.message
      && message.trim().is_empty()
    {
      return Err(ConfigError::InvalidValue {
        key: "commit.message".to_string(),
        message: "cannot be empty".to_string(),
      });
    }

    Ok(())
  }
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `HEADERPORT_CONFIG` environment variable
/// 3. `.headerport.toml` in `base_dir`
pub fn discover_config_path(explicit_path: Option<&Path>, base_dir: &Path) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    if path.exists() {
      verbose_log!("Using explicit config path: {}", path.display());
      return Some(path.to_path_buf());
    }
    verbose_log!("Explicit config path does not exist: {}", path.display());
    return None;
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  let local_config = base_dir.join(DEFAULT_CONFIG_FILENAME);
  if local_config.exists() {
    verbose_log!("Using config: {}", local_config.display());
    return Some(local_config);
  }

  verbose_log!("No config file found");
  None
}

/// Load configuration from the discovered path, or the defaults.
///
/// An explicit `--config` path that does not exist is an error.
pub fn load_config(explicit_path: Option<&Path>, base_dir: &Path, no_config: bool) -> Result<Config> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(Config::default());
  }

  if let Some(path) = explicit_path
    && !path.exists()
  {
    anyhow::bail!("Config file not found: {}", path.display());
  }

  match discover_config_path(explicit_path, base_dir) {
    Some(path) => Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display())),
    None => Ok(Config::default()),
  }
}
