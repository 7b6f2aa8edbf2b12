//! # Configuration Management
//!
//! Locates sprig's directories and loads the user configuration file, a small
//! TOML document describing which Jira site to talk to and how.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Represents the configuration directories for the sprig application
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
  pub data_dir: PathBuf,
  pub cache_dir: Option<PathBuf>,
}

impl ConfigDirs {
  pub fn new() -> Result<Self> {
    let proj_dirs = ProjectDirs::from("eddieland", "", "sprig").context("Failed to determine project directories")?;

    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
      data_dir: proj_dirs.data_dir().to_path_buf(),
      cache_dir: Some(proj_dirs.cache_dir().to_path_buf()),
    })
  }

  pub fn config_dir(&self) -> &PathBuf {
    &self.config_dir
  }

  pub fn data_dir(&self) -> &PathBuf {
    &self.data_dir
  }

  pub fn cache_dir(&self) -> Option<&PathBuf> {
    self.cache_dir.as_ref()
  }

  /// Path of the user configuration file
  pub fn config_path(&self) -> PathBuf {
    self.config_dir.join("config.toml")
  }

  pub fn load_config(&self) -> Result<SprigConfig> {
    SprigConfig::load(&self.config_path())
  }

  pub fn save_config(&self, config: &SprigConfig) -> Result<()> {
    config.save(&self.config_path())
  }
}

/// Get the configuration directories
pub fn get_config_dirs() -> Result<ConfigDirs> {
  ConfigDirs::new()
}

/// How the CLI authenticates against Jira
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
  /// Account e-mail and API token from .netrc
  #[default]
  Basic,
  /// Personal access token
  Bearer,
}

impl fmt::Display for AuthMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AuthMode::Basic => f.write_str("basic"),
      AuthMode::Bearer => f.write_str("bearer"),
    }
  }
}

impl FromStr for AuthMode {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "basic" => Ok(AuthMode::Basic),
      "bearer" => Ok(AuthMode::Bearer),
      other => Err(anyhow::anyhow!("Unknown auth mode '{other}'. Expected 'basic' or 'bearer'")),
    }
  }
}

/// Jira connection settings stored under `[jira]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraSettings {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub host: Option<String>,
  pub auth_mode: AuthMode,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub timeout_secs: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub connect_timeout_secs: Option<u64>,
}

/// The user configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprigConfig {
  pub jira: JiraSettings,
}

impl SprigConfig {
  /// Load the configuration at `path`, or the defaults when it does not exist
  pub fn load(path: &Path) -> Result<Self> {
    if !path.exists() {
      return Ok(Self::default());
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read config from {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config from {}", path.display()))
  }

  /// Render the configuration as it would be written to disk
  pub fn to_toml(&self) -> Result<String> {
    toml::to_string_pretty(self).context("Failed to serialize config to TOML")
  }

  pub fn save(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).with_context(|| format!("Failed to create config directory {}", parent.display()))?;
    }

    fs::write(path, self.to_toml()?).with_context(|| format!("Failed to write config to {}", path.display()))
  }
}
