//! # Config Command
//!
//! Shows and edits the sprig configuration file.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use sprig_core::output::format_path;
use sprig_core::{AuthMode, SprigConfig, ensure_url_scheme, get_config_dirs, print_info, print_success};

/// Command for configuration management
#[derive(Args)]
pub struct ConfigArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: ConfigSubcommands,
}

/// Subcommands for the config command
#[derive(Subcommand)]
pub enum ConfigSubcommands {
  /// Print the configuration file location and contents
  Show,

  /// Change one or more settings
  #[command(arg_required_else_help = true)]
  Set(SetArgs),
}

/// Settings accepted by `sprig config set`
#[derive(Args, Debug, Clone, Default)]
pub struct SetArgs {
  /// Jira site, e.g. mycompany.atlassian.net
  #[arg(long, value_name = "URL")]
  pub host: Option<String>,

  /// Request timeout in seconds
  #[arg(long, value_name = "SECS")]
  pub timeout: Option<u64>,

  /// Connect timeout in seconds
  #[arg(long, value_name = "SECS")]
  pub connect_timeout: Option<u64>,

  /// How the .netrc password is sent
  #[arg(long, value_enum, ignore_case = true)]
  pub auth_mode: Option<AuthMode>,
}

/// Handle the config command
pub(crate) fn handle_config_command(config: ConfigArgs) -> Result<()> {
  let dirs = get_config_dirs()?;
  let path = dirs.config_path();

  match config.subcommand {
    ConfigSubcommands::Show => {
      let current = dirs.load_config()?;
      print_info(&format!("Configuration file: {}", format_path(&path.display().to_string())));
      if !path.exists() {
        println!("(not created yet; showing defaults)");
      }
      print!("{}", current.to_toml()?);
      Ok(())
    }
    ConfigSubcommands::Set(set) => {
      let mut current = dirs.load_config()?;
      apply_settings(&mut current, set)?;
      dirs.save_config(&current)?;
      print_success(&format!("Saved {}", format_path(&path.display().to_string())));
      Ok(())
    }
  }
}

fn apply_settings(config: &mut SprigConfig, set: SetArgs) -> Result<()> {
  if let Some(host) = set.host {
    config.jira.host = Some(ensure_url_scheme(&host)?);
  }
  if let Some(timeout) = set.timeout {
    if timeout == 0 {
      bail!("--timeout must be at least 1 second");
    }
    config.jira.timeout_secs = Some(timeout);
  }
  if let Some(connect_timeout) = set.connect_timeout {
    if connect_timeout == 0 {
      bail!("--connect-timeout must be at least 1 second");
    }
    config.jira.connect_timeout_secs = Some(connect_timeout);
  }
  if let Some(auth_mode) = set.auth_mode {
    config.jira.auth_mode = auth_mode;
  }
  Ok(())
}
