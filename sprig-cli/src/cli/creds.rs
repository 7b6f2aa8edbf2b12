//! # Credentials Command
//!
//! Reports whether the `.netrc` file holds usable Jira credentials and,
//! optionally, whether Jira accepts them.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use sprig_core::creds::netrc::{get_netrc_path, has_secure_permissions};
use sprig_core::creds::{ATLASSIAN_FALLBACK_MACHINE, get_jira_credentials, home_dir, is_atlassian_cloud_host, normalize_host};
use sprig_core::output::{format_command, format_path};
use sprig_core::{print_error, print_info, print_success, print_warning, resolve_jira_base_url};

use crate::clients::{ConnectionOptions, create_jira_runtime_and_client};

/// Command for credential management
#[derive(Args)]
pub struct CredsArgs {
  /// The subcommand to execute
  #[command(subcommand)]
  pub subcommand: CredsSubcommands,
}

/// Subcommands for the creds command
#[derive(Subcommand)]
pub enum CredsSubcommands {
  /// Check if credentials are properly configured
  #[command(long_about = "Checks that your .netrc file exists, is private, and contains\n\
                      credentials for the configured Jira host (or the shared\n\
                      'atlassian.net' entry). With --verify, also asks Jira whether\n\
                      it accepts them.")]
  Check {
    /// Call Jira to confirm the credentials work
    #[arg(long)]
    verify: bool,
  },
}

/// Handle the creds command
pub(crate) fn handle_creds_command(creds: CredsArgs, connection: &ConnectionOptions) -> Result<()> {
  match creds.subcommand {
    CredsSubcommands::Check { verify } => handle_check_command(connection, verify),
  }
}

fn handle_check_command(connection: &ConnectionOptions, verify: bool) -> Result<()> {
  let home = home_dir()?;
  let netrc_path = get_netrc_path(&home);
  let config = sprig_core::get_config_dirs()?.load_config()?;

  if !netrc_path.exists() {
    print_error("No .netrc file found.");
    println!(
      "Create a .netrc file at {} with your credentials.",
      format_path(&netrc_path.display().to_string())
    );
    print_example();
    return Ok(());
  }

  if has_secure_permissions(&netrc_path)? {
    print_success(".netrc file has secure permissions.");
  } else {
    print_warning("Your .netrc file has insecure permissions.");
    println!(
      "For security, change permissions to 600: {}",
      format_command(&format!("chmod 600 {}", netrc_path.display()))
    );
  }

  let host = match resolve_jira_base_url(connection.host.as_deref(), &config.jira) {
    Ok(base_url) => normalize_host(&base_url),
    Err(_) => {
      print_warning("No Jira host configured; checking the shared atlassian.net entry only.");
      ATLASSIAN_FALLBACK_MACHINE.to_string()
    }
  };

  match get_jira_credentials(&home, &host) {
    Ok(Some(creds)) => print_success(&format!("Jira credentials found for {host} (login {}).", creds.username)),
    Ok(None) => {
      print_warning(&format!("No Jira credentials found for {host}."));
      if is_atlassian_cloud_host(&host) {
        println!("Add credentials for machine '{host}' or '{ATLASSIAN_FALLBACK_MACHINE}' to your .netrc file.");
      } else {
        println!("Add credentials for machine '{host}' to your .netrc file.");
      }
      print_example();
      return Ok(());
    }
    Err(e) => {
      print_error(&format!("Error checking Jira credentials: {e}"));
      return Ok(());
    }
  }

  if verify {
    print_info("Verifying credentials with Jira...");
    let (rt, client) = create_jira_runtime_and_client(connection)?;
    let accepted = rt
      .block_on(client.test_connection())
      .context("Could not reach Jira to verify credentials")?;
    if accepted {
      print_success("Jira accepted the credentials.");
    } else {
      anyhow::bail!("Jira rejected the credentials for {host}");
    }
  }

  Ok(())
}

fn print_example() {
  print_info("Example .netrc format:");
  println!("```");
  println!("machine {ATLASSIAN_FALLBACK_MACHINE}");
  println!("  login your-email@example.com");
  println!("  password your-api-token");
  println!("```");
}
