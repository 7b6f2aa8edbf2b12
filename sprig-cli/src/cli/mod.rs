//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for the sprig tool:
//! raw endpoint calls, catalog browsing, credential checks and
//! configuration.

mod call;
mod config;
mod creds;
mod endpoints;

use anyhow::Result;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Args, Parser, Subcommand};
use sprig_core::ColorMode;

use crate::clients::ConnectionOptions;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// Top-level CLI command for the sprig tool
#[derive(Parser)]
#[command(name = "sprig")]
#[command(display_name = "🌱 Sprig")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Call any Jira REST endpoint from the command line")]
#[command(
  long_about = "Sprig sends Jira REST API requests through one shared dispatcher.\n\n\
        Every catalogued endpoint can be called by name with path parameters,\n\
        query parameters and a body. Results are printed as JSON, text, or\n\
        written to a file for binary downloads."
)]
#[command(version = VERSION)]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages (one line per request)\n\
             -vvv: Show trace level messages (header names and query pairs)"
  )]
  pub verbose: u8,

  /// Controls when colored output is used
  #[arg(
    long,
    value_enum,
    ignore_case = true,
    global = true,
    default_value_t = ColorMode::Auto,
  )]
  pub colors: ColorMode,

  #[command(flatten)]
  pub connection: ConnectionArgs,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Global flags that decide where and how requests are sent
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
  /// Jira site, e.g. mycompany.atlassian.net (overrides $JIRA_HOST and the config file)
  #[arg(long, global = true, value_name = "URL")]
  pub host: Option<String>,

  /// Request timeout in seconds
  #[arg(long, global = true, value_name = "SECS")]
  pub timeout: Option<u64>,

  /// Authenticate with this bearer token instead of .netrc credentials
  #[arg(long, global = true, value_name = "TOKEN", env = "SPRIG_BEARER_TOKEN", hide_env_values = true)]
  pub bearer_token: Option<String>,
}

impl From<ConnectionArgs> for ConnectionOptions {
  fn from(args: ConnectionArgs) -> Self {
    ConnectionOptions {
      host: args.host,
      timeout_secs: args.timeout,
      bearer_token: args.bearer_token,
    }
  }
}

/// Subcommands for the sprig tool
#[derive(Subcommand)]
pub enum Commands {
  /// Call a catalogued Jira endpoint
  #[command(long_about = "Dispatch one catalogued Jira endpoint.\n\n\
            Path parameters fill the endpoint's {placeholders}; query parameters may be\n\
            repeated to send a list. Bodies are given as JSON (--data, --data-file),\n\
            plain text (--text) or files to upload (--file).\n\n\
            Examples:\n  \
            sprig call get_issue -p issueIdOrKey=PROJ-1 -q fields=summary -q fields=status\n  \
            sprig call add_comment -p issueIdOrKey=PROJ-1 --data '{\"body\": {...}}'\n  \
            sprig call get_attachment_content -p id=10001 -H 'Accept: */*' --output file.png")]
  #[command(alias = "c")]
  Call(call::CallArgs),

  /// List catalogued endpoints
  #[command(long_about = "List the Jira endpoints sprig knows about.\n\n\
            Use --group to show one area of the API and --filter to search names,\n\
            paths and summaries.")]
  #[command(alias = "ls")]
  Endpoints(endpoints::EndpointsArgs),

  /// Credential management
  #[command(long_about = "Check the Jira credentials stored in your .netrc file.\n\n\
            Credentials are looked up for the configured Jira host first, then for\n\
            the shared 'atlassian.net' machine entry.")]
  #[command(arg_required_else_help = true)]
  Creds(creds::CredsArgs),

  /// Show or change the configuration file
  #[command(arg_required_else_help = true)]
  Config(config::ConfigArgs),
}

pub fn handle_cli(cli: Cli) -> Result<()> {
  cli.colors.apply();

  let connection: ConnectionOptions = cli.connection.into();
  match cli.command {
    Commands::Call(call) => call::handle_call_command(call, &connection),
    Commands::Endpoints(endpoints) => endpoints::handle_endpoints_command(endpoints),
    Commands::Creds(creds) => creds::handle_creds_command(creds, &connection),
    Commands::Config(config) => config::handle_config_command(config),
  }
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn test_cli_definition_is_valid() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
      "sprig",
      "endpoints",
      "--host",
      "acme.atlassian.net",
      "--timeout",
      "5",
      "-vv",
    ])
    .unwrap();

    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.connection.host.as_deref(), Some("acme.atlassian.net"));
    assert_eq!(cli.connection.timeout, Some(5));
  }

  #[test]
  fn test_version_includes_git_hash() {
    assert!(VERSION.starts_with(env!("CARGO_PKG_VERSION")));
    assert!(VERSION.contains(env!("GIT_HASH")));
  }
}
