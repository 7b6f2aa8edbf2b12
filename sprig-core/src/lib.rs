//! # Sprig Core Library
//!
//! Configuration, credential discovery, URL handling and terminal output
//! shared by the sprig command-line tool. The Jira dispatcher itself lives in
//! `sprig-jira` and reads none of this; the CLI turns it into an execution
//! context.

pub mod config;
pub mod creds;
pub mod output;
pub mod url;

pub use config::{AuthMode, ConfigDirs, JiraSettings, SprigConfig, get_config_dirs};
pub use creds::{Credentials, get_jira_credentials};
pub use output::{ColorMode, print_error, print_info, print_success, print_warning};
pub use url::{ENV_JIRA_HOST, ensure_url_scheme, resolve_jira_base_url};
