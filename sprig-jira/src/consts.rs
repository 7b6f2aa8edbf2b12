//! Constants for the sprig-jira dispatcher.

use std::time::Duration;

/// User-Agent header value for the Jira API client
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Whole-request timeout applied when a context does not set one
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Header Jira requires on multipart uploads to bypass its XSRF check
pub const ATLASSIAN_TOKEN_HEADER: &str = "x-atlassian-token";
