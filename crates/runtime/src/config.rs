//! Centralized configuration for the toolup CLI
//!
//! This module provides a single source of truth for the fixed values used by
//! the I/O layer and the network client.
//!
//! # Environment Variables
//!
//! The following environment variables can be used to override defaults:
//! - `TOOLUP_HTTP_TIMEOUT_SECS`: Override the HTTP request timeout
//! - `SHELL`: Consulted when no shell override is configured

use std::time::Duration;

/// Column count used when the terminal width cannot be determined
pub const DEFAULT_TERMINAL_WIDTH: usize = 80;

/// Terminator appended to every prompt emitted by `read_line`
pub const PROMPT_SEPARATOR: &str = ": \n";

/// Environment variable consulted for the user's shell
pub const SHELL_ENV_VAR: &str = "SHELL";

/// Environment variable name for overriding the HTTP timeout
pub const HTTP_TIMEOUT_ENV_VAR: &str = "TOOLUP_HTTP_TIMEOUT_SECS";

/// Default HTTP timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Product token used at the start of the HTTP user agent
pub const USER_AGENT_PREFIX: &str = "toolup";

/// Resolve the HTTP timeout from the environment.
pub fn http_timeout() -> Duration {
    parse_http_timeout(std::env::var(HTTP_TIMEOUT_ENV_VAR).ok().as_deref())
}

/// Parse a timeout override, ignoring values that are not a positive number of seconds.
pub fn parse_http_timeout(value: Option<&str>) -> Duration {
    let secs = value
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
    Duration::from_secs(secs)
}
