//! Runtime abstractions for the toolup CLI
//!
//! This crate contains the capability traits that the rest of the CLI routes
//! its input, output and network access through, together with the production
//! network client and the configuration constants shared across crates.

/// Configuration constants and environment overrides
pub mod config;
/// Capability traits and production implementations
pub mod deps;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

// Re-export commonly used types at the crate root
pub use config::{
    DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_TERMINAL_WIDTH, HTTP_TIMEOUT_ENV_VAR, PROMPT_SEPARATOR,
    SHELL_ENV_VAR, USER_AGENT_PREFIX,
};
pub use deps::{HttpClient, InputProvider, OutputHandler, RealHttpClient};
