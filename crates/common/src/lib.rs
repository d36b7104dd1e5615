//! Shared building blocks for the toolup CLI
//!
//! The centerpiece is [`CoreContext`], the single object every command routes
//! its output, prompts and environment lookups through. The remaining modules
//! provide what the context is built from: terminal width detection, text
//! wrapping and the build's identity (version and CPU architecture).

/// Run-scoped context mediating all user-facing I/O
pub mod context;
/// CPU architecture the binary was built for
pub mod platform;
/// Terminal width detection
pub mod terminal;
/// Version of the tool
pub mod version;
/// Text reflow to a column limit
pub mod wrap;

pub use context::{CONFIRMATION_GUIDANCE, CoreContext, user_agent};
pub use platform::Architecture;
pub use terminal::{ConsoleWidthProbe, FixedWidthProbe, TerminalWidthProbe, terminal_width};
pub use version::{Version, VersionParseError};
pub use wrap::wrap;
