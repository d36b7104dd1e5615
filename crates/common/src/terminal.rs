//! Terminal width detection
//!
//! The raw query is isolated behind [`TerminalWidthProbe`] so nothing above
//! this module depends on how (or whether) the platform reports a size.

use console::Term;
use toolup_runtime::config::DEFAULT_TERMINAL_WIDTH;

/// Source of the current terminal column count
pub trait TerminalWidthProbe: Send + Sync {
    /// Column count reported by the environment, if it reported one
    fn columns(&self) -> Option<usize>;
}

/// Production probe that asks the terminal attached to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleWidthProbe;

impl TerminalWidthProbe for ConsoleWidthProbe {
    fn columns(&self) -> Option<usize> {
        Term::stdout()
            .size_checked()
            .map(|(_rows, columns)| usize::from(columns))
    }
}

/// Probe that always reports the same answer, for embedding and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedWidthProbe(pub Option<usize>);

impl TerminalWidthProbe for FixedWidthProbe {
    fn columns(&self) -> Option<usize> {
        self.0
    }
}

/// Current terminal width, falling back to [`DEFAULT_TERMINAL_WIDTH`].
///
/// The probe is consulted on every call since the terminal may have been
/// resized in between.
pub fn terminal_width(probe: &dyn TerminalWidthProbe) -> usize {
    match probe.columns() {
        Some(columns) if columns > 0 => columns,
        reported => {
            tracing::debug!(
                ?reported,
                "Terminal width unavailable, using {}",
                DEFAULT_TERMINAL_WIDTH
            );
            DEFAULT_TERMINAL_WIDTH
        }
    }
}
