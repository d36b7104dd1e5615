use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use toolup_runtime::config::{self, PROMPT_SEPARATOR, SHELL_ENV_VAR, USER_AGENT_PREFIX};
use toolup_runtime::deps::{HttpClient, InputProvider, OutputHandler, RealHttpClient};

use crate::platform::Architecture;
use crate::terminal::{ConsoleWidthProbe, TerminalWidthProbe, terminal_width};
use crate::version::Version;
use crate::wrap::wrap;

/// Printed when a confirmation answer is not recognized
pub const CONFIRMATION_GUIDANCE: &str =
    "Please input either \"y\" or \"n\", or press ENTER to use the default.";

/// User agent sent with every request, e.g. `toolup/0.1.0 (x86_64)`
pub fn user_agent() -> String {
    format!(
        "{}/{} ({})",
        USER_AGENT_PREFIX,
        Version::CURRENT,
        Architecture::CURRENT
    )
}

/// Run-scoped context that every command routes its I/O through.
///
/// Output goes to the injected [`OutputHandler`] when one is set and to stdout
/// otherwise; input likewise comes from the [`InputProvider`] or stdin. The
/// context is cheap to clone and clones share the same capabilities.
#[derive(Clone)]
pub struct CoreContext {
    /// Overrides the platform home directory
    pub mocked_home_dir: Option<PathBuf>,
    /// Directory commands resolve relative paths against
    pub current_directory: PathBuf,
    /// Overrides shell detection
    pub mocked_shell: Option<String>,
    /// Network client used by commands
    pub http_client: Arc<dyn HttpClient>,
    /// Destination for output; stdout when `None`
    pub output_handler: Option<Arc<dyn OutputHandler>>,
    /// Source of input; stdin when `None`
    pub input_provider: Option<Arc<dyn InputProvider>>,
    /// Source of the terminal width used for wrapping
    pub width_probe: Arc<dyn TerminalWidthProbe>,
}

impl CoreContext {
    /// Context for a real run: console I/O and the production HTTP client
    pub fn new() -> Result<Self> {
        let http_client = RealHttpClient::new(&user_agent(), config::http_timeout())?;
        Ok(Self::with_http_client(Arc::new(http_client)))
    }

    /// Context using console I/O and the given network client
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            mocked_home_dir: None,
            current_directory: process_current_directory(),
            mocked_shell: None,
            http_client,
            output_handler: None,
            input_provider: None,
            width_probe: Arc::new(ConsoleWidthProbe),
        }
    }

    /// Send output to `handler` instead of stdout
    #[must_use]
    pub fn with_output_handler(mut self, handler: Arc<dyn OutputHandler>) -> Self {
        self.output_handler = Some(handler);
        self
    }

    /// Read input from `provider` instead of stdin
    #[must_use]
    pub fn with_input_provider(mut self, provider: Arc<dyn InputProvider>) -> Self {
        self.input_provider = Some(provider);
        self
    }

    /// Replace the terminal width probe
    #[must_use]
    pub fn with_width_probe(mut self, probe: Arc<dyn TerminalWidthProbe>) -> Self {
        self.width_probe = probe;
        self
    }

    /// Override the home directory
    #[must_use]
    pub fn with_home_dir(mut self, home_dir: impl Into<PathBuf>) -> Self {
        self.mocked_home_dir = Some(home_dir.into());
        self
    }

    /// Override the working directory
    #[must_use]
    pub fn with_current_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.current_directory = directory.into();
        self
    }

    /// Override the shell
    #[must_use]
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.mocked_shell = Some(shell.into());
        self
    }

    /// The user's home directory, honoring the override
    pub fn home_dir(&self) -> Option<PathBuf> {
        self.mocked_home_dir.clone().or_else(dirs::home_dir)
    }

    /// The user's shell, honoring the override before consulting `$SHELL`
    pub fn shell(&self) -> Option<String> {
        self.mocked_shell.clone().or_else(|| {
            std::env::var(SHELL_ENV_VAR)
                .ok()
                .filter(|shell| !shell.is_empty())
        })
    }

    /// Width output is currently wrapped to
    pub fn terminal_width(&self) -> usize {
        terminal_width(self.width_probe.as_ref())
    }

    /// Print `message` wrapped to the terminal width.
    ///
    /// On the console a missing `terminator` means a newline. An output
    /// handler receives the wrapped text and terminator as a single unit,
    /// with a missing terminator treated as empty.
    pub async fn print(&self, message: &str, terminator: Option<&str>) -> Result<()> {
        let width = self.terminal_width();
        let wrapped = if message.is_empty() {
            message.to_string()
        } else {
            wrap(message, width)
        };

        match &self.output_handler {
            Some(handler) => {
                let unit = format!("{wrapped}{}", terminator.unwrap_or_default());
                handler.handle_output_line(&unit).await
            }
            None => write_console(&wrapped, terminator),
        }
    }

    /// Show `prompt` and read one line of input.
    ///
    /// Returns `None` once input is exhausted.
    pub async fn read_line(&self, prompt: &str) -> Result<Option<String>> {
        self.print(prompt, Some(PROMPT_SEPARATOR)).await?;

        match &self.input_provider {
            Some(provider) => provider.read_line().await,
            None => read_console_line().await,
        }
    }

    /// Ask the user to confirm, returning `default_behavior` for an empty answer.
    ///
    /// Unrecognized answers are met with guidance and the question is asked
    /// again, with no limit on attempts. Exhausted input counts as the default.
    pub async fn prompt_for_confirmation(&self, default_behavior: bool) -> Result<bool> {
        let options = if default_behavior { "(Y/n)" } else { "(y/N)" };
        let prompt = format!("Proceed? {options}");

        loop {
            let answer = match self.read_line(&prompt).await? {
                Some(line) => line.to_lowercase(),
                None if default_behavior => "y".to_string(),
                None => "n".to_string(),
            };

            match answer.as_str() {
                "" => return Ok(default_behavior),
                "y" => return Ok(true),
                "n" => return Ok(false),
                other => {
                    tracing::debug!(answer = other, "Unrecognized confirmation answer");
                    self.print(CONFIRMATION_GUIDANCE, None).await?;
                }
            }
        }
    }
}

fn process_current_directory() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|e| {
        tracing::warn!("Failed to read current directory, using '.': {}", e);
        PathBuf::from(".")
    })
}

fn write_console(text: &str, terminator: Option<&str>) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    match terminator {
        Some(terminator) => write!(stdout, "{text}{terminator}")?,
        None => writeln!(stdout, "{text}")?,
    }
    stdout.flush()?;
    Ok(())
}

async fn read_console_line() -> Result<Option<String>> {
    tokio::task::spawn_blocking(|| -> Result<Option<String>> {
        let mut line = String::new();
        if std::io::stdin().read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(len);
        Ok(Some(line))
    })
    .await?
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
