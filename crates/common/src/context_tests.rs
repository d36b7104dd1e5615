//! Tests for the core context

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use rstest::rstest;
use toolup_runtime::deps::{InputProvider, OutputHandler};
use toolup_runtime::test_helpers::{
    MockHttpClientMock, MockInputProviderMock, MockOutputHandlerMock, TestInputProvider,
    TestOutputHandler,
};

use super::*;
use crate::terminal::FixedWidthProbe;

const LONG_MESSAGE: &str = "Downloading the toolchain archive and its detached signature, then \
     verifying the signature against the trusted keyring before anything is extracted into \
     the installation directory.";

struct TestFixture {
    output: Arc<TestOutputHandler>,
    input: Arc<TestInputProvider>,
    width: Option<usize>,
}

impl TestFixture {
    fn new() -> Self {
        Self {
            output: Arc::new(TestOutputHandler::new()),
            input: Arc::new(TestInputProvider::new()),
            width: Some(80),
        }
    }

    fn with_input(mut self, lines: &[&str]) -> Self {
        self.input = Arc::new(TestInputProvider::with_lines(lines.iter().copied()));
        self
    }

    fn with_width(mut self, width: Option<usize>) -> Self {
        self.width = width;
        self
    }

    fn to_context(&self) -> CoreContext {
        CoreContext::with_http_client(Arc::new(MockHttpClientMock::new()))
            .with_output_handler(self.output.clone())
            .with_input_provider(self.input.clone())
            .with_width_probe(Arc::new(FixedWidthProbe(self.width)))
    }
}

// Records output and input in the order they happen
#[derive(Default)]
struct Transcript {
    events: Mutex<Vec<String>>,
}

#[async_trait]
impl OutputHandler for Transcript {
    async fn handle_output_line(&self, text: &str) -> Result<()> {
        self.events.lock().unwrap().push(format!("out:{text}"));
        Ok(())
    }
}

#[async_trait]
impl InputProvider for Transcript {
    async fn read_line(&self) -> Result<Option<String>> {
        self.events.lock().unwrap().push("in".to_string());
        Ok(Some("toolup".to_string()))
    }
}

#[tokio::test]
async fn test_print_delivers_wrapped_text_to_handler() {
    let fixture = TestFixture::new().with_width(Some(10));
    let ctx = fixture.to_context();

    ctx.print("The quick brown fox", None).await.unwrap();

    assert_eq!(fixture.output.get_output(), vec!["The quick\nbrown fox"]);
}

#[tokio::test]
async fn test_print_appends_terminator_as_one_unit() {
    let fixture = TestFixture::new();
    let ctx = fixture.to_context();

    ctx.print("Installed", Some("\n")).await.unwrap();
    ctx.print("Step 1", Some(" ... ")).await.unwrap();

    assert_eq!(fixture.output.get_output(), vec!["Installed\n", "Step 1 ... "]);
}

#[tokio::test]
async fn test_print_empty_message() {
    let fixture = TestFixture::new();
    let ctx = fixture.to_context();

    ctx.print("", None).await.unwrap();
    ctx.print("", Some("\n")).await.unwrap();

    assert_eq!(fixture.output.get_output(), vec!["", "\n"]);
}

#[tokio::test]
async fn test_print_preserves_call_order() {
    let fixture = TestFixture::new();
    let ctx = fixture.to_context();

    for step in ["resolve", "download", "verify", "extract"] {
        ctx.print(step, Some("\n")).await.unwrap();
    }

    assert_eq!(
        fixture.output.get_output(),
        vec!["resolve\n", "download\n", "verify\n", "extract\n"]
    );
}

#[rstest]
#[case(None)]
#[case(Some(0))]
#[tokio::test]
async fn test_print_without_width_matches_default(#[case] reported: Option<usize>) {
    let unknown = TestFixture::new().with_width(reported);
    let explicit = TestFixture::new().with_width(Some(80));

    unknown.to_context().print(LONG_MESSAGE, None).await.unwrap();
    explicit.to_context().print(LONG_MESSAGE, None).await.unwrap();

    assert_eq!(unknown.output.get_output(), explicit.output.get_output());
    assert!(unknown.output.get_text().contains('\n'));
}

#[tokio::test]
async fn test_print_propagates_handler_failure() {
    let mut output = MockOutputHandlerMock::new();
    output
        .expect_handle_output_line()
        .times(1)
        .returning(|_| Err(anyhow::anyhow!("broken pipe")));

    let ctx = CoreContext::with_http_client(Arc::new(MockHttpClientMock::new()))
        .with_output_handler(Arc::new(output))
        .with_width_probe(Arc::new(FixedWidthProbe(Some(80))));

    let err = ctx.print("hello", None).await.unwrap_err();
    assert!(err.to_string().contains("broken pipe"));
}

#[tokio::test]
async fn test_clones_share_capabilities() {
    let fixture = TestFixture::new();
    let ctx = fixture.to_context();
    let cloned = ctx.clone();

    ctx.print("from original", None).await.unwrap();
    cloned.print("from clone", None).await.unwrap();

    assert_eq!(
        fixture.output.get_output(),
        vec!["from original", "from clone"]
    );
}

#[tokio::test]
async fn test_read_line_prints_prompt_before_reading() {
    let transcript = Arc::new(Transcript::default());
    let ctx = CoreContext::with_http_client(Arc::new(MockHttpClientMock::new()))
        .with_output_handler(transcript.clone())
        .with_input_provider(transcript.clone())
        .with_width_probe(Arc::new(FixedWidthProbe(Some(80))));

    let line = ctx.read_line("Project name").await.unwrap();

    assert_eq!(line.as_deref(), Some("toolup"));
    assert_eq!(
        *transcript.events.lock().unwrap(),
        vec!["out:Project name: \n".to_string(), "in".to_string()]
    );
}

#[tokio::test]
async fn test_read_line_returns_provider_result_unchanged() {
    let fixture = TestFixture::new().with_input(&["  Mixed Case  "]);
    let ctx = fixture.to_context();

    let line = ctx.read_line("Name").await.unwrap();

    assert_eq!(line.as_deref(), Some("  Mixed Case  "));
}

#[tokio::test]
async fn test_read_line_end_of_input() {
    let fixture = TestFixture::new();
    let ctx = fixture.to_context();

    assert_eq!(ctx.read_line("Name").await.unwrap(), None);
    assert_eq!(fixture.output.get_output(), vec!["Name: \n"]);
}

#[tokio::test]
async fn test_read_line_propagates_provider_failure() {
    let mut input = MockInputProviderMock::new();
    input
        .expect_read_line()
        .times(1)
        .returning(|| Err(anyhow::anyhow!("stdin closed unexpectedly")));

    let ctx = TestFixture::new()
        .to_context()
        .with_input_provider(Arc::new(input));

    assert!(ctx.read_line("Name").await.is_err());
}

#[rstest]
#[case(true, &[""], true)]
#[case(true, &["n"], false)]
#[case(true, &["Y"], true)]
#[case(true, &["y"], true)]
#[case(true, &["N"], false)]
#[case(false, &[""], false)]
#[case(false, &["y"], true)]
#[case(false, &["n"], false)]
#[case(true, &[], true)]
#[case(false, &[], false)]
#[tokio::test]
async fn test_confirmation_answers(
    #[case] default_behavior: bool,
    #[case] answers: &[&str],
    #[case] expected: bool,
) {
    let fixture = TestFixture::new().with_input(answers);
    let ctx = fixture.to_context();

    let confirmed = ctx.prompt_for_confirmation(default_behavior).await.unwrap();

    assert_eq!(confirmed, expected);
    assert_eq!(fixture.input.read_count(), 1);
}

#[tokio::test]
async fn test_confirmation_prompt_format() {
    let fixture = TestFixture::new().with_input(&["", ""]);
    let ctx = fixture.to_context();

    ctx.prompt_for_confirmation(true).await.unwrap();
    ctx.prompt_for_confirmation(false).await.unwrap();

    assert_eq!(
        fixture.output.get_output(),
        vec!["Proceed? (Y/n): \n", "Proceed? (y/N): \n"]
    );
}

#[tokio::test]
async fn test_confirmation_reprompts_on_invalid_answer() {
    let fixture = TestFixture::new().with_input(&["x", "y"]);
    let ctx = fixture.to_context();

    let confirmed = ctx.prompt_for_confirmation(true).await.unwrap();

    assert!(confirmed);
    assert_eq!(fixture.input.read_count(), 2);
    assert_eq!(
        fixture.output.get_output(),
        vec!["Proceed? (Y/n): \n", CONFIRMATION_GUIDANCE, "Proceed? (Y/n): \n"]
    );
}

#[tokio::test]
async fn test_confirmation_keeps_asking_until_valid() {
    let fixture = TestFixture::new().with_input(&["yes", "no", " y", "N"]);
    let ctx = fixture.to_context();

    let confirmed = ctx.prompt_for_confirmation(true).await.unwrap();

    assert!(!confirmed);
    assert_eq!(fixture.input.read_count(), 4);
    let guidance = fixture
        .output
        .get_output()
        .into_iter()
        .filter(|unit| unit == CONFIRMATION_GUIDANCE)
        .count();
    assert_eq!(guidance, 3);
}

#[tokio::test]
async fn test_confirmation_invalid_then_end_of_input_uses_default() {
    let fixture = TestFixture::new().with_input(&["maybe"]);
    let ctx = fixture.to_context();

    assert!(!ctx.prompt_for_confirmation(false).await.unwrap());
    assert_eq!(fixture.input.read_count(), 2);
}

#[test]
fn test_home_dir_override() {
    let ctx = TestFixture::new()
        .to_context()
        .with_home_dir("/tmp/toolup-home");

    assert_eq!(ctx.home_dir(), Some(PathBuf::from("/tmp/toolup-home")));
}

#[test]
fn test_home_dir_defaults_to_platform() {
    let ctx = TestFixture::new().to_context();

    assert_eq!(ctx.home_dir(), dirs::home_dir());
}

#[test]
fn test_shell_override() {
    let ctx = TestFixture::new().to_context().with_shell("/bin/zsh");

    assert_eq!(ctx.shell().as_deref(), Some("/bin/zsh"));
}

#[test]
fn test_current_directory_defaults_to_process() {
    let ctx = TestFixture::new().to_context();

    assert_eq!(ctx.current_directory, std::env::current_dir().unwrap());

    let ctx = ctx.with_current_directory("/srv/project");
    assert_eq!(ctx.current_directory, PathBuf::from("/srv/project"));
}

#[test]
fn test_terminal_width_uses_probe() {
    let ctx = TestFixture::new().with_width(Some(42)).to_context();
    assert_eq!(ctx.terminal_width(), 42);

    let ctx = ctx.with_width_probe(Arc::new(FixedWidthProbe(None)));
    assert_eq!(ctx.terminal_width(), 80);
}

#[test]
fn test_user_agent() {
    assert_eq!(
        user_agent(),
        format!(
            "toolup/{} ({})",
            env!("CARGO_PKG_VERSION"),
            std::env::consts::ARCH
        )
    );
}
