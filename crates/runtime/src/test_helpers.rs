//! Test helper utilities and mock implementations for the toolup CLI.
//!
//! This module provides capture and scripted implementations of the I/O
//! capabilities, plus `mockall` mocks for every capability trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use toolup_runtime::test_helpers::{TestInputProvider, TestOutputHandler};
//!
//! let output = Arc::new(TestOutputHandler::new());
//! let input = Arc::new(TestInputProvider::with_lines(["y"]));
//!
//! // Hand `output` and `input` to the code under test, then inspect
//! // `output.get_output()`.
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use mockall::mock;

use crate::deps::{HttpClient, InputProvider, OutputHandler};

/// Output capability that captures every delivered unit of text
#[derive(Default)]
pub struct TestOutputHandler {
    output: Mutex<Vec<String>>,
}

impl TestOutputHandler {
    /// Create an empty capture
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, one entry per call, in call order
    pub fn get_output(&self) -> Vec<String> {
        self.output.lock().unwrap().clone()
    }

    /// All delivered text joined together, as it would appear on a console
    pub fn get_text(&self) -> String {
        self.output.lock().unwrap().concat()
    }
}

#[async_trait]
impl OutputHandler for TestOutputHandler {
    async fn handle_output_line(&self, text: &str) -> Result<()> {
        self.output.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Input capability that replays a fixed script, then reports end-of-input
#[derive(Default)]
pub struct TestInputProvider {
    lines: Mutex<VecDeque<String>>,
    reads: Mutex<usize>,
}

impl TestInputProvider {
    /// Create a provider that is already exhausted
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a provider that answers with `lines`, one per read
    pub fn with_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: Mutex::new(lines.into_iter().map(Into::into).collect()),
            reads: Mutex::new(0),
        }
    }

    /// Number of reads performed, including the ones that hit end-of-input
    pub fn read_count(&self) -> usize {
        *self.reads.lock().unwrap()
    }

    /// Lines that have not been consumed yet
    pub fn remaining(&self) -> usize {
        self.lines.lock().unwrap().len()
    }
}

#[async_trait]
impl InputProvider for TestInputProvider {
    async fn read_line(&self) -> Result<Option<String>> {
        *self.reads.lock().unwrap() += 1;
        Ok(self.lines.lock().unwrap().pop_front())
    }
}

// Mock implementation of the `OutputHandler` trait for testing.
//
// Useful when a test needs delivery to fail.
//
// # Example
//
// ```rust
// use toolup_runtime::test_helpers::MockOutputHandlerMock;
//
// let mut output = MockOutputHandlerMock::new();
// output
//     .expect_handle_output_line()
//     .returning(|_| Err(anyhow::anyhow!("broken pipe")));
// ```
mock! {
    pub OutputHandlerMock {}

    #[async_trait]
    impl OutputHandler for OutputHandlerMock {
        async fn handle_output_line(&self, text: &str) -> Result<()>;
    }
}

// Mock implementation of the `InputProvider` trait for testing.
mock! {
    pub InputProviderMock {}

    #[async_trait]
    impl InputProvider for InputProviderMock {
        async fn read_line(&self) -> Result<Option<String>>;
    }
}

// Mock implementation of the `HttpClient` trait for testing.
//
// This mock allows you to simulate responses without making actual network
// calls. A mock with no expectations is a convenient stand-in wherever a
// client must be supplied but is never used.
mock! {
    pub HttpClientMock {}

    #[async_trait]
    impl HttpClient for HttpClientMock {
        async fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;
        async fn get_text(&self, url: &str) -> Result<String>;
    }
}
