//! Common test utilities for the mock agent.
//!
//! This module provides shared test infrastructure including:
//! - Builders for request and notification lines
//! - An in-process harness around `Responder`
//! - A handle on the spawned `mock-acp-agent` binary

#![allow(dead_code)]

use mock_acp_agent::config::{Mode, ResponderConfig};
use mock_acp_agent::responder::{Responder, RunSummary};
use serde_json::{json, Value};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

/// Serializes a request as one input line.
pub fn request(id: impl Into<Value>, method: &str, params: Value) -> String {
    let mut line = json!({
        "jsonrpc": "2.0",
        "id": id.into(),
        "method": method,
        "params": params,
    })
    .to_string();
    line.push('\n');
    line
}

/// Serializes a notification as one input line.
pub fn notification(method: &str, params: Value) -> String {
    let mut line = json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
    })
    .to_string();
    line.push('\n');
    line
}

/// Params of a `session/prompt` request with a single text block.
pub fn prompt_params(session_id: &str, text: &str) -> Value {
    json!({
        "sessionId": session_id,
        "prompt": [{"type": "text", "text": text}],
    })
}

/// What an in-process run produced.
pub struct RunOutput {
    /// Loop counters.
    pub summary: RunSummary,
    /// Every output line, parsed.
    pub messages: Vec<Value>,
}

impl RunOutput {
    /// Output messages that are responses (carry an `id`).
    pub fn responses(&self) -> Vec<&Value> {
        self.messages.iter().filter(|m| m.get("id").is_some()).collect()
    }

    /// Output messages that are notifications (no `id`).
    pub fn notifications(&self) -> Vec<&Value> {
        self.messages.iter().filter(|m| m.get("id").is_none()).collect()
    }
}

/// Runs a responder over `input` with the given config and collects output.
///
/// # Panics
///
/// Panics if the loop fails or emits anything that is not a JSON line.
pub async fn run_with_config(config: ResponderConfig, input: &str) -> RunOutput {
    let mut responder = Responder::new(config, input.as_bytes(), Vec::new());
    let summary = responder.run().await.expect("responder loop should not fail");

    let out = String::from_utf8(responder.into_writer()).expect("output should be UTF-8");
    let messages = out
        .lines()
        .map(|line| serde_json::from_str(line).expect("every output line should be JSON"))
        .collect();

    RunOutput { summary, messages }
}

/// Runs a responder in the given mode with default settings.
pub async fn run_in_mode(mode: Mode, input: &str) -> RunOutput {
    run_with_config(ResponderConfig::with_mode(mode), input).await
}

/// A spawned `mock-acp-agent` process with piped stdio.
pub struct AgentProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Lines<BufReader<ChildStdout>>,
}

impl AgentProcess {
    /// Spawns the binary with extra CLI arguments and environment.
    ///
    /// # Panics
    ///
    /// Panics if the process cannot be spawned.
    pub fn spawn(args: &[&str], envs: &[(&str, &str)]) -> Self {
        let mut command = Command::new(env!("CARGO_BIN_EXE_mock-acp-agent"));
        command
            .args(args)
            .env_remove("ACP_MOCK_MODE")
            .env_remove("ACP_MOCK_SLOW_DELAY_MS")
            .env_remove("ACP_MOCK_SESSION_ID")
            .env_remove("RUST_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in envs {
            command.env(key, value);
        }

        let mut child = command.spawn().expect("failed to spawn mock-acp-agent");
        let stdin = child.stdin.take().expect("stdin should be piped");
        let stdout = child.stdout.take().expect("stdout should be piped");

        Self {
            child,
            stdin: Some(stdin),
            stdout: BufReader::new(stdout).lines(),
        }
    }

    /// Writes raw input to the agent's stdin.
    ///
    /// # Panics
    ///
    /// Panics if stdin was closed or the write fails.
    pub async fn send(&mut self, input: &str) {
        let stdin = self.stdin.as_mut().expect("stdin already closed");
        stdin.write_all(input.as_bytes()).await.expect("write to agent");
        stdin.flush().await.expect("flush agent stdin");
    }

    /// Reads the next output line as JSON, or `None` at end of output.
    ///
    /// # Panics
    ///
    /// Panics on read errors or non-JSON output.
    pub async fn next_message(&mut self) -> Option<Value> {
        let line = self.stdout.next_line().await.expect("read agent stdout")?;
        Some(serde_json::from_str(&line).expect("agent output should be JSON"))
    }

    /// Closes the agent's stdin, signalling end of input.
    pub fn close_stdin(&mut self) {
        self.stdin.take();
    }

    /// Reads all remaining output lines.
    pub async fn drain(&mut self) -> Vec<Value> {
        let mut messages = Vec::new();
        while let Some(message) = self.next_message().await {
            messages.push(message);
        }
        messages
    }

    /// Waits for exit and returns the status with everything written to stderr.
    ///
    /// # Panics
    ///
    /// Panics if waiting on the process fails.
    pub async fn finish(mut self) -> (std::process::ExitStatus, String) {
        self.close_stdin();
        let output = self
            .child
            .wait_with_output()
            .await
            .expect("wait for mock-acp-agent");
        (output.status, String::from_utf8_lossy(&output.stderr).into_owned())
    }
}
