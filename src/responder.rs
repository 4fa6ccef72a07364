//! The session responder: read a line, dispatch it, write what it produced.
//!
//! # Message Flow
//!
//! 1. Read one line from the client
//! 2. Skip it if blank or malformed (nothing is written back)
//! 3. Dispatch by method name; `session/prompt` also by [`Mode`]
//! 4. Write any `session/update` notifications the handler produced
//! 5. Write exactly one response if the message was a request
//! 6. Stop after `shutdown`, otherwise repeat until input ends
//!
//! Processing is strictly sequential. The slow-mode stall blocks the whole
//! loop, and the next line is not read until the current handler returns,
//! so a stalled prompt cannot be interrupted.
//!
//! # Example
//!
//! ```no_run
//! use mock_acp_agent::config::ResponderConfig;
//! use mock_acp_agent::responder::Responder;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let stdin = tokio::io::BufReader::new(tokio::io::stdin());
//!     let stdout = tokio::io::stdout();
//!     let mut responder = Responder::new(ResponderConfig::default(), stdin, stdout);
//!     let summary = responder.run().await?;
//!     println!("{summary:?}");
//!     Ok(())
//! }
//! ```

use crate::acp::{
    self, method, InitializeResult, NewSessionResult, PromptResult, Status, StatusResult,
    StopReason,
};
use crate::config::{Mode, ResponderConfig};
use crate::error::{ResponderError, ResponderResult};
use crate::framing::{Frame, LineReader, LineWriter};
use crate::protocol::{IncomingMessage, JsonRpcError, JsonRpcNotification, JsonRpcResponse};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{debug, info};

/// Where the session is in its advertised lifecycle.
///
/// Tracked for diagnostics only. The responder is permissive: no call is
/// ever rejected because it arrived in the "wrong" phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Nothing received yet.
    #[default]
    Uninitialized,
    /// `initialize` answered, or the last session was ended.
    Ready,
    /// `session/new` answered.
    SessionOpen,
    /// `shutdown` processed; the loop stops.
    Shutdown,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionPhase::Uninitialized => "uninitialized",
            SessionPhase::Ready => "ready",
            SessionPhase::SessionOpen => "session_open",
            SessionPhase::Shutdown => "shutdown",
        };
        f.write_str(name)
    }
}

/// Why [`Responder::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopCause {
    /// The input stream ended.
    #[default]
    EndOfInput,
    /// A `shutdown` message was processed.
    Shutdown,
}

/// Counters for one run of the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Why the loop ended.
    pub stop: StopCause,
    /// Lines read, including skipped ones.
    pub lines_read: usize,
    /// Requests dispatched.
    pub requests: usize,
    /// Notifications dispatched.
    pub notifications: usize,
    /// Blank lines, malformed lines and inbound responses.
    pub skipped: usize,
}

/// Outcome of a handler, before it is tied to a request id.
enum Reply {
    Success(Value),
    Failure(JsonRpcError),
}

impl Reply {
    fn success<T: Serialize>(result: &T) -> ResponderResult<Self> {
        serde_json::to_value(result)
            .map(Reply::Success)
            .map_err(|e| ResponderError::serialize("response", e))
    }

    fn into_response(self, id: Value) -> JsonRpcResponse {
        match self {
            Reply::Success(result) => JsonRpcResponse::success(id, result),
            Reply::Failure(error) => JsonRpcResponse::new_error(id, error),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Scripted agent serving one session over a line-delimited stream pair.
pub struct Responder<R, W> {
    config: ResponderConfig,
    reader: LineReader<R>,
    writer: LineWriter<W>,
    phase: SessionPhase,
}

impl<R, W> Responder<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Creates a responder reading requests from `reader` and writing
    /// responses and notifications to `writer`.
    pub fn new(config: ResponderConfig, reader: R, writer: W) -> Self {
        Self {
            config,
            reader: LineReader::new(reader),
            writer: LineWriter::new(writer),
            phase: SessionPhase::Uninitialized,
        }
    }

    /// Returns the configuration this responder was built with.
    pub fn config(&self) -> &ResponderConfig {
        &self.config
    }

    /// Returns the current session phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Consumes the responder and returns the output writer.
    pub fn into_writer(self) -> W {
        self.writer.into_inner()
    }

    /// Runs the loop until `shutdown` is processed or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error only if reading, writing or encoding fails. Bad
    /// input never ends the loop.
    pub async fn run(&mut self) -> ResponderResult<RunSummary> {
        let mut summary = RunSummary::default();

        while let Some(frame) = self.reader.next_frame().await? {
            summary.lines_read += 1;

            let message = match frame {
                Frame::Blank => {
                    summary.skipped += 1;
                    continue;
                }
                Frame::Malformed(reason) => {
                    debug!("skipping malformed line: {reason}");
                    summary.skipped += 1;
                    continue;
                }
                Frame::Message(message) => message,
            };

            match &message {
                IncomingMessage::Request { .. } => summary.requests += 1,
                IncomingMessage::Notification { .. } => summary.notifications += 1,
                IncomingMessage::Response { id } => {
                    debug!(%id, "ignoring response to a request the agent never sent");
                    summary.skipped += 1;
                    continue;
                }
            }

            if self.handle_message(message).await? == Flow::Stop {
                summary.stop = StopCause::Shutdown;
                break;
            }
        }

        Ok(summary)
    }

    async fn handle_message(&mut self, message: IncomingMessage) -> ResponderResult<Flow> {
        let (id, name, params) = match message {
            IncomingMessage::Request { id, method, params } => (Some(id), method, params),
            IncomingMessage::Notification { method, params } => (None, method, params),
            IncomingMessage::Response { .. } => return Ok(Flow::Continue),
        };

        debug!(method = %name, id = ?id, phase = %self.phase, "dispatching");
        let reply = self.dispatch(&name, &params).await?;

        match id {
            Some(id) => {
                self.writer.send("response", &reply.into_response(id)).await?;
            }
            // Notifications are never answered, whatever the handler said.
            None => debug!(method = %name, "handled notification without response"),
        }

        if name == method::SHUTDOWN {
            Ok(Flow::Stop)
        } else {
            Ok(Flow::Continue)
        }
    }

    async fn dispatch(&mut self, name: &str, params: &Value) -> ResponderResult<Reply> {
        match name {
            method::INITIALIZE => {
                self.advance(SessionPhase::Ready);
                Reply::success(&InitializeResult::default())
            }
            method::SESSION_NEW => {
                self.advance(SessionPhase::SessionOpen);
                Reply::success(&NewSessionResult {
                    session_id: self.config.session_id.clone(),
                })
            }
            method::SESSION_PROMPT => self.handle_prompt(params).await,
            method::SESSION_END => {
                self.advance(SessionPhase::Ready);
                Reply::success(&StatusResult {
                    status: Status::Ended,
                })
            }
            method::SHUTDOWN => {
                self.advance(SessionPhase::Shutdown);
                Reply::success(&StatusResult {
                    status: Status::ShuttingDown,
                })
            }
            unknown => Ok(Reply::Failure(JsonRpcError::method_not_found(unknown))),
        }
    }

    async fn handle_prompt(&mut self, params: &Value) -> ResponderResult<Reply> {
        match self.config.mode {
            Mode::Error => {
                return Ok(Reply::Failure(JsonRpcError::server_error(
                    acp::PROMPT_FAILURE_MESSAGE,
                )));
            }
            Mode::Slow => {
                debug!(delay = ?self.config.slow_delay, "stalling prompt turn");
                tokio::time::sleep(self.config.slow_delay).await;
            }
            Mode::Normal => {}
        }

        let message = acp::extract_prompt_message(params);
        let session_id = acp::prompt_session_id(params, &self.config.session_id).to_string();

        for update in acp::prompt_turn_updates(&session_id, &message) {
            let params = serde_json::to_value(update)
                .map_err(|e| ResponderError::serialize("notification", e))?;
            let notification = JsonRpcNotification::new(method::SESSION_UPDATE, Some(params));
            self.writer.send("notification", &notification).await?;
        }

        Reply::success(&PromptResult {
            stop_reason: StopReason::EndTurn,
        })
    }

    fn advance(&mut self, next: SessionPhase) {
        if self.phase != next {
            debug!(from = %self.phase, to = %next, "session phase changed");
            self.phase = next;
        }
    }
}

/// Logs a finished run at info level.
pub fn log_summary(summary: &RunSummary) {
    info!(
        stop = ?summary.stop,
        lines = summary.lines_read,
        requests = summary.requests,
        notifications = summary.notifications,
        skipped = summary.skipped,
        "responder loop finished"
    );
}
