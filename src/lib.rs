//! Mock ACP agent
//!
//! A scripted stand-in for an Agent Client Protocol agent. It speaks
//! line-delimited JSON-RPC 2.0 on a pair of streams and walks one session
//! through `initialize`, `session/new`, `session/prompt`, `session/end` and
//! `shutdown`, so ACP clients can be exercised in integration tests without a
//! real agent process.
//!
//! The library exposes the responder so tests can drive it in-process; the
//! `mock-acp-agent` binary wires it to stdin and stdout.

pub mod acp;
pub mod config;
pub mod error;
pub mod framing;
pub mod protocol;
pub mod responder;

// Re-export core types for convenient access
pub use config::{Mode, ResponderConfig};
pub use error::{ResponderError, ResponderResult};
pub use responder::{Responder, RunSummary, SessionPhase, StopCause};
