//! Error types for the mock agent.
//!
//! Protocol-level problems (malformed lines, unknown methods, the deliberate
//! prompt failure in error mode) are never errors in this sense: they are
//! handled inside the dispatch loop and answered on the wire, or skipped.
//! `ResponderError` covers the failures that stop the loop itself, which
//! are all about the streams underneath it.
//!
//! # Example
//!
//! ```
//! use mock_acp_agent::error::{ResponderError, ResponderResult};
//!
//! fn check(bytes_written: usize) -> ResponderResult<()> {
//!     if bytes_written == 0 {
//!         return Err(ResponderError::io(
//!             "write",
//!             std::io::Error::from(std::io::ErrorKind::WriteZero),
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! let err = check(0).unwrap_err();
//! assert!(err.is_broken_stream());
//! ```

use thiserror::Error;

/// Result type alias using `ResponderError`.
pub type ResponderResult<T> = Result<T, ResponderError>;

/// Failures that terminate the responder loop.
#[derive(Debug, Error)]
pub enum ResponderError {
    /// Reading from or writing to a protocol stream failed.
    #[error("I/O error during {operation}: {source}")]
    Io {
        /// What the responder was doing (`read`, `write`, `flush`).
        operation: &'static str,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An outgoing message could not be encoded as JSON.
    #[error("failed to serialize outgoing {kind}: {source}")]
    Serialize {
        /// Kind of message being encoded (`response`, `notification`).
        kind: &'static str,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

impl ResponderError {
    /// Creates an I/O error for the given operation.
    #[must_use]
    pub fn io(operation: &'static str, source: std::io::Error) -> Self {
        Self::Io { operation, source }
    }

    /// Creates a serialization error for the given message kind.
    #[must_use]
    pub fn serialize(kind: &'static str, source: serde_json::Error) -> Self {
        Self::Serialize { kind, source }
    }

    /// Returns true when the peer went away (closed pipe, zero-length write).
    ///
    /// The binary treats this as an ordinary end of the session rather than
    /// a failure, since the client under test is free to hang up.
    #[must_use]
    pub fn is_broken_stream(&self) -> bool {
        match self {
            Self::Io { source, .. } => matches!(
                source.kind(),
                std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::WriteZero
                    | std::io::ErrorKind::ConnectionReset
            ),
            Self::Serialize { .. } => false,
        }
    }
}
