//! Agent-side ACP payloads.
//!
//! The shapes of everything the mock agent puts inside a response's
//! `result` or a `session/update` notification's `params`, plus reading the
//! bits of a `session/prompt` request the agent cares about.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Method names the agent answers, and the one it emits.
pub mod method {
    /// Capability negotiation.
    pub const INITIALIZE: &str = "initialize";
    /// Session creation.
    pub const SESSION_NEW: &str = "session/new";
    /// One prompt turn.
    pub const SESSION_PROMPT: &str = "session/prompt";
    /// Session termination.
    pub const SESSION_END: &str = "session/end";
    /// Process shutdown.
    pub const SHUTDOWN: &str = "shutdown";
    /// Progress notification emitted during a prompt turn.
    pub const SESSION_UPDATE: &str = "session/update";
}

/// ACP protocol version advertised by `initialize`.
pub const PROTOCOL_VERSION: u32 = 1;

/// Name reported in `serverInfo`.
pub const AGENT_NAME: &str = "mock-acp-agent";

/// Message of the induced prompt failure in `error` mode.
pub const PROMPT_FAILURE_MESSAGE: &str = "Mock error: prompt execution failed";

/// Id of the synthetic tool call reported during every prompt turn.
pub const MOCK_TOOL_CALL_ID: &str = "tc-001";

/// Result of `initialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Protocol version spoken by the agent.
    pub protocol_version: u32,
    /// What the agent supports.
    pub capabilities: AgentCapabilities,
    /// Agent identity.
    pub server_info: ServerInfo,
}

impl Default for InitializeResult {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            capabilities: AgentCapabilities {
                prompts: true,
                sessions: true,
            },
            server_info: ServerInfo {
                name: AGENT_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }
}

/// Capability flags advertised by `initialize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCapabilities {
    /// Accepts `session/prompt`.
    pub prompts: bool,
    /// Accepts `session/new` and `session/end`.
    pub sessions: bool,
}

/// Agent name and version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Agent name.
    pub name: String,
    /// Agent version.
    pub version: String,
}

/// Result of `session/new`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionResult {
    /// Opaque session token.
    pub session_id: String,
}

/// Why a prompt turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The agent finished its turn.
    EndTurn,
}

/// Result of a successful `session/prompt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptResult {
    /// Why the turn ended.
    pub stop_reason: StopReason,
}

/// Status marker returned by `session/end` and `shutdown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The session was ended.
    Ended,
    /// The agent is about to exit.
    ShuttingDown,
}

/// Result carrying a [`Status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResult {
    /// The marker.
    pub status: Status,
}

/// A content block inside an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    /// Plain text.
    Text {
        /// The text.
        text: String,
    },
}

/// Payload of a `session/update` notification's `update` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionUpdate {
    /// A piece of the agent's reply.
    AgentMessageChunk {
        /// Chunk content.
        content: ContentBlock,
    },
    /// The agent started a tool call.
    #[serde(rename_all = "camelCase")]
    ToolCall {
        /// Tool call id.
        tool_call_id: String,
        /// Display title.
        title: String,
        /// Tool kind.
        kind: String,
        /// Arguments as the tool received them.
        raw_input: Value,
        /// Output content produced so far.
        content: Vec<ContentBlock>,
    },
}

/// `params` of a `session/update` notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdateParams {
    /// Session the update belongs to.
    pub session_id: String,
    /// The update itself.
    pub update: SessionUpdate,
}

/// Builds the two updates every completed prompt turn emits, in order: an
/// agent message chunk echoing the prompt, then a synthetic `bash` call.
#[must_use]
pub fn prompt_turn_updates(session_id: &str, message: &str) -> [SessionUpdateParams; 2] {
    [
        SessionUpdateParams {
            session_id: session_id.to_string(),
            update: SessionUpdate::AgentMessageChunk {
                content: ContentBlock::Text {
                    text: format!("Working on: {message}"),
                },
            },
        },
        SessionUpdateParams {
            session_id: session_id.to_string(),
            update: SessionUpdate::ToolCall {
                tool_call_id: MOCK_TOOL_CALL_ID.to_string(),
                title: "bash".to_string(),
                kind: "command".to_string(),
                raw_input: json!({"command": "echo hello"}),
                content: Vec::new(),
            },
        },
    ]
}

/// Extracts the user's message from `session/prompt` params.
///
/// Takes the `text` of the first `type: "text"` block in `prompt`. When that
/// yields nothing (no text block, or a text block whose `text` is empty or
/// missing), falls back to a flat `message` string, and to `""` when that is
/// missing too.
///
/// The `message` fallback is a compatibility shim for clients that predate
/// content blocks. Nothing in the request says which shape it uses; both
/// are accepted on every request.
#[must_use]
pub fn extract_prompt_message(params: &Value) -> String {
    let block_text = params
        .get("prompt")
        .and_then(Value::as_array)
        .and_then(|blocks| {
            blocks
                .iter()
                .find(|block| block.get("type").and_then(Value::as_str) == Some("text"))
        })
        .and_then(|block| block.get("text"))
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty());

    block_text
        .or_else(|| params.get("message").and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

/// Session a prompt's updates are addressed to: the request's `sessionId`
/// when it is a string, otherwise `fallback`. The id is echoed, never
/// checked against the one `session/new` returned.
#[must_use]
pub fn prompt_session_id<'a>(params: &'a Value, fallback: &'a str) -> &'a str {
    params
        .get("sessionId")
        .and_then(Value::as_str)
        .unwrap_or(fallback)
}
