//! Startup configuration for the mock agent.
//!
//! Everything here is decided once, before the first line is read, and is
//! held immutably by the [`Responder`](crate::responder::Responder) for the
//! life of the process.

use std::fmt;
use std::time::Duration;

/// Session id handed out by `session/new` unless overridden.
pub const DEFAULT_SESSION_ID: &str = "mock-session-001";

/// How long `slow` mode stalls a prompt turn unless overridden.
pub const DEFAULT_SLOW_DELAY: Duration = Duration::from_secs(5);

/// Behavioral variant of the `session/prompt` handler.
///
/// All other methods behave the same in every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Complete every prompt turn immediately.
    #[default]
    Normal,

    /// Stall each prompt turn before completing it normally.
    ///
    /// Used to check that a client's prompt timeout fires.
    Slow,

    /// Fail each prompt turn with a server error and no updates.
    Error,
}

impl Mode {
    /// Maps a configuration value to a mode.
    ///
    /// Only the exact strings `slow` and `error` select those modes;
    /// anything else, including an empty string, is `Normal`.
    #[must_use]
    pub fn from_config_value(value: &str) -> Self {
        match value {
            "slow" => Mode::Slow,
            "error" => Mode::Error,
            _ => Mode::Normal,
        }
    }

    /// Returns true if `value` names one of the three modes exactly.
    #[must_use]
    pub fn is_recognized(value: &str) -> bool {
        matches!(value, "normal" | "slow" | "error")
    }

    /// Describes a raw configuration value for the startup line.
    ///
    /// Recognized values read `mode=slow`; anything else keeps the raw value
    /// and names the mode it acts as, e.g. `mode=turbo (behaving as normal)`.
    #[must_use]
    pub fn describe_config_value(value: &str) -> String {
        let mode = Mode::from_config_value(value);
        if Mode::is_recognized(value) {
            format!("mode={mode}")
        } else {
            format!("mode={value} (behaving as {mode})")
        }
    }

    /// Returns the configuration string for this mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Slow => "slow",
            Mode::Error => "error",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable configuration injected into the responder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponderConfig {
    /// Prompt-turn behavior.
    pub mode: Mode,
    /// Stall applied before a prompt turn in `slow` mode.
    pub slow_delay: Duration,
    /// Id returned by `session/new`, and the fallback target of prompt
    /// updates when a request names no session.
    pub session_id: String,
}

impl ResponderConfig {
    /// Default configuration with the given mode.
    #[must_use]
    pub fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            slow_delay: DEFAULT_SLOW_DELAY,
            session_id: DEFAULT_SESSION_ID.to_string(),
        }
    }
}
