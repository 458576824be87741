//! Console log types and sandbox configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a relayed console event.
///
/// Mirrors the four console methods the relay intercepts. Anything else
/// arriving on the wire (unknown or missing `type`) degrades to [`Log`]
/// rather than being dropped.
///
/// [`Log`]: LogLevel::Log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Log,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Maps a relay `type` string to a level, defaulting to `Log` for
    /// anything unrecognized.
    pub fn from_relay_type(s: &str) -> Self {
        match s {
            "info" => Self::Info,
            "warn" => Self::Warn,
            "error" => Self::Error,
            _ => Self::Log,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the host console log.
///
/// Host-owned display record: the sink appends these in arrival order and
/// only an explicit clear removes them. `text` is the already-joined
/// rendering of the relay message's parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleEntry {
    pub level: LogLevel,
    pub text: String,
}

impl ConsoleEntry {
    pub fn new(level: LogLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

impl fmt::Display for ConsoleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.text)
    }
}

/// Snippet pre-filled into the editor and restored by reset.
pub const DEFAULT_SOURCE: &str = "<h2>Hello, sandbox!</h2>\n<p>Edit this snippet and press Run.</p>\n<script>\n  console.log(\"sandbox ready\");\n</script>\n";

/// Sandbox configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Path to Chrome/Chromium binary (auto-detected if not set).
    pub executable: Option<String>,
    /// Preview viewport width.
    pub viewport_width: u32,
    /// Preview viewport height.
    pub viewport_height: u32,
    /// CDP request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Source text loaded at startup and restored by reset.
    pub default_source: String,
    /// Additional Chrome arguments.
    pub extra_args: Vec<String>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            executable: None,
            viewport_width: 1024,
            viewport_height: 768,
            request_timeout_ms: 10_000,
            default_source: DEFAULT_SOURCE.to_string(),
            extra_args: Vec::new(),
        }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_relay_type() {
        assert_eq!(LogLevel::from_relay_type("log"), LogLevel::Log);
        assert_eq!(LogLevel::from_relay_type("info"), LogLevel::Info);
        assert_eq!(LogLevel::from_relay_type("warn"), LogLevel::Warn);
        assert_eq!(LogLevel::from_relay_type("error"), LogLevel::Error);
    }

    #[test]
    fn test_unknown_level_degrades_to_log() {
        assert_eq!(LogLevel::from_relay_type("debug"), LogLevel::Log);
        assert_eq!(LogLevel::from_relay_type(""), LogLevel::Log);
        assert_eq!(LogLevel::from_relay_type("ERROR"), LogLevel::Log);
    }

    #[test]
    fn test_level_serde_roundtrip() {
        let json = serde_json::to_string(&LogLevel::Warn).unwrap();
        assert_eq!(json, "\"warn\"");
        let back: LogLevel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, LogLevel::Warn);
    }

    #[test]
    fn test_entry_display() {
        let entry = ConsoleEntry::new(LogLevel::Error, "boom (line: 3)");
        assert_eq!(entry.to_string(), "[error] boom (line: 3)");
    }

    #[test]
    fn test_config_defaults() {
        let config = SandboxConfig::default();
        assert!(config.executable.is_none());
        assert_eq!(config.viewport_width, 1024);
        assert_eq!(config.viewport_height, 768);
        assert!(config.default_source.contains("sandbox ready"));
    }

    #[test]
    fn test_config_partial_fields_default() {
        let config: SandboxConfig = serde_json::from_str(r#"{"viewport_width": 800}"#).unwrap();
        assert_eq!(config.viewport_width, 800);
        assert_eq!(config.viewport_height, 768);
        assert_eq!(config.default_source, DEFAULT_SOURCE);
    }
}
