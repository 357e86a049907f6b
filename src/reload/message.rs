//! Hot reload message protocol.
//!
//! JSON messages sent to clients, tagged by `type`:
//!
//! - `full-reload`: discard all state and reload
//! - `error`: show the build error overlay
//! - `connected`: handshake greeting

use serde::{Deserialize, Serialize};

/// Source identifier attached to error overlays.
pub const ERROR_ID: &str = "moonlit-build";
/// Name of the producer of error overlays.
pub const PLUGIN_NAME: &str = "moonlit";

/// Notification delivered to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HotPayload {
    /// Reload everything. `path` is always `"*"`.
    FullReload { path: String },

    /// Build failed; display `err` without reloading.
    Error { err: ErrorPayload },

    /// Connection established
    Connected { version: String },
}

/// Error overlay content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
    pub stack: String,
    pub id: String,
    pub plugin: String,
}

impl HotPayload {
    pub fn full_reload() -> Self {
        Self::FullReload {
            path: "*".to_string(),
        }
    }

    /// Error overlay without a stack trace.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            err: ErrorPayload {
                message: message.into(),
                stack: String::new(),
                id: ERROR_ID.to_string(),
                plugin: PLUGIN_NAME.to_string(),
            },
        }
    }

    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"full-reload","path":"*"}"#.to_string())
    }

    /// Parse from JSON string
    #[cfg(test)]
    pub fn from_json(s: &str) -> Option<Self> {
        serde_json::from_str(s).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_reload_json() {
        assert_eq!(
            HotPayload::full_reload().to_json(),
            r#"{"type":"full-reload","path":"*"}"#
        );
    }

    #[test]
    fn test_error_json() {
        let json = HotPayload::error("error: unbound x").to_json();
        assert_eq!(
            json,
            r#"{"type":"error","err":{"message":"error: unbound x","stack":"","id":"moonlit-build","plugin":"moonlit"}}"#
        );
    }

    #[test]
    fn test_parse_error_message() {
        let parsed = HotPayload::from_json(&HotPayload::error("a\nb").to_json()).unwrap();
        match parsed {
            HotPayload::Error { err } => {
                assert_eq!(err.message, "a\nb");
                assert!(err.stack.is_empty());
            }
            other => panic!("expected Error, got {other:?}"),
        }
    }

    #[test]
    fn test_connected_carries_version() {
        let json = HotPayload::connected().to_json();
        assert!(json.contains(r#""type":"connected""#));
        assert!(json.contains(env!("CARGO_PKG_VERSION")));
    }
}
