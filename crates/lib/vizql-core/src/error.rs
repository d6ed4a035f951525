use std::error::Error;
use std::fmt;

use serde_json::{Value, json};

/// Failure raised while relaying a bridge operation upstream.
///
/// Every variant renders to a JSON object tagged with a `kind` field so tool
/// callers can branch on the failure class without parsing prose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// The bridge is missing configuration the operation needs.
    Config { message: String },
    /// The upstream answered with a non-success HTTP status.
    Status {
        operation: &'static str,
        status: u16,
        detail: String,
    },
    /// The request never produced an HTTP response.
    Transport {
        operation: &'static str,
        detail: String,
    },
    /// The Metadata API answered 200 but reported GraphQL errors.
    Upstream { details: Value },
    /// The upstream response parsed but is missing an expected part.
    Shape { message: &'static str, raw: Value },
}

impl ToolError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn transport(operation: &'static str, detail: impl fmt::Display) -> Self {
        Self::Transport {
            operation,
            detail: detail.to_string(),
        }
    }

    /// Renders the failure as the JSON object returned to tool callers.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Config { message } => json!({ "kind": "config", "error": message }),
            Self::Status {
                operation,
                status,
                detail,
            } => json!({
                "kind": "status",
                "error": format!("{operation} request failed"),
                "status": status,
                "detail": detail,
            }),
            Self::Transport { operation, detail } => json!({
                "kind": "transport",
                "error": format!("{operation} request failed"),
                "detail": detail,
            }),
            Self::Upstream { details } => json!({
                "kind": "upstream",
                "error": "Metadata API errors",
                "details": details,
            }),
            Self::Shape { message, raw } => json!({
                "kind": "shape",
                "error": message,
                "raw": raw,
            }),
        }
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { message } => write!(f, "configuration error: {message}"),
            Self::Status {
                operation, status, ..
            } => {
                write!(f, "{operation} request failed with status {status}")
            }
            Self::Transport { operation, detail } => {
                write!(f, "{operation} request failed: {detail}")
            }
            Self::Upstream { .. } => write!(f, "Metadata API errors"),
            Self::Shape { message, .. } => write!(f, "{message}"),
        }
    }
}

impl Error for ToolError {}
