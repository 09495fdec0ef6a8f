//! Error types for the MCP server.

use std::fmt;

use thiserror::Error;

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// A single rejected argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted path of the offending field (e.g. `files[1].content`).
    pub field: String,
    /// Why the value was rejected.
    pub reason: String,
}

impl FieldError {
    /// Create a field error.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`: {}", self.field, self.reason)
    }
}

/// MCP server errors.
#[derive(Error, Debug)]
pub enum Error {
    /// JSON-RPC protocol error.
    #[error("JSON-RPC error: {code} - {message}")]
    JsonRpc {
        /// Error code.
        code: i32,
        /// Error message.
        message: String,
    },

    /// Tool arguments failed validation.
    #[error("validation error: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    /// Browser or OS identifier outside the supported set.
    #[error("unsupported impersonation: {kind} `{value}`")]
    UnsupportedImpersonation {
        /// Which identifier was rejected ("browser" or "os").
        kind: &'static str,
        /// The rejected identifier.
        value: String,
    },

    /// Transport-level failure (connect, TLS, timeout, proxy).
    #[error("request execution failed: {0}")]
    RequestExecution(String),

    /// Response body could not be rendered in the requested format.
    #[error("format error ({format}): {reason}")]
    Format {
        /// Requested return format.
        format: &'static str,
        /// Underlying reason.
        reason: String,
    },

    /// Tool not found.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Invalid JSON-RPC parameters.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Error {
    /// Shorthand for a single-field validation error.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Validation(vec![FieldError::new(field, reason)])
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::JsonRpc { .. } => "json_rpc",
            Error::Validation(_) => "validation",
            Error::UnsupportedImpersonation { .. } => "unsupported_impersonation",
            Error::RequestExecution(_) => "request_execution",
            Error::Format { .. } => "format",
            Error::UnknownTool(_) => "unknown_tool",
            Error::InvalidParams(_) => "invalid_params",
            Error::Serialization(_) => "serialization",
            Error::Io(_) => "io",
            Error::Internal(_) => "internal",
        }
    }

    /// Get the JSON-RPC error code for this error.
    pub fn code(&self) -> i32 {
        match self {
            Error::JsonRpc { code, .. } => *code,
            Error::UnknownTool(_) => codes::METHOD_NOT_FOUND,
            Error::Validation(_) | Error::InvalidParams(_) => codes::INVALID_PARAMS,
            Error::UnsupportedImpersonation { .. } => codes::INVALID_PARAMS,
            Error::RequestExecution(_) => -32001,
            Error::Format { .. } => -32003,
            Error::Serialization(_) => codes::PARSE_ERROR,
            Error::Io(_) => -32002,
            Error::Internal(_) => codes::INTERNAL_ERROR,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let detail = if err.is_timeout() {
            "operation timed out"
        } else if err.is_connect() {
            "connection failed"
        } else if err.is_redirect() {
            "redirect policy violated"
        } else if err.is_builder() {
            "client configuration rejected"
        } else {
            "transport error"
        };
        // reqwest hides the interesting part (TLS, proxy, DNS) in the source chain.
        let mut message = format!("{detail}: {err}");
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(&format!(": {cause}"));
            source = cause.source();
        }
        Error::RequestExecution(message)
    }
}

/// Standard JSON-RPC error codes.
pub mod codes {
    /// Parse error.
    pub const PARSE_ERROR: i32 = -32700;
    /// Invalid request.
    pub const INVALID_REQUEST: i32 = -32600;
    /// Method not found.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid params.
    pub const INVALID_PARAMS: i32 = -32602;
    /// Internal error.
    pub const INTERNAL_ERROR: i32 = -32603;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_lists_every_field() {
        let err = Error::Validation(vec![
            FieldError::new("files[0].content", "invalid base64"),
            FieldError::new("files[2].name", "missing required field"),
        ]);
        assert_eq!(
            err.to_string(),
            "validation error: `files[0].content`: invalid base64; `files[2].name`: missing required field"
        );
        assert_eq!(err.code(), codes::INVALID_PARAMS);
    }

    #[test]
    fn impersonation_error_names_the_identifier() {
        let err = Error::UnsupportedImpersonation {
            kind: "browser",
            value: "netscape_1".into(),
        };
        assert_eq!(err.to_string(), "unsupported impersonation: browser `netscape_1`");
        assert_eq!(err.kind(), "unsupported_impersonation");
    }
}
