//! Unified error types for httpdebug.
//!
//! [`SyntaxError`] reports malformed configuration text with the 1-based
//! byte offset of the failure. [`ComponentError`] is what a middleware or
//! handler factory returns when it rejects its settings. [`HttpDebugError`]
//! is the crate error that wraps both together with name resolution
//! failures. All use `thiserror` for `Display` and `Error` derives.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syntax error at offset {offset}: {kind}")]
pub struct SyntaxError {
    /// 1-based byte offset of the cursor when parsing failed.
    pub offset: usize,
    pub kind: SyntaxErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxErrorKind {
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },

    #[error("unexpected '{}', expected {expected}", .found.escape_ascii())]
    Unexpected { found: u8, expected: &'static str },

    #[error("unexpected end of input inside quoted string")]
    UnterminatedString,

    #[error("missing ':' after path '{path}'")]
    MissingPathColon { path: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    #[error("missing configuration '{key}'")]
    MissingSetting { key: &'static str },

    #[error("invalid {key} '{value}': {reason}")]
    InvalidSetting {
        key: String,
        value: String,
        reason: String,
    },
}

impl ComponentError {
    pub fn invalid(key: &str, value: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum HttpDebugError {
    #[error("Config {0}")]
    Syntax(#[from] SyntaxError),

    #[error("Path '{path}': middleware '{name}' not found")]
    MiddlewareNotFound { path: String, name: String },

    #[error("Path '{path}': handler '{name}' not found")]
    HandlerNotFound { path: String, name: String },

    #[error("Path '{path}': {name}: {source}")]
    Component {
        path: String,
        name: String,
        #[source]
        source: ComponentError,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
