use serde_json::{Value, json};
use thiserror::Error;

/// Failures of a debug lookup, one variant per outcome the caller can see.
#[derive(Debug, Error)]
pub enum DebugError {
    #[error("missing query parameter")]
    MissingParameter,
    #[error("type must be custom, got '{0}'")]
    UnsupportedType(String),
    #[error("custom category {0} not found")]
    CategoryNotFound(String),
    #[error("source {0} not found or disabled")]
    SourceUnavailable(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl DebugError {
    /// HTTP status code this error is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            DebugError::MissingParameter | DebugError::UnsupportedType(_) => 400,
            DebugError::CategoryNotFound(_) | DebugError::SourceUnavailable(_) => 404,
            DebugError::Unexpected(_) => 500,
        }
    }

    /// Short label used for metrics and log fields.
    pub fn label(&self) -> &'static str {
        match self {
            DebugError::MissingParameter => "missing_parameter",
            DebugError::UnsupportedType(_) => "unsupported_type",
            DebugError::CategoryNotFound(_) => "category_not_found",
            DebugError::SourceUnavailable(_) => "source_unavailable",
            DebugError::Unexpected(_) => "unexpected",
        }
    }

    /// Error body. Client errors carry only `error`; server failures also
    /// carry `success: false`, which existing callers rely on.
    pub fn body(&self) -> Value {
        match self {
            DebugError::Unexpected(err) => json!({
                "success": false,
                "error": format!("{err:#}"),
            }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}
