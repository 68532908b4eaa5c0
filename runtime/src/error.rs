//! Error types shared by the matching core.

use std::path::PathBuf;

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, MatchError>;

/// Errors produced by the matching core, the registry and the fit pipeline.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// A frozen artifact could not be loaded. Fatal at startup.
    #[error("failed to load model artifact {}: {reason}", .path.display())]
    ModelLoad { path: PathBuf, reason: String },

    /// A request carried a missing or malformed profile field.
    #[error("invalid input for `{field}`: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("registry error: {0}")]
    Registry(#[from] rusqlite::Error),

    #[error("training failed: {reason}")]
    Training { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MatchError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn model_load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ModelLoad {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable kind, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ModelLoad { .. } => "model_load",
            Self::InvalidInput { .. } => "invalid_input",
            Self::Registry(_) => "registry",
            Self::Training { .. } => "training",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_message() {
        let err = MatchError::invalid("latitude", "must be finite");
        assert_eq!(err.kind(), "invalid_input");
        assert_eq!(err.to_string(), "invalid input for `latitude`: must be finite");
    }

    #[test]
    fn test_model_load_mentions_path() {
        let err = MatchError::model_load("/tmp/model.json", "missing");
        assert!(err.to_string().contains("/tmp/model.json"));
    }
}
