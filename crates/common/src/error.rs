//! Error types shared across Subdrawer crates.

use std::path::{Path, PathBuf};

/// Top-level error type for Subdrawer operations.
#[derive(Debug, thiserror::Error)]
pub enum SubdrawerError {
    /// No pose source file could be found anywhere it was looked for.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A pose file exists but its content is not a valid pose dataset.
    #[error("Invalid pose data in {path}: {message}")]
    DataFormat { path: PathBuf, message: String },

    /// A read or write against a specific path failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An image has no pose and none can be derived from the dataset.
    #[error("Inconsistent pose state: {message}")]
    StateInconsistency { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using SubdrawerError.
pub type SubdrawerResult<T> = Result<T, SubdrawerError>;

impl SubdrawerError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
        }
    }

    pub fn data_format(path: impl AsRef<Path>, msg: impl Into<String>) -> Self {
        Self::DataFormat {
            path: path.as_ref().to_path_buf(),
            message: msg.into(),
        }
    }

    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn state_inconsistency(msg: impl Into<String>) -> Self {
        Self::StateInconsistency {
            message: msg.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    /// Whether this error came from touching the filesystem.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_format_message_names_path() {
        let err = SubdrawerError::data_format("/tmp/pose_data.json", "expected an object");
        let text = err.to_string();
        assert!(text.contains("/tmp/pose_data.json"));
        assert!(text.contains("expected an object"));
    }

    #[test]
    fn test_io_classification() {
        let err = SubdrawerError::io(
            "/nope",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.is_io());
        assert!(err.to_string().contains("/nope"));
        assert!(!SubdrawerError::configuration("missing").is_io());
        assert!(!SubdrawerError::render("bad encoder").is_io());
    }
}
