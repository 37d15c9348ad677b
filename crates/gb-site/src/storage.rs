//! Storage trait and error types.
//!
//! Provides the [`Storage`] trait for reading guide configurations and part
//! bodies, so site logic can be tested without touching the filesystem.
//!
//! All identifiers passed to storage are slugs, not file paths. Callers
//! validate slugs before they reach a backend.

use std::path::PathBuf;

/// Body of a part, tagged with its format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartSource {
    /// Markdown source (`<slug>.md`).
    Markdown(String),
    /// Raw HTML (`<slug>.html`).
    Html(String),
}

/// Storage error.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Resource does not exist.
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error other than "not found".
    #[error("I/O error: {source} (path: {})", .path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The content directory could not be turned into a glob pattern.
    #[error("Invalid scan pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

impl StorageError {
    /// Create a storage error from an I/O error, mapping `NotFound`.
    #[must_use]
    pub fn io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Io { path, source: err }
        }
    }

    /// True if the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Read-only access to guide content.
pub trait Storage: Send + Sync {
    /// Slugs of all guides that have a configuration, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the content root cannot be scanned.
    fn list_guides(&self) -> Result<Vec<String>, StorageError>;

    /// Raw configuration text of a guide.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if the guide has no configuration.
    fn read_guide(&self, guide: &str) -> Result<String, StorageError>;

    /// Body of a part. Markdown is preferred when both formats exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if neither body file exists.
    fn read_part(&self, guide: &str, part: &str) -> Result<PartSource, StorageError>;

    /// Markdown shown in place of an unknown part.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] if no not-found page is provided.
    fn read_not_found(&self) -> Result<String, StorageError>;
}
