//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::storage::{PartSource, Storage, StorageError};

/// In-memory storage.
///
/// # Example
///
/// ```ignore
/// use gb_site::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_guide("rust", "title = \"Rust\"")
///     .with_markdown("rust", "intro", "# Intro");
///
/// assert_eq!(storage.list_guides().unwrap(), vec!["rust"]);
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    guides: BTreeMap<String, String>,
    parts: BTreeMap<(String, String), PartSource>,
    not_found: Option<String>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a guide configuration.
    #[must_use]
    pub fn with_guide(mut self, guide: impl Into<String>, config: impl Into<String>) -> Self {
        self.guides.insert(guide.into(), config.into());
        self
    }

    /// Add a markdown part.
    #[must_use]
    pub fn with_markdown(
        mut self,
        guide: impl Into<String>,
        part: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        self.parts
            .insert((guide.into(), part.into()), PartSource::Markdown(body.into()));
        self
    }

    /// Add an HTML part.
    #[must_use]
    pub fn with_html(
        mut self,
        guide: impl Into<String>,
        part: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        self.parts
            .insert((guide.into(), part.into()), PartSource::Html(body.into()));
        self
    }

    /// Set the not-found page.
    #[must_use]
    pub fn with_not_found(mut self, body: impl Into<String>) -> Self {
        self.not_found = Some(body.into());
        self
    }
}

impl Storage for MockStorage {
    fn list_guides(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.guides.keys().cloned().collect())
    }

    fn read_guide(&self, guide: &str) -> Result<String, StorageError> {
        self.guides
            .get(guide)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(PathBuf::from(guide).join("content.toml")))
    }

    fn read_part(&self, guide: &str, part: &str) -> Result<PartSource, StorageError> {
        self.parts
            .get(&(guide.to_owned(), part.to_owned()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound(PathBuf::from(guide).join(part)))
    }

    fn read_not_found(&self) -> Result<String, StorageError> {
        self.not_found
            .clone()
            .ok_or_else(|| StorageError::NotFound(PathBuf::from("not-found.md")))
    }
}
