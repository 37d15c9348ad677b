//! Filesystem storage backend.

use std::path::{Path, PathBuf};

use crate::storage::{PartSource, Storage, StorageError};

/// Guide configuration filename inside each guide directory.
const GUIDE_CONFIG_FILENAME: &str = "content.toml";

/// Not-found page at the content root.
const NOT_FOUND_FILENAME: &str = "not-found.md";

/// Storage over a content directory with one sub-directory per guide.
///
/// Files are read on every call; nothing is cached.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Create storage rooted at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn guide_dir(&self, guide: &str) -> PathBuf {
        self.root.join(guide)
    }
}

fn read_file(path: &Path) -> Result<String, StorageError> {
    std::fs::read_to_string(path).map_err(|e| StorageError::io(e, path))
}

impl Storage for FsStorage {
    fn list_guides(&self) -> Result<Vec<String>, StorageError> {
        let root = glob::Pattern::escape(&self.root.to_string_lossy());
        let pattern = format!("{root}/*/{GUIDE_CONFIG_FILENAME}");

        let mut slugs: Vec<String> = glob::glob(&pattern)?
            .filter_map(|entry| match entry {
                Ok(path) => path
                    .parent()
                    .and_then(Path::file_name)
                    .map(|name| name.to_string_lossy().into_owned()),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable guide entry");
                    None
                }
            })
            .collect();
        slugs.sort();

        Ok(slugs)
    }

    fn read_guide(&self, guide: &str) -> Result<String, StorageError> {
        read_file(&self.guide_dir(guide).join(GUIDE_CONFIG_FILENAME))
    }

    fn read_part(&self, guide: &str, part: &str) -> Result<PartSource, StorageError> {
        let dir = self.guide_dir(guide);

        match read_file(&dir.join(format!("{part}.md"))) {
            Ok(text) => return Ok(PartSource::Markdown(text)),
            Err(e) if !e.is_not_found() => return Err(e),
            Err(_) => {}
        }

        read_file(&dir.join(format!("{part}.html"))).map(PartSource::Html)
    }

    fn read_not_found(&self) -> Result<String, StorageError> {
        read_file(&self.root.join(NOT_FOUND_FILENAME))
    }
}
