//! Guide configuration model (`content.toml`).

use serde::{Deserialize, Serialize};

/// A named grouping of parts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChapterConfig {
    /// Display title. Parts reference their chapter by this exact string.
    pub title: String,
    /// URL-friendly identifier.
    pub slug: String,
}

/// A single content page within a chapter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChapterPartConfig {
    /// Display title.
    pub title: String,
    /// Identifier; the body lives in `<slug>.md` or `<slug>.html`.
    pub slug: String,
    /// Title of the parent chapter.
    pub chapter: String,
}

/// Per-guide configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    /// Guide title.
    pub title: String,
    /// Guide identifier (matches its directory name).
    pub slug: String,
    /// Short description for the guides list.
    pub description: String,
    /// Chapters in menu order.
    pub chapters: Vec<ChapterConfig>,
    /// Parts in reading order.
    pub chapter_parts: Vec<ChapterPartConfig>,
}

/// Error decoding a guide configuration.
#[derive(Debug, thiserror::Error)]
#[error("Invalid guide configuration: {0}")]
pub struct GuideError(#[from] toml::de::Error);

impl GuideConfig {
    /// Decode a guide from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`GuideError`] if the text is not valid TOML or a field has
    /// the wrong type. Missing fields default to empty.
    pub fn from_toml(text: &str) -> Result<Self, GuideError> {
        Ok(toml::from_str(text)?)
    }

    /// Find a part by slug.
    pub fn find_part(&self, slug: &str) -> Option<&ChapterPartConfig> {
        self.chapter_parts.iter().find(|part| part.slug == slug)
    }

    /// First part in reading order.
    pub fn first_part(&self) -> Option<&ChapterPartConfig> {
        self.chapter_parts.first()
    }

    /// Find a chapter by title.
    pub fn find_chapter(&self, title: &str) -> Option<&ChapterConfig> {
        self.chapters.iter().find(|chapter| chapter.title == title)
    }
}
