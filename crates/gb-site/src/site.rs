//! Site facade over guide storage.
//!
//! [`Site`] loads guide configurations, renders part bodies and builds the
//! navigation for each page. Every call goes back to storage; there is no
//! cache, so edits to the content directory show up on the next request.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use gb_renderer::{MarkdownRenderer, RenderResult, TocEntry, render_html};
use serde::Serialize;

use crate::guide::{GuideConfig, GuideError};
use crate::navigation::{GuideNavigation, build_navigation, part_path};
use crate::storage::{PartSource, Storage, StorageError};

/// Title shown for parts that do not exist.
const NOT_FOUND_TITLE: &str = "Not Found";

/// Used when the content directory has no `not-found.md`.
const NOT_FOUND_FALLBACK: &str = "# Not Found\n\nThe page you are looking for does not exist.\n";

/// Site error.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// No guide with this slug.
    #[error("Guide not found: {0}")]
    GuideNotFound(String),
    /// Guide has no parts to show.
    #[error("Guide has no parts: {0}")]
    NoParts(String),
    /// Guide configuration could not be decoded.
    #[error("Invalid guide '{slug}': {source}")]
    InvalidGuide {
        /// Guide slug.
        slug: String,
        /// Decode error.
        #[source]
        source: GuideError,
    },
    /// Storage failure other than a missing resource.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SiteError {
    /// True if the error means "nothing to show here".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::GuideNotFound(_) | Self::NoParts(_))
    }
}

/// A rendered part with everything the guide template needs.
#[derive(Clone, Debug, Serialize)]
pub struct PartPage {
    /// Guide slug from the URL.
    pub guide_slug: String,
    /// Guide title, or "Not Found" when the part is missing.
    pub guide_title: String,
    /// Chapter menu and prev/next links.
    pub navigation: GuideNavigation,
    /// Headings of the part body.
    pub toc: Vec<TocEntry>,
    /// Rendered body.
    pub html: String,
    /// False when the not-found content was rendered instead.
    pub found: bool,
}

/// Content problem reported by [`Site::check`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuideIssue {
    /// Guide directory name is not a valid slug.
    InvalidSlug { guide: String },
    /// `content.toml` could not be decoded.
    InvalidConfig { guide: String, message: String },
    /// `slug` in `content.toml` differs from the directory name.
    SlugMismatch { guide: String, configured: String },
    /// Guide lists no parts.
    NoParts { guide: String },
    /// Part slug contains characters outside `[A-Za-z0-9_-]`.
    InvalidPartSlug { guide: String, part: String },
    /// Part slug listed more than once.
    DuplicatePart { guide: String, part: String },
    /// Part references a chapter title that does not exist.
    UnknownChapter {
        guide: String,
        part: String,
        chapter: String,
    },
    /// Neither `<part>.md` nor `<part>.html` exists.
    MissingPart { guide: String, part: String },
}

impl fmt::Display for GuideIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSlug { guide } => write!(f, "{guide}: directory name is not a valid slug"),
            Self::InvalidConfig { guide, message } => write!(f, "{guide}: {message}"),
            Self::SlugMismatch { guide, configured } => {
                write!(f, "{guide}: slug '{configured}' does not match directory name")
            }
            Self::NoParts { guide } => write!(f, "{guide}: no chapter parts"),
            Self::InvalidPartSlug { guide, part } => {
                write!(f, "{guide}/{part}: part slug is not a valid slug")
            }
            Self::DuplicatePart { guide, part } => write!(f, "{guide}/{part}: duplicate part slug"),
            Self::UnknownChapter {
                guide,
                part,
                chapter,
            } => write!(f, "{guide}/{part}: unknown chapter '{chapter}'"),
            Self::MissingPart { guide, part } => {
                write!(f, "{guide}/{part}: no {part}.md or {part}.html")
            }
        }
    }
}

/// True if `slug` is non-empty and only contains `[A-Za-z0-9_-]`.
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Guide site backed by a [`Storage`].
#[derive(Clone)]
pub struct Site {
    storage: Arc<dyn Storage>,
}

impl Site {
    /// Create a site over `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// All guides that can be decoded, sorted by directory name.
    ///
    /// Guides that fail to load are logged and skipped.
    #[must_use]
    pub fn guides(&self) -> Vec<GuideConfig> {
        let slugs = match self.storage.list_guides() {
            Ok(slugs) => slugs,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list guides");
                return Vec::new();
            }
        };

        slugs
            .iter()
            .filter_map(|slug| match self.guide(slug) {
                Ok(guide) => Some(guide),
                Err(e) => {
                    tracing::warn!(guide = %slug, error = %e, "Skipping guide");
                    None
                }
            })
            .collect()
    }

    /// Load one guide.
    ///
    /// An empty `slug` in the configuration is filled in from `slug`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::GuideNotFound`] for unknown or invalid slugs,
    /// [`SiteError::InvalidGuide`] if the configuration does not decode.
    pub fn guide(&self, slug: &str) -> Result<GuideConfig, SiteError> {
        if !is_valid_slug(slug) {
            return Err(SiteError::GuideNotFound(slug.to_owned()));
        }

        let text = self.storage.read_guide(slug).map_err(|e| {
            if e.is_not_found() {
                SiteError::GuideNotFound(slug.to_owned())
            } else {
                SiteError::Storage(e)
            }
        })?;

        let mut guide = GuideConfig::from_toml(&text).map_err(|source| SiteError::InvalidGuide {
            slug: slug.to_owned(),
            source,
        })?;

        if guide.slug.is_empty() {
            guide.slug = slug.to_owned();
        } else if guide.slug != slug {
            tracing::warn!(
                guide = %slug,
                configured = %guide.slug,
                "Guide slug does not match its directory; using directory name"
            );
            guide.slug = slug.to_owned();
        }

        Ok(guide)
    }

    /// URL path of the first part of a guide.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NoParts`] if the guide lists no parts, or any
    /// error from [`Site::guide`].
    pub fn first_part_path(&self, slug: &str) -> Result<String, SiteError> {
        let guide = self.guide(slug)?;
        guide
            .first_part()
            .map(|part| part_path(slug, &part.slug))
            .ok_or_else(|| SiteError::NoParts(slug.to_owned()))
    }

    /// Render a part of a guide.
    ///
    /// A missing part body is not an error: the page carries the not-found
    /// content, the title "Not Found" and `found = false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the guide itself cannot be loaded, or if storage
    /// fails for a reason other than a missing file.
    pub fn render_part(&self, guide_slug: &str, part_slug: &str) -> Result<PartPage, SiteError> {
        let guide = self.guide(guide_slug)?;
        let navigation = build_navigation(&guide, guide_slug, part_slug);

        let source = if is_valid_slug(part_slug) {
            match self.storage.read_part(guide_slug, part_slug) {
                Ok(source) => Some(source),
                Err(e) if e.is_not_found() => None,
                Err(e) => return Err(e.into()),
            }
        } else {
            None
        };

        let (result, found, guide_title) = match source {
            Some(source) => (render_source(&source), true, guide.title),
            None => {
                tracing::debug!(guide = %guide_slug, part = %part_slug, "Part not found");
                (self.not_found_page(), false, NOT_FOUND_TITLE.to_owned())
            }
        };

        Ok(PartPage {
            guide_slug: guide_slug.to_owned(),
            guide_title,
            navigation,
            toc: result.toc,
            html: result.html,
            found,
        })
    }

    /// Render the not-found content.
    ///
    /// Falls back to a built-in page when `not-found.md` is missing or
    /// unreadable.
    #[must_use]
    pub fn not_found_page(&self) -> RenderResult {
        let markdown = match self.storage.read_not_found() {
            Ok(text) => text,
            Err(e) => {
                if !e.is_not_found() {
                    tracing::warn!(error = %e, "Failed to read not-found page");
                }
                NOT_FOUND_FALLBACK.to_owned()
            }
        };
        MarkdownRenderer::new().render_markdown(&markdown)
    }

    /// Validate every guide in storage.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Storage`] if storage fails while scanning.
    pub fn check(&self) -> Result<Vec<GuideIssue>, SiteError> {
        let mut issues = Vec::new();

        for slug in self.storage.list_guides()? {
            if !is_valid_slug(&slug) {
                issues.push(GuideIssue::InvalidSlug { guide: slug });
                continue;
            }

            let guide = match GuideConfig::from_toml(&self.storage.read_guide(&slug)?) {
                Ok(guide) => guide,
                Err(e) => {
                    issues.push(GuideIssue::InvalidConfig {
                        guide: slug,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            self.check_guide(&slug, &guide, &mut issues)?;
        }

        Ok(issues)
    }

    fn check_guide(
        &self,
        slug: &str,
        guide: &GuideConfig,
        issues: &mut Vec<GuideIssue>,
    ) -> Result<(), SiteError> {
        if !guide.slug.is_empty() && guide.slug != slug {
            issues.push(GuideIssue::SlugMismatch {
                guide: slug.to_owned(),
                configured: guide.slug.clone(),
            });
        }

        if guide.chapter_parts.is_empty() {
            issues.push(GuideIssue::NoParts {
                guide: slug.to_owned(),
            });
        }

        let mut seen = HashSet::new();
        for part in &guide.chapter_parts {
            let guide_slug = slug.to_owned();
            let part_slug = part.slug.clone();

            if !seen.insert(part.slug.as_str()) {
                issues.push(GuideIssue::DuplicatePart {
                    guide: guide_slug,
                    part: part_slug,
                });
                continue;
            }

            if guide.find_chapter(&part.chapter).is_none() {
                issues.push(GuideIssue::UnknownChapter {
                    guide: guide_slug.clone(),
                    part: part_slug.clone(),
                    chapter: part.chapter.clone(),
                });
            }

            if !is_valid_slug(&part.slug) {
                issues.push(GuideIssue::InvalidPartSlug {
                    guide: guide_slug,
                    part: part_slug,
                });
                continue;
            }

            match self.storage.read_part(slug, &part.slug) {
                Ok(_) => {}
                Err(e) if e.is_not_found() => issues.push(GuideIssue::MissingPart {
                    guide: guide_slug,
                    part: part_slug,
                }),
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }
}

fn render_source(source: &PartSource) -> RenderResult {
    match source {
        PartSource::Markdown(text) => MarkdownRenderer::new().render_markdown(text),
        PartSource::Html(body) => render_html(body),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::MockStorage;

    const RUST: &str = r#"
title = "Rust Basics"
slug = "rust"
description = "Learn Rust."

[[chapters]]
title = "Start"
slug = "start"

[[chapter_parts]]
title = "Install"
slug = "install"
chapter = "Start"

[[chapter_parts]]
title = "Table"
slug = "table"
chapter = "Start"
"#;

    fn site(storage: MockStorage) -> Site {
        Site::new(Arc::new(storage))
    }

    fn rust_site() -> Site {
        site(
            MockStorage::new()
                .with_guide("rust", RUST)
                .with_markdown("rust", "install", "# Install\n\n## Linux\n\nRun rustup.")
                .with_html("rust", "table", "<table><tr><td>1</td></tr></table>")
                .with_not_found("# Gone\n\n## Try again"),
        )
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("rust-basics_2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug(".."));
        assert!(!is_valid_slug("a/b"));
        assert!(!is_valid_slug("intro.md"));
    }

    #[test]
    fn test_guides_skips_broken() {
        let site = site(
            MockStorage::new()
                .with_guide("rust", RUST)
                .with_guide("broken", "title = ")
                .with_guide("zig", "title = \"Zig\""),
        );

        let slugs: Vec<String> = site.guides().into_iter().map(|g| g.slug).collect();
        assert_eq!(slugs, vec!["rust", "zig"]);
    }

    #[test]
    fn test_guide_fills_and_overrides_slug() {
        let site = site(
            MockStorage::new()
                .with_guide("zig", "title = \"Zig\"")
                .with_guide("go", "title = \"Go\"\nslug = \"golang\""),
        );

        assert_eq!(site.guide("zig").unwrap().slug, "zig");
        assert_eq!(site.guide("go").unwrap().slug, "go");
    }

    #[test]
    fn test_guide_errors() {
        let site = site(MockStorage::new().with_guide("broken", "title = "));

        assert!(matches!(site.guide("missing"), Err(SiteError::GuideNotFound(_))));
        assert!(matches!(site.guide("../etc"), Err(SiteError::GuideNotFound(_))));
        assert!(matches!(site.guide("broken"), Err(SiteError::InvalidGuide { .. })));
    }

    #[test]
    fn test_first_part_path() {
        let site = site(
            MockStorage::new()
                .with_guide("rust", RUST)
                .with_guide("empty", "title = \"Empty\""),
        );

        assert_eq!(site.first_part_path("rust").unwrap(), "/guides/rust/install");
        let err = site.first_part_path("empty").unwrap_err();
        assert!(matches!(err, SiteError::NoParts(_)));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_render_markdown_part() {
        let page = rust_site().render_part("rust", "install").unwrap();

        assert!(page.found);
        assert_eq!(page.guide_title, "Rust Basics");
        assert!(page.html.contains(r#"<h2 id="linux">Linux</h2>"#));
        assert_eq!(page.toc.len(), 1);
        assert_eq!(page.toc[0].id, "linux");
        assert_eq!(page.navigation.part_title.as_deref(), Some("Install"));
        assert_eq!(page.navigation.next.unwrap().path, "/guides/rust/table");
    }

    #[test]
    fn test_render_html_part() {
        let page = rust_site().render_part("rust", "table").unwrap();

        assert!(page.found);
        assert_eq!(page.html, "<table><tr><td>1</td></tr></table>");
        assert!(page.toc.is_empty());
        assert_eq!(page.navigation.prev.unwrap().title, "Install");
    }

    #[test]
    fn test_unknown_part_renders_not_found_content() {
        let page = rust_site().render_part("rust", "missing").unwrap();

        assert!(!page.found);
        assert_eq!(page.guide_title, "Not Found");
        assert!(page.html.contains("Gone"));
        assert_eq!(page.toc.len(), 1);
        assert_eq!(page.navigation.chapters[0].parts.len(), 2);
        assert!(page.navigation.prev.is_none());
    }

    #[test]
    fn test_invalid_part_slug_is_not_found() {
        let page = rust_site().render_part("rust", "..").unwrap();
        assert!(!page.found);
    }

    #[test]
    fn test_render_part_unknown_guide() {
        let err = rust_site().render_part("go", "install").unwrap_err();
        assert!(matches!(err, SiteError::GuideNotFound(ref slug) if slug == "go"));
    }

    #[test]
    fn test_not_found_page_fallback() {
        let page = site(MockStorage::new()).not_found_page();
        assert_eq!(page.title.as_deref(), Some("Not Found"));
        assert!(page.html.contains("does not exist"));
    }

    #[test]
    fn test_check_clean_guide() {
        assert_eq!(rust_site().check().unwrap(), Vec::new());
    }

    #[test]
    fn test_check_reports_issues() {
        let guide = r#"
slug = "other"

[[chapters]]
title = "Start"

[[chapter_parts]]
slug = "intro"
chapter = "Start"

[[chapter_parts]]
slug = "intro"
chapter = "Start"

[[chapter_parts]]
slug = "extra"
chapter = "Later"

[[chapter_parts]]
slug = "../x"
chapter = "Start"
"#;
        let site = site(
            MockStorage::new()
                .with_guide("book", guide)
                .with_markdown("book", "intro", "# Intro")
                .with_guide("broken", "title = ")
                .with_guide("empty", "title = \"Empty\""),
        );

        let issues = site.check().unwrap();

        assert_eq!(issues.len(), 7);
        assert_eq!(
            issues[..5].to_vec(),
            vec![
                GuideIssue::SlugMismatch {
                    guide: "book".to_owned(),
                    configured: "other".to_owned(),
                },
                GuideIssue::DuplicatePart {
                    guide: "book".to_owned(),
                    part: "intro".to_owned(),
                },
                GuideIssue::UnknownChapter {
                    guide: "book".to_owned(),
                    part: "extra".to_owned(),
                    chapter: "Later".to_owned(),
                },
                GuideIssue::MissingPart {
                    guide: "book".to_owned(),
                    part: "extra".to_owned(),
                },
                GuideIssue::InvalidPartSlug {
                    guide: "book".to_owned(),
                    part: "../x".to_owned(),
                },
            ]
        );
        assert!(matches!(&issues[5], GuideIssue::InvalidConfig { guide, .. } if guide == "broken"));
        assert_eq!(
            issues[6],
            GuideIssue::NoParts {
                guide: "empty".to_owned()
            }
        );
    }

    #[test]
    fn test_issue_display() {
        let issue = GuideIssue::MissingPart {
            guide: "rust".to_owned(),
            part: "intro".to_owned(),
        };
        assert_eq!(issue.to_string(), "rust/intro: no intro.md or intro.html");
    }
}
