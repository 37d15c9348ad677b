//! Guides, chapters and parts for Guidebook.
//!
//! This crate provides:
//! - [`GuideConfig`]: the per-guide `content.toml` model
//! - [`Storage`]: read access to guide configs and part bodies
//! - [`build_navigation`]: the chapter menu with active part and prev/next links
//! - [`Site`]: ties storage and rendering together for the HTTP layer
//!
//! # Content Layout
//!
//! ```text
//! guides/
//! ├── not-found.md          # shown for unknown parts
//! └── rust-basics/
//!     ├── content.toml      # title, slug, description, chapters, chapter_parts
//!     ├── intro.md          # part body (markdown)
//!     └── cheatsheet.html   # part body (raw HTML)
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use gb_site::{FsStorage, Site};
//!
//! let site = Site::new(Arc::new(FsStorage::new(PathBuf::from("guides"))));
//! for guide in site.guides() {
//!     println!("{}: {}", guide.slug, guide.title);
//! }
//! ```

mod fs;
mod guide;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod navigation;
mod site;
mod storage;

pub use fs::FsStorage;
pub use guide::{ChapterConfig, ChapterPartConfig, GuideConfig, GuideError};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockStorage;
pub use navigation::{ChapterNav, GuideNavigation, PartLink, build_navigation, part_path};
pub use site::{GuideIssue, PartPage, Site, SiteError, is_valid_slug};
pub use storage::{PartSource, Storage, StorageError};

// Re-export TocEntry from gb-renderer for convenience
pub use gb_renderer::TocEntry;
