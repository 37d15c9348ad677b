//! Guide navigation menu.
//!
//! Groups the flat `chapter_parts` list under the chapters they name,
//! marks the part being read, and finds its neighbours in reading order:
//!
//! ```text
//! Getting Started
//!     Installation
//!     Hello World      <- active
//! Ownership
//!     Borrowing
//! ```

use serde::Serialize;

use crate::guide::{ChapterPartConfig, GuideConfig};

/// Link to a part.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PartLink {
    /// Part title.
    pub title: String,
    /// URL path (`/guides/<guide>/<part>`).
    pub path: String,
    /// True for the part being rendered.
    pub is_active: bool,
}

/// A chapter with its parts, for the sidebar.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChapterNav {
    /// Chapter title.
    pub title: String,
    /// Chapter slug.
    pub slug: String,
    /// Parts of this chapter in reading order.
    pub parts: Vec<PartLink>,
}

/// Navigation for one rendered part.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GuideNavigation {
    /// Chapters in configuration order.
    pub chapters: Vec<ChapterNav>,
    /// Title of the active part.
    pub part_title: Option<String>,
    /// Chapter of the active part (as written in the part config).
    pub chapter_title: Option<String>,
    /// Part before the active one in reading order.
    pub prev: Option<PartLink>,
    /// Part after the active one in reading order.
    pub next: Option<PartLink>,
}

/// URL path of a part.
pub fn part_path(guide_slug: &str, part_slug: &str) -> String {
    format!("/guides/{guide_slug}/{part_slug}")
}

fn link(guide_slug: &str, part: &ChapterPartConfig, is_active: bool) -> PartLink {
    PartLink {
        title: part.title.clone(),
        path: part_path(guide_slug, &part.slug),
        is_active,
    }
}

/// Build the navigation for `active_part` of a guide.
///
/// Parts whose `chapter` matches no chapter title are left out of the menu
/// but still take part in prev/next. An unknown `active_part` yields a menu
/// with nothing active and no neighbours.
pub fn build_navigation(guide: &GuideConfig, guide_slug: &str, active_part: &str) -> GuideNavigation {
    let parts = &guide.chapter_parts;
    let active = parts.iter().position(|part| part.slug == active_part);

    let chapters = guide
        .chapters
        .iter()
        .map(|chapter| ChapterNav {
            title: chapter.title.clone(),
            slug: chapter.slug.clone(),
            parts: parts
                .iter()
                .filter(|part| part.chapter == chapter.title)
                .map(|part| link(guide_slug, part, part.slug == active_part))
                .collect(),
        })
        .collect();

    let Some(index) = active else {
        return GuideNavigation {
            chapters,
            ..GuideNavigation::default()
        };
    };

    let current = &parts[index];
    GuideNavigation {
        chapters,
        part_title: Some(current.title.clone()),
        chapter_title: Some(current.chapter.clone()),
        prev: index
            .checked_sub(1)
            .and_then(|i| parts.get(i))
            .map(|part| link(guide_slug, part, false)),
        next: parts.get(index + 1).map(|part| link(guide_slug, part, false)),
    }
}
