//! Renderer state and shared output helpers.

use std::collections::HashSet;

use crate::util::slugify;

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TocEntry {
    /// Heading level (2-6).
    pub level: u8,
    /// Heading text without markup.
    pub title: String,
    /// Anchor ID.
    pub id: String,
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// A heading that has been fully read.
pub(crate) struct CompletedHeading {
    pub(crate) level: u8,
    pub(crate) id: String,
    pub(crate) html: String,
}

/// Tracks the heading being read, assigned ids, title and toc.
#[derive(Default)]
pub(crate) struct HeadingState {
    current: Option<OpenHeading>,
    used_ids: HashSet<String>,
    title: Option<String>,
    toc: Vec<TocEntry>,
}

struct OpenHeading {
    level: u8,
    explicit_id: Option<String>,
    text: String,
    html: String,
}

impl HeadingState {
    pub(crate) fn start(&mut self, level: u8, explicit_id: Option<String>) {
        self.current = Some(OpenHeading {
            level,
            explicit_id,
            text: String::new(),
            html: String::new(),
        });
    }

    pub(crate) fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Append rendered markup to the open heading.
    pub(crate) fn push_html(&mut self, html: &str) {
        if let Some(heading) = &mut self.current {
            heading.html.push_str(html);
        }
    }

    /// Append plain text (used for the id, toc and title).
    pub(crate) fn push_text(&mut self, text: &str) {
        if let Some(heading) = &mut self.current {
            heading.text.push_str(text);
        }
    }

    /// Close the open heading, assign its id and record title/toc.
    pub(crate) fn complete(&mut self) -> Option<CompletedHeading> {
        let heading = self.current.take()?;
        let text = heading.text.trim().to_owned();

        let base = heading
            .explicit_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| slugify(&text));
        let id = if base.is_empty() {
            base
        } else {
            self.unique_id(base)
        };

        if heading.level == 1 {
            if self.title.is_none() {
                self.title = Some(text);
            }
        } else if !id.is_empty() {
            self.toc.push(TocEntry {
                level: heading.level,
                title: text,
                id: id.clone(),
            });
        }

        Some(CompletedHeading {
            level: heading.level,
            id,
            html: heading.html.trim().to_owned(),
        })
    }

    /// Return `base`, or `base-N` with the smallest N not yet taken.
    fn unique_id(&mut self, base: String) -> String {
        if self.used_ids.insert(base.clone()) {
            return base;
        }
        let mut n = 1;
        loop {
            let candidate = format!("{base}-{n}");
            if self.used_ids.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    pub(crate) fn take_title(&mut self) -> Option<String> {
        self.title.take()
    }

    pub(crate) fn take_toc(&mut self) -> Vec<TocEntry> {
        std::mem::take(&mut self.toc)
    }
}
