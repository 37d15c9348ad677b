//! Markdown to HTML rendering for Guidebook pages.
//!
//! [`MarkdownRenderer`] walks `pulldown-cmark` events and writes HTML itself,
//! which lets it:
//! - assign stable, unique `id` attributes to every heading
//! - collect a table of contents ([`TocEntry`]) for the guide sidebar
//! - open absolute links in a new tab
//! - tag fenced code blocks with `language-*` classes for client-side highlighting
//!
//! Parts written in raw HTML go through [`render_html`] instead.
//!
//! # Example
//!
//! ```
//! use gb_renderer::MarkdownRenderer;
//!
//! let result = MarkdownRenderer::new().render_markdown("# Intro\n\n## Setup\n\nText.");
//! assert_eq!(result.title.as_deref(), Some("Intro"));
//! assert_eq!(result.toc[0].id, "setup");
//! ```

mod html;
mod renderer;
mod state;
mod util;

pub use html::render_html;
pub use renderer::{MarkdownRenderer, RenderResult};
pub use state::{TocEntry, escape_html};
pub use util::slugify;
