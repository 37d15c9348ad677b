//! Raw HTML parts.

use crate::renderer::RenderResult;

/// Wrap an HTML part body as a render result.
///
/// The body is trusted site content and is passed through unchanged. No
/// title or table of contents is extracted from raw HTML.
pub fn render_html(body: &str) -> RenderResult {
    RenderResult {
        html: body.to_owned(),
        title: None,
        toc: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_html_passthrough() {
        let body = "<h2 id=\"x\">X</h2>\n<p>Body</p>";
        let result = render_html(body);
        assert_eq!(result.html, body);
        assert!(result.title.is_none());
        assert!(result.toc.is_empty());
    }
}
