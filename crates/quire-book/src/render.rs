//! Markdown to HTML conversion.

use pulldown_cmark::{Options, Parser};

/// Converts a markdown body to an HTML fragment.
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> String;
}

/// `CommonMark` renderer backed by pulldown-cmark.
///
/// Enables tables, footnotes, strikethrough, task lists and `{#id}` heading
/// attributes.
#[derive(Clone, Copy, Debug, Default)]
pub struct CommonMarkRenderer;

impl CommonMarkRenderer {
    /// Get parser options.
    #[must_use]
    pub fn parser_options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES
    }
}

impl MarkdownRenderer for CommonMarkRenderer {
    fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, Self::parser_options());
        let mut html = String::with_capacity(markdown.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, parser);
        html
    }
}

/// Escape text for use in HTML content and attribute values.
#[must_use]
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

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_render_paragraph() {
        assert_eq!(CommonMarkRenderer.render("Hello *world*"), "<p>Hello <em>world</em></p>\n");
    }

    #[test]
    fn test_render_heading_id() {
        let html = CommonMarkRenderer.render("## Setup {#setup}");
        assert_eq!(html, "<h2 id=\"setup\">Setup</h2>\n");
    }

    #[test]
    fn test_render_table() {
        let html = CommonMarkRenderer.render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_render_strikethrough_and_tasks() {
        let html = CommonMarkRenderer.render("~~gone~~\n\n- [x] done\n");
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("checkbox"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">Tom & Jerry's</a>"), "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#x27;s&lt;/a&gt;");
    }
}
