//! Table of contents generation.

use std::fmt::Write;
use std::path::Path;

use crate::paths::relative_link;
use crate::render::escape_html;
use crate::tree::{BookTree, PageId};

const INDENT: &str = "    ";

/// Render the table of contents as nested `<li>` items.
///
/// `entries` is the top-level sequence, usually [`BookTree::top_level`]. When
/// it contains the TOC marker page, only entries after the marker are listed.
/// The book's own index page is never listed. Links are relative to
/// `link_base`, the file the table of contents is embedded in.
#[must_use]
pub fn generate(tree: &BookTree, entries: &[PageId], link_base: &Path) -> String {
    let listed = match entries.iter().position(|&id| tree.page(id).is_toc_marker()) {
        Some(marker) => &entries[marker + 1..],
        None => entries,
    };

    let mut html = String::new();
    for &id in listed {
        if Some(id) == tree.root() {
            continue;
        }
        write_item(tree, id, link_base, "  ", &mut html);
        html.push('\n');
    }
    html
}

fn write_item(tree: &BookTree, id: PageId, link_base: &Path, indent: &str, out: &mut String) {
    let page = tree.page(id);
    let _ = write!(
        out,
        "{indent}<li><a href=\"{}\">{}</a>",
        escape_html(&relative_link(link_base, &page.target)),
        escape_html(&page.title)
    );

    let children = tree.children(id);
    if !children.is_empty() {
        let nested = format!("{indent}{INDENT}");
        let _ = writeln!(out, "\n{nested}<ul>");
        for &child in children {
            write_item(tree, child, link_base, &nested, out);
            out.push('\n');
        }
        let _ = write!(out, "{nested}</ul>\n{indent}");
    }
    out.push_str("</li>");
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tree::{Page, PageBody};

    fn page(name: &str, body: PageBody) -> Page {
        Page {
            chapter: format!("{name}.md"),
            source: PathBuf::from(format!("/src/{name}.md")),
            target: PathBuf::from(format!("/out/{name}.html")),
            title: name.to_uppercase(),
            body,
        }
    }

    fn html(name: &str) -> Page {
        page(name, PageBody::Html(String::new()))
    }

    #[test]
    fn test_entries_after_marker_only() {
        let mut tree = BookTree::new();
        let root = tree.add_page(html("index"), None);
        let p0 = tree.add_page(html("p0"), Some(root));
        let marker = tree.add_page(page("toc", PageBody::TableOfContents), Some(root));
        let p1 = tree.add_page(html("p1"), Some(root));
        let p2 = tree.add_page(html("p2"), Some(root));

        let toc = generate(&tree, &[p0, marker, p1, p2], Path::new("/out/index.html"));

        assert_eq!(
            toc,
            "  <li><a href=\"p1.html\">P1</a></li>\n  <li><a href=\"p2.html\">P2</a></li>\n"
        );
    }

    #[test]
    fn test_without_marker_lists_all_but_index() {
        let mut tree = BookTree::new();
        let root = tree.add_page(html("index"), None);
        let a = tree.add_page(html("a"), Some(root));

        let toc = generate(&tree, &tree.top_level(), Path::new("/out/index.html"));

        assert_eq!(toc, "  <li><a href=\"a.html\">A</a></li>\n");
        assert!(!toc.contains("INDEX"));
        assert_eq!(tree.top_level(), vec![root, a]);
    }

    #[test]
    fn test_nested_children_recursive() {
        let mut tree = BookTree::new();
        let root = tree.add_page(html("index"), None);
        let part = tree.add_page(html("part"), Some(root));
        let inner = tree.add_page(html("inner"), Some(part));
        tree.add_page(html("deep"), Some(inner));

        let toc = generate(&tree, &tree.top_level(), Path::new("/out/index.html"));

        assert_eq!(
            toc,
            concat!(
                "  <li><a href=\"part.html\">PART</a>\n",
                "      <ul>\n",
                "      <li><a href=\"inner.html\">INNER</a>\n",
                "          <ul>\n",
                "          <li><a href=\"deep.html\">DEEP</a></li>\n",
                "          </ul>\n",
                "      </li>\n",
                "      </ul>\n",
                "  </li>\n",
            )
        );
    }

    #[test]
    fn test_titles_are_escaped() {
        let mut tree = BookTree::new();
        let root = tree.add_page(html("index"), None);
        let mut odd = html("odd");
        odd.title = "Q&A <draft>".to_owned();
        tree.add_page(odd, Some(root));

        let toc = generate(&tree, &tree.top_level(), Path::new("/out/index.html"));

        assert!(toc.contains(">Q&amp;A &lt;draft&gt;</a>"));
    }
}
