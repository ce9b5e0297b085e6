//! In-memory page tree for one build.
//!
//! # Architecture
//!
//! Pages are stored in a flat `Vec<Page>`. Parent/children relationships and
//! the prev/next reading order are tracked by [`PageId`] indices, so the tree
//! has no reference cycles and is dropped in one piece after the build.
//! The first page added is the root.

use std::path::{Path, PathBuf};

/// Index of a page in a [`BookTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageId(usize);

impl PageId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Page content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageBody {
    /// Rendered HTML.
    Html(String),
    /// Placeholder replaced by the table of contents at write time.
    TableOfContents,
}

/// One renderable document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    /// Manifest entry name this page came from.
    pub chapter: String,
    /// Source markdown file.
    pub source: PathBuf,
    /// Output file.
    pub target: PathBuf,
    pub title: String,
    pub body: PageBody,
}

impl Page {
    /// Whether this page marks the table of contents position.
    #[must_use]
    pub fn is_toc_marker(&self) -> bool {
        self.body == PageBody::TableOfContents
    }
}

/// Breadcrumb navigation item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreadcrumbItem {
    pub title: String,
    /// Output file of the ancestor.
    pub target: PathBuf,
}

/// Arena of pages with tree and reading-order links.
#[derive(Clone, Debug, Default)]
pub struct BookTree {
    pages: Vec<Page>,
    children: Vec<Vec<PageId>>,
    parents: Vec<Option<PageId>>,
    prev: Vec<Option<PageId>>,
    next: Vec<Option<PageId>>,
}

impl BookTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page under `parent`, appended after its existing children.
    pub fn add_page(&mut self, page: Page, parent: Option<PageId>) -> PageId {
        let id = PageId(self.pages.len());
        self.pages.push(page);
        self.children.push(Vec::new());
        self.parents.push(parent);
        self.prev.push(None);
        self.next.push(None);
        if let Some(parent) = parent {
            self.children[parent.0].push(id);
        }
        id
    }

    /// Root page, `None` for an empty tree.
    #[must_use]
    pub fn root(&self) -> Option<PageId> {
        (!self.pages.is_empty()).then_some(PageId(0))
    }

    #[must_use]
    pub fn page(&self, id: PageId) -> &Page {
        &self.pages[id.0]
    }

    #[must_use]
    pub fn children(&self, id: PageId) -> &[PageId] {
        &self.children[id.0]
    }

    #[must_use]
    pub fn parent(&self, id: PageId) -> Option<PageId> {
        self.parents[id.0]
    }

    #[must_use]
    pub fn prev(&self, id: PageId) -> Option<PageId> {
        self.prev[id.0]
    }

    #[must_use]
    pub fn next(&self, id: PageId) -> Option<PageId> {
        self.next[id.0]
    }

    /// Set the reading-order neighbours of a page.
    pub fn set_links(&mut self, id: PageId, prev: Option<PageId>, next: Option<PageId>) {
        self.prev[id.0] = prev;
        self.next[id.0] = next;
    }

    /// Ancestors from the parent up to the root.
    #[must_use]
    pub fn ancestors(&self, id: PageId) -> Vec<PageId> {
        let mut ancestors = Vec::new();
        let mut current = self.parents[id.0];
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.parents[parent.0];
        }
        ancestors
    }

    /// Breadcrumbs from the outermost section down to the parent.
    ///
    /// The root is not included since every page already links to it.
    #[must_use]
    pub fn breadcrumbs(&self, id: PageId) -> Vec<BreadcrumbItem> {
        let mut crumbs: Vec<BreadcrumbItem> = self
            .ancestors(id)
            .into_iter()
            .filter(|&a| self.parents[a.0].is_some())
            .map(|a| BreadcrumbItem {
                title: self.pages[a.0].title.clone(),
                target: self.pages[a.0].target.clone(),
            })
            .collect();
        crumbs.reverse();
        crumbs
    }

    /// The root followed by its direct children.
    #[must_use]
    pub fn top_level(&self) -> Vec<PageId> {
        self.root()
            .map(|root| {
                std::iter::once(root)
                    .chain(self.children[root.0].iter().copied())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Find a page by its source path.
    #[must_use]
    pub fn find_by_source(&self, source: &Path) -> Option<PageId> {
        self.pages.iter().position(|p| p.source == source).map(PageId)
    }

    /// All page ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = PageId> {
        (0..self.pages.len()).map(PageId)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn page(name: &str) -> Page {
        Page {
            chapter: name.to_owned(),
            source: PathBuf::from(format!("/src/{name}.md")),
            target: PathBuf::from(format!("/out/{name}.html")),
            title: name.to_uppercase(),
            body: PageBody::Html(String::new()),
        }
    }

    #[test]
    fn test_add_page_links_parent_and_children() {
        let mut tree = BookTree::new();
        let root = tree.add_page(page("index"), None);
        let a = tree.add_page(page("a"), Some(root));
        let b = tree.add_page(page("b"), Some(root));

        assert_eq!(tree.root(), Some(root));
        assert_eq!(tree.children(root), [a, b]);
        assert_eq!(tree.parent(b), Some(root));
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_empty_tree_has_no_root() {
        let tree = BookTree::new();
        assert_eq!(tree.root(), None);
        assert!(tree.top_level().is_empty());
    }

    #[test]
    fn test_breadcrumbs_exclude_root() {
        let mut tree = BookTree::new();
        let root = tree.add_page(page("index"), None);
        let part = tree.add_page(page("part"), Some(root));
        let sub = tree.add_page(page("sub"), Some(part));
        let leaf = tree.add_page(page("leaf"), Some(sub));

        let titles: Vec<String> = tree.breadcrumbs(leaf).into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["PART", "SUB"]);
        assert!(tree.breadcrumbs(part).is_empty());
        assert_eq!(tree.ancestors(leaf), vec![sub, part, root]);
    }

    #[test]
    fn test_top_level() {
        let mut tree = BookTree::new();
        let root = tree.add_page(page("index"), None);
        let part = tree.add_page(page("part"), Some(root));
        tree.add_page(page("nested"), Some(part));
        let last = tree.add_page(page("last"), Some(root));

        assert_eq!(tree.top_level(), vec![root, part, last]);
    }

    #[test]
    fn test_find_by_source() {
        let mut tree = BookTree::new();
        let root = tree.add_page(page("index"), None);
        let a = tree.add_page(page("a"), Some(root));

        assert_eq!(tree.find_by_source(Path::new("/src/a.md")), Some(a));
        assert_eq!(tree.find_by_source(Path::new("/src/z.md")), None);
    }
}
