//! Build pipeline.
//!
//! Phases run strictly in order: tree construction, navigation threading,
//! table of contents synthesis, then rendering and writing every page. The
//! output directory mirrors the book's directory layout, so relative image
//! links keep working after local images are copied over.

use std::path::{Path, PathBuf};

use crate::builder::{TreeBuilder, TreeWarning};
use crate::config::BookConfig;
use crate::manifest::{Manifest, ManifestError};
use crate::paths::relative_link;
use crate::render::MarkdownRenderer;
use crate::template::{
    PageContext, STYLE_FILE, SectionHeader, TemplateError, TemplateRenderer, Theme, TitleItem,
};
use crate::tree::{BookTree, PageBody, PageId};
use crate::{assets, frontmatter, navigation, toc};

/// Error type for the build pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// Output could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The book produced no pages.
    #[error("Book has no pages")]
    EmptyBook,
}

/// Summary of a finished build.
#[derive(Debug, Default)]
pub struct PublishReport {
    /// Rendered pages in document order.
    pub pages: Vec<PathBuf>,
    /// Structural problems found while building the tree.
    pub warnings: Vec<TreeWarning>,
    /// Referenced local images that do not exist.
    pub missing_images: Vec<PathBuf>,
}

/// Links shared by every page, as absolute output paths.
struct SharedTargets {
    index: PathBuf,
    toc: PathBuf,
    style: PathBuf,
    book_title: String,
    copyright: String,
}

/// Renders a book to a directory.
pub struct Publisher<'a> {
    config: &'a BookConfig,
    markdown: &'a dyn MarkdownRenderer,
    templates: &'a dyn TemplateRenderer,
}

impl<'a> Publisher<'a> {
    #[must_use]
    pub fn new(
        config: &'a BookConfig,
        markdown: &'a dyn MarkdownRenderer,
        templates: &'a dyn TemplateRenderer,
    ) -> Self {
        Self {
            config,
            markdown,
            templates,
        }
    }

    /// Build the book described by `book_file` into `output_dir`.
    pub fn publish(&self, book_file: &Path, output_dir: &Path, theme: &Theme) -> Result<PublishReport, PublishError> {
        let manifest = Manifest::load(book_file, self.config.manifest_kind(book_file))?;
        let outcome = TreeBuilder::new(self.config, self.markdown).build(book_file, output_dir)?;
        let mut tree = outcome.tree;

        let order = navigation::link(&mut tree);
        let root = tree.root().ok_or(PublishError::EmptyBook)?;

        let top_level = tree.top_level();
        let toc_page = top_level.iter().copied().find(|&id| tree.page(id).is_toc_marker());
        let index = output_dir.join(self.config.index_output_name());
        let toc_target = toc_page.map_or_else(|| index.clone(), |id| tree.page(id).target.clone());
        let toc_html = toc::generate(&tree, &top_level, &toc_target);

        let shared = SharedTargets {
            index,
            toc: toc_target,
            style: output_dir.join(STYLE_FILE),
            book_title: tree.page(root).title.clone(),
            copyright: manifest.copyright().to_owned(),
        };

        write_output(&shared.style, &theme.style)?;

        let mut report = PublishReport {
            warnings: outcome.warnings,
            ..PublishReport::default()
        };

        for id in order {
            let context = page_context(&tree, id, &shared, &toc_html);
            let html = self.templates.render(&theme.template, &context)?;
            let target = &tree.page(id).target;
            write_output(target, &html)?;
            report.pages.push(target.clone());
            report.missing_images.extend(self.copy_images(&tree, id, output_dir)?);
        }

        for image in &report.missing_images {
            tracing::warn!(image = %image.display(), "Missing image");
        }
        tracing::info!(pages = report.pages.len(), output = %output_dir.display(), "Build finished");
        Ok(report)
    }

    /// Copy local images referenced by a page's source into the output tree.
    fn copy_images(&self, tree: &BookTree, id: PageId, output_dir: &Path) -> Result<Vec<PathBuf>, PublishError> {
        let page = tree.page(id);
        if page.is_toc_marker() || !page.source.is_file() {
            return Ok(Vec::new());
        }
        let doc = match frontmatter::read(&page.source, self.config.frontmatter) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(path = %page.source.display(), error = %e, "Skipping images");
                return Ok(Vec::new());
            }
        };
        assets::copy_local_images(&doc.body, &page.source, &page.target, output_dir).map_err(|source| {
            PublishError::Io {
                path: page.target.clone(),
                source,
            }
        })
    }
}

fn page_context(tree: &BookTree, id: PageId, shared: &SharedTargets, toc_html: &str) -> PageContext {
    let page = tree.page(id);
    let link = |to: &Path| relative_link(&page.target, to);

    let sections: Vec<PageId> = tree
        .ancestors(id)
        .into_iter()
        .filter(|&a| tree.parent(a).is_some())
        .collect();

    let mut titles = vec![TitleItem {
        title: page.title.clone(),
    }];
    titles.extend(sections.iter().map(|&a| TitleItem {
        title: tree.page(a).title.clone(),
    }));

    let section_headers = tree
        .breadcrumbs(id)
        .into_iter()
        .map(|crumb| SectionHeader {
            href: link(&crumb.target),
            title: crumb.title,
        })
        .collect();

    let body = match &page.body {
        PageBody::Html(html) => html.clone(),
        PageBody::TableOfContents => format!("<ul class=\"toc\">\n{toc_html}</ul>\n"),
    };

    PageContext {
        body,
        title: page.title.clone(),
        titles,
        section_headers,
        header: page.title.clone(),
        prev: tree.prev(id).map(|p| link(&tree.page(p).target)).unwrap_or_default(),
        next: tree.next(id).map(|n| link(&tree.page(n).target)).unwrap_or_default(),
        index_html: link(&shared.index),
        toc_html: link(&shared.toc),
        style_css: link(&shared.style),
        book_title: shared.book_title.clone(),
        copyright: shared.copyright.clone(),
    }
}

fn write_output(path: &Path, content: &str) -> Result<(), PublishError> {
    let io_err = |source| PublishError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(io_err)?;
    }
    tracing::debug!(path = %path.display(), "Writing page");
    std::fs::write(path, content).map_err(io_err)
}
