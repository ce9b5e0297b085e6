//! Book structure, editing and HTML publishing for quire.
//!
//! A book is a directory of markdown pages held together by JSON descriptors:
//! `.book.json` at the root and `.chapter.json` in every chapter directory.
//! Each descriptor lists its level's pages and chapters in reading order.
//!
//! This crate provides:
//! - [`Project`]: editing operations on one level of a book (add, new, split)
//! - [`Publisher`]: the build pipeline turning a book into linked HTML pages
//! - [`split_document`]: cutting a manuscript into pages at its headings
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::Path;
//! use quire_book::{BookConfig, CommonMarkRenderer, MiniJinjaRenderer, Publisher, Theme};
//!
//! let config = BookConfig::default();
//! let templates = MiniJinjaRenderer::new();
//! let publisher = Publisher::new(&config, &CommonMarkRenderer, &templates);
//! let report = publisher.publish(Path::new("book/.book.json"), Path::new("html"), &Theme::builtin())?;
//! println!("{} pages", report.pages.len());
//! # Ok(())
//! # }
//! ```

mod assets;
mod builder;
mod config;
pub mod frontmatter;
mod manifest;
pub mod navigation;
mod paths;
mod project;
mod publish;
mod render;
pub mod sections;
mod split;
mod template;
pub mod toc;
mod tree;

pub use assets::{Relocation, copy_local_images, is_remote, list_images, rewrite_image_links};
pub use builder::{BuildOutcome, TOC_TITLE, TreeBuilder, TreeWarning};
pub use config::BookConfig;
pub use frontmatter::{Frontmatter, FrontmatterError, FrontmatterStyle, ReconcileOutcome};
pub use manifest::{
    BookManifest, ChapterManifest, Manifest, ManifestError, ManifestKind, find_enclosing_manifest,
    markdown_files,
};
pub use paths::relative_link;
pub use project::{AddOutcome, InitOutcome, NewPageOutcome, Project, ProjectError, name_from_title};
pub use publish::{PublishError, PublishReport, Publisher};
pub use render::{CommonMarkRenderer, MarkdownRenderer, escape_html};
pub use sections::{SplitDocument, SplitOptions, split_document};
pub use split::{
    ImportPlan, PlannedPage, SplitPlan, SplitReport, SplitWarning, import, page_file_name,
    plan_import,
};
pub use template::{
    MiniJinjaRenderer, PageContext, STYLE_FILE, SectionHeader, TEMPLATE_FILE, TemplateError,
    TemplateRenderer, Theme, TitleItem,
};
pub use tree::{BookTree, BreadcrumbItem, Page, PageBody, PageId};
