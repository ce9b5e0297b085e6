//! Per-book naming conventions.

use std::path::{Path, PathBuf};

use crate::frontmatter::FrontmatterStyle;
use crate::manifest::ManifestKind;

/// Immutable configuration for one book.
///
/// Built once per command and passed by reference to every component, so
/// two books with different conventions can be processed side by side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookConfig {
    /// Book descriptor file name, present once at the book root.
    pub book_file: String,
    /// Chapter descriptor file name, present in every sub-tree directory.
    pub chapter_file: String,
    /// Index page implicitly heading every level.
    pub index_file: String,
    /// Manifest entry that marks where the table of contents goes.
    pub toc_file: String,
    /// Extension of rendered pages.
    pub extension: String,
    /// Frontmatter delimiter style.
    pub frontmatter: FrontmatterStyle,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            book_file: ".book.json".to_owned(),
            chapter_file: ".chapter.json".to_owned(),
            index_file: "index.md".to_owned(),
            toc_file: "toc.md".to_owned(),
            extension: "html".to_owned(),
            frontmatter: FrontmatterStyle::default(),
        }
    }
}

impl BookConfig {
    /// Descriptor kind for a manifest path, decided by its file name.
    #[must_use]
    pub fn manifest_kind(&self, manifest_path: &Path) -> ManifestKind {
        if manifest_path
            .file_name()
            .is_some_and(|name| name == self.book_file.as_str())
        {
            ManifestKind::Book
        } else {
            ManifestKind::Chapter
        }
    }

    /// Whether `path` names an index file.
    #[must_use]
    pub fn is_index(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| name == self.index_file.as_str())
    }

    /// Output path of a chapter, relative to its level's output directory.
    #[must_use]
    pub fn output_name(&self, chapter: &str) -> PathBuf {
        Path::new(chapter).with_extension(&self.extension)
    }

    /// Output file name of a level's index page.
    #[must_use]
    pub fn index_output_name(&self) -> PathBuf {
        self.output_name(&self.index_file)
    }
}
