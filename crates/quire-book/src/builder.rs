//! Tree assembly from chapter descriptors.
//!
//! [`TreeBuilder::build`] walks a descriptor in order and resolves each entry
//! to a leaf page or, for directories, a recursively built sub-tree. Problems
//! with individual entries are collected as [`TreeWarning`]s and never stop
//! the walk; only an unreadable root descriptor is fatal.

use std::path::{Path, PathBuf};

use crate::config::BookConfig;
use crate::frontmatter::{self, guess_title};
use crate::manifest::{Manifest, ManifestError};
use crate::render::MarkdownRenderer;
use crate::tree::{BookTree, Page, PageBody, PageId};

/// Title of the synthetic table of contents page.
pub const TOC_TITLE: &str = "Table of Contents";

/// Structural problem found while building a tree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeWarning {
    /// A level has no index file; its root page is empty.
    #[error("Missing index file {}", .0.display())]
    MissingIndex(PathBuf),
    /// Frontmatter could not be parsed; the page uses its guessed title.
    #[error("Malformed frontmatter in {}: {message}", path.display())]
    MalformedFrontmatter { path: PathBuf, message: String },
    /// A directory entry has no chapter descriptor.
    #[error("Missing chapter descriptor {}", .0.display())]
    MissingChapterDescriptor(PathBuf),
    /// A page or nested descriptor exists but could not be read.
    #[error("Failed to read {}: {message}", path.display())]
    Unreadable { path: PathBuf, message: String },
    /// An entry is neither a file nor a directory.
    #[error("Neither file nor directory: {}", .0.display())]
    UnresolvableReference(PathBuf),
    /// The index file is listed explicitly; it is always included anyway.
    #[error("{} is always the first page of its level, ignoring entry", .0.display())]
    ListedIndex(PathBuf),
}

/// Result of [`TreeBuilder::build`].
#[derive(Debug)]
pub struct BuildOutcome {
    pub tree: BookTree,
    pub warnings: Vec<TreeWarning>,
}

/// Builds a [`BookTree`] from a descriptor.
pub struct TreeBuilder<'a> {
    config: &'a BookConfig,
    renderer: &'a dyn MarkdownRenderer,
}

impl<'a> TreeBuilder<'a> {
    #[must_use]
    pub fn new(config: &'a BookConfig, renderer: &'a dyn MarkdownRenderer) -> Self {
        Self { config, renderer }
    }

    /// Build the tree rooted at `manifest_path`, placing output under
    /// `target_dir`.
    pub fn build(&self, manifest_path: &Path, target_dir: &Path) -> Result<BuildOutcome, ManifestError> {
        let mut tree = BookTree::new();
        let mut warnings = Vec::new();
        self.build_level(manifest_path, target_dir, None, &mut tree, &mut warnings)?;

        for warning in &warnings {
            tracing::warn!(%warning, "Book structure");
        }
        Ok(BuildOutcome { tree, warnings })
    }

    fn build_level(
        &self,
        manifest_path: &Path,
        target_dir: &Path,
        parent: Option<PageId>,
        tree: &mut BookTree,
        warnings: &mut Vec<TreeWarning>,
    ) -> Result<PageId, ManifestError> {
        let manifest = Manifest::load(manifest_path, self.config.manifest_kind(manifest_path))?;
        let source_dir = manifest_path.parent().unwrap_or(Path::new("."));
        tracing::debug!(dir = %source_dir.display(), "Building level");

        let index_source = source_dir.join(&self.config.index_file);
        let root_page = if index_source.is_file() {
            self.load_page(&self.config.index_file, &index_source, target_dir.join(self.config.index_output_name()), warnings)
        } else {
            warnings.push(TreeWarning::MissingIndex(index_source.clone()));
            Page {
                chapter: self.config.index_file.clone(),
                title: guess_title(&index_source, &self.config.index_file),
                source: index_source,
                target: target_dir.join(self.config.index_output_name()),
                body: PageBody::Html(String::new()),
            }
        };
        let root = tree.add_page(root_page, parent);

        for chapter in manifest.chapters() {
            let source = source_dir.join(chapter);

            if *chapter == self.config.toc_file {
                let page = Page {
                    chapter: chapter.clone(),
                    source,
                    target: target_dir.join(self.config.output_name(chapter)),
                    title: TOC_TITLE.to_owned(),
                    body: PageBody::TableOfContents,
                };
                tree.add_page(page, Some(root));
            } else if *chapter == self.config.index_file {
                warnings.push(TreeWarning::ListedIndex(source));
            } else if source.is_file() {
                let target = target_dir.join(self.config.output_name(chapter));
                let page = self.load_page(chapter, &source, target, warnings);
                tree.add_page(page, Some(root));
            } else if source.is_dir() {
                let nested = source.join(&self.config.chapter_file);
                if !nested.is_file() {
                    warnings.push(TreeWarning::MissingChapterDescriptor(nested));
                    continue;
                }
                let nested_target = target_dir.join(chapter);
                if let Err(e) = self.build_level(&nested, &nested_target, Some(root), tree, warnings) {
                    warnings.push(TreeWarning::Unreadable {
                        path: nested,
                        message: e.to_string(),
                    });
                }
            } else {
                warnings.push(TreeWarning::UnresolvableReference(source));
            }
        }

        Ok(root)
    }

    /// Read a page file and render its body.
    fn load_page(&self, chapter: &str, source: &Path, target: PathBuf, warnings: &mut Vec<TreeWarning>) -> Page {
        let guess = guess_title(source, &self.config.index_file);
        let (title, body) = match frontmatter::read(source, self.config.frontmatter) {
            Ok(doc) => {
                if let Some(message) = doc.malformed {
                    warnings.push(TreeWarning::MalformedFrontmatter {
                        path: source.to_path_buf(),
                        message,
                    });
                }
                let frontmatter = doc.frontmatter.unwrap_or_default().with_defaults(&guess);
                let title = frontmatter.title.unwrap_or(guess);
                (title, self.renderer.render(&doc.body))
            }
            Err(e) => {
                warnings.push(TreeWarning::Unreadable {
                    path: source.to_path_buf(),
                    message: e.to_string(),
                });
                (guess, String::new())
            }
        };

        Page {
            chapter: chapter.to_owned(),
            source: source.to_path_buf(),
            target,
            title,
            body: PageBody::Html(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::render::CommonMarkRenderer;

    fn write(path: &Path, content: &str) {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    fn book(root: &Path, chapters: &[&str]) -> PathBuf {
        let mut manifest = Manifest::new_book("toc.md");
        manifest.chapters_mut().clear();
        for chapter in chapters {
            manifest.add_chapter(*chapter, false);
        }
        let path = root.join(".book.json");
        manifest.save(&path).unwrap();
        path
    }

    fn chapter(dir: &Path, chapters: &[&str]) {
        let mut manifest = Manifest::new_chapter();
        for chapter in chapters {
            manifest.add_chapter(*chapter, false);
        }
        std::fs::create_dir_all(dir).unwrap();
        manifest.save(&dir.join(".chapter.json")).unwrap();
    }

    fn build(manifest: &Path, out: &Path) -> BuildOutcome {
        let config = BookConfig::default();
        TreeBuilder::new(&config, &CommonMarkRenderer)
            .build(manifest, out)
            .unwrap()
    }

    #[test]
    fn test_build_flat_book() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write(&root.join("index.md"), "+++\ntitle = \"My Book\"\n+++\nWelcome\n");
        write(&root.join("a.md"), "+++\ntitle = \"Alpha\"\n+++\nA\n");
        write(&root.join("b.md"), "B\n");
        let manifest = book(root, &["toc.md", "a.md", "b.md"]);

        let outcome = build(&manifest, &root.join("html"));
        let tree = &outcome.tree;

        assert!(outcome.warnings.is_empty());
        assert_eq!(tree.len(), 4);
        let root_id = tree.root().unwrap();
        let titles: Vec<&str> = tree
            .children(root_id)
            .iter()
            .map(|&id| tree.page(id).title.as_str())
            .collect();
        assert_eq!(titles, vec![TOC_TITLE, "Alpha", "b"]);
        assert_eq!(tree.page(root_id).title, "My Book");
        assert_eq!(tree.page(root_id).body, PageBody::Html("<p>Welcome</p>\n".to_owned()));
        assert!(tree.page(tree.children(root_id)[0]).is_toc_marker());
        assert_eq!(tree.page(tree.children(root_id)[1]).target, root.join("html/a.html"));
    }

    #[test]
    fn test_build_nested_chapter() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write(&root.join("index.md"), "Book\n");
        write(&root.join("part/index.md"), "+++\ntitle = \"Part\"\n+++\n");
        write(&root.join("part/x.md"), "X\n");
        chapter(&root.join("part"), &["x.md"]);
        let manifest = book(root, &["part"]);

        let outcome = build(&manifest, &root.join("html"));
        let tree = &outcome.tree;

        assert!(outcome.warnings.is_empty());
        let root_id = tree.root().unwrap();
        let part = tree.children(root_id)[0];
        assert_eq!(tree.page(part).title, "Part");
        assert_eq!(tree.page(part).target, root.join("html/part/index.html"));
        let x = tree.children(part)[0];
        assert_eq!(tree.page(x).target, root.join("html/part/x.html"));
        assert_eq!(tree.parent(x), Some(part));
    }

    #[test]
    fn test_resolvable_entries_produce_one_page_each() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write(&root.join("index.md"), "");
        let names = ["one.md", "two.md", "three.md"];
        for name in names {
            write(&root.join(name), "text");
        }
        let manifest = book(root, &names);

        let outcome = build(&manifest, &root.join("html"));

        assert_eq!(outcome.tree.len(), names.len() + 1);
        assert_eq!(outcome.tree.children(outcome.tree.root().unwrap()).len(), names.len());
    }

    #[test]
    fn test_missing_index_degrades() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("mybook");
        write(&root.join("a.md"), "A");
        let manifest = book(&root, &["a.md"]);

        let outcome = build(&manifest, &root.join("html"));

        assert_eq!(outcome.warnings, vec![TreeWarning::MissingIndex(root.join("index.md"))]);
        let root_page = outcome.tree.page(outcome.tree.root().unwrap());
        assert_eq!(root_page.title, "mybook");
        assert_eq!(root_page.body, PageBody::Html(String::new()));
        assert_eq!(outcome.tree.len(), 2);
    }

    #[test]
    fn test_bad_entries_are_skipped_with_warnings() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write(&root.join("index.md"), "");
        std::fs::create_dir(root.join("loose")).unwrap();
        write(&root.join("ok.md"), "ok");
        let manifest = book(root, &["loose", "gone.md", "index.md", "ok.md"]);

        let outcome = build(&manifest, &root.join("html"));

        assert_eq!(
            outcome.warnings,
            vec![
                TreeWarning::MissingChapterDescriptor(root.join("loose/.chapter.json")),
                TreeWarning::UnresolvableReference(root.join("gone.md")),
                TreeWarning::ListedIndex(root.join("index.md")),
            ]
        );
        assert_eq!(outcome.tree.len(), 2);
    }

    #[test]
    fn test_malformed_frontmatter_uses_guess() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        write(&root.join("index.md"), "");
        write(&root.join("broken.md"), "+++\ntitle = [\n+++\nBody\n");
        let manifest = book(root, &["broken.md"]);

        let outcome = build(&manifest, &root.join("html"));

        assert!(matches!(
            outcome.warnings.as_slice(),
            [TreeWarning::MalformedFrontmatter { .. }]
        ));
        let page = outcome.tree.children(outcome.tree.root().unwrap())[0];
        assert_eq!(outcome.tree.page(page).title, "broken");
    }

    #[test]
    fn test_missing_root_descriptor_is_fatal() {
        let temp = tempfile::tempdir().unwrap();
        let config = BookConfig::default();
        let result = TreeBuilder::new(&config, &CommonMarkRenderer)
            .build(&temp.path().join(".book.json"), temp.path());
        assert!(matches!(result, Err(ManifestError::NotFound(_))));
    }
}
