//! Book and chapter editing.
//!
//! A [`Project`] is one directory level of a book opened for editing: either
//! the book root or a chapter directory inside it. Every mutating operation
//! saves the level's descriptor before returning.

use std::path::{Path, PathBuf};

use crate::assets::list_images;
use crate::config::BookConfig;
use crate::frontmatter::{self, Frontmatter, FrontmatterError, ReconcileOutcome, guess_title};
use crate::manifest::{self, Manifest, ManifestError, ManifestKind};
use crate::sections::{SplitOptions, indent_headings, split_document};

/// Error type for editing operations.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// No book descriptor in the directory or its parents.
    #[error("Not inside a book: {}", .0.display())]
    NotABook(PathBuf),
    /// Inside a book, but the directory has no chapter descriptor.
    #[error("Not a chapter directory, missing {}", .0.display())]
    NotAChapter(PathBuf),
    /// A book descriptor already exists.
    #[error("Book is already defined in {}", .0.display())]
    AlreadyABook(PathBuf),
    /// The file is not listed in the level's descriptor.
    #[error("{chapter} is not a page of {}", manifest.display())]
    NotInManifest { chapter: String, manifest: PathBuf },
    /// Splitting found no headings to split at.
    #[error("No headings to split at in {}", .0.display())]
    EmptySplitResult(PathBuf),
    /// The operation would overwrite an existing file or chapter.
    #[error("{} already exists", .0.display())]
    TargetExists(PathBuf),
    /// Input file does not exist.
    #[error("File not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error(transparent)]
    Frontmatter(#[from] FrontmatterError),
    /// Filesystem operation failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProjectError {
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result of [`Project::init`].
#[derive(Debug, PartialEq, Eq)]
pub enum InitOutcome {
    /// A new book descriptor was written.
    Created(PathBuf),
    /// An existing book's frontmatter was refreshed.
    Updated(PathBuf),
}

/// Result of adding one entry with [`Project::add`].
#[derive(Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// A page file was added.
    Page(String),
    /// A directory was turned into a chapter and added.
    Section(String),
    /// The entry names the index file, which is always included.
    IsIndex(String),
    /// The directory already has a chapter descriptor.
    ExistingSection(String),
    /// The entry is already listed.
    AlreadyListed(String),
    /// Neither a file nor a directory.
    Missing(String),
}

/// Result of creating one page with [`Project::new_pages`].
#[derive(Debug, PartialEq, Eq)]
pub enum NewPageOutcome {
    Created(String),
    /// A file with the derived name already exists; nothing was changed.
    Exists(String),
}

/// File name stem for a page title.
///
/// Lowercases, turns spaces into underscores and slashes into dashes, and drops
/// `.`, `*`, `:`, `(`, `)` and `?`.
#[must_use]
pub fn name_from_title(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            '/' => Some('-'),
            '.' | '*' | ':' | '(' | ')' | '?' => None,
            c => Some(c),
        })
        .collect()
}

/// Write a new page and list it in `manifest`.
///
/// Returns `false` without touching anything when the file already exists.
pub(crate) fn create_page(
    manifest: &mut Manifest,
    dir: &Path,
    file_name: &str,
    frontmatter: &Frontmatter,
    body: &str,
    config: &BookConfig,
) -> Result<bool, ProjectError> {
    let path = dir.join(file_name);
    if path.exists() {
        return Ok(false);
    }
    frontmatter::write(&path, Some(frontmatter), body, config.frontmatter)?;
    manifest.add_chapter(file_name, false);
    Ok(true)
}

/// One level of a book opened for editing.
#[derive(Debug)]
pub struct Project<'a> {
    pub(crate) config: &'a BookConfig,
    pub(crate) dir: PathBuf,
    pub(crate) manifest_path: PathBuf,
    pub(crate) manifest: Manifest,
    pub(crate) book_file: PathBuf,
}

impl<'a> Project<'a> {
    /// Open the book root or chapter directory at `dir`.
    pub fn open(dir: &Path, config: &'a BookConfig) -> Result<Self, ProjectError> {
        let own_book = dir.join(&config.book_file);
        let (manifest_path, book_file) = if own_book.is_file() {
            (own_book.clone(), own_book)
        } else {
            let book_file = manifest::find_enclosing_manifest(dir, &config.book_file)
                .ok_or_else(|| ProjectError::NotABook(dir.to_path_buf()))?;
            let chapter_file = dir.join(&config.chapter_file);
            if !chapter_file.is_file() {
                return Err(ProjectError::NotAChapter(chapter_file));
            }
            (chapter_file, book_file)
        };

        let manifest = Manifest::load(&manifest_path, config.manifest_kind(&manifest_path))?;
        Ok(Self {
            config,
            dir: dir.to_path_buf(),
            manifest_path,
            manifest,
            book_file,
        })
    }

    /// Create a book in `dir`, or refresh an existing one when `update` is set.
    pub fn init(dir: &Path, config: &'a BookConfig, update: bool) -> Result<InitOutcome, ProjectError> {
        if let Some(existing) = manifest::find_enclosing_manifest(dir, &config.book_file) {
            if !update {
                return Err(ProjectError::AlreadyABook(existing));
            }
            let book_dir = existing.parent().unwrap_or(dir);
            let project = Self::open(book_dir, config)?;
            project.update_frontmatters()?;
            return Ok(InitOutcome::Updated(existing));
        }

        let path = dir.join(&config.book_file);
        Manifest::new_book(&config.toc_file).save(&path)?;
        let project = Self::open(dir, config)?;
        project.update_frontmatters()?;
        Ok(InitOutcome::Created(path))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Descriptor of this level.
    #[must_use]
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    #[must_use]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Descriptor of the enclosing book.
    #[must_use]
    pub fn book_file(&self) -> &Path {
        &self.book_file
    }

    /// Save this level's descriptor.
    pub fn save(&self) -> Result<(), ProjectError> {
        self.manifest.save(&self.manifest_path)?;
        Ok(())
    }

    /// Add existing files or directories to this level.
    ///
    /// Files get frontmatter if they lack it. Directories become chapters with
    /// an empty descriptor and an index page.
    pub fn add(&mut self, names: &[String]) -> Result<Vec<AddOutcome>, ProjectError> {
        let mut outcomes = Vec::with_capacity(names.len());
        let mut changed = false;

        for name in names {
            let path = self.dir.join(name);
            let outcome = if *name == self.config.index_file {
                AddOutcome::IsIndex(name.clone())
            } else if self.manifest.contains(name) {
                AddOutcome::AlreadyListed(name.clone())
            } else if path.is_file() {
                let guess = guess_title(&path, &self.config.index_file);
                frontmatter::reconcile(&path, &guess, None, self.config.frontmatter)?;
                self.manifest.add_chapter(name.as_str(), false);
                changed = true;
                AddOutcome::Page(name.clone())
            } else if path.is_dir() {
                let descriptor = path.join(&self.config.chapter_file);
                if descriptor.is_file() {
                    AddOutcome::ExistingSection(name.clone())
                } else {
                    Manifest::new_chapter().save(&descriptor)?;
                    let index = path.join(&self.config.index_file);
                    let guess = guess_title(&index, &self.config.index_file);
                    frontmatter::reconcile(&index, &guess, None, self.config.frontmatter)?;
                    self.manifest.add_chapter(name.as_str(), false);
                    changed = true;
                    AddOutcome::Section(name.clone())
                }
            } else {
                AddOutcome::Missing(name.clone())
            };
            tracing::debug!(?outcome, "Add");
            outcomes.push(outcome);
        }

        if changed {
            self.save()?;
        }
        Ok(outcomes)
    }

    /// Create empty pages named after `titles` and append them to this level.
    pub fn new_pages(&mut self, titles: &[String]) -> Result<Vec<NewPageOutcome>, ProjectError> {
        let mut outcomes = Vec::with_capacity(titles.len());
        let mut changed = false;

        for title in titles {
            let file_name = format!("{}.md", name_from_title(title));
            let frontmatter = Frontmatter::titled(title.as_str());
            if create_page(&mut self.manifest, &self.dir, &file_name, &frontmatter, "", self.config)? {
                changed = true;
                outcomes.push(NewPageOutcome::Created(file_name));
            } else {
                outcomes.push(NewPageOutcome::Exists(file_name));
            }
        }

        if changed {
            self.save()?;
        }
        Ok(outcomes)
    }

    /// Reconcile the frontmatter of every page reachable from this level.
    pub fn update_frontmatters(&self) -> Result<Vec<(PathBuf, ReconcileOutcome)>, ProjectError> {
        let mut results = Vec::new();
        reconcile_level(&self.manifest, &self.dir, self.config, &mut results)?;
        Ok(results)
    }

    /// Push every heading in `file` one level deeper.
    ///
    /// Returns `false` when the file has no headings.
    pub fn indent(&self, file: &str) -> Result<bool, ProjectError> {
        let path = self.dir.join(file);
        if !path.is_file() {
            return Err(ProjectError::MissingFile(path));
        }
        let doc = frontmatter::read(&path, self.config.frontmatter)?;
        let indented = indent_headings(&doc.body);
        if indented == doc.body {
            return Ok(false);
        }
        frontmatter::write(&path, doc.frontmatter.as_ref(), &indented, self.config.frontmatter)?;
        Ok(true)
    }

    /// Titles and line counts of the pages `file` would split into.
    pub fn outline(&self, file: &str) -> Result<Vec<(String, usize)>, ProjectError> {
        let path = self.dir.join(file);
        if !path.is_file() {
            return Err(ProjectError::MissingFile(path));
        }
        let doc = frontmatter::read(&path, self.config.frontmatter)?;
        let split = split_document(&doc.body, &SplitOptions::default());
        Ok(split
            .bundles
            .iter()
            .map(|bundle| (bundle.title(), bundle.lines().len()))
            .collect())
    }

    /// Every markdown file of the whole book, in document order.
    pub fn markdown_files(&self) -> Result<Vec<PathBuf>, ProjectError> {
        Ok(manifest::markdown_files(&self.book_file, self.config)?)
    }

    /// Every image target referenced by the book, with the file referencing it.
    pub fn images(&self) -> Result<Vec<(PathBuf, String)>, ProjectError> {
        let mut images = Vec::new();
        for file in self.markdown_files()? {
            let doc = frontmatter::read(&file, self.config.frontmatter)?;
            images.extend(list_images(&doc.body).into_iter().map(|image| (file.clone(), image)));
        }
        Ok(images)
    }
}

fn reconcile_level(
    manifest: &Manifest,
    dir: &Path,
    config: &BookConfig,
    results: &mut Vec<(PathBuf, ReconcileOutcome)>,
) -> Result<(), ProjectError> {
    let mut reconcile = |path: PathBuf| -> Result<(), ProjectError> {
        let guess = guess_title(&path, &config.index_file);
        let outcome = frontmatter::reconcile(&path, &guess, None, config.frontmatter)?;
        if outcome == ReconcileOutcome::SkippedMalformed {
            tracing::warn!(path = %path.display(), "Leaving malformed frontmatter untouched");
        }
        results.push((path, outcome));
        Ok(())
    };

    reconcile(dir.join(&config.index_file))?;

    let mut nested = Vec::new();
    for chapter in manifest.chapters() {
        if *chapter == config.toc_file || *chapter == config.index_file {
            continue;
        }
        let path = dir.join(chapter);
        if path.is_file() {
            reconcile(path)?;
        } else if path.is_dir() {
            nested.push(path);
        } else {
            tracing::warn!(path = %path.display(), "Neither file nor directory");
        }
    }

    for chapter_dir in nested {
        let descriptor = chapter_dir.join(&config.chapter_file);
        if !descriptor.is_file() {
            tracing::warn!(path = %descriptor.display(), "Missing chapter descriptor");
            continue;
        }
        let chapter = match Manifest::load(&descriptor, ManifestKind::Chapter) {
            Ok(chapter) => chapter,
            Err(e) => {
                tracing::warn!(path = %descriptor.display(), error = %e, "Skipping unreadable chapter descriptor");
                continue;
            }
        };
        reconcile_level(&chapter, &chapter_dir, config, results)?;
    }
    Ok(())
}
