//! Chapter descriptors.
//!
//! Every directory level of a book carries a JSON descriptor listing its
//! chapters in document order. The book root uses the book descriptor, which
//! wraps the chapter list and adds a copyright line:
//!
//! ```json
//! {
//!     "chapter": {
//!         "chapters": ["toc.md", "intro.md", "part-one"]
//!     },
//!     "copyright": "2024 Jane Doe"
//! }
//! ```
//!
//! Nested directories use the chapter descriptor, `{"chapters": [...]}`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::BookConfig;

/// Chapter list of one directory level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterManifest {
    pub chapters: Vec<String>,
}

/// Book-level descriptor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookManifest {
    pub chapter: ChapterManifest,
    #[serde(default)]
    pub copyright: String,
}

/// Which descriptor format a file uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ManifestKind {
    Book,
    Chapter,
}

/// A loaded descriptor of either kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Manifest {
    Book(BookManifest),
    Chapter(ChapterManifest),
}

/// Error type for descriptor I/O.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// Descriptor file does not exist.
    #[error("Descriptor not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("Failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Invalid JSON.
    #[error("Invalid descriptor {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Manifest {
    /// A fresh book descriptor listing only the table of contents marker.
    #[must_use]
    pub fn new_book(toc_file: &str) -> Self {
        Self::Book(BookManifest {
            chapter: ChapterManifest {
                chapters: vec![toc_file.to_owned()],
            },
            copyright: String::new(),
        })
    }

    /// An empty chapter descriptor.
    #[must_use]
    pub fn new_chapter() -> Self {
        Self::Chapter(ChapterManifest::default())
    }

    #[must_use]
    pub fn kind(&self) -> ManifestKind {
        match self {
            Self::Book(_) => ManifestKind::Book,
            Self::Chapter(_) => ManifestKind::Chapter,
        }
    }

    /// Chapter names in document order.
    #[must_use]
    pub fn chapters(&self) -> &[String] {
        match self {
            Self::Book(book) => &book.chapter.chapters,
            Self::Chapter(chapter) => &chapter.chapters,
        }
    }

    pub fn chapters_mut(&mut self) -> &mut Vec<String> {
        match self {
            Self::Book(book) => &mut book.chapter.chapters,
            Self::Chapter(chapter) => &mut chapter.chapters,
        }
    }

    /// Copyright line; chapter descriptors have none.
    #[must_use]
    pub fn copyright(&self) -> &str {
        match self {
            Self::Book(book) => &book.copyright,
            Self::Chapter(_) => "",
        }
    }

    /// Append a chapter, or insert it first when `at_start` is set.
    pub fn add_chapter(&mut self, name: impl Into<String>, at_start: bool) {
        let chapters = self.chapters_mut();
        if at_start {
            chapters.insert(0, name.into());
        } else {
            chapters.push(name.into());
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.chapters().iter().any(|c| c == name)
    }

    /// Replace every occurrence of `old` with `new`. Returns whether anything
    /// was replaced.
    pub fn replace_chapter(&mut self, old: &str, new: &str) -> bool {
        let mut replaced = false;
        for chapter in self.chapters_mut().iter_mut().filter(|c| c.as_str() == old) {
            new.clone_into(chapter);
            replaced = true;
        }
        replaced
    }

    /// Load a descriptor of the given kind.
    pub fn load(path: &Path, kind: ManifestKind) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ManifestError::NotFound(path.to_path_buf())
            } else {
                ManifestError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let json_err = |source| ManifestError::Json {
            path: path.to_path_buf(),
            source,
        };
        let manifest = match kind {
            ManifestKind::Book => Self::Book(serde_json::from_str(&content).map_err(json_err)?),
            ManifestKind::Chapter => {
                Self::Chapter(serde_json::from_str(&content).map_err(json_err)?)
            }
        };
        tracing::debug!(path = %path.display(), chapters = manifest.chapters().len(), "Loaded descriptor");
        Ok(manifest)
    }

    /// Serialize with four-space indentation and a trailing newline.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        match self {
            Self::Book(book) => book.serialize(&mut serializer)?,
            Self::Chapter(chapter) => chapter.serialize(&mut serializer)?,
        }
        let mut json = String::from_utf8_lossy(&buf).into_owned();
        json.push('\n');
        Ok(json)
    }

    /// Write the descriptor to `path`.
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        let json = self.to_json().map_err(|source| ManifestError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Writing descriptor");
        std::fs::write(path, json).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Find the nearest `file_name` in `start_dir` or any of its ancestors.
#[must_use]
pub fn find_enclosing_manifest(start_dir: &Path, file_name: &str) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(file_name))
        .find(|candidate| candidate.is_file())
}

/// All markdown files reachable from a descriptor, in document order.
///
/// The index file of each level comes first. Entries that are neither a file
/// nor a directory with a descriptor are skipped, as is the table of contents
/// marker when it has no backing file.
pub fn markdown_files(manifest_path: &Path, config: &BookConfig) -> Result<Vec<PathBuf>, ManifestError> {
    let manifest = Manifest::load(manifest_path, config.manifest_kind(manifest_path))?;
    let dir = manifest_path.parent().unwrap_or(Path::new("."));

    let mut files = vec![dir.join(&config.index_file)];
    for chapter in manifest.chapters() {
        let path = dir.join(chapter);
        if path.is_file() {
            files.push(path);
        } else if path.is_dir() {
            let nested = path.join(&config.chapter_file);
            match markdown_files(&nested, config) {
                Ok(nested_files) => files.extend(nested_files),
                Err(e) => tracing::warn!(chapter = %chapter, error = %e, "Skipping chapter"),
            }
        }
    }
    Ok(files)
}
