//! Splitting manuscripts into pages.
//!
//! Both `split` and `import` cut a document at its pivot headings (see
//! [`crate::sections`]) and turn every bundle into a page with a title and a
//! weight. Every operation is planned first: all preconditions are checked and
//! all output computed before the first write. The source file is removed
//! only after everything else has been written.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::assets::{Relocation, rewrite_image_links};
use crate::config::BookConfig;
use crate::frontmatter::{self, Frontmatter, guess_title};
use crate::manifest::{self, Manifest};
use crate::project::{Project, ProjectError};
use crate::sections::{SplitDocument, SplitOptions, split_document};

/// Weight step between consecutive split pages.
const WEIGHT_STEP: i64 = 10;

/// Non-fatal problem found while splitting.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SplitWarning {
    /// More than one asset folder claims the same position; none was moved.
    #[error("Several folders are numbered {position}, not moving any of them")]
    AmbiguousAssetFolder {
        position: usize,
        candidates: Vec<PathBuf>,
    },
    /// An asset folder's destination already exists; the folder was not moved.
    #[error("{} already exists, not moving {}", to.display(), from.display())]
    AssetTargetExists { from: PathBuf, to: PathBuf },
    /// An image link points at a missing file and was left unchanged.
    #[error("Missing image {}", .0.display())]
    MissingImage(PathBuf),
}

/// A page that a split or import will create.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedPage {
    pub title: String,
    pub file_name: String,
    pub weight: i64,
    pub body: String,
    /// Line count of the bundle in the source document.
    pub source_lines: usize,
}

/// What a split will do, computed without touching the filesystem.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitPlan {
    /// File being split.
    pub source: PathBuf,
    /// Directory the new pages go to.
    pub target_dir: PathBuf,
    /// Whether the source is the level's index page.
    pub is_index: bool,
    /// Frontmatter kept for the rewritten or new index page.
    pub frontmatter: Frontmatter,
    /// Text before the first page heading, kept on the index page.
    pub intro: String,
    pub pages: Vec<PlannedPage>,
}

/// What a split or import did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SplitReport {
    /// Files written, in order.
    pub written: Vec<PathBuf>,
    /// Asset folders moved into the new chapter directory.
    pub moved: Vec<Relocation>,
    /// The source file, if it was removed.
    pub removed: Option<PathBuf>,
    pub warnings: Vec<SplitWarning>,
}

/// Markdown file name for a split page.
///
/// Titles that reduce to nothing fall back to `page-NN`. With `attach_number`
/// the two-digit position is prefixed.
#[must_use]
pub fn page_file_name(title: &str, position: usize, attach_number: bool) -> String {
    let name = crate::project::name_from_title(title);
    let name = if name.is_empty() {
        format!("page-{position:02}")
    } else if attach_number {
        format!("{position:02}-{name}")
    } else {
        name
    };
    format!("{name}.md")
}

/// Leading decimal number of a file name, e.g. `3` for `03-figures`.
fn leading_number(name: &str) -> Option<usize> {
    let digits: String = name.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Turn a split document into planned pages with unique file names.
fn plan_pages(doc: &SplitDocument, options: &SplitOptions, taken: &mut HashSet<String>) -> Vec<PlannedPage> {
    let pivot = doc.pivot.unwrap_or(1);
    doc.bundles
        .iter()
        .enumerate()
        .map(|(i, bundle)| {
            let position = i + 1;
            let title = bundle.title();
            let mut file_name = page_file_name(&title, position, options.attach_number);
            let stem = file_name.trim_end_matches(".md").to_owned();
            let mut attempt = 2;
            while !taken.insert(file_name.clone()) {
                file_name = format!("{stem}-{attempt}.md");
                attempt += 1;
            }
            PlannedPage {
                title,
                file_name,
                weight: i64::try_from(position).unwrap_or(i64::MAX).saturating_mul(WEIGHT_STEP),
                body: bundle.page_body(pivot),
                source_lines: bundle.lines().len(),
            }
        })
        .collect()
}

impl Project<'_> {
    /// Plan splitting `file`, a page of this level or its index.
    pub fn plan_split(&self, file: &str, options: &SplitOptions) -> Result<SplitPlan, ProjectError> {
        let source = self.dir.join(file);
        if !source.is_file() {
            return Err(ProjectError::MissingFile(source));
        }

        let is_index = *file == self.config.index_file;
        if !is_index && !self.manifest.contains(file) {
            return Err(ProjectError::NotInManifest {
                chapter: file.to_owned(),
                manifest: self.manifest_path.clone(),
            });
        }

        let doc = frontmatter::read(&source, self.config.frontmatter)?;
        let split = split_document(&doc.body, options);
        if split.bundles.is_empty() {
            return Err(ProjectError::EmptySplitResult(source));
        }

        let target_dir = if is_index {
            self.dir.clone()
        } else {
            let name = dir_entry_name(file);
            let dir = self.dir.join(&name);
            if dir.join(&self.config.chapter_file).exists() || self.manifest.contains(&name) {
                return Err(ProjectError::TargetExists(dir));
            }
            dir
        };

        let mut taken = HashSet::from([self.config.index_file.clone()]);
        let pages = plan_pages(&split, options, &mut taken);
        for page in &pages {
            let path = target_dir.join(&page.file_name);
            if path.exists() {
                return Err(ProjectError::TargetExists(path));
            }
        }

        let guess = if is_index {
            guess_title(&source, &self.config.index_file)
        } else {
            guess_title(&target_dir.join(&self.config.index_file), &self.config.index_file)
        };
        let frontmatter = doc.frontmatter.unwrap_or_default().with_defaults(&guess);

        Ok(SplitPlan {
            source,
            target_dir,
            is_index,
            frontmatter,
            intro: split.intro_text(),
            pages,
        })
    }

    /// Split `file` into pages.
    ///
    /// Splitting the index adds the pages to this level, after the table of
    /// contents marker if there is one and before the other chapters otherwise.
    /// Splitting a page turns it into a chapter directory of the same name and
    /// removes the page.
    pub fn split(&mut self, file: &str, options: &SplitOptions) -> Result<SplitReport, ProjectError> {
        let plan = self.plan_split(file, options)?;
        if plan.is_index {
            self.split_index(plan)
        } else {
            self.split_page(file, plan)
        }
    }

    fn split_index(&mut self, plan: SplitPlan) -> Result<SplitReport, ProjectError> {
        let style = self.config.frontmatter;
        let mut report = SplitReport::default();

        let insert_at = match self
            .manifest
            .chapters()
            .iter()
            .position(|c| *c == self.config.toc_file)
        {
            Some(marker) => marker + 1,
            None => 0,
        };
        for (offset, page) in plan.pages.iter().enumerate() {
            let path = plan.target_dir.join(&page.file_name);
            frontmatter::write(&path, Some(&page_frontmatter(page)), &page.body, style)?;
            report.written.push(path);
            self.manifest
                .chapters_mut()
                .insert(insert_at + offset, page.file_name.clone());
        }

        frontmatter::write(&plan.source, Some(&plan.frontmatter), &plan.intro, style)?;
        report.written.push(plan.source);
        self.save()?;
        Ok(report)
    }

    fn split_page(&mut self, file: &str, plan: SplitPlan) -> Result<SplitReport, ProjectError> {
        let style = self.config.frontmatter;
        let mut report = SplitReport::default();
        let chapter_name = dir_entry_name(file);

        let relocations = self.plan_asset_moves(&plan, &chapter_name, &mut report.warnings);

        std::fs::create_dir_all(&plan.target_dir).map_err(ProjectError::io(&plan.target_dir))?;

        let mut chapter = Manifest::new_chapter();
        for page in &plan.pages {
            let path = plan.target_dir.join(&page.file_name);
            let (body, missing) = rewrite_image_links(&page.body, &plan.source, &path, &relocations);
            report.warnings.extend(missing.into_iter().map(SplitWarning::MissingImage));
            frontmatter::write(&path, Some(&page_frontmatter(page)), &body, style)?;
            chapter.add_chapter(page.file_name.as_str(), false);
            report.written.push(path);
        }

        let index = plan.target_dir.join(&self.config.index_file);
        let (intro, missing) = rewrite_image_links(&plan.intro, &plan.source, &index, &relocations);
        report.warnings.extend(missing.into_iter().map(SplitWarning::MissingImage));
        frontmatter::write(&index, Some(&plan.frontmatter), &intro, style)?;
        report.written.push(index);

        let descriptor = plan.target_dir.join(&self.config.chapter_file);
        chapter.save(&descriptor)?;
        report.written.push(descriptor);

        for relocation in relocations {
            tracing::info!(from = %relocation.from.display(), to = %relocation.to.display(), "Moving assets");
            std::fs::rename(&relocation.from, &relocation.to).map_err(ProjectError::io(&relocation.from))?;
            report.moved.push(relocation);
        }

        if self.manifest.replace_chapter(file, &chapter_name) {
            self.save()?;
        }

        tracing::info!(path = %plan.source.display(), "Removing");
        std::fs::remove_file(&plan.source).map_err(ProjectError::io(&plan.source))?;
        report.removed = Some(plan.source);

        for warning in &report.warnings {
            tracing::warn!(%warning, "Split");
        }
        Ok(report)
    }

    /// Sibling folders to move into the new chapter directory.
    ///
    /// A folder moves with page N when its name starts with the number N and
    /// no other folder does. Chapters listed in the descriptor never move.
    fn plan_asset_moves(&self, plan: &SplitPlan, chapter_name: &str, warnings: &mut Vec<SplitWarning>) -> Vec<Relocation> {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let folders: Vec<(usize, PathBuf)> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir() && *path != plan.target_dir)
            .filter_map(|path| {
                let name = path.file_name()?.to_string_lossy().into_owned();
                if name == chapter_name || self.manifest.contains(&name) {
                    return None;
                }
                Some((leading_number(&name)?, path))
            })
            .collect();

        let mut relocations = Vec::new();
        for position in 1..=plan.pages.len() {
            let mut candidates: Vec<PathBuf> = folders
                .iter()
                .filter(|(n, _)| *n == position)
                .map(|(_, p)| p.clone())
                .collect();
            match candidates.len() {
                0 => {}
                1 => {
                    let from = candidates.remove(0);
                    let Some(name) = from.file_name() else { continue };
                    let to = plan.target_dir.join(name);
                    if to.exists() {
                        warnings.push(SplitWarning::AssetTargetExists { from, to });
                    } else {
                        relocations.push(Relocation { from, to });
                    }
                }
                _ => {
                    candidates.sort();
                    warnings.push(SplitWarning::AmbiguousAssetFolder { position, candidates });
                }
            }
        }
        relocations
    }
}

/// Directory entry name for a page file, `guide.md` becomes `guide`.
fn dir_entry_name(file: &str) -> String {
    Path::new(file).with_extension("").to_string_lossy().into_owned()
}

fn page_frontmatter(page: &PlannedPage) -> Frontmatter {
    Frontmatter {
        weight: Some(page.weight),
        ..Frontmatter::titled(page.title.as_str())
    }
}

/// What an import will do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportPlan {
    pub source: PathBuf,
    /// Directory that becomes the new book root.
    pub book_dir: PathBuf,
    pub index_title: String,
    pub intro: String,
    pub pages: Vec<PlannedPage>,
}

/// Plan turning the markdown file `source` into a new book in `book_dir`.
pub fn plan_import(
    source: &Path,
    book_dir: &Path,
    config: &BookConfig,
    options: &SplitOptions,
) -> Result<ImportPlan, ProjectError> {
    if !source.is_file() {
        return Err(ProjectError::MissingFile(source.to_path_buf()));
    }
    if let Some(existing) = manifest::find_enclosing_manifest(book_dir, &config.book_file) {
        return Err(ProjectError::AlreadyABook(existing));
    }

    let doc = frontmatter::read(source, config.frontmatter)?;
    let split = split_document(&doc.body, options);
    if split.bundles.is_empty() {
        return Err(ProjectError::EmptySplitResult(source.to_path_buf()));
    }

    let mut taken = HashSet::from([config.index_file.clone(), config.toc_file.clone()]);
    let pages = plan_pages(&split, options, &mut taken);

    let index = book_dir.join(&config.index_file);
    for path in std::iter::once(index).chain(pages.iter().map(|p| book_dir.join(&p.file_name))) {
        if path.exists() {
            return Err(ProjectError::TargetExists(path));
        }
    }

    let guess = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let index_title = doc
        .frontmatter
        .and_then(|fm| fm.title)
        .unwrap_or(guess);

    Ok(ImportPlan {
        source: source.to_path_buf(),
        book_dir: book_dir.to_path_buf(),
        index_title,
        intro: split.intro_text(),
        pages,
    })
}

/// Create a new book in `book_dir` from the markdown file `source`.
///
/// The text before the first heading becomes the book's index page and every
/// pivot heading becomes a page listed after the table of contents. The source
/// file is left in place.
pub fn import(
    source: &Path,
    book_dir: &Path,
    config: &BookConfig,
    options: &SplitOptions,
) -> Result<SplitReport, ProjectError> {
    let plan = plan_import(source, book_dir, config, options)?;
    let style = config.frontmatter;
    let mut report = SplitReport::default();

    std::fs::create_dir_all(book_dir).map_err(ProjectError::io(book_dir))?;

    let mut manifest = Manifest::new_book(&config.toc_file);
    for page in &plan.pages {
        let path = book_dir.join(&page.file_name);
        let (body, missing) = rewrite_image_links(&page.body, source, &path, &[]);
        report.warnings.extend(missing.into_iter().map(SplitWarning::MissingImage));
        frontmatter::write(&path, Some(&page_frontmatter(page)), &body, style)?;
        manifest.add_chapter(page.file_name.as_str(), false);
        report.written.push(path);
    }

    let index = book_dir.join(&config.index_file);
    let (intro, missing) = rewrite_image_links(&plan.intro, source, &index, &[]);
    report.warnings.extend(missing.into_iter().map(SplitWarning::MissingImage));
    frontmatter::write(&index, Some(&Frontmatter::titled(plan.index_title.as_str())), &intro, style)?;
    report.written.push(index);

    let book_file = book_dir.join(&config.book_file);
    manifest.save(&book_file)?;
    report.written.push(book_file);

    Ok(report)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::manifest::ManifestKind;

    const MANUSCRIPT: &str = "+++\ntitle = \"Guide\"\n+++\nOverview text.\n\n# First Steps\nfirst\n## Detail\nmore\n# Going Further {#further}\nlast\n";

    fn book(root: &Path, config: &BookConfig) {
        Project::init(root, config, false).unwrap();
    }

    fn read(path: &Path) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_page_file_name() {
        assert_eq!(page_file_name("First Steps", 1, false), "first_steps.md");
        assert_eq!(page_file_name("First Steps", 3, true), "03-first_steps.md");
        assert_eq!(page_file_name("???", 2, false), "page-02.md");
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("03-figures"), Some(3));
        assert_eq!(leading_number("12"), Some(12));
        assert_eq!(leading_number("figures"), None);
    }

    #[test]
    fn test_plan_pages_unique_names_and_weights() {
        let doc = split_document("# Notes\na\n# Notes\nb\n# Other\nc\n", &SplitOptions::default());
        let mut taken = HashSet::new();
        let pages = plan_pages(&doc, &SplitOptions::default(), &mut taken);
        let names: Vec<&str> = pages.iter().map(|p| p.file_name.as_str()).collect();
        let weights: Vec<i64> = pages.iter().map(|p| p.weight).collect();
        assert_eq!(names, vec!["notes.md", "notes-2.md", "other.md"]);
        assert_eq!(weights, vec![10, 20, 30]);
    }

    #[test]
    fn test_split_page_into_chapter() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        let config = BookConfig::default();
        book(root, &config);
        std::fs::write(root.join("guide.md"), MANUSCRIPT).unwrap();
        let mut project = Project::open(root, &config).unwrap();
        project.add(&["guide.md".to_owned()]).unwrap();

        let report = project.split("guide.md", &SplitOptions::default()).unwrap();

        assert_eq!(report.removed, Some(root.join("guide.md")));
        assert!(!root.join("guide.md").exists());
        assert_eq!(project.manifest().chapters(), ["toc.md", "guide"]);
        let saved = Manifest::load(&root.join(".book.json"), ManifestKind::Book).unwrap();
        assert_eq!(saved.chapters(), ["toc.md", "guide"]);

        let chapter = Manifest::load(&root.join("guide/.chapter.json"), ManifestKind::Chapter).unwrap();
        assert_eq!(chapter.chapters(), ["first_steps.md", "going_further.md"]);
        assert_eq!(
            read(&root.join("guide/index.md")),
            "+++\ntitle = \"Guide\"\n+++\nOverview text.\n"
        );
        assert_eq!(
            read(&root.join("guide/first_steps.md")),
            "+++\ntitle = \"First Steps\"\nweight = 10\n+++\nfirst\n# Detail\nmore\n"
        );
        assert_eq!(
            read(&root.join("guide/going_further.md")),
            "+++\ntitle = \"Going Further\"\nweight = 20\n+++\nlast\n"
        );
    }

    #[test]
    fn test_split_page_moves_numbered_assets_and_rewrites_images() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        let config = BookConfig::default();
        book(root, &config);
        std::fs::create_dir_all(root.join("1-shots")).unwrap();
        std::fs::write(root.join("1-shots/a.png"), "png").unwrap();
        std::fs::create_dir_all(root.join("img")).unwrap();
        std::fs::write(root.join("img/b.png"), "png").unwrap();
        std::fs::write(
            root.join("guide.md"),
            "# One\n![a](1-shots/a.png)\n# Two\n![b](img/b.png)\n",
        )
        .unwrap();
        let mut project = Project::open(root, &config).unwrap();
        project.add(&["guide.md".to_owned()]).unwrap();

        let report = project.split("guide.md", &SplitOptions::default()).unwrap();

        assert_eq!(
            report.moved,
            vec![Relocation {
                from: root.join("1-shots"),
                to: root.join("guide/1-shots"),
            }]
        );
        assert!(root.join("guide/1-shots/a.png").is_file());
        assert!(read(&root.join("guide/one.md")).contains("![a](1-shots/a.png)"));
        assert!(read(&root.join("guide/two.md")).contains("![b](../img/b.png)"));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_split_page_ambiguous_assets_stay() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        let config = BookConfig::default();
        book(root, &config);
        std::fs::create_dir_all(root.join("1-a")).unwrap();
        std::fs::create_dir_all(root.join("01-b")).unwrap();
        std::fs::write(root.join("guide.md"), "# One\nx\n").unwrap();
        let mut project = Project::open(root, &config).unwrap();
        project.add(&["guide.md".to_owned()]).unwrap();

        let report = project.split("guide.md", &SplitOptions::default()).unwrap();

        assert!(report.moved.is_empty());
        assert!(root.join("1-a").is_dir());
        assert!(root.join("01-b").is_dir());
        assert_eq!(
            report.warnings,
            vec![SplitWarning::AmbiguousAssetFolder {
                position: 1,
                candidates: vec![root.join("01-b"), root.join("1-a")],
            }]
        );
    }

    #[test]
    fn test_split_page_keeps_assets_when_destination_exists() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        let config = BookConfig::default();
        book(root, &config);
        std::fs::create_dir_all(root.join("1-shots")).unwrap();
        std::fs::write(root.join("1-shots/a.png"), "new").unwrap();
        std::fs::create_dir_all(root.join("guide/1-shots")).unwrap();
        std::fs::write(root.join("guide/1-shots/a.png"), "old").unwrap();
        std::fs::write(root.join("guide.md"), "# One\n![a](1-shots/a.png)\n").unwrap();
        let mut project = Project::open(root, &config).unwrap();
        project.add(&["guide.md".to_owned()]).unwrap();

        let report = project.split("guide.md", &SplitOptions::default()).unwrap();

        assert!(report.moved.is_empty());
        assert_eq!(
            report.warnings,
            vec![SplitWarning::AssetTargetExists {
                from: root.join("1-shots"),
                to: root.join("guide/1-shots"),
            }]
        );
        assert_eq!(read(&root.join("1-shots/a.png")), "new");
        assert_eq!(read(&root.join("guide/1-shots/a.png")), "old");
        assert!(read(&root.join("guide/one.md")).contains("![a](../1-shots/a.png)"));
        assert!(!root.join("guide.md").exists());
    }

    #[test]
    fn test_split_index_into_only_toc_book() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        let config = BookConfig::default();
        book(root, &config);
        std::fs::write(root.join("index.md"), MANUSCRIPT).unwrap();
        let mut project = Project::open(root, &config).unwrap();

        let report = project.split("index.md", &SplitOptions::default()).unwrap();

        assert_eq!(report.removed, None);
        assert_eq!(
            project.manifest().chapters(),
            ["toc.md", "first_steps.md", "going_further.md"]
        );
        assert_eq!(
            read(&root.join("index.md")),
            "+++\ntitle = \"Guide\"\n+++\nOverview text.\n"
        );
    }

    #[test]
    fn test_split_index_inserts_before_existing_chapters() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        let config = BookConfig::default();
        book(root, &config);
        std::fs::write(root.join("later.md"), "later").unwrap();
        std::fs::write(root.join("index.md"), "# A\na\n# B\nb\n").unwrap();
        let mut project = Project::open(root, &config).unwrap();
        project.add(&["later.md".to_owned()]).unwrap();

        project.split("index.md", &SplitOptions::default()).unwrap();

        assert_eq!(project.manifest().chapters(), ["toc.md", "a.md", "b.md", "later.md"]);
    }

    #[test]
    fn test_split_requires_listed_page() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        let config = BookConfig::default();
        book(root, &config);
        std::fs::write(root.join("loose.md"), "# A\n").unwrap();
        let mut project = Project::open(root, &config).unwrap();

        let result = project.split("loose.md", &SplitOptions::default());

        assert!(matches!(result, Err(ProjectError::NotInManifest { .. })));
        assert!(root.join("loose.md").is_file());
    }

    #[test]
    fn test_split_without_headings_writes_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        let config = BookConfig::default();
        book(root, &config);
        std::fs::write(root.join("flat.md"), "no headings here\n").unwrap();
        let mut project = Project::open(root, &config).unwrap();
        project.add(&["flat.md".to_owned()]).unwrap();
        let before = read(&root.join("flat.md"));

        let result = project.split("flat.md", &SplitOptions::default());

        assert!(matches!(result, Err(ProjectError::EmptySplitResult(_))));
        assert_eq!(read(&root.join("flat.md")), before);
        assert!(!root.join("flat").exists());
    }

    #[test]
    fn test_split_refuses_to_overwrite_pages() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        let config = BookConfig::default();
        book(root, &config);
        std::fs::write(root.join("a.md"), "existing").unwrap();
        std::fs::write(root.join("index.md"), "# A\nnew\n").unwrap();
        let mut project = Project::open(root, &config).unwrap();

        let result = project.split("index.md", &SplitOptions::default());

        assert!(matches!(result, Err(ProjectError::TargetExists(p)) if p == root.join("a.md")));
        assert_eq!(read(&root.join("a.md")), "existing");
    }

    #[test]
    fn test_plan_split_on_filter() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        let config = BookConfig::default();
        book(root, &config);
        std::fs::write(root.join("index.md"), "# Part 1\na\n# Aside\nb\n# Part 2\nc\n").unwrap();
        let project = Project::open(root, &config).unwrap();
        let options = SplitOptions {
            on: Some("part".to_owned()),
            ..SplitOptions::default()
        };

        let plan = project.plan_split("index.md", &options).unwrap();

        let titles: Vec<&str> = plan.pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Part 1", "Part 2"]);
        assert_eq!(plan.pages[0].source_lines, 4);
    }

    #[test]
    fn test_import_creates_book() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("manuscript.md");
        std::fs::write(&source, MANUSCRIPT).unwrap();
        let book_dir = temp.path().join("book");
        let config = BookConfig::default();

        import(&source, &book_dir, &config, &SplitOptions::default()).unwrap();

        let manifest = Manifest::load(&book_dir.join(".book.json"), ManifestKind::Book).unwrap();
        assert_eq!(
            manifest.chapters(),
            ["toc.md", "first_steps.md", "going_further.md"]
        );
        assert_eq!(
            read(&book_dir.join("index.md")),
            "+++\ntitle = \"Guide\"\n+++\nOverview text.\n"
        );
        assert!(read(&book_dir.join("going_further.md")).contains("weight = 20"));
        assert!(source.is_file());
    }

    #[test]
    fn test_import_inside_book_is_refused() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        let config = BookConfig::default();
        book(root, &config);
        let source = root.join("m.md");
        std::fs::write(&source, "# A\n").unwrap();

        let result = import(&source, &root.join("sub"), &config, &SplitOptions::default());

        assert!(matches!(result, Err(ProjectError::AlreadyABook(_))));
    }

    #[test]
    fn test_import_without_headings_writes_nothing() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("prose.md");
        std::fs::write(&source, "just prose, no headings\n").unwrap();
        let book_dir = temp.path().join("book");

        let result = import(&source, &book_dir, &BookConfig::default(), &SplitOptions::default());

        assert!(matches!(result, Err(ProjectError::EmptySplitResult(p)) if p == source));
        assert!(!book_dir.exists());
    }

    #[test]
    fn test_import_missing_source() {
        let temp = tempfile::tempdir().unwrap();
        let config = BookConfig::default();
        let result = plan_import(
            &temp.path().join("nope.md"),
            temp.path(),
            &config,
            &SplitOptions::default(),
        );
        assert!(matches!(result, Err(ProjectError::MissingFile(_))));
    }
}
