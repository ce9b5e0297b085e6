//! Image references in markdown.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::paths::relative_link;

/// `![alt](url)` or `![alt](url "title")`.
static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());

/// Image targets referenced by a markdown text, in order of appearance.
#[must_use]
pub fn list_images(markdown: &str) -> Vec<String> {
    IMAGE_RE
        .captures_iter(markdown)
        .map(|caps| caps[2].to_owned())
        .collect()
}

/// Whether an image target points outside the book.
#[must_use]
pub fn is_remote(url: &str) -> bool {
    let url = url.trim_start();
    if url.starts_with("//") {
        return true;
    }
    // A single-letter scheme is a Windows drive, not a URL.
    url.split_once(':').is_some_and(|(scheme, _)| {
        scheme.len() > 1
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
    })
}

/// Split an image target into its path and the optional title suffix.
fn split_target(target: &str) -> (&str, &str) {
    let target = target.trim();
    match target.find(char::is_whitespace) {
        Some(i) => (&target[..i], &target[i..]),
        None => (target, ""),
    }
}

/// Local file path of an image target, `None` for remote targets.
#[must_use]
pub fn local_image_path(target: &str) -> Option<&str> {
    let (path, _) = split_target(target);
    (!path.is_empty() && !is_remote(path)).then_some(path)
}

/// A directory moved from one location to another.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Relocation {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Rewrite local image links of text moving from `from_file` to `to_file`.
///
/// Links are resolved against the old location, mapped through `relocations`,
/// and re-expressed relative to the new location. Links to files that do not
/// exist are left alone and returned.
pub fn rewrite_image_links(
    markdown: &str,
    from_file: &Path,
    to_file: &Path,
    relocations: &[Relocation],
) -> (String, Vec<PathBuf>) {
    let from_dir = from_file.parent().unwrap_or(Path::new(""));
    let mut missing = Vec::new();

    let rewritten = IMAGE_RE.replace_all(markdown, |caps: &Captures<'_>| {
        let original = caps[0].to_owned();
        let (path, title) = split_target(&caps[2]);
        if path.is_empty() || is_remote(path) {
            return original;
        }

        let resolved = from_dir.join(path);
        if !resolved.exists() {
            tracing::warn!(image = %resolved.display(), "Ignoring missing image");
            missing.push(resolved);
            return original;
        }

        let moved = relocations
            .iter()
            .find_map(|r| {
                resolved
                    .strip_prefix(&r.from)
                    .ok()
                    .map(|rest| r.to.join(rest))
            })
            .unwrap_or(resolved);
        let link = relative_link(to_file, &moved);
        tracing::debug!(from = %path, to = %link, "Rewriting image link");
        format!("![{}]({link}{title})", &caps[1])
    });

    (rewritten.into_owned(), missing)
}

/// Resolve `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Copy the local images referenced by a page next to its output file.
///
/// Rooted image paths and paths that would land outside `output_root` are
/// skipped. Returns the referenced images that do not exist.
pub fn copy_local_images(
    markdown: &str,
    source_file: &Path,
    target_file: &Path,
    output_root: &Path,
) -> std::io::Result<Vec<PathBuf>> {
    let source_dir = source_file.parent().unwrap_or(Path::new(""));
    let target_dir = target_file.parent().unwrap_or(Path::new(""));
    let output_root = normalize(output_root);
    let mut missing = Vec::new();

    for image in list_images(markdown) {
        let Some(path) = local_image_path(&image) else {
            continue;
        };
        if Path::new(path).has_root() {
            tracing::warn!(image = %path, "Not copying image with an absolute path");
            continue;
        }
        let source = source_dir.join(path);
        if !source.is_file() {
            missing.push(source);
            continue;
        }
        let target = normalize(&target_dir.join(path));
        if !target.starts_with(&output_root) {
            tracing::warn!(image = %path, target = %target.display(), "Not copying image outside the output directory");
            continue;
        }
        if same_file(&source, &target) {
            continue;
        }
        if let Some(dir) = target.parent() {
            std::fs::create_dir_all(dir)?;
        }
        tracing::info!(image = %path, "Copying");
        std::fs::copy(&source, &target)?;
    }

    Ok(missing)
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
