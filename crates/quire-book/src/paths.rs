//! Relative links between output files.

use std::path::{Component, Path};

/// Relative URL from the file `from` to the path `to`.
///
/// The last component of `from` is the current document; the link is resolved
/// against its directory. Both paths must be absolute or both relative to the
/// same base. Segments are joined with `/` regardless of platform.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use quire_book::relative_link;
///
/// assert_eq!(relative_link(Path::new("/out/a/b.html"), Path::new("/out/c.html")), "../c.html");
/// assert_eq!(relative_link(Path::new("/out/index.html"), Path::new("/out/a/index.html")), "a/index.html");
/// ```
#[must_use]
pub fn relative_link(from: &Path, to: &Path) -> String {
    let from_dir: Vec<Component<'_>> = from
        .parent()
        .map(|p| p.components().collect())
        .unwrap_or_default();
    let to_segs: Vec<Component<'_>> = to.components().collect();

    let common = from_dir
        .iter()
        .zip(&to_segs)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    parts.extend(std::iter::repeat_n("..".to_owned(), from_dir.len() - common));
    parts.extend(
        to_segs[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    if parts.is_empty() {
        "./".to_owned()
    } else {
        parts.join("/")
    }
}
