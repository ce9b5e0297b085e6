//! Frontmatter parsing and reconciliation.
//!
//! A page file starts with a TOML metadata block delimited by separator
//! lines, followed by the markdown body:
//!
//! ```text
//! +++
//! title = "Getting Started"
//! weight = 10
//! +++
//! Body text.
//! ```
//!
//! Files written by older tools put the metadata before a single separator
//! line, with no opening delimiter. Both forms are read. Only the delimited
//! form is written.
//!
//! # Reconciliation
//!
//! [`reconcile`] fills in managed fields that are missing (currently only
//! `title`) and writes the file back only when the serialized metadata
//! changed, so running it repeatedly leaves files byte-identical.

use std::io;
use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sections::trim_blank;

/// Separator line style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrontmatterStyle {
    /// Character repeated to form a separator line.
    pub separator: char,
    /// Minimum number of repetitions.
    pub min_length: usize,
}

impl Default for FrontmatterStyle {
    fn default() -> Self {
        Self {
            separator: '+',
            min_length: 3,
        }
    }
}

impl FrontmatterStyle {
    /// Whether `line` is a separator line (surrounding whitespace ignored).
    #[must_use]
    pub fn is_separator(&self, line: &str) -> bool {
        let trimmed = line.trim();
        trimmed.chars().count() >= self.min_length && trimmed.chars().all(|c| c == self.separator)
    }

    /// The separator line written by [`render`].
    #[must_use]
    pub fn delimiter(&self) -> String {
        self.separator.to_string().repeat(self.min_length)
    }
}

/// Page metadata.
///
/// Keys other than the managed ones are preserved in `extra`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Page title shown in navigation, breadcrumbs and the table of contents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Ordering hint written by `import` and `split`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,

    /// Unmanaged user keys.
    #[serde(flatten)]
    pub extra: toml::Table,
}

impl Frontmatter {
    /// Frontmatter holding only a title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Fill managed fields that are absent. User-set values are kept.
    #[must_use]
    pub fn with_defaults(mut self, title_guess: &str) -> Self {
        if self.title.is_none() {
            self.title = Some(title_guess.to_owned());
        }
        self
    }

    /// Title, or an empty string when unset.
    #[must_use]
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Serialize to TOML without delimiters.
    pub fn to_toml(&self) -> Result<String, FrontmatterError> {
        Ok(toml::to_string(self)?)
    }
}

/// A page file split into metadata and body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedDocument {
    /// Metadata, `None` when the file has no separator line.
    pub frontmatter: Option<Frontmatter>,
    /// Body text following the metadata block.
    pub body: String,
    /// TOML error message when the metadata block was malformed.
    ///
    /// In that case `frontmatter` is an empty map.
    pub malformed: Option<String>,
}

/// Error type for frontmatter operations.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    /// I/O error reading or writing a page file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Metadata could not be serialized.
    #[error("Failed to serialize frontmatter: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result of [`reconcile`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The file was (re)written.
    Written,
    /// Nothing changed, the file was left alone.
    Unchanged,
    /// The metadata block is malformed and was left for the user to fix.
    SkippedMalformed,
}

/// Byte range of the first separator line in `text`.
fn find_separator(text: &str, style: FrontmatterStyle) -> Option<Range<usize>> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let start = offset;
        offset += line.len();
        if style.is_separator(line) {
            return Some(start..offset);
        }
    }
    None
}

/// Split `text` into frontmatter and body.
///
/// The first separator line ends the metadata. When only blank lines precede
/// it and a second separator follows, the metadata is the block between the
/// two. Without any separator line the whole text is body.
#[must_use]
pub fn parse(text: &str, style: FrontmatterStyle) -> ParsedDocument {
    let Some(first) = find_separator(text, style) else {
        return ParsedDocument {
            frontmatter: None,
            body: text.to_owned(),
            malformed: None,
        };
    };

    let head = &text[..first.start];
    let rest = &text[first.end..];

    let (metadata, body) = if head.trim().is_empty() {
        match find_separator(rest, style) {
            Some(second) => (&rest[..second.start], &rest[second.end..]),
            None => (head, rest),
        }
    } else {
        (head, rest)
    };

    let (frontmatter, malformed) = match toml::from_str::<Frontmatter>(metadata) {
        Ok(frontmatter) => (frontmatter, None),
        Err(e) => (Frontmatter::default(), Some(e.to_string())),
    };

    ParsedDocument {
        frontmatter: Some(frontmatter),
        body: body.to_owned(),
        malformed,
    }
}

/// Read and parse a page file.
///
/// A missing file reads as an empty body without frontmatter. Malformed
/// metadata is logged and returned as an empty map.
pub fn read(path: &Path, style: FrontmatterStyle) -> Result<ParsedDocument, FrontmatterError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ParsedDocument::default()),
        Err(e) => return Err(e.into()),
    };

    let parsed = parse(&text, style);
    if let Some(message) = &parsed.malformed {
        tracing::warn!(path = %path.display(), error = %message, "Malformed frontmatter");
    }
    Ok(parsed)
}

/// Render a page file in canonical form.
///
/// The body is trimmed of leading and trailing blank lines.
pub fn render(
    frontmatter: Option<&Frontmatter>,
    body: &str,
    style: FrontmatterStyle,
) -> Result<String, FrontmatterError> {
    let mut out = String::new();

    if let Some(frontmatter) = frontmatter {
        let delimiter = style.delimiter();
        out.push_str(&delimiter);
        out.push('\n');
        let toml = frontmatter.to_toml()?;
        let toml = toml.trim_end();
        if !toml.is_empty() {
            out.push_str(toml);
            out.push('\n');
        }
        out.push_str(&delimiter);
        out.push('\n');
    }

    let lines: Vec<&str> = body.lines().collect();
    let lines = trim_blank(&lines);
    if !lines.is_empty() {
        out.push_str(&lines.join("\n"));
        out.push('\n');
    }

    Ok(out)
}

/// Write a page file in canonical form, creating parent directories.
pub fn write(
    path: &Path,
    frontmatter: Option<&Frontmatter>,
    body: &str,
    style: FrontmatterStyle,
) -> Result<(), FrontmatterError> {
    let content = render(frontmatter, body, style)?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    tracing::info!(path = %path.display(), "Writing");
    std::fs::write(path, content)?;
    Ok(())
}

/// Title guess for a page file.
///
/// For the index file this is the name of its directory, otherwise the file
/// name without extension.
#[must_use]
pub fn guess_title(path: &Path, index_file: &str) -> String {
    let is_index = path.file_name().is_some_and(|name| name == index_file);
    let named = if is_index {
        path.parent().and_then(Path::file_name)
    } else {
        path.file_stem()
    };
    named
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Ensure `path` carries complete frontmatter.
///
/// Without frontmatter, `{title = title_guess}` is synthesized and the file is
/// written (created if missing). With frontmatter, missing managed fields are
/// filled and the file is rewritten only when the serialized metadata
/// changed. `extra_content` is appended to the body after a blank line and
/// forces a write.
pub fn reconcile(
    path: &Path,
    title_guess: &str,
    extra_content: Option<&str>,
    style: FrontmatterStyle,
) -> Result<ReconcileOutcome, FrontmatterError> {
    let doc = read(path, style)?;
    if doc.malformed.is_some() {
        return Ok(ReconcileOutcome::SkippedMalformed);
    }

    let (frontmatter, changed) = match doc.frontmatter {
        None => (Frontmatter::default().with_defaults(title_guess), true),
        Some(existing) => {
            let before = existing.to_toml()?;
            let filled = existing.with_defaults(title_guess);
            let changed = filled.to_toml()? != before;
            (filled, changed)
        }
    };

    if !changed && extra_content.is_none() {
        return Ok(ReconcileOutcome::Unchanged);
    }

    let body = match extra_content {
        Some(extra) => append_content(&doc.body, extra),
        None => doc.body,
    };

    write(path, Some(&frontmatter), &body, style)?;
    Ok(ReconcileOutcome::Written)
}

/// Join two bodies with one blank line, trimming blank lines at the seams.
fn append_content(body: &str, extra: &str) -> String {
    let body: Vec<&str> = body.lines().collect();
    let extra: Vec<&str> = extra.lines().collect();
    let body = trim_blank(&body);
    let extra = trim_blank(&extra);

    match (body.is_empty(), extra.is_empty()) {
        (true, _) => extra.join("\n"),
        (false, true) => body.join("\n"),
        (false, false) => format!("{}\n\n{}", body.join("\n"), extra.join("\n")),
    }
}
