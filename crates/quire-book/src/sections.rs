//! Heading-based section splitting.
//!
//! A flat markdown document is cut into sections at every heading line, then
//! sections are regrouped into bundles, each opened by a heading at the pivot
//! depth (the shallowest heading in the document). Bundles become pages when a
//! document is split or imported.

use std::sync::LazyLock;

use regex::Regex;

/// Trailing `{#id}` heading annotation.
static HEADING_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\{#[^}]*\}\s*$").unwrap());

/// Depth of a section.
///
/// Sections without a heading marker sort after every heading depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionDepth {
    /// Heading with this many `#` characters.
    Heading(usize),
    /// Untitled text.
    Text,
}

/// A run of lines starting at a heading (or at the start of the document).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Section {
    pub lines: Vec<String>,
}

impl Section {
    /// Depth of the section's first line.
    #[must_use]
    pub fn depth(&self) -> SectionDepth {
        section_depth(self)
    }

    /// Title of the section's heading, empty for untitled text.
    #[must_use]
    pub fn title(&self) -> String {
        section_title(self)
    }
}

/// Tracks whether a line is inside a fenced code block.
#[derive(Default)]
struct FenceState {
    open: Option<(char, usize)>,
}

impl FenceState {
    /// Feed a line. Returns true when the line is inside a fence, including the
    /// fence lines themselves.
    fn feed(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();
        let fence = ['`', '~'].into_iter().find_map(|c| {
            let run = trimmed.chars().take_while(|&x| x == c).count();
            (run >= 3).then_some((c, run))
        });

        match (self.open, fence) {
            (None, Some(found)) => {
                self.open = Some(found);
                true
            }
            (Some((c, len)), Some((found_c, found_len)))
                if c == found_c && found_len >= len && trimmed.trim_end().len() == found_len =>
            {
                self.open = None;
                true
            }
            (Some(_), _) => true,
            (None, None) => false,
        }
    }
}

fn is_heading(line: &str) -> bool {
    line.starts_with('#')
}

/// Split lines into sections at each heading outside fenced code.
///
/// Lines before the first heading form a leading untitled section when they
/// contain anything besides blank lines.
#[must_use]
pub fn split_to_sections<S: AsRef<str>>(lines: &[S]) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut fences = FenceState::default();

    for line in lines {
        let line = line.as_ref();
        let fenced = fences.feed(line);
        if !fenced && is_heading(line) && !current.is_empty() {
            sections.push(Section {
                lines: std::mem::take(&mut current),
            });
        }
        current.push(line.to_owned());
    }
    if !current.is_empty() {
        sections.push(Section { lines: current });
    }

    if let Some(first) = sections.first()
        && first.depth() == SectionDepth::Text
        && trim_blank(&first.lines).is_empty()
    {
        sections.remove(0);
    }

    sections
}

/// Depth of a section: the number of leading `#` of its first line.
#[must_use]
pub fn section_depth(section: &Section) -> SectionDepth {
    let first = section.lines.first().map_or("", String::as_str);
    if !is_heading(first) {
        return SectionDepth::Text;
    }
    match first.chars().take_while(|&c| c == '#').count() {
        0 => SectionDepth::Text,
        n => SectionDepth::Heading(n),
    }
}

/// Heading text of a section without the marker and any `{#id}` suffix.
#[must_use]
pub fn section_title(section: &Section) -> String {
    let first = section.lines.first().map_or("", String::as_str);
    if !is_heading(first) {
        return String::new();
    }
    let text = first.split_once(' ').map_or("", |(_, rest)| rest);
    HEADING_ID_RE.replace(text, "").trim().to_owned()
}

/// Minimum heading depth over all sections, `None` if none has a heading.
#[must_use]
pub fn pivot_depth(sections: &[Section]) -> Option<usize> {
    sections
        .iter()
        .filter_map(|s| match s.depth() {
            SectionDepth::Heading(n) => Some(n),
            SectionDepth::Text => None,
        })
        .min()
}

/// Strip leading and trailing blank lines.
#[must_use]
pub fn trim_blank<S: AsRef<str>>(lines: &[S]) -> &[S] {
    let is_blank = |line: &S| line.as_ref().trim().is_empty();
    let Some(start) = lines.iter().position(|l| !is_blank(l)) else {
        return &lines[..0];
    };
    let end = lines.iter().rposition(|l| !is_blank(l)).map_or(start, |i| i + 1);
    &lines[start..end]
}

/// Consecutive sections grouped under one opening section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Bundle {
    pub sections: Vec<Section>,
}

impl Bundle {
    /// Depth of every section in the bundle.
    #[must_use]
    pub fn depths(&self) -> Vec<SectionDepth> {
        self.sections.iter().map(Section::depth).collect()
    }

    /// Title of the opening section.
    #[must_use]
    pub fn title(&self) -> String {
        self.sections.first().map(Section::title).unwrap_or_default()
    }

    /// All lines of the bundle in order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.sections
            .iter()
            .flat_map(|s| s.lines.iter().cloned())
            .collect()
    }

    /// Body of the bundle as a standalone page.
    ///
    /// The opening heading is dropped (it becomes the page title) and nested
    /// headings are lifted by `pivot` levels, never above level one.
    #[must_use]
    pub fn page_body(&self, pivot: usize) -> String {
        let mut lines: Vec<String> = Vec::new();
        for (i, section) in self.sections.iter().enumerate() {
            let mut section_lines = section.lines.iter();
            let head = section_lines.next();
            if i > 0
                && let (Some(head), SectionDepth::Heading(depth)) = (head, section.depth())
            {
                let lifted = depth.saturating_sub(pivot).max(1);
                let rest = head.trim_start_matches('#');
                lines.push(format!("{}{rest}", "#".repeat(lifted)));
            }
            lines.extend(section_lines.cloned());
        }
        trim_blank(&lines).join("\n")
    }
}

/// Group sections into bundles; a new bundle starts at each section whose
/// depth equals `pivot`.
#[must_use]
pub fn join_sections(sections: &[Section], pivot: SectionDepth) -> Vec<Bundle> {
    join_sections_matching(sections, |section| section.depth() == pivot)
}

fn join_sections_matching(
    sections: &[Section],
    mut opens: impl FnMut(&Section) -> bool,
) -> Vec<Bundle> {
    let mut bundles = Vec::new();
    let mut current: Vec<Section> = Vec::new();
    for section in sections {
        if opens(section) && !current.is_empty() {
            bundles.push(Bundle {
                sections: std::mem::take(&mut current),
            });
        }
        current.push(section.clone());
    }
    if !current.is_empty() {
        bundles.push(Bundle { sections: current });
    }
    bundles
}

/// Options for [`split_document`].
#[derive(Clone, Debug, Default)]
pub struct SplitOptions {
    /// Only pivot headings containing this text (case-insensitive) open a
    /// new bundle.
    pub on: Option<String>,
    /// Prefix page file names with their two-digit position.
    pub attach_number: bool,
}

/// A document cut into an introduction and page bundles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SplitDocument {
    /// Lines before the first opening heading, trimmed.
    pub intro: Vec<String>,
    /// Bundles, each opened by a pivot heading.
    pub bundles: Vec<Bundle>,
    /// Pivot depth, `None` for documents without headings.
    pub pivot: Option<usize>,
}

impl SplitDocument {
    /// Introduction as a single string.
    #[must_use]
    pub fn intro_text(&self) -> String {
        self.intro.join("\n")
    }
}

/// Split a markdown body into an introduction and bundles at the pivot depth.
#[must_use]
pub fn split_document(body: &str, options: &SplitOptions) -> SplitDocument {
    let lines: Vec<&str> = body.lines().collect();
    let sections = split_to_sections(&lines);
    let Some(pivot) = pivot_depth(&sections) else {
        return SplitDocument {
            intro: trim_blank(&lines).iter().map(|l| (*l).to_owned()).collect(),
            bundles: Vec::new(),
            pivot: None,
        };
    };

    let needle = options.on.as_deref().map(str::to_lowercase);
    let opens = |section: &Section| {
        section.depth() == SectionDepth::Heading(pivot)
            && needle
                .as_deref()
                .is_none_or(|n| section.title().to_lowercase().contains(n))
    };

    let mut bundles = join_sections_matching(&sections, opens);
    let mut intro = Vec::new();
    if let Some(first) = bundles.first()
        && !first.sections.first().is_some_and(opens)
    {
        intro = bundles.remove(0).lines();
    }

    SplitDocument {
        intro: trim_blank(&intro).to_vec(),
        bundles,
        pivot: Some(pivot),
    }
}

/// Push every heading one level deeper.
#[must_use]
pub fn indent_headings(body: &str) -> String {
    let mut fences = FenceState::default();
    let mut out: Vec<String> = body
        .lines()
        .map(|line| {
            if !fences.feed(line) && is_heading(line) {
                format!("#{line}")
            } else {
                line.to_owned()
            }
        })
        .collect();
    if body.ends_with('\n') {
        out.push(String::new());
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn section(lines: &[&str]) -> Section {
        Section {
            lines: lines.iter().map(|l| (*l).to_owned()).collect(),
        }
    }

    #[test]
    fn test_split_two_headings() {
        let sections = split_to_sections(&["# A", "one", "# B", "two"]);
        assert_eq!(
            sections,
            vec![section(&["# A", "one"]), section(&["# B", "two"])]
        );
    }

    #[test]
    fn test_split_keeps_leading_text() {
        let sections = split_to_sections(&["intro", "", "# A", "one"]);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].depth(), SectionDepth::Text);
        assert_eq!(sections[0].lines, vec!["intro", ""]);
    }

    #[test]
    fn test_split_drops_blank_leading_text() {
        let sections = split_to_sections(&["", "  ", "# A"]);
        assert_eq!(sections, vec![section(&["# A"])]);
    }

    #[test]
    fn test_split_ignores_headings_in_fences() {
        let sections = split_to_sections(&["# A", "```sh", "# comment", "```", "# B"]);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].lines.len(), 4);
    }

    #[test]
    fn test_split_tilde_fence_needs_matching_close() {
        let sections = split_to_sections(&["# A", "~~~~", "```", "# inside", "~~~~", "# B"]);
        assert_eq!(sections.len(), 2);
    }

    #[test]
    fn test_section_depth() {
        assert_eq!(section_depth(&section(&["### Deep"])), SectionDepth::Heading(3));
        assert_eq!(section_depth(&section(&["plain"])), SectionDepth::Text);
        assert_eq!(section_depth(&Section::default()), SectionDepth::Text);
    }

    #[test]
    fn test_section_depth_counts_leading_markers_only() {
        assert_eq!(section_depth(&section(&["#1# Odd"])), SectionDepth::Heading(1));
        assert_eq!(section_depth(&section(&["## C# and F#"])), SectionDepth::Heading(2));
    }

    #[test]
    fn test_text_sorts_after_headings() {
        assert!(SectionDepth::Heading(6) < SectionDepth::Text);
        assert!(SectionDepth::Heading(1) < SectionDepth::Heading(2));
    }

    #[test]
    fn test_section_title_strips_id() {
        assert_eq!(section_title(&section(&["## Setup {#setup}"])), "Setup");
        assert_eq!(section_title(&section(&["# Why? "])), "Why?");
        assert_eq!(section_title(&section(&["#"])), "");
        assert_eq!(section_title(&section(&["text"])), "");
    }

    #[test]
    fn test_join_sections_by_pivot() {
        let sections: Vec<Section> = ["#", "##", "#", "#", "##", "##"]
            .iter()
            .map(|marker| section(&[format!("{marker} x").as_str()]))
            .collect();
        let bundles = join_sections(&sections, SectionDepth::Heading(1));
        let depths: Vec<Vec<SectionDepth>> = bundles.iter().map(Bundle::depths).collect();
        let h = SectionDepth::Heading;
        assert_eq!(
            depths,
            vec![vec![h(1), h(2)], vec![h(1)], vec![h(1), h(2), h(2)]]
        );
    }

    #[test]
    fn test_join_then_flatten_restores_sections() {
        let lines = ["intro", "# A", "a", "## A.1", "a1", "# B", "b"];
        let sections = split_to_sections(&lines);
        let bundles = join_sections(&sections, SectionDepth::Heading(1));
        let flattened: Vec<String> = bundles.iter().flat_map(Bundle::lines).collect();
        assert_eq!(flattened, lines);
    }

    #[test]
    fn test_pivot_depth() {
        let sections = split_to_sections(&["text", "### C", "## B"]);
        assert_eq!(pivot_depth(&sections), Some(2));
        assert_eq!(pivot_depth(&split_to_sections(&["text"])), None);
    }

    #[test]
    fn test_trim_blank() {
        let lines = ["", " ", "a", "", "b", "", ""];
        let trimmed = trim_blank(&lines);
        assert_eq!(trimmed, ["a", "", "b"]);
        assert_eq!(trim_blank(trimmed), trimmed);
        assert!(trim_blank(&["", ""]).is_empty());
    }

    #[test]
    fn test_page_body_lifts_nested_headings() {
        let bundle = Bundle {
            sections: vec![
                section(&["## Part", "", "text"]),
                section(&["### Detail", "more", ""]),
                section(&["#### Deeper"]),
            ],
        };
        assert_eq!(bundle.page_body(2), "text\n# Detail\nmore\n\n## Deeper");
    }

    #[test]
    fn test_split_document() {
        let body = "Preface\n\n# One\nfirst\n## Sub\nsub\n# Two {#two}\nsecond\n";
        let doc = split_document(body, &SplitOptions::default());

        assert_eq!(doc.intro, vec!["Preface"]);
        assert_eq!(doc.pivot, Some(1));
        let titles: Vec<String> = doc.bundles.iter().map(Bundle::title).collect();
        assert_eq!(titles, vec!["One", "Two"]);
        assert_eq!(doc.bundles[0].page_body(1), "first\n# Sub\nsub");
    }

    #[test]
    fn test_split_document_sub_pivot_prefix_goes_to_intro() {
        let doc = split_document("### Note\nn\n## Main\nm\n", &SplitOptions::default());
        assert_eq!(doc.intro, vec!["### Note", "n"]);
        assert_eq!(doc.bundles.len(), 1);
    }

    #[test]
    fn test_split_document_on_filter() {
        let body = "# Chapter 1\na\n# Notes\nb\n# CHAPTER 2\nc\n";
        let options = SplitOptions {
            on: Some("chapter".to_owned()),
            ..SplitOptions::default()
        };
        let doc = split_document(body, &options);
        let titles: Vec<String> = doc.bundles.iter().map(Bundle::title).collect();
        assert_eq!(titles, vec!["Chapter 1", "CHAPTER 2"]);
        assert_eq!(doc.bundles[0].page_body(1), "a\n# Notes\nb");
    }

    #[test]
    fn test_split_document_without_headings() {
        let doc = split_document("\njust text\n\n", &SplitOptions::default());
        assert_eq!(doc.intro, vec!["just text"]);
        assert!(doc.bundles.is_empty());
        assert_eq!(doc.pivot, None);
    }

    #[test]
    fn test_indent_headings() {
        let body = "# A\ntext\n```\n# not a heading\n```\n## B\n";
        assert_eq!(
            indent_headings(body),
            "## A\ntext\n```\n# not a heading\n```\n### B\n"
        );
    }
}
