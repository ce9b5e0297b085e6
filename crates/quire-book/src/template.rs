//! Page templates.
//!
//! Every page is rendered by filling one HTML template with a [`PageContext`].
//! Referencing a key the context does not define is an error, so template
//! typos fail the build instead of rendering empty strings.

use std::path::{Path, PathBuf};

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

const BUILTIN_TEMPLATE: &str = include_str!("../templates/template.html");
const BUILTIN_STYLE: &str = include_str!("../templates/style.css");

/// Template file name inside a theme directory.
pub const TEMPLATE_FILE: &str = "template.html";
/// Stylesheet file name inside a theme directory and the output directory.
pub const STYLE_FILE: &str = "style.css";

/// Error type for template loading and rendering.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// Template could not be rendered.
    #[error("Template error: {0}")]
    Render(#[from] minijinja::Error),
    /// Theme file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Title entry, innermost first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TitleItem {
    pub title: String,
}

/// Link to an enclosing section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionHeader {
    pub title: String,
    pub href: String,
}

/// Values available to the page template.
///
/// All links are relative to the page being rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageContext {
    /// Rendered page body.
    pub body: String,
    pub title: String,
    /// Page title followed by enclosing section titles, root excluded.
    pub titles: Vec<TitleItem>,
    /// Enclosing sections from outermost to innermost, root excluded.
    pub section_headers: Vec<SectionHeader>,
    pub header: String,
    /// Previous page link, empty on the first page.
    pub prev: String,
    /// Next page link, empty on the last page.
    pub next: String,
    pub index_html: String,
    pub toc_html: String,
    pub style_css: String,
    pub book_title: String,
    pub copyright: String,
}

/// Fills a template with a page context.
pub trait TemplateRenderer {
    fn render(&self, template: &str, context: &PageContext) -> Result<String, TemplateError>;
}

/// minijinja-backed renderer with strict undefined handling.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, context: &PageContext) -> Result<String, TemplateError> {
        Ok(self.env.render_str(template, context)?)
    }
}

/// Page template plus stylesheet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    pub template: String,
    pub style: String,
}

impl Theme {
    /// Theme compiled into the binary.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            template: BUILTIN_TEMPLATE.to_owned(),
            style: BUILTIN_STYLE.to_owned(),
        }
    }

    /// Load a theme directory.
    ///
    /// `template.html` is required. Without `style.css` the built-in
    /// stylesheet is used.
    pub fn load(dir: &Path) -> Result<Self, TemplateError> {
        let read = |path: PathBuf| {
            std::fs::read_to_string(&path).map_err(|source| TemplateError::Io { path, source })
        };

        let template = read(dir.join(TEMPLATE_FILE))?;
        let style_path = dir.join(STYLE_FILE);
        let style = if style_path.is_file() {
            read(style_path)?
        } else {
            BUILTIN_STYLE.to_owned()
        };

        Ok(Self { template, style })
    }
}
