//! Colored terminal output utilities.

use console::{Style, Term};

/// Message tone, mapped to a color.
#[derive(Clone, Copy)]
enum Tone {
    Plain,
    Success,
    Warning,
    Error,
    Heading,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Plain => Style::new(),
            Self::Success => Style::new().green(),
            Self::Warning => Style::new().yellow(),
            Self::Error => Style::new().red(),
            Self::Heading => Style::new().cyan().bold(),
        }
    }
}

/// Terminal output formatter.
///
/// Status messages go to stderr. Command results such as file listings go to
/// stdout so they can be piped.
pub(crate) struct Output {
    status: Term,
    results: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            status: Term::stderr(),
            results: Term::stdout(),
        }
    }

    fn emit(&self, tone: Tone, msg: &str) {
        let _ = self.status.write_line(&tone.style().apply_to(msg).to_string());
    }

    pub(crate) fn info(&self, msg: &str) {
        self.emit(Tone::Plain, msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.emit(Tone::Success, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.emit(Tone::Warning, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.emit(Tone::Error, msg);
    }

    /// Heading above a block of result lines.
    pub(crate) fn highlight(&self, msg: &str) {
        self.emit(Tone::Heading, msg);
    }

    /// Print a result line to stdout.
    pub(crate) fn line(&self, msg: &str) {
        let _ = self.results.write_line(msg);
    }
}
