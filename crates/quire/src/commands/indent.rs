//! `quire indent` command implementation.

use clap::Args;
use quire_book::Project;

use super::Context;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the indent command.
#[derive(Args)]
pub(crate) struct IndentArgs {
    /// Pages whose headings should move one level deeper.
    #[arg(required = true)]
    files: Vec<String>,

    /// Show the page outline without writing anything.
    #[arg(short, long)]
    print: bool,
}

impl IndentArgs {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let output = Output::new();
        let (_, book) = ctx.book_config()?;
        let project = Project::open(&ctx.cwd, &book)?;

        for file in &self.files {
            if self.print {
                output.highlight(file);
                for (title, lines) in project.outline(file)? {
                    output.line(&format!("{title} ({lines})"));
                }
            } else if project.indent(file)? {
                output.success(&format!("Indented {file}"));
            } else {
                output.warning(&format!("No headings in {file}"));
            }
        }
        Ok(())
    }
}
