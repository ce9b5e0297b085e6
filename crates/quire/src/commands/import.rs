//! `quire import` command implementation.

use std::path::PathBuf;

use clap::Args;
use quire_book::{import, plan_import};

use super::{Context, split_options};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the import command.
#[derive(Args)]
pub(crate) struct ImportArgs {
    /// Markdown file to turn into a book in the current directory.
    file: PathBuf,

    /// Show the pages that would be created without writing anything.
    #[arg(short, long)]
    print: bool,

    /// Only split at headings containing this text.
    #[arg(long)]
    on: Option<String>,
}

impl ImportArgs {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let output = Output::new();
        let (config, book) = ctx.book_config()?;
        let options = split_options(&config, self.on);
        let source = ctx.cwd.join(&self.file);

        if self.print {
            let plan = plan_import(&source, &ctx.cwd, &book, &options)?;
            output.highlight(&plan.index_title);
            for page in &plan.pages {
                output.line(&format!(
                    "{} ({}) -> {}",
                    page.title, page.source_lines, page.file_name
                ));
            }
            return Ok(());
        }

        let report = import(&source, &ctx.cwd, &book, &options)?;
        for warning in &report.warnings {
            output.warning(&warning.to_string());
        }
        output.success(&format!(
            "Created book with {} files from {}",
            report.written.len(),
            source.display()
        ));
        Ok(())
    }
}
