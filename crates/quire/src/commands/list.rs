//! `quire list` subcommand group.

use std::path::Path;

use clap::Subcommand;
use quire_book::Project;

use super::Context;
use crate::error::CliError;
use crate::output::Output;

/// Listing commands.
#[derive(Subcommand)]
pub(crate) enum ListCommand {
    /// Every markdown file of the book, in reading order.
    Markdown,
    /// Every image referenced by the book's pages.
    Images,
}

impl ListCommand {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let output = Output::new();
        let (_, book) = ctx.book_config()?;
        let project = Project::open(&ctx.book_dir(&book)?, &book)?;
        let show = |path: &Path| {
            path.strip_prefix(&ctx.cwd)
                .unwrap_or(path)
                .display()
                .to_string()
        };

        match self {
            Self::Markdown => {
                for file in project.markdown_files()? {
                    output.line(&show(&file));
                }
            }
            Self::Images => {
                for (file, image) in project.images()? {
                    output.line(&format!("{}: {image}", show(&file)));
                }
            }
        }
        Ok(())
    }
}
