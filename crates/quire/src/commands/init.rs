//! `quire init` command implementation.

use clap::Args;
use quire_book::{InitOutcome, Project};

use super::Context;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the init command.
#[derive(Args)]
pub(crate) struct InitArgs {
    /// Refresh the frontmatter of an existing book instead of failing.
    #[arg(short, long)]
    update: bool,
}

impl InitArgs {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let output = Output::new();
        let (_, book) = ctx.book_config()?;

        match Project::init(&ctx.cwd, &book, self.update)? {
            InitOutcome::Created(path) => {
                output.success(&format!("Created book {}", path.display()));
            }
            InitOutcome::Updated(path) => {
                output.success(&format!("Updated book {}", path.display()));
            }
        }
        Ok(())
    }
}
