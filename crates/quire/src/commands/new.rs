//! `quire new` command implementation.

use clap::Args;
use quire_book::{NewPageOutcome, Project};

use super::Context;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the new command.
#[derive(Args)]
pub(crate) struct NewArgs {
    /// Titles of the pages to create.
    #[arg(required = true)]
    titles: Vec<String>,
}

impl NewArgs {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let output = Output::new();
        let (_, book) = ctx.book_config()?;
        let mut project = Project::open(&ctx.cwd, &book)?;

        for outcome in project.new_pages(&self.titles)? {
            match outcome {
                NewPageOutcome::Created(name) => output.success(&format!("Created {name}")),
                NewPageOutcome::Exists(name) => {
                    output.warning(&format!("{name} already exists, ignoring"));
                }
            }
        }
        Ok(())
    }
}
