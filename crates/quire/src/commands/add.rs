//! `quire add` command implementation.

use clap::Args;
use quire_book::{AddOutcome, Project};

use super::Context;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the add command.
#[derive(Args)]
pub(crate) struct AddArgs {
    /// Files or directories to append to the current chapter.
    #[arg(required = true)]
    chapters: Vec<String>,
}

impl AddArgs {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let output = Output::new();
        let (_, book) = ctx.book_config()?;
        let mut project = Project::open(&ctx.cwd, &book)?;

        for outcome in project.add(&self.chapters)? {
            match outcome {
                AddOutcome::Page(name) => output.success(&format!("Added {name}")),
                AddOutcome::Section(name) => output.success(&format!("Added section {name}")),
                AddOutcome::IsIndex(name) => {
                    output.warning(&format!("{name} is the index page and always included, ignoring"));
                }
                AddOutcome::ExistingSection(name) => {
                    output.warning(&format!("Section {name} already has a chapter descriptor, ignoring"));
                }
                AddOutcome::AlreadyListed(name) => {
                    output.warning(&format!("{name} is already listed, ignoring"));
                }
                AddOutcome::Missing(name) => output.warning(&format!("{name} doesn't exist")),
            }
        }
        Ok(())
    }
}
