//! `quire split` command implementation.

use clap::Args;
use quire_book::Project;

use super::{Context, split_options};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the split command.
#[derive(Args)]
pub(crate) struct SplitArgs {
    /// Pages of the current chapter to split.
    #[arg(required = true)]
    files: Vec<String>,

    /// Show the pages that would be created without writing anything.
    #[arg(short, long)]
    print: bool,

    /// Only split at headings containing this text.
    #[arg(long)]
    on: Option<String>,
}

impl SplitArgs {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let output = Output::new();
        let (config, book) = ctx.book_config()?;
        let options = split_options(&config, self.on);

        for file in &self.files {
            // Reopen per file: each split rewrites the descriptor.
            let mut project = Project::open(&ctx.cwd, &book)?;

            if self.print {
                let plan = project.plan_split(file, &options)?;
                output.highlight(file);
                for page in &plan.pages {
                    output.line(&format!(
                        "{} ({}) -> {}",
                        page.title,
                        page.source_lines,
                        plan.target_dir.join(&page.file_name).display()
                    ));
                }
                continue;
            }

            let report = project.split(file, &options)?;
            for warning in &report.warnings {
                output.warning(&warning.to_string());
            }
            for moved in &report.moved {
                output.info(&format!("Moved {} -> {}", moved.from.display(), moved.to.display()));
            }
            output.success(&format!("Split {file} into {} files", report.written.len()));
        }
        Ok(())
    }
}
