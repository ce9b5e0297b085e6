//! `quire build` command implementation.

use std::path::PathBuf;

use clap::Args;
use quire_book::{CommonMarkRenderer, MiniJinjaRenderer, Publisher, Theme};
use quire_config::CliSettings;

use super::{Context, book_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Output directory for rendered pages (default: html/ next to the book).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Directory holding template.html and style.css (overrides config).
    #[arg(short, long)]
    template_dir: Option<PathBuf>,
}

impl BuildArgs {
    pub(crate) fn execute(self, ctx: &Context) -> Result<(), CliError> {
        let output = Output::new();

        let (_, discovery) = ctx.book_config()?;
        let book_dir = ctx.book_dir(&discovery)?;

        let cli_settings = CliSettings {
            output_dir: self.output_dir,
            template_dir: self.template_dir,
        };
        let config = ctx.load_config(&book_dir, Some(&cli_settings))?;
        let book = book_config(&config);
        let output_dir = &config.build_resolved.output_dir;

        output.info(&format!("Book: {}", book_dir.display()));
        output.info(&format!("Output: {}", output_dir.display()));

        let theme = match &config.build_resolved.template_dir {
            Some(dir) => Theme::load(dir)?,
            None => Theme::builtin(),
        };
        let templates = MiniJinjaRenderer::new();
        let publisher = Publisher::new(&book, &CommonMarkRenderer, &templates);
        let report = publisher.publish(&book_dir.join(&book.book_file), output_dir, &theme)?;

        for warning in &report.warnings {
            output.warning(&warning.to_string());
        }
        for image in &report.missing_images {
            output.warning(&format!("Missing image {}", image.display()));
        }
        output.success(&format!(
            "Built {} pages to {}",
            report.pages.len(),
            output_dir.display()
        ));
        Ok(())
    }
}
