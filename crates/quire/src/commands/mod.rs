//! CLI command implementations.

mod add;
mod build;
mod import;
mod indent;
mod init;
mod list;
mod new;
mod split;

use std::path::{Path, PathBuf};

use quire_book::{BookConfig, FrontmatterStyle, ProjectError, SplitOptions, find_enclosing_manifest};
use quire_config::{CliSettings, Config};

pub(crate) use add::AddArgs;
pub(crate) use build::BuildArgs;
pub(crate) use import::ImportArgs;
pub(crate) use indent::IndentArgs;
pub(crate) use init::InitArgs;
pub(crate) use list::ListCommand;
pub(crate) use new::NewArgs;
pub(crate) use split::SplitArgs;

use crate::error::CliError;

/// Invocation-wide settings shared by every command.
pub(crate) struct Context {
    /// Directory the command was started in.
    pub(crate) cwd: PathBuf,
    /// Explicit `--config` path.
    pub(crate) config_path: Option<PathBuf>,
}

impl Context {
    pub(crate) fn from_env(config_path: Option<PathBuf>) -> Result<Self, CliError> {
        Ok(Self {
            cwd: std::env::current_dir()?,
            config_path,
        })
    }

    /// Load `quire.toml`, discovering it from `start_dir` upwards.
    pub(crate) fn load_config(
        &self,
        start_dir: &Path,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Config, CliError> {
        let config = Config::load(self.config_path.as_deref(), start_dir, cli_settings)?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }
        Ok(config)
    }

    /// Book settings for commands working in the current directory.
    pub(crate) fn book_config(&self) -> Result<(Config, BookConfig), CliError> {
        let config = self.load_config(&self.cwd, None)?;
        let book = book_config(&config);
        Ok((config, book))
    }

    /// Root directory of the book enclosing the current directory.
    pub(crate) fn book_dir(&self, book: &BookConfig) -> Result<PathBuf, CliError> {
        let book_file = find_enclosing_manifest(&self.cwd, &book.book_file)
            .ok_or_else(|| ProjectError::NotABook(self.cwd.clone()))?;
        Ok(book_file
            .parent()
            .map_or_else(|| self.cwd.clone(), Path::to_path_buf))
    }
}

/// Map loaded configuration onto the library's book settings.
pub(crate) fn book_config(config: &Config) -> BookConfig {
    BookConfig {
        extension: config.build_resolved.extension.clone(),
        frontmatter: FrontmatterStyle {
            separator: config.frontmatter.separator_char(),
            min_length: config.frontmatter.min_length,
        },
        ..BookConfig::default()
    }
}

/// Split options from the `--on` flag and the `[split]` config table.
pub(crate) fn split_options(config: &Config, on: Option<String>) -> SplitOptions {
    SplitOptions {
        on,
        attach_number: config.split.attach_number,
    }
}
