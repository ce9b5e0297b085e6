//! CLI error types.

use quire_book::{ManifestError, ProjectError, PublishError, TemplateError};
use quire_config::ConfigError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Project(#[from] ProjectError),

    #[error("{0}")]
    Manifest(#[from] ManifestError),

    #[error("{0}")]
    Template(#[from] TemplateError),

    #[error("{0}")]
    Publish(#[from] PublishError),
}
