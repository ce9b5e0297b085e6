//! Configuration management for quire.
//!
//! Settings live in `quire.toml`, found next to the book or in any parent
//! directory. Command-line flags are layered on top with [`CliSettings`].
//!
//! ## Example
//!
//! ```toml
//! [build]
//! output_dir = "html"
//! extension = "html"
//! template_dir = "theme"
//!
//! [frontmatter]
//! separator = "+"
//! min_length = 3
//!
//! [split]
//! attach_number = false
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Command-line flags that take precedence over `quire.toml`.
///
/// Unset fields leave the file's value in place.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output directory for rendered pages.
    pub output_dir: Option<PathBuf>,
    /// Override template directory.
    pub template_dir: Option<PathBuf>,
}

/// Name of the file searched for by [`Config::load`].
const CONFIG_FILENAME: &str = "quire.toml";

/// Smallest separator length that still reads as a delimiter line.
const MIN_SEPARATOR_LENGTH: usize = 3;

/// Settings for one quire invocation.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build configuration (paths are relative strings from TOML).
    build: BuildConfigRaw,
    /// Frontmatter delimiter style.
    pub frontmatter: FrontmatterConfig,
    /// Split command configuration.
    pub split: SplitConfig,

    /// Resolved build configuration (set after loading).
    #[serde(skip)]
    pub build_resolved: BuildConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw build configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    output_dir: Option<String>,
    extension: Option<String>,
    template_dir: Option<String>,
}

/// Resolved build configuration with absolute paths.
#[derive(Debug, Default)]
pub struct BuildConfig {
    /// Directory rendered pages are written to.
    pub output_dir: PathBuf,
    /// Extension of rendered pages.
    pub extension: String,
    /// Directory holding `template.html` and optionally `style.css`.
    ///
    /// If `None`, the built-in template is used.
    pub template_dir: Option<PathBuf>,
}

/// Frontmatter delimiter configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FrontmatterConfig {
    /// Character repeated to form a separator line.
    pub separator: String,
    /// Minimum number of repetitions for a separator line.
    pub min_length: usize,
}

impl Default for FrontmatterConfig {
    fn default() -> Self {
        Self {
            separator: "+".to_owned(),
            min_length: MIN_SEPARATOR_LENGTH,
        }
    }
}

impl FrontmatterConfig {
    /// Separator character.
    ///
    /// Falls back to `+` when the configured string is empty; [`Config::validate`]
    /// rejects that case for loaded files.
    #[must_use]
    pub fn separator_char(&self) -> char {
        self.separator.chars().next().unwrap_or('+')
    }
}

/// Split command configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Prefix page names created by `split` with their two-digit position.
    pub attach_number: bool,
}

/// Error loading `quire.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `--config` names a file that does not exist.
    #[error("No configuration at {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid quire.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of range.
    #[error("Invalid setting: {0}")]
    Validation(String),
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

impl Config {
    /// Load `config_path`, or the first `quire.toml` found from `start_dir`
    /// upwards.
    ///
    /// Without a file, defaults are rooted at `start_dir`. `cli_settings` are
    /// overlaid last.
    pub fn load(
        config_path: Option<&Path>,
        start_dir: &Path,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = discover_config(start_dir) {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_base(start_dir)
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Overlay command-line flags.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(output_dir) = &settings.output_dir {
            self.build_resolved.output_dir.clone_from(output_dir);
        }
        if let Some(template_dir) = &settings.template_dir {
            self.build_resolved.template_dir = Some(template_dir.clone());
        }
    }

    /// Defaults for a book without `quire.toml`, rooted at `base`.
    fn default_with_base(base: &Path) -> Self {
        Self {
            build: BuildConfigRaw::default(),
            frontmatter: FrontmatterConfig::default(),
            split: SplitConfig::default(),
            build_resolved: BuildConfig {
                output_dir: base.join("html"),
                extension: "html".to_owned(),
                template_dir: None,
            },
            config_path: None,
        }
    }

    /// Parse, resolve and validate one file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Check value ranges. Runs on every loaded file.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_build()?;
        self.validate_frontmatter()?;
        Ok(())
    }

    fn validate_build(&self) -> Result<(), ConfigError> {
        let extension = &self.build_resolved.extension;
        require_non_empty(extension, "build.extension")?;
        if extension.starts_with('.') || extension.contains('/') {
            return Err(ConfigError::Validation(format!(
                "build.extension must be a bare extension, got '{extension}'"
            )));
        }
        Ok(())
    }

    fn validate_frontmatter(&self) -> Result<(), ConfigError> {
        let separator = &self.frontmatter.separator;
        require_non_empty(separator, "frontmatter.separator")?;

        let mut chars = separator.chars();
        let single = chars.next().filter(|_| chars.next().is_none());
        match single {
            Some(c) if !c.is_alphanumeric() && !c.is_whitespace() => {}
            _ => {
                return Err(ConfigError::Validation(format!(
                    "frontmatter.separator must be a single punctuation character, got '{separator}'"
                )));
            }
        }

        if self.frontmatter.min_length < MIN_SEPARATOR_LENGTH {
            return Err(ConfigError::Validation(format!(
                "frontmatter.min_length must be at least {MIN_SEPARATOR_LENGTH}"
            )));
        }

        Ok(())
    }

    /// Paths in the file are relative to the file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.build_resolved = BuildConfig {
            output_dir: config_dir.join(self.build.output_dir.as_deref().unwrap_or("html")),
            extension: self
                .build
                .extension
                .clone()
                .unwrap_or_else(|| "html".to_owned()),
            template_dir: self.build.template_dir.as_deref().map(|d| config_dir.join(d)),
        };
    }
}

/// Search for config file in `start` and its parents.
fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}
