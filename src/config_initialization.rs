//! Settings initialization and hierarchy management
//!
//! Precedence is CLI > environment > settings file > defaults. The env layer
//! is handled by clap (`env = ...` on the global arguments), so by the time
//! [`initialize_settings`] runs the CLI and environment are already merged.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::adapters::exec_ffmpeg::DEFAULT_TRANSCODER;
use crate::cli::GlobalArgs;
use crate::domain::model::{CategoryDescriptor, FormatDescriptor};
use crate::domain::rules::{CategoryRegistry, FormatRegistry};
use crate::utils::logging::LoggingConfig;

/// Default settings file name, looked up in the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "clipshelf.toml";

/// Default repository file name
pub const DEFAULT_REPOSITORY_FILE: &str = "clipshelf.json";

/// Default uploader program
pub const DEFAULT_UPLOADER: &str = "clipshelf-upload";

/// External uploader invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploaderSettings {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for UploaderSettings {
    fn default() -> Self {
        Self {
            program: DEFAULT_UPLOADER.to_string(),
            args: Vec::new(),
        }
    }
}

/// Contents of `clipshelf.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub repository_file: PathBuf,
    pub transcoder: String,
    pub uploader: UploaderSettings,
    pub logging: LoggingConfig,
    /// Replaces the built-in categories when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryDescriptor>>,
    /// Replaces the built-in formats when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formats: Option<Vec<FormatDescriptor>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            repository_file: PathBuf::from(DEFAULT_REPOSITORY_FILE),
            transcoder: DEFAULT_TRANSCODER.to_string(),
            uploader: UploaderSettings::default(),
            logging: LoggingConfig::default(),
            categories: None,
            formats: None,
        }
    }
}

impl Settings {
    /// Parse a settings file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No settings file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read settings file {}", path.display()))
            }
        };
        Self::parse(&content).with_context(|| format!("Invalid settings file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply values given on the command line or through the environment
    pub fn apply_overrides(&mut self, args: &GlobalArgs) {
        if let Some(repository) = &args.repository {
            self.repository_file = repository.clone();
        }
        if let Some(transcoder) = &args.transcoder {
            self.transcoder = transcoder.clone();
        }
        if let Some(uploader) = &args.uploader {
            self.uploader.program = uploader.clone();
        }
        if let Some(level) = args.log_level {
            self.logging.level = level;
        }
        if let Some(format) = args.log_format {
            self.logging.format = format;
        }
    }

    pub fn category_registry(&self) -> Result<CategoryRegistry> {
        match &self.categories {
            Some(categories) => CategoryRegistry::new(categories.clone())
                .context("Invalid category in settings file"),
            None => Ok(CategoryRegistry::builtin()),
        }
    }

    pub fn format_registry(&self) -> Result<FormatRegistry> {
        match &self.formats {
            Some(formats) => {
                FormatRegistry::new(formats.clone()).context("Invalid format in settings file")
            }
            None => Ok(FormatRegistry::builtin()),
        }
    }
}

/// Build the effective settings from the file named on the command line
pub fn initialize_settings(args: &GlobalArgs) -> Result<Settings> {
    let mut settings = Settings::load(&args.config)?;
    settings.apply_overrides(args);
    Ok(settings)
}

/// Log where the effective values came from, once logging is up
pub fn log_settings(args: &GlobalArgs, settings: &Settings) {
    info!(
        config = %args.config.display(),
        repository = %settings.repository_file.display(),
        transcoder = %settings.transcoder,
        uploader = %settings.uploader.program,
        custom_categories = settings.categories.is_some(),
        custom_formats = settings.formats.is_some(),
        "Settings initialized"
    );
}
