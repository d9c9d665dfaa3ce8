//! Application configuration.
//!
//! # Responsibility
//! - Load `kindergarten.toml` when present; fall back to defaults otherwise.
//! - Resolve relative paths against the directory holding the config file.
//!
//! # Invariants
//! - Every field has a default, so an empty file is a valid config.
//! - A missing file is not an error; a malformed one is.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "kindergarten.toml";
pub const DEFAULT_DATABASE_FILE: &str = "kindergarten.db";
pub const DEFAULT_LOG_DIR: &str = "logs";

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "failed to parse config `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite database file.
    pub database_path: PathBuf,
    /// Directory for rolling log files.
    pub log_dir: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_FILE),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            log_level: default_log_level().to_string(),
        }
    }
}

impl AppConfig {
    /// Parses a TOML document. Relative paths stay relative.
    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|err| err.to_string())
    }

    /// Loads `path` if it exists, defaults otherwise, then anchors relative
    /// paths at the file's parent directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let config = match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents).map_err(|message| {
                ConfigError::Parse {
                    path: path.to_path_buf(),
                    message,
                }
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        Ok(config.anchored_at(&base_dir))
    }

    /// Rewrites relative paths as `base_dir/<path>`.
    pub fn anchored_at(mut self, base_dir: &Path) -> Self {
        if self.database_path.is_relative() {
            self.database_path = base_dir.join(&self.database_path);
        }
        if self.log_dir.is_relative() {
            self.log_dir = base_dir.join(&self.log_dir);
        }
        self
    }
}
