//! VVLevel Configuration Management
//!
//! Loads tool options from a `key = value` options file.
//!
//! ```text
//! # vvlevel.cfg
//! levelsdir = /home/me/.local/share/VVVVVV
//! playtest = false
//! playassets =
//! loglevel = debug
//! sortlevels = true
//! ```
//!
//! Unknown keys are ignored and malformed values fall back to their default,
//! so an old or hand-edited file never stops the tool from starting.

use std::fs;
use std::path::{Path, PathBuf};
use vvlevel_core::CoreError;

/// Default options file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "vvlevel.cfg";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Options file missing
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Options file unreadable
    #[error("Could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ConfigError> for CoreError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NotFound(path) => CoreError::NotFound(path.display().to_string()),
            other => CoreError::Config(other.to_string()),
        }
    }
}

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Tool configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelConfig {
    /// User directory containing `levels/` (from "levelsdir" option)
    pub levels_dir: PathBuf,

    /// Command-line play-test mode (from "playtest" option)
    pub playtest: bool,

    /// Asset bundle mounted in play-test mode (from "playassets" option)
    pub play_assets: String,

    /// Default log filter (from "loglevel" option)
    pub log_level: String,

    /// Sort level listings by title (from "sortlevels" option)
    pub sort_levels: bool,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            levels_dir: PathBuf::from("."),
            playtest: false,
            play_assets: String::new(),
            log_level: "info".into(),
            sort_levels: true,
        }
    }
}

impl LevelConfig {
    /// Load configuration from an options file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&content))
    }

    /// Load `vvlevel.cfg` from the working directory
    pub fn load_default() -> Result<Self> {
        Self::load_from_file(DEFAULT_CONFIG_FILE)
    }

    /// Parse options text
    pub fn parse(content: &str) -> Self {
        let mut config = Self::default();

        for line in content.lines() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                config.parse_option(key.trim(), value.trim());
            }
        }

        config
    }

    fn parse_option(&mut self, key: &str, value: &str) {
        match key {
            "levelsdir" => {
                if !value.is_empty() {
                    self.levels_dir = PathBuf::from(value);
                }
            }
            "playtest" => {
                self.playtest = parse_bool(value).unwrap_or(false);
            }
            "playassets" => self.play_assets = value.into(),
            "loglevel" => {
                if !value.is_empty() {
                    self.log_level = value.to_lowercase();
                }
            }
            "sortlevels" => {
                self.sort_levels = parse_bool(value).unwrap_or(true);
            }
            _ => {
                tracing::debug!("Ignoring unknown option: {}", key);
            }
        }
    }

    /// Log a summary of the configuration
    pub fn display(&self) {
        tracing::info!("VVLevel configuration:");
        tracing::info!("    Levels dir: {}", self.levels_dir.display());
        tracing::info!("    Play-test: {}", self.playtest);
        if !self.play_assets.is_empty() {
            tracing::info!("    Play assets: {}", self.play_assets);
        }
        tracing::info!("    Log level: {}", self.log_level);
        tracing::info!("    Sort levels: {}", self.sort_levels);
    }
}

/// `true`/`false` as well as `1`/`0`
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = LevelConfig::default();
        assert_eq!(config.levels_dir, PathBuf::from("."));
        assert!(!config.playtest);
        assert_eq!(config.log_level, "info");
        assert!(config.sort_levels);
    }

    #[test]
    fn test_parse_simple_config() {
        let config_text = r#"
# comment = ignored
levelsdir = /tmp/vvvvvv
playtest = 1
playassets = levels/bundle
loglevel = DEBUG
sortlevels = false
unknownkey = whatever
"#;
        let config = LevelConfig::parse(config_text);
        assert_eq!(config.levels_dir, PathBuf::from("/tmp/vvvvvv"));
        assert!(config.playtest);
        assert_eq!(config.play_assets, "levels/bundle");
        assert_eq!(config.log_level, "debug");
        assert!(!config.sort_levels);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = LevelConfig::parse("playtest = maybe\nsortlevels = ???\nloglevel =\nnot a pair");
        assert_eq!(config, LevelConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "playassets = x = y\n").unwrap();

        let config = LevelConfig::load_from_file(&path).unwrap();
        assert_eq!(config.play_assets, "x = y");

        let missing = LevelConfig::load_from_file(temp_dir.path().join("nope.cfg"));
        assert!(matches!(missing, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_into_core_error() {
        let missing = ConfigError::NotFound(PathBuf::from("nope.cfg"));
        let err: CoreError = missing.into();
        assert!(matches!(err, CoreError::NotFound(ref path) if path == "nope.cfg"));

        let unreadable = ConfigError::Io {
            path: PathBuf::from("dir.cfg"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(matches!(CoreError::from(unreadable), CoreError::Config(_)));
    }
}
