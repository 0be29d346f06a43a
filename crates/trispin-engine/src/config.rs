//! Application configuration.
//!
//! Loaded from a TOML file; every field has a default so an empty file (or no
//! file at all) yields a windowed 800x600 setup reading `shaders/vertex.vs`
//! and `shaders/fragment.fs`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "trispin.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("window size must be non-zero, got {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub shaders: ShaderConfig,
    pub logging: LogConfig,
}

/// Window size and mode.
///
/// In fullscreen mode the window is borderless on the primary monitor and
/// `width`/`height` only seed the initial viewport.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "trispin".to_string(),
            width: 800,
            height: 600,
            fullscreen: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShaderConfig {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
    /// Abort when a stage fails to compile or the program fails to link.
    pub strict: bool,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("shaders/vertex.vs"),
            fragment: PathBuf::from("shaders/fragment.fs"),
            strict: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `env_logger` filter; `RUST_LOG` applies when unset.
    pub filter: Option<String>,
}

impl AppConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`. Relative shader paths are resolved against the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_toml_str(&text)?;
        if let Some(dir) = path.parent() {
            config.shaders.vertex = dir.join(&config.shaders.vertex);
            config.shaders.fragment = dir.join(&config.shaders.fragment);
        }
        Ok(config)
    }

    /// Loads `explicit` if given, else [`DEFAULT_CONFIG_FILE`] when it exists,
    /// else the defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let WindowConfig { width, height, .. } = self.window;
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidSize { width, height });
        }
        Ok(())
    }
}
