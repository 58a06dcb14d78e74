//! Configuration file support for persistent settings.
//!
//! This module loads an optional TOML file located at
//! `~/.config/swork/config.toml` (or the platform-specific equivalent). Values
//! in the file serve as defaults that CLI arguments and environment variables
//! override.
//!
//! # Layering
//!
//! The precedence order is: **CLI argument > environment > config file > hardcoded default**.
//!
//! # Example config
//!
//! ```toml
//! registry = "~/.config/swork/projects.json"
//! session_root = "/tmp/swork"
//! editor = "nvim"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration file structure.
///
/// All fields are `Option<T>` so we can tell which values the file sets and
/// layer them under the CLI and environment.
#[derive(Deserialize, Default, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Path of the project registry (JSON)
    pub registry: Option<PathBuf>,

    /// Directory holding one scratch directory per terminal session
    pub session_root: Option<PathBuf>,

    /// Editor command used by `swork add` to create activation scripts
    pub editor: Option<String>,
}

/// Expand a leading `~` in a path to the user's home directory.
///
/// Paths that don't start with `~` are returned unchanged.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

impl FileConfig {
    /// Returns the path where the configuration file is expected.
    ///
    /// The file lives at `<config_dir>/swork/config.toml`, where `<config_dir>`
    /// is the platform-specific configuration directory (e.g. `~/.config` on
    /// Linux).
    ///
    /// # Returns
    ///
    /// `Some(PathBuf)` with the config file path, or `None` if the config
    /// directory cannot be determined.
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("swork").join("config.toml"))
    }

    /// Load configuration from the default config file location.
    ///
    /// If the config file doesn't exist, returns a default (empty) configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file exists but cannot be read
    /// - The config file exists but contains invalid TOML or unexpected fields
    pub fn load() -> anyhow::Result<Self> {
        let Some(path) = Self::config_path() else {
            return Ok(Self::default());
        };

        Self::load_from(&path)
    }

    /// Load configuration from an explicit path, with the same rules as [`FileConfig::load`].
    ///
    /// # Errors
    ///
    /// Same as [`FileConfig::load`].
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file at {}: {e}", path.display())
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file at {}: {e}", path.display())
        })?;

        Ok(config)
    }
}
