//! Resolved settings for one invocation.

use std::path::{Path, PathBuf};

use crate::env::EnvSnapshot;
use crate::error::{Result, SworkError};
use crate::registry::Registry;

use super::{FileConfig, file::expand_tilde};

/// Editor used when neither the config file nor `$EDITOR` names one.
pub const FALLBACK_EDITOR: &str = "vi";

/// Settings after layering CLI, environment, config file, and defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Registry file path
    pub registry: PathBuf,

    /// Parent of all session directories
    pub session_root: PathBuf,

    /// Editor command for `swork add`
    pub editor: String,
}

impl Settings {
    /// Layer the sources into final settings.
    ///
    /// `registry_flag` is the value of `--registry` (or `SWORK_REGISTRY`, which
    /// clap folds into the same argument).
    ///
    /// # Errors
    ///
    /// Returns [`SworkError::Usage`] if no registry path is given and the home
    /// directory cannot be determined.
    pub fn resolve(
        registry_flag: Option<&Path>,
        file: &FileConfig,
        env: &EnvSnapshot,
    ) -> Result<Self> {
        let registry = match (registry_flag, &file.registry) {
            (Some(flag), _) => expand_tilde(flag),
            (None, Some(configured)) => expand_tilde(configured),
            (None, None) => Registry::default_path().ok_or_else(|| {
                SworkError::Usage(
                    "cannot determine the home directory; pass --registry".to_string(),
                )
            })?,
        };

        let session_root = file.session_root.as_deref().map_or_else(
            || std::env::temp_dir().join("swork"),
            expand_tilde,
        );

        let editor = file
            .editor
            .clone()
            .or_else(|| {
                env.get("EDITOR")
                    .filter(|value| !value.is_empty())
                    .map(|value| value.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| FALLBACK_EDITOR.to_string());

        Ok(Self {
            registry,
            session_root,
            editor,
        })
    }
}
