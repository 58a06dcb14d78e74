//! The explicit state one invocation operates on.

use std::path::{Path, PathBuf};

use crate::env::EnvSnapshot;
use crate::error::{Result, SworkError};

use super::SessionStore;

/// Session state for a single invocation.
///
/// Built once at startup and handed to every operation, so nothing below the
/// binary reads the process environment or the working directory directly.
#[derive(Debug)]
pub struct SessionContext {
    store: SessionStore,

    /// The environment captured on the first invocation of this session
    baseline: EnvSnapshot,

    /// The active project, as last persisted or as changed by this invocation
    active: Option<String>,

    /// The directory the shell was in when it invoked the tool
    invocation_dir: PathBuf,

    /// The environment inherited from the invoking shell
    current_env: EnvSnapshot,
}

impl SessionContext {
    /// Load the session, capturing the baseline first if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`SworkError::Session`] if the session files cannot be read or written.
    pub fn load(
        store: SessionStore,
        current_env: EnvSnapshot,
        invocation_dir: PathBuf,
    ) -> Result<Self> {
        let baseline = store.ensure_baseline(&current_env)?;
        let active = store.read_active()?;

        Ok(Self {
            store,
            baseline,
            active,
            invocation_dir,
            current_env,
        })
    }

    /// Work out where the shell was invoked from.
    ///
    /// `PWD` is preferred over the resolved working directory so symlinked
    /// paths come back the way the user typed them.
    ///
    /// # Errors
    ///
    /// Returns [`SworkError::Io`] if `PWD` is unset and the working directory
    /// cannot be determined.
    pub fn invocation_dir_from(env: &EnvSnapshot) -> Result<PathBuf> {
        if let Some(pwd) = env.get("PWD")
            && !pwd.is_empty()
        {
            return Ok(PathBuf::from(pwd));
        }

        std::env::current_dir().map_err(|e| SworkError::io("reading the working directory", e))
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    #[must_use]
    pub fn baseline(&self) -> &EnvSnapshot {
        &self.baseline
    }

    #[must_use]
    pub fn current_env(&self) -> &EnvSnapshot {
        &self.current_env
    }

    #[must_use]
    pub fn invocation_dir(&self) -> &Path {
        &self.invocation_dir
    }

    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub(crate) fn set_active(&mut self, name: Option<String>) {
        self.active = name;
    }

    pub(crate) fn take_active(&mut self) -> Option<String> {
        self.active.take()
    }

    /// Write the active-project marker back to the session directory.
    ///
    /// # Errors
    ///
    /// Returns [`SworkError::Session`] if the `cur` file cannot be written.
    pub fn persist(&self) -> Result<()> {
        self.store.write_active(self.active())
    }
}
