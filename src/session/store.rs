//! The per-session scratch directory.
//!
//! Each session directory holds exactly two files:
//!
//! - `env` - the baseline environment snapshot, in the [`codec`](crate::env::codec) format
//! - `cur` - the name of the active project, or nothing
//!
//! Both are created empty when the directory is first opened. Nothing here is
//! locked; two invocations racing on the same session can interleave.

use std::{
    fs::{self, DirBuilder, OpenOptions},
    os::unix::fs::DirBuilderExt,
    path::{Path, PathBuf},
};

use crate::env::{self, EnvSnapshot};
use crate::error::{Result, SworkError};

use super::SessionIdentity;

/// File holding the baseline environment.
pub const ENV_FILE: &str = "env";

/// File holding the active project name.
pub const CUR_FILE: &str = "cur";

/// Handle on one session directory.
#[derive(Clone, Debug)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Open the directory for `identity` under `root`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SworkError::Session`] if the directory or its files cannot be created.
    pub fn resolve(root: &Path, identity: &SessionIdentity) -> Result<Self> {
        Self::open(root.join(identity.dir_name()))
    }

    /// Open (and lazily create) a session directory at an explicit path.
    ///
    /// The session directory is private to the user because the snapshot holds
    /// the full environment.
    ///
    /// # Errors
    ///
    /// Returns [`SworkError::Session`] if the directory or its files cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();

        if !dir.is_dir() {
            DirBuilder::new()
                .recursive(true)
                .mode(0o700)
                .create(&dir)
                .map_err(|e| SworkError::session(&dir, &e))?;
            tracing::debug!(dir = %dir.display(), "created session directory");
        }

        let store = Self { dir };
        for name in [ENV_FILE, CUR_FILE] {
            store.touch(name)?;
        }

        Ok(store)
    }

    /// Path of the session directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn touch(&self, name: &str) -> Result<()> {
        let path = self.path(name);
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map(drop)
            .map_err(|e| SworkError::session(path, &e))
    }

    /// Whether no baseline has been captured yet.
    ///
    /// # Errors
    ///
    /// Returns [`SworkError::Session`] if the `env` file cannot be inspected.
    pub fn is_env_snapshot_empty(&self) -> Result<bool> {
        let path = self.path(ENV_FILE);
        let metadata = fs::metadata(&path).map_err(|e| SworkError::session(path, &e))?;
        Ok(metadata.len() == 0)
    }

    /// Read the stored baseline.
    ///
    /// # Errors
    ///
    /// Returns [`SworkError::Session`] if the file cannot be read or decoded.
    pub fn read_snapshot(&self) -> Result<EnvSnapshot> {
        let path = self.path(ENV_FILE);
        let data = fs::read(&path).map_err(|e| SworkError::session(&path, &e))?;

        env::decode(&data).map_err(|e| SworkError::Session {
            path,
            reason: e.to_string(),
        })
    }

    /// Overwrite the stored baseline.
    ///
    /// A snapshot that encodes to nothing is stored as a single empty line, so
    /// the file still marks the baseline as captured.
    ///
    /// # Errors
    ///
    /// Returns [`SworkError::Session`] if the file cannot be written.
    pub fn write_snapshot(&self, snapshot: &EnvSnapshot) -> Result<()> {
        let path = self.path(ENV_FILE);
        let mut data = env::encode(snapshot);
        if data.is_empty() {
            data.push(b'\n');
        }

        fs::write(&path, data).map_err(|e| SworkError::session(path, &e))
    }

    /// Capture `current` as the baseline unless one already exists, and
    /// return the stored baseline.
    ///
    /// # Errors
    ///
    /// Returns [`SworkError::Session`] if the `env` file cannot be read or written.
    pub fn ensure_baseline(&self, current: &EnvSnapshot) -> Result<EnvSnapshot> {
        if self.is_env_snapshot_empty()? {
            tracing::info!(
                path = %self.path(ENV_FILE).display(),
                "saving environment"
            );
            self.write_snapshot(current)?;
        }

        self.read_snapshot()
    }

    /// Read the active project name, if any.
    ///
    /// # Errors
    ///
    /// Returns [`SworkError::Session`] if the `cur` file cannot be read.
    pub fn read_active(&self) -> Result<Option<String>> {
        let path = self.path(CUR_FILE);
        let content = fs::read_to_string(&path).map_err(|e| SworkError::session(path, &e))?;
        let name = content.strip_suffix('\n').unwrap_or(&content);

        Ok((!name.is_empty()).then(|| name.to_string()))
    }

    /// Record `name` as the active project, or clear the marker with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SworkError::Session`] if the `cur` file cannot be written.
    pub fn write_active(&self, name: Option<&str>) -> Result<()> {
        let path = self.path(CUR_FILE);
        fs::write(&path, name.unwrap_or_default()).map_err(|e| SworkError::session(path, &e))
    }
}
