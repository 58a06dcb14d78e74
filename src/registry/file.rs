//! Loading, validating, and saving the registry file.
//!
//! # Example file
//!
//! ```json
//! {
//!   "day_job": {
//!     "root": "/home/u/src/day_job",
//!     "start_cmd": "echo 'day_job setup'; source .swork.activate",
//!     "teardown_cmd": "echo 'day_job teardown'; source .swork.deactivate"
//!   }
//! }
//! ```
//!
//! The file is accepted or rejected as a whole: malformed JSON, a missing
//! field, or an empty field anywhere fails the load rather than dropping the
//! offending entry.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use crate::error::{Result, SworkError};

use super::ProjectEntry;

/// Default registry file name, relative to the home directory.
pub const DEFAULT_FILE_NAME: &str = ".sworkrc";

/// All known projects, keyed by name.
#[derive(Clone, Debug)]
pub struct Registry {
    path: PathBuf,
    projects: BTreeMap<String, ProjectEntry>,
}

impl Registry {
    /// Default location of the registry file (`$HOME/.sworkrc`).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_FILE_NAME))
    }

    /// An empty registry that will be saved to `path`.
    #[must_use]
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            projects: BTreeMap::new(),
        }
    }

    /// Load and validate the registry at `path`.
    ///
    /// # Errors
    ///
    /// - [`SworkError::RegistryMissing`] if the file does not exist
    /// - [`SworkError::RegistryMalformed`] if it is not a JSON object of entries
    /// - [`SworkError::InvalidEntry`] if any entry has an empty field
    /// - [`SworkError::Io`] if it exists but cannot be read
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SworkError::RegistryMissing { path });
            }
            Err(e) => {
                return Err(SworkError::io(
                    format!("reading registry file {}", path.display()),
                    e,
                ));
            }
        };

        let projects: BTreeMap<String, ProjectEntry> =
            serde_json::from_str(&content).map_err(|e| SworkError::RegistryMalformed {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        for (name, entry) in &projects {
            entry.validate(name)?;
        }

        tracing::debug!(path = %path.display(), projects = projects.len(), "loaded registry");
        Ok(Self { path, projects })
    }

    /// Like [`Registry::load`], but a missing file yields an empty registry.
    ///
    /// # Errors
    ///
    /// Same as [`Registry::load`], except for [`SworkError::RegistryMissing`].
    pub fn load_or_empty(path: impl Into<PathBuf>) -> Result<Self> {
        match Self::load(path) {
            Err(SworkError::RegistryMissing { path }) => {
                tracing::debug!(path = %path.display(), "no registry file yet, starting empty");
                Ok(Self::empty(path))
            }
            other => other,
        }
    }

    /// Path the registry was loaded from and will be saved to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a project by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&ProjectEntry> {
        self.projects.get(name)
    }

    /// Look up a project by name, failing if it is not defined.
    ///
    /// # Errors
    ///
    /// Returns [`SworkError::ProjectNotFound`] if there is no such project.
    pub fn get(&self, name: &str) -> Result<&ProjectEntry> {
        self.lookup(name)
            .ok_or_else(|| SworkError::ProjectNotFound(name.to_string()))
    }

    /// Whether a project with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.projects.contains_key(name)
    }

    /// Iterate over all projects, sorted by name.
    pub fn list_all(&self) -> impl Iterator<Item = (&str, &ProjectEntry)> {
        self.projects.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Insert or replace a project.
    ///
    /// # Errors
    ///
    /// Returns [`SworkError::InvalidEntry`] if the entry has an empty field.
    pub fn upsert(&mut self, name: &str, entry: ProjectEntry) -> Result<()> {
        entry.validate(name)?;
        self.projects.insert(name.to_string(), entry);
        Ok(())
    }

    /// Insert a project that must not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`SworkError::DuplicateProject`] if the name is taken, or
    /// [`SworkError::InvalidEntry`] if the entry has an empty field.
    pub fn add(&mut self, name: &str, entry: ProjectEntry) -> Result<()> {
        if self.contains(name) {
            return Err(SworkError::DuplicateProject(name.to_string()));
        }
        self.upsert(name, entry)
    }

    /// Remove a project and return its entry.
    ///
    /// # Errors
    ///
    /// Returns [`SworkError::ProjectNotFound`] if there is no such project.
    pub fn remove(&mut self, name: &str) -> Result<ProjectEntry> {
        self.projects
            .remove(name)
            .ok_or_else(|| SworkError::ProjectNotFound(name.to_string()))
    }

    /// Write the registry back to its file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`SworkError::Io`] if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                SworkError::io(format!("creating directory {}", parent.display()), e)
            })?;
        }

        let json = serde_json::to_string_pretty(&self.projects).map_err(|e| {
            SworkError::io("serializing the registry", io::Error::other(e))
        })?;

        fs::write(&self.path, json + "\n").map_err(|e| {
            SworkError::io(format!("writing registry file {}", self.path.display()), e)
        })?;

        tracing::debug!(path = %self.path.display(), projects = self.len(), "saved registry");
        Ok(())
    }
}
