//! A single registry entry.

use std::{
    fmt::{self, Display, Formatter},
    path::PathBuf,
};

use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SworkError};

/// How to enter and leave one project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    /// Absolute path to the project's root directory
    pub root: PathBuf,

    /// Shell command evaluated (from `root`) when the project starts
    pub start_cmd: String,

    /// Shell command evaluated (from `root`) when the project is torn down
    pub teardown_cmd: String,
}

impl ProjectEntry {
    pub fn new(
        root: impl Into<PathBuf>,
        start_cmd: impl Into<String>,
        teardown_cmd: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            start_cmd: start_cmd.into(),
            teardown_cmd: teardown_cmd.into(),
        }
    }

    /// Check that every field is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`SworkError::InvalidEntry`] naming the first empty field.
    pub fn validate(&self, name: &str) -> Result<()> {
        let empty = if self.root.as_os_str().is_empty() {
            Some("root")
        } else if self.start_cmd.is_empty() {
            Some("start_cmd")
        } else if self.teardown_cmd.is_empty() {
            Some("teardown_cmd")
        } else {
            None
        };

        match empty {
            Some(field) => Err(SworkError::InvalidEntry {
                name: name.to_string(),
                field,
            }),
            None => Ok(()),
        }
    }
}

impl Display for ProjectEntry {
    /// Multi-line listing used by `swork list`:
    ///
    /// ```text
    ///     root : /path/to/project
    ///     start_cmd : source .swork.activate
    ///     teardown_cmd : source .swork.deactivate
    /// ```
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "    {} : {}", "root".dimmed(), self.root.display())?;
        writeln!(f, "    {} : {}", "start_cmd".dimmed(), self.start_cmd)?;
        write!(f, "    {} : {}", "teardown_cmd".dimmed(), self.teardown_cmd)
    }
}
