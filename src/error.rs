//! Error types and the exit code table.
//!
//! Every failure the tool can report maps onto one [`SworkError`] variant, and
//! every variant maps onto a fixed process exit code. The binary downcasts the
//! top-level `anyhow::Error` back to [`SworkError`] to pick the exit code.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Process exit codes used by the binary.
pub mod exit_code {
    /// Everything went fine.
    pub const SUCCESS: i32 = 0;

    /// Any failure that is not covered by a more specific code.
    pub const FAILURE: i32 = 1;

    /// Bad arguments or flags.
    pub const USAGE: i32 = 2;

    /// The registry file is missing, malformed, or holds an invalid entry.
    pub const REGISTRY: i32 = 3;

    /// The named project is not in the registry.
    pub const NOT_FOUND: i32 = 4;

    /// A project with that name already exists.
    pub const DUPLICATE: i32 = 5;

    /// The terminal session could not be identified or its files accessed.
    pub const SESSION: i32 = 6;

    /// The editor or another child process failed.
    pub const SUBPROCESS: i32 = 7;
}

/// Errors produced by the library.
#[derive(Error, Debug)]
pub enum SworkError {
    #[error("{0}")]
    Usage(String),

    #[error("no registry file exists at {}", path.display())]
    RegistryMissing { path: PathBuf },

    #[error("failed to parse registry file at {}: {reason}", path.display())]
    RegistryMalformed { path: PathBuf, reason: String },

    #[error("project '{name}' has an empty `{field}`")]
    InvalidEntry { name: String, field: &'static str },

    #[error("the project {0} is not defined")]
    ProjectNotFound(String),

    #[error("already a project with the name {0}")]
    DuplicateProject(String),

    #[error("cannot identify the terminal session: {0}")]
    NoTerminal(String),

    #[error("session file {} is unusable: {reason}", path.display())]
    Session { path: PathBuf, reason: String },

    #[error("{program} exited with {status}")]
    Subprocess { program: String, status: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl SworkError {
    /// Returns the process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => exit_code::USAGE,
            Self::RegistryMissing { .. }
            | Self::RegistryMalformed { .. }
            | Self::InvalidEntry { .. } => exit_code::REGISTRY,
            Self::ProjectNotFound(_) => exit_code::NOT_FOUND,
            Self::DuplicateProject(_) => exit_code::DUPLICATE,
            Self::NoTerminal(_) | Self::Session { .. } => exit_code::SESSION,
            Self::Subprocess { .. } => exit_code::SUBPROCESS,
            Self::Io { .. } => exit_code::FAILURE,
        }
    }

    /// Wraps an I/O error with a short description of what was being done.
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Wraps an I/O error on a session file.
    pub(crate) fn session(path: impl Into<PathBuf>, source: &io::Error) -> Self {
        Self::Session {
            path: path.into(),
            reason: source.to_string(),
        }
    }
}

/// Shorthand result type for library operations.
pub type Result<T> = std::result::Result<T, SworkError>;
