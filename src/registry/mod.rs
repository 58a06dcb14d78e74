//! The project registry.
//!
//! The registry is a JSON object stored at `$HOME/.sworkrc` (by default)
//! mapping project names to a root directory and the commands that set the
//! project up and tear it down.
//!
//! ## Main Parts
//!
//! - [`ProjectEntry`] - One project's root, start command, and teardown command
//! - [`Registry`] - The whole file, loaded and validated as a unit

pub mod entry;
pub mod file;

pub use entry::ProjectEntry;
pub use file::Registry;
