//! Configuration for the application.
//!
//! This module contains the optional configuration file and the resolved
//! settings one invocation runs with.

pub mod file;
pub mod settings;

pub use file::FileConfig;
pub use settings::Settings;
