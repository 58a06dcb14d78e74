//! # swork
//!
//! A per-terminal shell environment manager.
//!
//! The first invocation in a terminal captures the shell's environment as the
//! session baseline. Starting a project tears down the active one, rebuilds
//! the environment from the baseline, and runs the project's start command;
//! restoring tears down and rebuilds without entering anything.
//!
//! A child process cannot change its parent shell's environment, so every
//! operation produces a [`env::Script`] of shell commands that the caller
//! prints and the shell evaluates.

pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod editor;
pub mod env;
pub mod error;
pub mod logging;
pub mod registry;
pub mod session;
