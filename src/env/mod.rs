//! Environment snapshots and the shell text that restores them.
//!
//! Nothing in this module touches the process environment of the invoking
//! shell. It captures, serializes, and renders; the caller prints the rendered
//! [`Script`] and the shell evaluates it.
//!
//! ## Main Parts
//!
//! - [`EnvSnapshot`] - An ordered name/value map of environment variables
//! - [`codec`] - The `name:hex(value)` line format used by the session `env` file
//! - [`Script`] - An ordered sequence of shell command lines

pub mod codec;
pub mod script;
pub mod snapshot;

pub use codec::{DecodeError, decode, encode};
pub use script::{Script, is_valid_name, quote, render_activation_script};
pub use snapshot::EnvSnapshot;
