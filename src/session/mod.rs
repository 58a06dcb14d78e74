//! Per-terminal session state.
//!
//! ## Main Parts
//!
//! - [`SessionIdentity`] - Terminal device plus shell pid, recomputed on each run
//! - [`SessionStore`] - The scratch directory holding the `env` and `cur` files
//! - [`SessionContext`] - Everything one invocation knows about its session

pub mod context;
pub mod identity;
pub mod store;

pub use context::SessionContext;
pub use identity::SessionIdentity;
pub use store::SessionStore;
