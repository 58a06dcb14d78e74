//! Diagnostic logging setup.
//!
//! Standard output carries the shell script, so every log line goes to
//! standard error.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive (e.g. `swork=debug`).
pub const LOG_ENV: &str = "SWORK_LOG";

/// Install the global subscriber.
///
/// `SWORK_LOG` takes precedence; otherwise the level is `debug` when
/// `verbose` is set and `warn` when it is not. Calling this twice is harmless.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .without_time()
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}
