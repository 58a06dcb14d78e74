//! Terminal session identification.
//!
//! A session is keyed by the terminal device on standard input plus the pid of
//! the invoking shell. Neither is stored anywhere; both
//! are recomputed on every invocation.

use std::{
    ffi::CStr,
    io::{self, IsTerminal},
    os::unix::process::parent_id,
};

use crate::error::{Result, SworkError};

/// Identity of one terminal session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionIdentity {
    /// Terminal device name without `/dev/`, with `/` replaced by `_` (e.g. `pts_3`)
    tty: String,

    /// Pid of the invoking shell
    shell_pid: u32,
}

impl SessionIdentity {
    /// Build an identity from a raw terminal path (e.g. `/dev/pts/3`) and a pid.
    #[must_use]
    pub fn new(tty_path: &str, shell_pid: u32) -> Self {
        Self {
            tty: sanitize_tty(tty_path),
            shell_pid,
        }
    }

    /// Identify the session this process runs in.
    ///
    /// The recommended wrapper (`eval "$(swork ...)"`) runs us as a simple
    /// command substitution, which the shell execs directly, so our parent is
    /// the interactive shell itself.
    ///
    /// # Errors
    ///
    /// Returns [`SworkError::NoTerminal`] if standard input is not a terminal.
    pub fn detect() -> Result<Self> {
        let shell_pid = parent_id();
        tracing::debug!(shell_pid, "identifying session");

        let tty = terminal_path()?;
        tracing::debug!(%tty, shell_pid, "resolved session identity");
        Ok(Self::new(&tty, shell_pid))
    }

    /// Name of this session's directory under the session root.
    #[must_use]
    pub fn dir_name(&self) -> String {
        format!("{}_{}", self.tty, self.shell_pid)
    }
}

fn sanitize_tty(path: &str) -> String {
    path.strip_prefix("/dev/")
        .unwrap_or(path)
        .replace('/', "_")
}

fn terminal_path() -> Result<String> {
    if !io::stdin().is_terminal() {
        return Err(SworkError::NoTerminal(
            "standard input is not attached to a terminal".to_string(),
        ));
    }

    let mut buf = [0 as libc::c_char; 256];
    // SAFETY: `buf` is valid for `buf.len()` bytes and ttyname_r NUL-terminates on success.
    let rc = unsafe { libc::ttyname_r(libc::STDIN_FILENO, buf.as_mut_ptr(), buf.len()) };
    if rc != 0 {
        return Err(SworkError::NoTerminal(
            io::Error::from_raw_os_error(rc).to_string(),
        ));
    }

    // SAFETY: ttyname_r succeeded, so `buf` holds a NUL-terminated string.
    let name = unsafe { CStr::from_ptr(buf.as_ptr()) };
    Ok(name.to_string_lossy().into_owned())
}
