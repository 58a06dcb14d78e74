//! Launching the user's editor.

use std::{
    io,
    os::fd::AsFd,
    path::Path,
    process::{Command, Stdio},
};

use crate::error::{Result, SworkError};

/// Open `path` in `editor` and wait for it to exit.
///
/// `editor` may carry arguments (`"code -w"`); it is split on whitespace. The
/// editor's stdout is pointed at our stderr so nothing it prints ends up in
/// the command stream the shell evaluates.
///
/// # Errors
///
/// - [`SworkError::Usage`] if `editor` is blank
/// - [`SworkError::Io`] if the editor cannot be spawned
/// - [`SworkError::Subprocess`] if it exits unsuccessfully
pub fn edit_file(editor: &str, path: &Path) -> Result<()> {
    let mut words = editor.split_whitespace();
    let Some(program) = words.next() else {
        return Err(SworkError::Usage("no editor configured".to_string()));
    };

    let stdout = io::stderr()
        .as_fd()
        .try_clone_to_owned()
        .map_err(|e| SworkError::io("duplicating stderr for the editor", e))?;

    tracing::debug!(editor = program, path = %path.display(), "launching editor");
    let status = Command::new(program)
        .args(words)
        .arg(path)
        .stdout(Stdio::from(stdout))
        .status()
        .map_err(|e| SworkError::io(format!("launching editor `{program}`"), e))?;

    if status.success() {
        Ok(())
    } else {
        Err(SworkError::Subprocess {
            program: program.to_string(),
            status: status.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_blank_editor_is_usage_error() {
        let err = edit_file("  ", Path::new("/tmp/x")).unwrap_err();
        assert!(matches!(err, SworkError::Usage(_)));
    }

    #[test]
    fn test_successful_editor() {
        let tmp = TempDir::new().unwrap();
        edit_file("true", &tmp.path().join("file")).unwrap();
    }

    #[test]
    fn test_editor_receives_path() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("created");

        edit_file("touch", &target).unwrap();
        assert!(target.is_file());
    }

    #[test]
    fn test_editor_arguments_are_passed() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("a").join("b");

        edit_file("mkdir -p", &target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_failing_editor() {
        let tmp = TempDir::new().unwrap();
        let err = edit_file("false", &tmp.path().join("file")).unwrap_err();
        assert!(matches!(err, SworkError::Subprocess { .. }));
    }

    #[test]
    fn test_missing_editor() {
        let tmp = TempDir::new().unwrap();
        let err = edit_file("definitely-not-an-editor-9f2c", &tmp.path().join("f")).unwrap_err();
        assert!(matches!(err, SworkError::Io { .. }));
    }
}
