//! The project stack state machine.
//!
//! A session is either idle or has exactly one active project. Starting a
//! project always pops the active one (if any) and rebuilds the environment
//! from the baseline before entering the new project; starts never stack on
//! top of each other.
//!
//! Every operation here returns a [`Script`] for the shell to evaluate and
//! updates the active project in the [`SessionContext`]. Writing the marker
//! back to disk is left to the caller ([`SessionContext::persist`]).

use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use crate::env::{Script, render_activation_script};
use crate::error::Result;
use crate::registry::Registry;
use crate::session::SessionContext;

/// Variable exported with the active project's root.
pub const PROJECT_ROOT_VAR: &str = "SW_PROJECT_ROOT";

/// Split `name/sub/dir` into the project name and the path inside it.
///
/// ```text
/// "proj"          -> ("proj", "")
/// "proj/src/main" -> ("proj", "src/main")
/// ```
#[must_use]
pub fn split_project_path(spec: &str) -> (&str, &str) {
    spec.split_once('/').unwrap_or((spec, ""))
}

/// Join a project root with a path inside the project.
#[must_use]
pub fn project_dir(root: &Path, sub: &str) -> PathBuf {
    if sub.is_empty() {
        root.to_path_buf()
    } else {
        root.join(sub)
    }
}

/// The commands that reset the shell to the session baseline.
#[must_use]
pub fn baseline_reset(ctx: &SessionContext) -> Script {
    render_activation_script(ctx.current_env().names(), ctx.baseline())
}

/// Tear down the active project, if any, and mark the session idle.
///
/// A project that has been removed from the registry since it was started
/// cannot be torn down; the marker is cleared and nothing is emitted.
pub fn pop(ctx: &mut SessionContext, registry: &Registry) -> Script {
    let mut script = Script::new();

    let Some(name) = ctx.take_active() else {
        return script;
    };

    match registry.lookup(&name) {
        Some(project) => {
            tracing::debug!(project = %name, "tearing down active project");
            script.push_cd(&project.root);
            script.push_raw(&project.teardown_cmd);
        }
        None => {
            tracing::debug!(project = %name, "active project is no longer registered, skipping teardown");
        }
    }

    script
}

/// Switch the session to `name`.
///
/// Emits, in order: the teardown of the previously active project, the
/// baseline reset, the export of [`PROJECT_ROOT_VAR`], `cd` into the project
/// root, its start command, and `cd` back to the invocation directory.
///
/// # Errors
///
/// Returns [`SworkError::ProjectNotFound`](crate::error::SworkError::ProjectNotFound)
/// if `name` is not registered. Nothing is changed in that case.
pub fn start(ctx: &mut SessionContext, registry: &Registry, name: &str) -> Result<Script> {
    let project = registry.get(name)?;

    let mut script = pop(ctx, registry);
    script.append(baseline_reset(ctx));
    script.push_export(OsStr::new(PROJECT_ROOT_VAR), project.root.as_os_str());
    script.push_cd(&project.root);
    script.push_raw(&project.start_cmd);
    script.push_cd(ctx.invocation_dir());

    tracing::debug!(project = %name, root = %project.root.display(), "starting project");
    ctx.set_active(Some(name.to_string()));
    Ok(script)
}

/// Tear down the active project and return the shell to the baseline.
pub fn restore(ctx: &mut SessionContext, registry: &Registry) -> Script {
    let mut script = pop(ctx, registry);
    script.append(baseline_reset(ctx));
    script.push_cd(ctx.invocation_dir());
    script
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::EnvSnapshot;
    use crate::registry::ProjectEntry;
    use crate::session::SessionStore;
    use tempfile::TempDir;

    fn context(tmp: &TempDir, baseline: &[(&str, &str)]) -> SessionContext {
        let store = SessionStore::open(tmp.path().join("session")).unwrap();
        let env: EnvSnapshot = baseline.iter().copied().collect();
        SessionContext::load(store, env, PathBuf::from("/work")).unwrap()
    }

    fn registry() -> Registry {
        let mut registry = Registry::empty("/unused");
        registry
            .upsert("a", ProjectEntry::new("/a", "start a", "stop a"))
            .unwrap();
        registry
            .upsert("b", ProjectEntry::new("/b", "start b", "stop b"))
            .unwrap();
        registry
    }

    #[test]
    fn test_split_project_path() {
        assert_eq!(split_project_path("proj"), ("proj", ""));
        assert_eq!(split_project_path("proj/src/main"), ("proj", "src/main"));
        assert_eq!(split_project_path("proj/"), ("proj", ""));
    }

    #[test]
    fn test_project_dir() {
        assert_eq!(project_dir(Path::new("/r"), ""), PathBuf::from("/r"));
        assert_eq!(project_dir(Path::new("/r"), "a/b"), PathBuf::from("/r/a/b"));
    }

    #[test]
    fn test_pop_when_idle_is_noop() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = context(&tmp, &[]);

        assert!(pop(&mut ctx, &registry()).is_empty());
        assert_eq!(ctx.active(), None);
    }

    #[test]
    fn test_pop_emits_teardown() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = context(&tmp, &[]);
        ctx.set_active(Some("a".to_string()));

        let script = pop(&mut ctx, &registry());

        assert_eq!(script.to_lines_lossy(), ["cd /a", "stop a"]);
        assert_eq!(ctx.active(), None);
    }

    #[test]
    fn test_pop_of_deleted_project_is_silent() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = context(&tmp, &[]);
        ctx.set_active(Some("gone".to_string()));

        let script = pop(&mut ctx, &registry());

        assert!(script.is_empty());
        assert_eq!(ctx.active(), None);
    }

    #[test]
    fn test_start_from_idle() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = context(&tmp, &[("HOME", "/home/u")]);

        let script = start(&mut ctx, &registry(), "a").unwrap();

        assert_eq!(
            script.to_lines_lossy(),
            [
                "unset HOME",
                "export HOME=/home/u",
                "export SW_PROJECT_ROOT=/a",
                "cd /a",
                "start a",
                "cd /work",
            ]
        );
        assert_eq!(ctx.active(), Some("a"));
    }

    #[test]
    fn test_start_replaces_active_project() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = context(&tmp, &[("HOME", "/home/u")]);
        let registry = registry();

        start(&mut ctx, &registry, "a").unwrap();
        let lines = start(&mut ctx, &registry, "b").unwrap().to_lines_lossy();

        let position = |needle: &str| lines.iter().position(|l| l == needle).unwrap();
        assert!(position("stop a") < position("export HOME=/home/u"));
        assert!(position("export HOME=/home/u") < position("start b"));
        assert!(!lines.iter().any(|l| l == "start a"));
        assert_eq!(ctx.active(), Some("b"));
    }

    #[test]
    fn test_start_unknown_project_changes_nothing() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = context(&tmp, &[]);
        ctx.set_active(Some("a".to_string()));

        assert!(start(&mut ctx, &registry(), "ghost").is_err());
        assert_eq!(ctx.active(), Some("a"));
    }

    #[test]
    fn test_restore_when_idle_still_resets() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = context(&tmp, &[("HOME", "/home/u")]);

        let script = restore(&mut ctx, &registry());

        assert_eq!(
            script.to_lines_lossy(),
            ["unset HOME", "export HOME=/home/u", "cd /work"]
        );
        assert_eq!(ctx.active(), None);
    }

    #[test]
    fn test_restore_tears_down_first() {
        let tmp = TempDir::new().unwrap();
        let mut ctx = context(&tmp, &[("HOME", "/home/u")]);
        let registry = registry();
        start(&mut ctx, &registry, "a").unwrap();

        let script = restore(&mut ctx, &registry);

        assert_eq!(
            script.to_lines_lossy(),
            [
                "cd /a",
                "stop a",
                "unset HOME",
                "export HOME=/home/u",
                "cd /work"
            ]
        );
        assert_eq!(ctx.active(), None);
    }

    #[test]
    fn test_baseline_reset_unsets_current_variables() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("session");
        let baseline: EnvSnapshot = [("HOME", "/home/u")].into_iter().collect();
        SessionContext::load(SessionStore::open(&dir).unwrap(), baseline, "/".into()).unwrap();

        let now: EnvSnapshot = [("HOME", "/home/u"), ("VIRTUAL_ENV", "/venv")]
            .into_iter()
            .collect();
        let ctx = SessionContext::load(SessionStore::open(&dir).unwrap(), now, "/".into()).unwrap();

        assert_eq!(
            baseline_reset(&ctx).to_lines_lossy(),
            ["unset HOME", "unset VIRTUAL_ENV", "export HOME=/home/u"]
        );
    }
}
