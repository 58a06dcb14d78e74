//! Subcommand dispatch.
//!
//! Each subcommand turns its arguments and the [`SessionContext`] into an
//! [`Outcome`]: the script the shell must evaluate and the exit code. Human
//! readable output (listings, confirmations) goes to stderr; only the script
//! is meant for stdout.

use std::path::{Path, PathBuf};

use colored::Colorize;
use inquire::{Confirm, InquireError};

use crate::cli::Command;
use crate::config::Settings;
use crate::controller::{self, project_dir, split_project_path};
use crate::editor;
use crate::env::{Script, quote};
use crate::error::{Result, SworkError, exit_code};
use crate::registry::{ProjectEntry, Registry};
use crate::session::SessionContext;

/// File created by `swork add` for the start command.
pub const ACTIVATE_FILE: &str = ".swork.activate";

/// File created by `swork add` for the teardown command.
pub const DEACTIVATE_FILE: &str = ".swork.deactivate";

/// What a subcommand produced.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Commands for the invoking shell, in order
    pub script: Script,

    /// Process exit code
    pub code: i32,
}

impl Outcome {
    fn script(script: Script) -> Self {
        Self {
            script,
            code: exit_code::SUCCESS,
        }
    }

    fn nothing() -> Self {
        Self::script(Script::new())
    }
}

/// Run one subcommand.
///
/// The active-project marker is persisted here, after the controller has
/// produced its script and before the script is printed.
///
/// # Errors
///
/// Any [`SworkError`] raised by the subcommand. When an error is returned no
/// script has been produced, so the shell receives nothing.
pub fn run(command: &Command, settings: &Settings, ctx: &mut SessionContext) -> Result<Outcome> {
    match command {
        Command::Start { cd, project } => start(settings, ctx, project, *cd),
        Command::Restore => restore(settings, ctx),
        Command::List => list(settings),
        Command::Add {
            activate,
            deactivate,
            no_create,
            name,
        } => add(
            settings,
            ctx,
            name,
            activate.as_deref(),
            deactivate.as_deref(),
            *no_create,
        ),
        Command::Remove { yes, name } => remove(settings, name, *yes),
        Command::Cd { target } => cd(settings, target),
        Command::Path { target } => path(settings, target),
    }
}

fn start(settings: &Settings, ctx: &mut SessionContext, spec: &str, cd: bool) -> Result<Outcome> {
    let (name, sub) = if cd {
        split_project_path(spec)
    } else {
        (spec, "")
    };

    let registry = Registry::load(&settings.registry)?;
    let mut script = controller::start(ctx, &registry, name)?;
    ctx.persist()?;

    if cd {
        let project = registry.get(name)?;
        script.push_cd(&project_dir(&project.root, sub));
    }

    Ok(Outcome::script(script))
}

fn restore(settings: &Settings, ctx: &mut SessionContext) -> Result<Outcome> {
    // Idle sessions restore without needing a registry at all.
    let registry = if ctx.active().is_some() {
        Registry::load(&settings.registry)?
    } else {
        Registry::empty(&settings.registry)
    };

    let script = controller::restore(ctx, &registry);
    ctx.persist()?;

    Ok(Outcome::script(script))
}

fn list(settings: &Settings) -> Result<Outcome> {
    let registry = Registry::load(&settings.registry)?;
    eprint!("{}", format_listing(&registry));
    Ok(Outcome::nothing())
}

/// Render the registry for `swork list`.
#[must_use]
pub fn format_listing(registry: &Registry) -> String {
    if registry.is_empty() {
        return format!("{}\n", "No projects registered".yellow());
    }

    registry
        .list_all()
        .map(|(name, entry)| format!("{}\n{entry}\n", name.bold()))
        .collect()
}

fn add(
    settings: &Settings,
    ctx: &SessionContext,
    name: &str,
    activate: Option<&Path>,
    deactivate: Option<&Path>,
    no_create: bool,
) -> Result<Outcome> {
    let mut registry = Registry::load_or_empty(&settings.registry)?;
    if registry.contains(name) {
        return Err(SworkError::DuplicateProject(name.to_string()));
    }

    let root = ctx.invocation_dir().to_path_buf();
    let activate = hook_file(settings, &root, activate, ACTIVATE_FILE, no_create)?;
    let deactivate = hook_file(settings, &root, deactivate, DEACTIVATE_FILE, no_create)?;

    let entry = ProjectEntry::new(
        &root,
        hook_command(name, "setup", activate.as_deref()),
        hook_command(name, "teardown", deactivate.as_deref()),
    );
    registry.add(name, entry)?;
    registry.save()?;

    eprintln!(
        "{} {} ({})",
        "Added".green(),
        name.bold(),
        root.display()
    );
    Ok(Outcome::nothing())
}

/// Resolve the file a project hook sources.
///
/// A given file must exist (relative paths are taken from the project root).
/// Otherwise, unless `no_create` is set, `default_name` is opened in the
/// editor; it is used only if the editor actually created it.
fn hook_file(
    settings: &Settings,
    root: &Path,
    given: Option<&Path>,
    default_name: &str,
    no_create: bool,
) -> Result<Option<PathBuf>> {
    if let Some(path) = given {
        if !root.join(path).is_file() {
            return Err(SworkError::Usage(format!(
                "{} is not a regular file",
                path.display()
            )));
        }
        return Ok(Some(path.to_path_buf()));
    }

    if no_create {
        return Ok(None);
    }

    let path = root.join(default_name);
    editor::edit_file(&settings.editor, &path)?;

    if path.is_file() {
        Ok(Some(PathBuf::from(default_name)))
    } else {
        tracing::warn!(path = %path.display(), "editor did not create the file, leaving it out");
        Ok(None)
    }
}

/// `echo '<name> <action>'`, followed by `; source <file>` when there is one.
fn hook_command(name: &str, action: &str, file: Option<&Path>) -> String {
    let banner = format!("{name} {action}");
    let mut command = format!("echo {}", String::from_utf8_lossy(&quote(banner.as_bytes())));

    if let Some(file) = file {
        let file = file.to_string_lossy();
        command.push_str("; source ");
        command.push_str(&String::from_utf8_lossy(&quote(file.as_bytes())));
    }

    command
}

fn remove(settings: &Settings, name: &str, yes: bool) -> Result<Outcome> {
    let mut registry = Registry::load(&settings.registry)?;
    registry.get(name)?;

    if !yes && !confirm_removal(name)? {
        eprintln!("{} {name}", "Did not remove".yellow());
        return Ok(Outcome::nothing());
    }

    registry.remove(name)?;
    registry.save()?;
    eprintln!("{} {}", "Removed".green(), name.bold());

    Ok(Outcome::nothing())
}

fn confirm_removal(name: &str) -> Result<bool> {
    match Confirm::new(&format!("Remove the project {name}?"))
        .with_default(false)
        .prompt()
    {
        Ok(answer) => Ok(answer),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
        Err(e) => Err(SworkError::io(
            "reading confirmation",
            std::io::Error::other(e),
        )),
    }
}

fn cd(settings: &Settings, target: &str) -> Result<Outcome> {
    let dir = resolve_target(settings, target)?;
    let mut script = Script::new();
    script.push_cd(&dir);
    Ok(Outcome::script(script))
}

fn path(settings: &Settings, target: &str) -> Result<Outcome> {
    let dir = resolve_target(settings, target)?;
    let mut script = Script::new();
    script.push_echo(dir.as_os_str());
    Ok(Outcome::script(script))
}

fn resolve_target(settings: &Settings, target: &str) -> Result<PathBuf> {
    let (name, sub) = split_project_path(target);
    let registry = Registry::load(&settings.registry)?;
    let project = registry.get(name)?;
    Ok(project_dir(&project.root, sub))
}
