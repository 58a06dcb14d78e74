//! # swork
//!
//! Per-terminal shell environment manager.
//!
//! The binary prints shell commands on stdout and everything else on stderr,
//! so it is meant to be run through a shell function that evaluates its
//! output:
//!
//! ```bash
//! sw() { eval "$(swork "$@")"; }
//!
//! sw add my_project      # register the current directory
//! sw start my_project    # tear down the active project, enter my_project
//! sw restore             # back to the environment the terminal started with
//! ```

use std::{
    io::{self, IsTerminal},
    process::exit,
};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, error::ErrorKind};
use colored::Colorize;
use swork::{
    cli::Cli,
    commands,
    config::{FileConfig, Settings},
    env::EnvSnapshot,
    error::{SworkError, exit_code},
    logging,
    session::{SessionContext, SessionIdentity, SessionStore},
};

/// Entry point for the swork application.
///
/// Errors from [`inner_main`] are printed to stderr and mapped to the exit
/// code of the underlying [`SworkError`], or 1 for anything else.
fn main() {
    match inner_main() {
        Ok(code) => exit(code),
        Err(err) => {
            eprintln!("{} {err:#}", "Error:".red().bold());

            let code = err
                .downcast_ref::<SworkError>()
                .map_or(exit_code::FAILURE, SworkError::exit_code);
            exit(code);
        }
    }
}

/// Main application logic.
///
/// 1. Parse arguments, keeping clap's help and errors off stdout
/// 2. Set up logging and answer the `--help-*` topics
/// 3. Layer config file, environment, and flags into [`Settings`]
/// 4. Identify the terminal session and load (or bootstrap) its state
/// 5. Run the subcommand and print its script on stdout
///
/// # Returns
///
/// The process exit code on success.
///
/// # Errors
///
/// Any failure while resolving the session or running the subcommand. No
/// script is printed in that case.
fn inner_main() -> Result<i32> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprint!("{}", err.render());
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => exit_code::SUCCESS,
                _ => exit_code::USAGE,
            };
            return Ok(code);
        }
    };

    logging::init(cli.verbose);

    if let Some(topic) = cli.help_topic() {
        eprint!("{}", topic.text());
        return Ok(exit_code::SUCCESS);
    }

    let Some(command) = cli.command.as_ref() else {
        eprint!("{}", Cli::command().render_help());
        return Ok(exit_code::USAGE);
    };

    let file_config = match FileConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {e}", "Warning: Failed to load config file:".yellow());
            FileConfig::default()
        }
    };

    let current_env = EnvSnapshot::from_process();
    let settings = Settings::resolve(cli.registry.as_deref(), &file_config, &current_env)?;

    let identity = SessionIdentity::detect()?;
    let store = SessionStore::resolve(&settings.session_root, &identity)?;
    let invocation_dir = SessionContext::invocation_dir_from(&current_env)?;
    let mut ctx = SessionContext::load(store, current_env, invocation_dir)?;

    let outcome = commands::run(command, &settings, &mut ctx)?;

    let stdout = io::stdout();
    if stdout.is_terminal() && !outcome.script.is_empty() {
        tracing::warn!(
            "printing commands instead of running them; evaluate the output, e.g. sw() {{ eval \"$(swork \"$@\")\"; }}"
        );
    }

    outcome
        .script
        .write_to(stdout.lock())
        .context("Failed to write commands to stdout")?;

    Ok(outcome.code)
}
