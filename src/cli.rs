use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Help text for `--help-config`.
pub const CONFIG_HELP: &str = r#"The registry file

`swork add` maintains the registry for you, but it is plain JSON and can be
edited by hand. It lives at $HOME/.sworkrc unless --registry, SWORK_REGISTRY,
or `registry` in ~/.config/swork/config.toml says otherwise.

    {
        "project1": {
            "root": "/path/to/project1",
            "start_cmd": "source /path/to/project1/activate",
            "teardown_cmd": "echo 'project1 teardown'"
        },
        "project2": {
            "root": "/path/to/project2",
            "start_cmd": "source /path/to/project2/activate",
            "teardown_cmd": "echo 'project2 teardown'"
        }
    }

Every project needs all three fields, none of them empty:

    root          absolute path of the project directory
    start_cmd     evaluated in `root` when the project starts
    teardown_cmd  evaluated in `root` when the project is torn down

A single invalid entry makes the whole file unusable.

`swork add` fills the commands in as

    echo '<name> setup'; source <activate file>
    echo '<name> teardown'; source <deactivate file>
"#;

/// Help text for `--help-examples`.
pub const EXAMPLES_HELP: &str = r#"Examples

swork prints shell commands; the shell has to evaluate them. Put this in
your ~/.bashrc or ~/.zshrc:

    sw() { eval "$(swork "$@")"; }

then:

    $ cd /path/to/project && sw add my_project   # register a project
    $ sw start day_job                           # enter a project
    $ sw start -c day_job/src/main               # enter it and cd into a sub dir
    $ sw restore                                 # back to the original shell
    $ sw cd proj1/sub/directory                  # cd without touching the env
    $ cp file "$(sw path proj1/sub/dir)"
    $ sw list
"#;

#[derive(Parser, Debug)]
struct HelpTopics {
    /// Show the format of the registry file
    #[arg(long)]
    help_config: bool,

    /// Show some usage examples
    #[arg(long)]
    help_examples: bool,
}

#[derive(Parser, Debug)]
#[command(name = "swork", version)]
#[command(about = "Set up the shell environment to work on a particular project")]
#[command(
    after_help = "swork prints shell commands on stdout; evaluate them with `eval \"$(swork ...)\"`."
)]
pub struct Cli {
    /// Registry file to use instead of $HOME/.sworkrc
    #[arg(long, global = true, env = "SWORK_REGISTRY")]
    pub registry: Option<PathBuf>,

    /// Log debug diagnostics to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Extra help topics
    #[command(flatten)]
    topics: HelpTopics,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Every subcommand the tool understands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start work on a project, tearing down the active one first
    Start {
        /// Also cd to the project (or to the sub dir given after the name)
        #[arg(short = 'c', long = "cd")]
        cd: bool,

        /// Project name, optionally followed by /path/to/sub/dir when --cd is given
        project: String,
    },

    /// Tear down the active project and restore the original environment
    Restore,

    /// List all registered projects
    List,

    /// Register the current directory as a new project
    Add {
        /// Existing activate file to source on start
        #[arg(short = 'a', long)]
        activate: Option<PathBuf>,

        /// Existing deactivate file to source on teardown
        #[arg(short = 'd', long)]
        deactivate: Option<PathBuf>,

        /// Don't create activate/deactivate files in the editor
        #[arg(long)]
        no_create: bool,

        /// Name of the project to add
        name: String,
    },

    /// Remove a project from the registry
    #[command(alias = "rm")]
    Remove {
        /// Don't ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,

        /// Name of the project to remove
        name: String,
    },

    /// cd to a project (or a sub dir of it) without touching the environment
    Cd {
        /// project[/path/to/sub/dir]
        target: String,
    },

    /// Print the path of a project (or a sub dir of it)
    Path {
        /// project[/path/to/sub/dir]
        target: String,
    },
}

/// A help topic requested with one of the `--help-*` flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HelpTopic {
    Config,
    Examples,
}

impl HelpTopic {
    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            Self::Config => CONFIG_HELP,
            Self::Examples => EXAMPLES_HELP,
        }
    }
}

impl Cli {
    /// The help topic requested, if any.
    #[must_use]
    pub fn help_topic(&self) -> Option<HelpTopic> {
        if self.topics.help_config {
            Some(HelpTopic::Config)
        } else if self.topics.help_examples {
            Some(HelpTopic::Examples)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_start_with_cd() {
        let cli = Cli::try_parse_from(["swork", "start", "-c", "proj/src"]).unwrap();

        assert_eq!(
            cli.command,
            Some(Command::Start {
                cd: true,
                project: "proj/src".to_string()
            })
        );
    }

    #[test]
    fn test_parse_add_options() {
        let cli =
            Cli::try_parse_from(["swork", "add", "-a", "act.sh", "--no-create", "proj"]).unwrap();

        assert_eq!(
            cli.command,
            Some(Command::Add {
                activate: Some(PathBuf::from("act.sh")),
                deactivate: None,
                no_create: true,
                name: "proj".to_string(),
            })
        );
    }

    #[test]
    fn test_rm_alias() {
        let cli = Cli::try_parse_from(["swork", "rm", "-y", "proj"]).unwrap();

        assert_eq!(
            cli.command,
            Some(Command::Remove {
                yes: true,
                name: "proj".to_string()
            })
        );
    }

    #[test]
    fn test_global_registry_flag() {
        let cli = Cli::try_parse_from(["swork", "list", "--registry", "/tmp/rc"]).unwrap();

        assert_eq!(cli.registry, Some(PathBuf::from("/tmp/rc")));
        assert_eq!(cli.command, Some(Command::List));
    }

    #[test]
    fn test_help_topics() {
        let cli = Cli::try_parse_from(["swork", "--help-config"]).unwrap();
        assert_eq!(cli.help_topic(), Some(HelpTopic::Config));
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["swork", "--help-examples"]).unwrap();
        assert_eq!(cli.help_topic(), Some(HelpTopic::Examples));
    }

    #[test]
    fn test_start_requires_project() {
        assert!(Cli::try_parse_from(["swork", "start"]).is_err());
    }
}
