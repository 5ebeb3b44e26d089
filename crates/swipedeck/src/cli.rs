use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::app::LaunchOptions;
use crate::deck::{self, Deck};

#[derive(Parser)]
#[command(name = "swipedeck")]
#[command(author, version, about)]
#[command(long_about = "A swipeable greeting-card slideshow.\n\n\
    Slides are read from a YAML deck. Without a deck, the bundled one is shown.\n\n\
    Examples:\n  \
    swipedeck                      Show the bundled deck (fullscreen)\n  \
    swipedeck card.yaml --windowed Show a deck in a window\n  \
    swipedeck check card.yaml      Validate a deck\n  \
    swipedeck slides               List the bundled slides")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// YAML deck to show
    pub deck: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed, never past the choice slide)
    #[arg(long)]
    pub slide: Option<usize>,

    /// Skip the entry screen; music stays off until toggled
    #[arg(long)]
    pub skip_intro: bool,

    /// Never start the audio player
    #[arg(long)]
    pub mute: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load and validate a deck
    Check {
        /// Deck file to validate
        deck: PathBuf,
    },

    /// List the slides of a deck
    Slides {
        /// Deck file (defaults to the bundled deck)
        deck: Option<PathBuf>,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. display.theme, swipe.threshold, audio.player)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// The given deck, or the bundled one.
pub fn resolve_deck(path: Option<&Path>) -> anyhow::Result<Deck> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("File not found: {}", path.display());
            }
            deck::load(path)
        }
        None => Ok(deck::bundled()?),
    }
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Check { deck }) => crate::commands::check::run(&deck),
            Some(Commands::Slides { deck }) => crate::commands::slides::run(deck.as_deref()),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                println!("swipedeck {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                let deck = resolve_deck(self.deck.as_deref())?;
                let options = LaunchOptions {
                    windowed: self.windowed,
                    start_slide: self.slide,
                    skip_intro: self.skip_intro,
                    mute: self.mute,
                };
                crate::app::run(deck, options, crate::config::Config::load_or_default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_launch_flags() {
        let cli = Cli::try_parse_from([
            "swipedeck",
            "card.yaml",
            "--windowed",
            "--slide",
            "5",
            "--mute",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.deck.as_deref(), Some(Path::new("card.yaml")));
        assert!(cli.windowed && cli.mute && !cli.skip_intro);
        assert_eq!(cli.slide, Some(5));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_config_set_subcommand() {
        let cli =
            Cli::try_parse_from(["swipedeck", "config", "set", "reveal.value", "7"]).unwrap();
        match cli.command {
            Some(Commands::Config {
                command: ConfigCommands::Set { key, value },
            }) => {
                assert_eq!(key, "reveal.value");
                assert_eq!(value, "7");
            }
            _ => panic!("expected config set"),
        }
    }

    #[test]
    fn test_resolve_missing_deck() {
        let err = resolve_deck(Some(Path::new("/no/such/deck.yaml"))).unwrap_err();
        assert!(err.to_string().contains("File not found"));
        assert_eq!(resolve_deck(None).unwrap().slides.size(), 19);
    }
}
