//! CLI argument parsing for planassist

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pa")]
#[command(author, version, about = "Streaming planning assistant", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level instead of info
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start an interactive chat session (the default)
    Chat,

    /// Inspect configuration
    Config {
        /// Print the effective configuration as YAML
        #[arg(long)]
        show: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_args_defaults_to_chat() {
        let cli = Cli::parse_from(["pa"]);
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_chat_with_globals() {
        let cli = Cli::parse_from(["pa", "chat", "--config", "custom.yml", "--verbose"]);
        assert!(matches!(cli.command, Some(Command::Chat)));
        assert_eq!(cli.config, Some(PathBuf::from("custom.yml")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_config_show() {
        let cli = Cli::parse_from(["pa", "config", "--show"]);
        assert!(matches!(cli.command, Some(Command::Config { show: true })));
    }
}
