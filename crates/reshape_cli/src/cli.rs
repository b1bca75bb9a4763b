//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// reshape-util - Validate reshape node trees
#[derive(Parser)]
#[command(name = "reshape-util")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate JSON node trees
    Validate {
        /// Files holding a JSON array of nodes
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Require content on every tag, text, comment and code node
        #[arg(long)]
        strict: bool,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
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
    fn test_parse_validate_args() {
        let cli = Cli::parse_from([
            "reshape-util",
            "--verbose",
            "validate",
            "a.json",
            "b.json",
            "--format",
            "json",
            "--strict",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Commands::Validate {
                files,
                format,
                strict,
            } => {
                assert_eq!(files, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
                assert_eq!(format, OutputFormat::Json);
                assert!(strict);
            }
            Commands::Init { .. } => panic!("Expected validate command"),
        }
    }

    #[test]
    fn test_validate_requires_files() {
        assert!(Cli::try_parse_from(["reshape-util", "validate"]).is_err());
    }
}
