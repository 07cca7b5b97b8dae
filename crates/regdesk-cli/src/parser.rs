//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface definition for the registry operator console.
///
/// This is the top-level parser that handles global options and dispatches
/// to subcommands.
#[derive(Parser)]
#[command(name = "regdesk")]
#[command(about = "Administer a registry of MCP servers, AI agents and models")]
#[command(version)]
pub struct Cli {
    /// Override the registry API base URL for this invocation
    #[arg(long = "api-base", global = true, env = "REGDESK_API_BASE")]
    pub api_base: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        // Verify the CLI parser can be constructed
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "regdesk",
            "--verbose",
            "--api-base",
            "http://registry.internal:8080",
            "agents",
            "list",
        ]);
        assert!(cli.verbose);
        assert_eq!(
            cli.api_base,
            Some("http://registry.internal:8080".to_string())
        );
    }
}
