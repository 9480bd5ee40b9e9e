//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Parser, Subcommand};

/// Trader API - database bootstrap and HTTP service
#[derive(Parser, Debug)]
#[command(name = "trader-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect, migrate and start the HTTP server
    Serve(ServeArgs),

    /// Run the schema auto-migration
    Migrate(MigrateArgs),

    /// Verify the database is reachable with the configured credentials
    Check,
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8000", env = "SERVER_PORT")]
    pub port: u16,
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateCommand,
}

/// Migration actions
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateCommand {
    /// Create missing tables and columns
    Up,
    /// Show pending changes without applying them
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::try_parse_from(["trader-api", "serve", "--host", "127.0.0.1", "-p", "9000"])
            .unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.host, "127.0.0.1");
                assert_eq!(args.port, 9000);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_migrate_actions() {
        let cli = Cli::try_parse_from(["trader-api", "migrate", "status"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Migrate(MigrateArgs {
                action: MigrateCommand::Status
            })
        ));

        let cli = Cli::try_parse_from(["trader-api", "-v", "migrate", "up"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_rollback_is_not_a_command() {
        assert!(Cli::try_parse_from(["trader-api", "migrate", "down"]).is_err());
    }

    #[test]
    fn test_check_takes_no_arguments() {
        let cli = Cli::try_parse_from(["trader-api", "check", "--verbose"]).unwrap();
        assert!(matches!(cli.command, Commands::Check));
        assert!(cli.verbose);
    }
}
