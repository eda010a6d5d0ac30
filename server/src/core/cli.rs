use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_AUTH_SECRET, ENV_CONFIG, ENV_DEBUG, ENV_HOST, ENV_NO_AUTH, ENV_PORT};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version, about = "Personal finance tracker", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Disable authentication and use the seeded local admin (for development)
    #[arg(long, global = true, env = ENV_NO_AUTH)]
    pub no_auth: bool,

    /// Enable debug mode (verbose request logging)
    #[arg(long, global = true, env = ENV_DEBUG)]
    pub debug: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// HS256 secret used to verify bearer tokens from the identity provider
    #[arg(long, global = true, env = ENV_AUTH_SECRET, hide_env_values = true)]
    pub auth_secret: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the server (default)
    Start,

    /// System maintenance commands
    System {
        #[command(subcommand)]
        command: SystemCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum SystemCommands {
    /// Delete the local data directory
    Prune {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

/// Parsed CLI options relevant for config loading
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub no_auth: bool,
    pub debug: bool,
    pub config: Option<PathBuf>,
    pub auth_secret: Option<String>,
}

/// Parse CLI arguments into config options and an optional command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();

    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        no_auth: cli.no_auth,
        debug: cli.debug,
        config: cli.config,
        auth_secret: cli.auth_secret,
    };

    (config, cli.command)
}
