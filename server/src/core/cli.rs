use clap::{Parser, Subcommand};

use std::path::PathBuf;

use super::constants::{ENV_CONFIG, ENV_DATABASE_URL, ENV_HOST, ENV_PORT, ENV_SECRET_KEY};

#[derive(Parser)]
#[command(name = "ratings")]
#[command(version, about = "Movie ratings server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Path to config file
    #[arg(long, short = 'c', global = true, env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Database connection string (postgres://... or sqlite://...)
    #[arg(long, global = true, env = ENV_DATABASE_URL)]
    pub database_url: Option<String>,

    /// Secret used to sign session cookies
    #[arg(long, global = true, env = ENV_SECRET_KEY, hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Development mode: generate an ephemeral signing key when none is set
    #[arg(long, global = true)]
    pub dev: bool,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// Create missing tables and exit
    InitDb,
    /// Replace users, movies and ratings with the MovieLens seed files
    Seed {
        /// Directory holding u.user, u.item and u.data
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Override the users file path
        #[arg(long)]
        users: Option<PathBuf>,

        /// Override the movies file path
        #[arg(long)]
        movies: Option<PathBuf>,

        /// Override the ratings file path
        #[arg(long)]
        ratings: Option<PathBuf>,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub config: Option<PathBuf>,
    pub database_url: Option<String>,
    pub secret_key: Option<String>,
    pub dev: bool,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        config: cli.config,
        database_url: cli.database_url,
        secret_key: cli.secret_key,
        dev: cli.dev,
    };
    (config, cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_subcommand_parses_overrides() {
        let cli = Cli::try_parse_from([
            "ratings",
            "seed",
            "--data-dir",
            "data",
            "--movies",
            "other/u.item",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Seed {
                data_dir, movies, ..
            }) => {
                assert_eq!(data_dir, Some(PathBuf::from("data")));
                assert_eq!(movies, Some(PathBuf::from("other/u.item")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["ratings", "start", "--port", "8080", "--dev"]).unwrap();
        assert_eq!(cli.port, Some(8080));
        assert!(cli.dev);
    }

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["ratings"]).unwrap();
        assert!(cli.command.is_none());
    }
}
