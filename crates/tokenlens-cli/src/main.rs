use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tokenlens::{TokenInspector, TokenlensConfig};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "tokenlens", version, about = "Inspect JSON Web Tokens without verifying them")]
struct Cli {
    /// Path to a tokenlens.yaml configuration file
    #[arg(long, global = true, env = "TOKENLENS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the decoded payload as JSON
    Decode {
        /// Token, or a file containing it. Falls back to the configured env var.
        token: Option<String>,
    },

    /// Check whether the token is still valid. Exits non-zero when it is not.
    Check {
        /// Token, or a file containing it. Falls back to the configured env var.
        token: Option<String>,
    },

    /// Print username, authorities and remaining lifetime as JSON
    Summary {
        /// Token, or a file containing it. Falls back to the configured env var.
        token: Option<String>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => TokenlensConfig::from_file(path)?,
        None => TokenlensConfig::default(),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    tracing::debug!(config = ?cli.config, "loaded configuration");

    let inspector = TokenInspector::new().configured(&config.inspector);
    let mut out = io::stdout().lock();

    let passed = match cli.cmd {
        Command::Decode { token } => {
            let token = commands::token::resolve_token(token, &config)?;
            commands::token::decode(&inspector, &token, &mut out)?
        }
        Command::Check { token } => {
            let token = commands::token::resolve_token(token, &config)?;
            commands::token::check(&inspector, &token, &mut out)?
        }
        Command::Summary { token } => {
            let token = commands::token::resolve_token(token, &config)?;
            commands::token::summary(&inspector, &token, &mut out)?
        }
    };

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
