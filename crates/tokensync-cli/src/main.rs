//! tokensync CLI
//!
//! Imports design token documents into a local variable store snapshot and
//! exports the store back to a token document.

mod cli;
mod commands;
mod config;
mod error;

use std::io;

use clap::{CommandFactory, Parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use config::Config;
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tokensync=warn"))
    };

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(io::stderr)
        .try_init();
    if result.is_ok() {
        tracing::debug!("Verbose mode enabled");
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        println!("{} design token sync", "tokensync".green().bold());
        println!();
        println!("Run {} for available commands.", "tokensync --help".cyan());
        return Ok(());
    };

    if let Commands::Completions { shell } = command {
        clap_complete::generate(shell, &mut Cli::command(), "tokensync", &mut io::stdout());
        return Ok(());
    }

    let cwd = std::env::current_dir()?;
    let config = Config::load(cli.config.as_deref(), &cwd)?;

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    runtime.block_on(execute_command(command, &config))
}

async fn execute_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Import {
            document,
            store,
            json,
        } => commands::run_import(&document, &config.store(store), json).await,
        Commands::Export { store, output } => {
            commands::run_export(&config.store(store), config.output(output).as_deref()).await
        }
        Commands::Diff {
            store,
            output,
            json,
        } => {
            let output = config.output(output).ok_or_else(|| {
                CliError::user("No output file to compare against; pass --output or set files.output")
            })?;
            commands::run_diff(&config.store(store), &output, json).await
        }
        Commands::Completions { .. } => Ok(()),
    }
}
