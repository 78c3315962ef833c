//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// tokensync - Synchronize design tokens with a variable store
#[derive(Parser, Debug)]
#[command(name = "tokensync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a tokensync.toml config file
    #[arg(short, long, global = true, env = "TOKENSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Import a token document into the variable store
    ///
    /// Groups are matched by name and variables by path; existing variables
    /// are updated in place, nothing is deleted.
    ///
    /// Examples:
    ///   tokensync import tokens.json
    ///   tokensync import tokens.json --store state/variables.json
    Import {
        /// Token document to import
        document: PathBuf,

        /// Variable store snapshot file
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// Output the report as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Export the variable store as a token document
    ///
    /// With an output file, the file is only rewritten when its content
    /// would change. Without one, the document is printed.
    Export {
        /// Variable store snapshot file
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// File to write the document to
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Preview what export would change in the output file
    Diff {
        /// Variable store snapshot file
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// File the export would be written to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   tokensync completions bash > ~/.local/share/bash-completion/completions/tokensync
    ///   tokensync completions zsh > ~/.zfunc/_tokensync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
