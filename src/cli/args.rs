//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::config::OutputFormat;

/// Labeled tag trees addressed by slash-delimited paths
#[derive(Parser, Debug)]
#[command(name = "rstree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global one
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tree built from a tag listing
    Show {
        /// Tag listing
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Output format (default: from config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Look up a single tag by path
    Resolve {
        /// Tag listing
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Path such as /Machine/Heating/Zones
        path: String,
        /// `json` prints the subtree below the path (default: from config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// List leaf tag paths
    Leaves {
        /// Tag listing
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Remove subtrees and print the remaining listing
    Delete {
        /// Tag listing
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Paths to remove
        #[arg(num_args = 1..)]
        paths: Vec<String>,
    },

    /// Build and print the sample pressure plant
    Demo {
        /// Output format (default: from config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create global config template
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
