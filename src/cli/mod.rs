//! CLI interface for settings-patcher

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "settings-patcher")]
#[command(author = "Krakaw")]
#[command(version)]
#[command(
    about = "Enable CORS and REST framework support in a Django settings file",
    long_about = None
)]
pub struct Cli {
    /// Path to a settings-patcher.toml (searched upward from the current directory by default)
    #[arg(short, long, global = true, env = "SETTINGS_PATCHER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Defaults to a silent `apply` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Patch the settings file in place
    Apply {
        /// Settings file to patch (overrides the configured path)
        settings: Option<PathBuf>,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        /// Output format for the report
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Fail if the settings file still needs patching
    Check {
        /// Settings file to inspect (overrides the configured path)
        settings: Option<PathBuf>,
    },

    /// Print the CORS / REST framework block that would be appended
    Block,

    /// Write a default settings-patcher.toml
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}
