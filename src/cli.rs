//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for member-persona.

use clap::{Parser, Subcommand, ValueEnum};

/// member-persona - Digital personas for association members
///
/// Reads a member snapshot (profile, activity records and forum metrics)
/// and prints the derived tags, ability scores, introduction and analysis.
#[derive(Parser, Debug)]
#[command(name = "member-persona")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a persona from a member snapshot
    Generate {
        /// Snapshot JSON file, or "-" for stdin
        input: String,

        /// Path to configuration file
        #[arg(short, long, env = "MEMBER_PERSONA_CONFIG")]
        config: Option<String>,

        /// Seed the random source for repeatable output
        #[arg(long)]
        seed: Option<u64>,

        /// Reference year for tenure (defaults to the current UTC year)
        #[arg(long)]
        year: Option<i32>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Display version and build information
    Version,

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Persona output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the effective configuration
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}
