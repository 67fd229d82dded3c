//! Command-line argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gatehouse")]
#[command(about = "Approval-gated tool execution runtime for AI agents")]
#[command(version)]
pub struct Cli {
    /// Path to a configuration file (overrides discovered configs)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Ignore all configuration files and use built-in defaults
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available tools, grouped by category
    Tools {
        /// Connect to providers and include their tools
        #[arg(long)]
        with_providers: bool,
    },

    /// Dispatch a tool by name
    Call {
        /// Tool name (e.g. read_file, mcp_atlas-local_query)
        name: String,

        /// Tool arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,

        /// Auto-approve proposals whose risk level allows it
        /// (high-risk proposals always require interactive confirmation)
        #[arg(long)]
        auto: bool,
    },

    /// List configured capability providers
    Providers,
}
