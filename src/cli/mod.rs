//! CLI module for Agent Hub
//!
//! Provides command-line interface parsing and handling for the agent-hub binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;
pub mod run;
pub mod simulate;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Agent Hub - pose a question to a panel of AI agents
///
/// Each agent answers, critiques the others, researches, and concludes.
#[derive(Parser, Debug)]
#[command(
    name = "agent-hub",
    version,
    about = "Agent Hub - multi-agent question answering",
    long_about = "Pose a question to a panel of AI agents and collect their responses,\n\
                  critiques, research and conclusions in four ordered stages.\n\n\
                  Run without arguments to start the server, or use 'init' to write a config file.",
    after_help = "EXAMPLES:\n    \
                  agent-hub init                           # Write hub.toml and .env.example\n    \
                  agent-hub                                # Start the server\n    \
                  agent-hub run \"Is fusion viable?\" --mock # One question, mock agents\n    \
                  agent-hub simulate                       # Push mock submissions to a running hub"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "hub.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (same as running without subcommand)
    Serve,

    /// Process a single question and print the resulting context
    Run {
        /// Question text
        question: String,

        /// Write the context JSON to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use mock agents instead of configured LLM agents
        #[arg(long)]
        mock: bool,
    },

    /// Drive a running hub through /submit with mock agent output
    Simulate {
        /// Base URL of the hub
        #[arg(long, default_value = "http://127.0.0.1:5000")]
        base_url: String,

        /// Question to submit
        #[arg(default_value = "What are the implications of artificial general intelligence?")]
        question: String,

        /// API key sent as X-API-Key with each submission
        #[arg(long, env = "HUB_API_KEY")]
        api_key: Option<String>,
    },

    /// Write a default hub.toml and .env.example
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration information
    Config {
        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
