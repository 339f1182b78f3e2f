//! CLI command definitions for the `affect` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod analyze;
pub mod providers;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Score children's questionnaire answers for sentiment.
#[derive(Parser)]
#[command(name = "affect", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log errors only and skip the `serve` banner. Command results still print.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Provider config file (missing file means built-in defaults).
    #[arg(long, global = true, env = "AFFECT_CONFIG", default_value = "affect.toml")]
    pub config: PathBuf,

    /// Write logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log filter for the chosen verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,affect_core=debug,affect_infra=debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a single answer.
    Analyze {
        /// Identifier of the question being answered.
        #[arg(long)]
        question_id: i64,

        /// Question text shown to the child.
        #[arg(long, default_value = "")]
        question: String,

        /// The child's answer.
        #[arg(long)]
        answer: String,

        /// Optional question category (e.g. "Gia đình").
        #[arg(long)]
        category: Option<String>,
    },

    /// Score every answer in a JSON file (array of analysis contexts).
    Batch {
        /// Path to the JSON file.
        file: PathBuf,
    },

    /// Show the provider chain with enabled/available state.
    Providers,

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value_t = 3000)]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
