//! Command-line argument definitions for the Animflow CLI.
//!
//! [`Args`] holds the global flags; [`Command`] selects what to do with the
//! input document.

use clap::{Parser, Subcommand};

/// Check, inspect and play Animflow documents
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a document and report its warnings
    Check {
        /// Path to the input file
        input: String,
    },

    /// Print the step boundaries and scheduled operations of a document
    Timeline {
        /// Path to the input file
        input: String,
    },

    /// Play a document headlessly with simulated narration
    Play(PlayArgs),
}

#[derive(clap::Args, Debug)]
pub struct PlayArgs {
    /// Path to the input file
    pub input: String,

    /// Playback speed factor, overriding the document and the config file
    #[arg(long)]
    pub speed: Option<f64>,

    /// Sleep between ticks so playback runs at wall-clock pace
    #[arg(long)]
    pub realtime: bool,

    /// Do not narrate, and never wait for narration
    #[arg(long)]
    pub no_narration: bool,

    /// Give up after this many seconds of simulated wall time
    #[arg(long, default_value_t = 600.0)]
    pub max_seconds: f64,
}

impl Command {
    /// The input document path of any subcommand.
    pub fn input(&self) -> &str {
        match self {
            Self::Check { input } | Self::Timeline { input } => input,
            Self::Play(play) => &play.input,
        }
    }
}
