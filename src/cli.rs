//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "callscribe",
    version,
    about = "Transcribe recorded sales calls and score customer interest",
    long_about = "Normalizes a recorded sales call, transcribes it with Whisper, translates \
                  the transcript to English, scores customer interest from weighted keywords, \
                  and exports one CSV record per call."
)]
pub struct Cli {
    /// Path to a config file (default: ~/.config/callscribe/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process one recorded call end-to-end and export its record
    Analyze {
        /// Path to the recorded call (.wav or anything ffmpeg can read)
        audio: PathBuf,

        /// Name of the agent who handled the call
        #[arg(long)]
        client: String,

        /// Name of the customer on the call
        #[arg(long)]
        customer: String,

        /// Whisper model to use (overrides config)
        #[arg(long)]
        model: Option<String>,

        /// Spoken language of the call (overrides config)
        #[arg(long)]
        language: Option<String>,

        /// Directory for the exported CSV (overrides config)
        #[arg(long)]
        results_dir: Option<PathBuf>,

        /// Fail instead of downloading a missing model
        #[arg(long)]
        no_download: bool,

        /// Print progress events as JSON lines on stdout
        #[arg(long)]
        progress_json: bool,
    },

    /// Manage Whisper models
    Models {
        #[command(subcommand)]
        action: ModelsAction,
    },

    /// Verify ffmpeg, model, and translation service availability
    Check,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ModelsAction {
    /// List available models and their installation state
    List,
    /// Download and install a model
    Install {
        /// Model name (e.g. "base", "small", "large-v3")
        name: String,
    },
}
