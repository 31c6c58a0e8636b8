use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "taleforge")]
#[command(about = "Choose-your-own-adventure gateway: scenarios generated by an OpenAI-compatible model.")]
pub(crate) struct Cli {
    /// Override config directory (user settings are read from `<conf>/taleforge/settings.yaml`).
    #[arg(long, global = true)]
    pub(crate) conf: Option<PathBuf>,

    /// Debug logging for taleforge (RUST_LOG still wins).
    #[arg(long, short, global = true)]
    pub(crate) verbose: bool,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run HTTP server (POST /generateScenario). Default bind: 0.0.0.0:8080
    Gateway {
        /// Listen address (e.g. 0.0.0.0:8080); falls back to gateway.bind in settings
        #[arg(long)]
        bind: Option<String>,

        /// Per-round timeout in seconds (default: 120)
        #[arg(long)]
        turn_timeout: Option<u64>,

        /// Max concurrent rounds (omit for no limit)
        #[arg(long)]
        max_concurrent: Option<usize>,

        /// Rounds per story, conclusion included (default: 10)
        #[arg(long)]
        max_rounds: Option<usize>,

        /// Model id sent to the completion endpoint
        #[arg(long)]
        model: Option<String>,

        /// Chat completions endpoint
        #[arg(long)]
        inference_url: Option<String>,

        /// Serve canned scenarios; no API key needed
        #[arg(long)]
        mock: bool,
    },
}
