//! CLI argument definitions for the Vitrine daemon.

use std::path::PathBuf;

use clap::Parser;

/// Vitrine smart display daemon
#[derive(Parser, Debug)]
#[command(name = "vitrined")]
#[command(about = "Serve the display state tree over HTTP and WebSocket")]
#[command(version)]
pub struct Cli {
    /// File the state tree is checkpointed to and restored from
    #[arg(long, default_value = "state.json", env = "VITRINE_STATE_FILE")]
    pub state_file: PathBuf,

    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8080", env = "VITRINE_ADDR")]
    pub addr: String,

    /// Directory of client assets served at /
    #[arg(long, default_value = "client", env = "VITRINE_ASSETS")]
    pub assets: PathBuf,
}
