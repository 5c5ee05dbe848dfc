use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "roomcast")]
#[command(author, version, about = "Stream a directory of videos to devices on your local network")]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory and start the streaming server
    Serve {
        /// Directory containing video files
        #[arg(required = true)]
        directory: PathBuf,

        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on (0 picks the next free port from 5000)
        #[arg(short, long, default_value = "5000")]
        port: u16,
    },

    /// List the video files a directory would serve, in gallery order
    Scan {
        /// Directory to scan
        #[arg(required = true)]
        directory: PathBuf,
    },

    /// Probe a video file and display its metadata
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}
