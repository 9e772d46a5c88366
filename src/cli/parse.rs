//! CLI parse: clap types. No behavior; definitions only.

use crate::pattern::{AspectRatio, DEFAULT_MAX_DIMENSION};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Frame Engine CLI - procedural frame images and galleries
#[derive(Debug, Parser)]
#[command(name = "frames")]
#[command(about = "Generate procedural frame images and populate frame galleries")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered above the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Synthesize one image and write it as PNG
    Synth {
        /// Seed string; the same seed always yields the same pattern family and colors
        #[arg(long)]
        seed: String,
        /// Longer side of the image, in pixels
        #[arg(long, default_value_t = DEFAULT_MAX_DIMENSION)]
        max_dimension: u32,
        /// Aspect ratio as W:H (random when omitted)
        #[arg(long)]
        aspect: Option<AspectRatio>,
        /// Output file
        #[arg(long)]
        out: PathBuf,
    },
    /// Populate a frame store through the dispatcher and summarize it
    Gallery {
        /// Number of frames to add
        #[arg(long, default_value_t = 8)]
        count: usize,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as TOML
    Config,
}
