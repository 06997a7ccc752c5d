use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rtchart", version, about = "Realtime chart monitor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the live monitor and print the latest values as they arrive
    Run {
        #[arg(long, default_value_t = 10)]
        duration_seconds: u64,
        /// Settings file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        threshold: Option<f64>,
        /// Chart update period in milliseconds
        #[arg(long)]
        period_ms: Option<u32>,
        /// Start with chart updates frozen
        #[arg(long)]
        freeze: bool,
        /// Where to write each new chart image
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Render one chart from a deterministic window
    Render {
        #[command(flatten)]
        window: WindowArgs,
        #[arg(long)]
        output: PathBuf,
    },
    /// Print the chart description for a deterministic window as JSON
    Describe {
        #[command(flatten)]
        window: WindowArgs,
    },
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Args)]
pub struct WindowArgs {
    /// Number of samples to generate
    #[arg(long, default_value_t = 240)]
    pub samples: usize,
    #[arg(long)]
    pub threshold: Option<f64>,
    /// Spacing between samples in milliseconds
    #[arg(long)]
    pub step_ms: Option<u32>,
    /// Timestamp of the first sample (RFC 3339)
    #[arg(long, default_value = "2024-01-01T12:00:00Z")]
    pub start: String,
    /// Settings file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write the default settings to PATH
    Init {
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the normalized settings stored in PATH
    Show { path: PathBuf },
}
