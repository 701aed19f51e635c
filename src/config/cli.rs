use crate::config::Settings;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "raffle")]
#[command(about = "Look up raffle tickets by seller name")]
pub struct CliConfig {
    /// Path to a TOML configuration file (defaults to ./raffle.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the cached dataset
    #[arg(long, global = true)]
    pub state_dir: Option<String>,

    /// Per-request timeout for sheet fetches
    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Find tickets sold by a seller (case-insensitive, partial names match)
    Search { query: String },

    /// Show every seller in the current dataset
    List,

    /// Replace the dataset with a CSV file
    Upload { file: PathBuf },

    /// Replace the dataset with a published Google Sheet
    Sync {
        /// Sheet link; falls back to the configured or last connected sheet
        url: Option<String>,

        /// Keep refreshing until interrupted
        #[arg(long)]
        watch: bool,

        /// Seconds between refreshes in watch mode
        #[arg(long)]
        interval: Option<u64>,
    },

    /// Write the current dataset to a CSV file
    Export { file: PathBuf },

    /// Show where the current data came from
    Status,

    /// Restore the bundled sample data
    Reset,
}

impl CliConfig {
    /// Flags win over the configuration file.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(dir) = &self.state_dir {
            settings.state_dir = dir.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            settings.timeout_seconds = timeout;
        }
        if let Command::Sync {
            url, interval, ..
        } = &self.command
        {
            if let Some(url) = url {
                settings.sheet_url = Some(url.clone());
            }
            if let Some(interval) = interval {
                settings.refresh_interval_secs = *interval;
            }
        }
    }
}
