use cc_core::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "consent")]
#[command(about = "Cookie consent manager: inspect and drive a consent profile")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Profile directory holding the stored record (defaults to the XDG state dir)
    #[arg(long, global = true)]
    pub profile_dir: Option<PathBuf>,

    /// Hostname the simulated document is served from
    #[arg(long, global = true, default_value = "localhost")]
    pub host: String,

    /// Config file (defaults to ~/.config/cookie-consent/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the stored decision and what startup would do
    Status,

    /// Grant every optional category
    AcceptAll,

    /// Refuse every optional category
    Reject,

    /// Save a custom selection (unlisted categories are refused)
    Save {
        /// Allow analytics cookies
        #[arg(long)]
        analytics: bool,

        /// Allow marketing cookies
        #[arg(long)]
        marketing: bool,
    },

    /// Show the settings toggles as the reopened surface would
    Settings,

    /// Show/manage configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a commented default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
