use anyhow::{Context, Result};
use clap::Parser;

mod cli;
mod config_cmds;
mod consent_cmds;

use cc_config::{ConsentConfig, validate_config};
use cc_core::{Selections, Transition};
use cli::{Cli, Commands, ConfigCommands};
use consent_cmds::ConsentContext;
use std::path::Path;

fn load_config(explicit: Option<&Path>) -> Result<ConsentConfig> {
    let config = match explicit {
        Some(path) => ConsentConfig::load_from(path)?,
        None => ConsentConfig::load()?,
    };
    validate_config(&config).context("Invalid consent configuration")?;
    Ok(config)
}

fn open_context(
    config_path: Option<&Path>,
    profile_dir: Option<&Path>,
    host: &str,
) -> Result<ConsentContext> {
    let config = load_config(config_path)?;
    let profile_dir = profile_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.storage.profile_dir());
    tracing::debug!(profile = %profile_dir.display(), %host, "Opening consent profile");
    Ok(ConsentContext {
        config,
        profile_dir,
        host: host.to_string(),
    })
}

fn main() -> Result<()> {
    // Initialize tracing (output to stderr, initialize only once)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let Cli {
        command,
        format,
        profile_dir,
        host,
        config,
    } = Cli::parse();
    let config_path = config.as_deref();
    let context = || open_context(config_path, profile_dir.as_deref(), &host);

    match command {
        Commands::Status => consent_cmds::handle_status(&context()?, format),
        Commands::AcceptAll => {
            consent_cmds::handle_decision(&context()?, Transition::AcceptAll, format)
        }
        Commands::Reject => {
            consent_cmds::handle_decision(&context()?, Transition::RejectNonEssential, format)
        }
        Commands::Save {
            analytics,
            marketing,
        } => consent_cmds::handle_decision(
            &context()?,
            Transition::CustomSave(Selections {
                analytics,
                marketing,
            }),
            format,
        ),
        Commands::Settings => consent_cmds::handle_settings(&context()?, format),
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Show => {
                let config = load_config(config_path)?;
                config_cmds::handle_config_show(&config, format)
            }
            ConfigCommands::Path => config_cmds::handle_config_path(config_path),
            ConfigCommands::Init { force } => config_cmds::handle_config_init(config_path, force),
        },
    }
}
