use anyhow::{Result, bail};
use cc_config::ConsentConfig;
use cc_core::OutputFormat;
use std::path::{Path, PathBuf};

pub(crate) fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => ConsentConfig::config_path(),
    }
}

pub(crate) fn handle_config_show(config: &ConsentConfig, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Text => {
            print!("{}", toml::to_string_pretty(config)?);
        }
    }
    Ok(())
}

pub(crate) fn handle_config_path(explicit: Option<&Path>) -> Result<()> {
    let path = resolve_config_path(explicit)?;
    println!("{}", path.display());
    Ok(())
}

pub(crate) fn handle_config_init(explicit: Option<&Path>, force: bool) -> Result<()> {
    let path = resolve_config_path(explicit)?;
    if path.exists() && !force {
        bail!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }
    ConsentConfig::save_default_template_to(&path)?;
    eprintln!("Wrote consent config template to: {}", path.display());
    Ok(())
}
