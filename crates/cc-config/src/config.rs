//! Consent configuration (`~/.config/cookie-consent/config.toml`).
//!
//! Every field defaults to the built-in constants, so a missing file or a
//! partial file behaves exactly like the stock banner.

use anyhow::{Context, Result};
use cc_core::{
    CONSENT_SCHEMA_VERSION, CONSENT_STORAGE_KEY, CONSENT_VALIDITY_DAYS, ValidityWindow,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::paths;

const DEFAULT_MEASUREMENT_ID: &str = "G-V2H82YS2VS";
const DEFAULT_LOADER_BASE_URL: &str = "https://www.googletagmanager.com/gtag/js";
const DEFAULT_COOKIE_NAMES: &[&str] = &["_ga", "_gid", "_gat"];
const DEFAULT_COOKIE_PATTERNS: &[&str] = &["^_ga_", "^_gat_"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

/// `[storage]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_key")]
    pub key: String,
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default = "default_validity_days")]
    pub validity_days: u32,
    /// Directory of the file-backed profile. None = XDG state dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            schema_version: default_schema_version(),
            validity_days: default_validity_days(),
            dir: None,
        }
    }
}

/// `[analytics]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_measurement_id")]
    pub measurement_id: String,
    #[serde(default = "default_loader_base_url")]
    pub loader_base_url: String,
    /// Fixed cookie names to clear. `_ga_<measurement_id>` is always added.
    #[serde(default = "default_cookie_names")]
    pub cookie_names: Vec<String>,
    /// Regexes matched against cookie names present in the document.
    #[serde(default = "default_cookie_patterns")]
    pub cookie_patterns: Vec<String>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            measurement_id: default_measurement_id(),
            loader_base_url: default_loader_base_url(),
            cookie_names: default_cookie_names(),
            cookie_patterns: default_cookie_patterns(),
        }
    }
}

fn default_key() -> String {
    CONSENT_STORAGE_KEY.to_string()
}

fn default_schema_version() -> String {
    CONSENT_SCHEMA_VERSION.to_string()
}

fn default_validity_days() -> u32 {
    CONSENT_VALIDITY_DAYS
}

fn default_measurement_id() -> String {
    DEFAULT_MEASUREMENT_ID.to_string()
}

fn default_loader_base_url() -> String {
    DEFAULT_LOADER_BASE_URL.to_string()
}

fn default_cookie_names() -> Vec<String> {
    DEFAULT_COOKIE_NAMES.iter().map(|s| s.to_string()).collect()
}

fn default_cookie_patterns() -> Vec<String> {
    DEFAULT_COOKIE_PATTERNS.iter().map(|s| s.to_string()).collect()
}

impl StorageConfig {
    pub fn validity_window(&self) -> ValidityWindow {
        ValidityWindow::new(self.schema_version.clone(), self.validity_days)
    }

    pub fn profile_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(paths::default_profile_dir)
    }
}

impl AnalyticsConfig {
    /// Loader URL, e.g. `https://www.googletagmanager.com/gtag/js?id=G-V2H82YS2VS`.
    pub fn loader_url(&self) -> String {
        format!("{}?id={}", self.loader_base_url, self.measurement_id)
    }

    /// Fixed tracking cookie names, including `_ga_<measurement_id>`.
    pub fn tracking_cookie_names(&self) -> Vec<String> {
        let mut names = self.cookie_names.clone();
        let per_property = format!("_ga_{}", self.measurement_id);
        if !names.contains(&per_property) {
            names.push(per_property);
        }
        names
    }
}

impl ConsentConfig {
    /// Load from `~/.config/cookie-consent/config.toml`.
    ///
    /// Returns `Default` if the file does not exist or if the config
    /// directory cannot be determined (e.g., no HOME in containers).
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(Self::default()),
        };
        Self::load_from(&path)
    }

    /// Load from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No consent config, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read consent config: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse consent config: {}", path.display()))?;
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf> {
        let dir = paths::config_dir().context("Failed to determine config directory")?;
        Ok(dir.join(paths::CONFIG_FILE_NAME))
    }

    /// Generate default config TOML with comments as a template.
    pub fn default_template() -> String {
        r#"# Cookie consent configuration
# Location: ~/.config/cookie-consent/config.toml

[storage]
key = "cookie_consent"
schema_version = "1.0"   # bump to force every visitor to decide again
validity_days = 180
# dir = "/path/to/profile"  # file-backed profile (default: XDG state dir)

[analytics]
measurement_id = "G-V2H82YS2VS"
loader_base_url = "https://www.googletagmanager.com/gtag/js"
cookie_names = ["_ga", "_gid", "_gat"]   # _ga_<measurement_id> is always cleared too
cookie_patterns = ["^_ga_", "^_gat_"]
"#
        .to_string()
    }

    /// Write the default template to `path`, creating directories as needed.
    pub fn save_default_template_to(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(path, Self::default_template())
            .with_context(|| format!("Failed to write consent config: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
