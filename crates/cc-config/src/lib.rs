//! Consent configuration loading and validation (`~/.config/cookie-consent/config.toml`).

pub mod config;
pub mod paths;
pub mod validate;

pub use config::{AnalyticsConfig, ConsentConfig, StorageConfig};
pub use validate::validate_config;
