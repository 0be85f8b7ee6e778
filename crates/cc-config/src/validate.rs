use anyhow::{Result, bail};
use cc_core::is_valid_storage_key;

use crate::config::ConsentConfig;

/// Validate a loaded consent configuration.
/// Returns Ok(()) if valid, or Err with a descriptive message.
pub fn validate_config(config: &ConsentConfig) -> Result<()> {
    validate_storage(config)?;
    validate_analytics(config)?;
    Ok(())
}

fn validate_storage(config: &ConsentConfig) -> Result<()> {
    if config.storage.key.trim().is_empty() {
        bail!("storage.key cannot be empty");
    }
    if !is_valid_storage_key(&config.storage.key) {
        bail!(
            "storage.key '{}' may only contain letters, digits, '_', '-' or '.' and cannot start with '.'",
            config.storage.key
        );
    }
    if config.storage.schema_version.trim().is_empty() {
        bail!("storage.schema_version cannot be empty");
    }
    if config.storage.validity_days == 0 {
        bail!("storage.validity_days must be > 0 (got 0)");
    }
    Ok(())
}

fn validate_analytics(config: &ConsentConfig) -> Result<()> {
    let analytics = &config.analytics;
    if analytics.measurement_id.trim().is_empty() {
        bail!("analytics.measurement_id cannot be empty");
    }
    if !analytics.loader_base_url.starts_with("https://") {
        bail!(
            "analytics.loader_base_url must be an https URL (got '{}')",
            analytics.loader_base_url
        );
    }
    if let Some(empty) = analytics.cookie_names.iter().find(|n| n.trim().is_empty()) {
        bail!("analytics.cookie_names contains an empty name ('{empty}')");
    }
    for pattern in &analytics.cookie_patterns {
        if let Err(e) = regex::Regex::new(pattern) {
            bail!("analytics.cookie_patterns entry '{pattern}' is not a valid regex: {e}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ConsentConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut config = ConsentConfig::default();
        config.storage.key = "  ".into();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("storage.key"));
    }

    #[test]
    fn test_unstorable_key_rejected() {
        for key in ["my consent", "../x"] {
            let mut config = ConsentConfig::default();
            config.storage.key = key.into();
            let err = validate_config(&config).unwrap_err();
            assert!(err.to_string().contains("may only contain"), "{key}: {err}");
        }
    }

    #[test]
    fn test_empty_schema_version_rejected() {
        let mut config = ConsentConfig::default();
        config.storage.schema_version = String::new();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("storage.schema_version"));
    }

    #[test]
    fn test_zero_validity_rejected() {
        let mut config = ConsentConfig::default();
        config.storage.validity_days = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("validity_days must be > 0"));
    }

    #[test]
    fn test_empty_measurement_id_rejected() {
        let mut config = ConsentConfig::default();
        config.analytics.measurement_id = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_plain_http_loader_rejected() {
        let mut config = ConsentConfig::default();
        config.analytics.loader_base_url = "http://www.googletagmanager.com/gtag/js".into();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("https"));
    }

    #[test]
    fn test_empty_cookie_name_rejected() {
        let mut config = ConsentConfig::default();
        config.analytics.cookie_names.push(String::new());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let mut config = ConsentConfig::default();
        config.analytics.cookie_patterns = vec!["^_ga_(".into()];
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("not a valid regex"));
    }
}
