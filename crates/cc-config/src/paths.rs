use std::path::PathBuf;

/// XDG app name used for config and state paths.
pub const APP_NAME: &str = "cookie-consent";

/// Config file name inside [`config_dir`].
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// `~/.config/cookie-consent` (or the platform equivalent).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Directory holding the default file-backed profile.
///
/// `state_dir()` is Linux-only; fall back to `data_local_dir()` elsewhere.
pub fn state_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| {
        dirs.state_dir()
            .unwrap_or_else(|| dirs.data_local_dir())
            .to_path_buf()
    })
}

/// Default profile directory, or a temp-dir fallback when no home is known
/// (e.g. in containers).
pub fn default_profile_dir() -> PathBuf {
    state_dir()
        .map(|dir| dir.join("profile"))
        .unwrap_or_else(|| std::env::temp_dir().join(format!("{APP_NAME}-profile")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_dir_ends_with_profile_component() {
        let dir = default_profile_dir();
        let last = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        assert!(
            last == "profile" || last == format!("{APP_NAME}-profile"),
            "unexpected profile dir: {}",
            dir.display()
        );
    }

    #[test]
    fn test_config_dir_uses_app_name() {
        if let Some(dir) = config_dir() {
            assert!(dir.to_string_lossy().contains(APP_NAME));
        }
    }
}
