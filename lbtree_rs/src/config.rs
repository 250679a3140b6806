//! Configuration file support for lbtree.
//!
//! Loads optional `<config dir>/lbtree/config.toml`. Every key is optional and
//! command-line flags take precedence.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::types::ColorMode;

/// Root configuration structure
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LbtreeConfig {
    /// Default cloud profile when neither `--cloud` nor `OS_CLOUD` is set.
    pub cloud: Option<String>,
    pub color: Option<ColorMode>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
    pub short_ids: Option<bool>,
}

impl LbtreeConfig {
    /// `<config dir>/lbtree/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("lbtree").join("config.toml"))
    }

    /// Load from the default location.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_from_path(&path),
            None => Self::default(),
        }
    }

    /// Load config from a specific path.
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no config file");
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = LbtreeConfig::default();
        assert!(config.cloud.is_none());
        assert!(config.color.is_none());
        assert!(config.timeout_secs.is_none());
        assert!(config.short_ids.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().expect("temp dir");
        let config = LbtreeConfig::load_from_path(&temp.path().join("config.toml"));
        assert_eq!(config, LbtreeConfig::default());
    }

    #[test]
    fn test_load_valid_config() {
        let temp = TempDir::new().expect("temp dir");
        let config_path = temp.path().join("config.toml");
        let mut file = std::fs::File::create(&config_path).expect("create config");
        writeln!(
            file,
            r#"
cloud = "prod"
color = "never"
timeout_secs = 10
short_ids = true
"#
        )
        .expect("write config");

        let config = LbtreeConfig::load_from_path(&config_path);
        assert_eq!(config.cloud.as_deref(), Some("prod"));
        assert_eq!(config.color, Some(ColorMode::Never));
        assert_eq!(config.timeout_secs, Some(10));
        assert_eq!(config.short_ids, Some(true));
    }

    #[test]
    fn test_invalid_config_falls_back_to_default() {
        let temp = TempDir::new().expect("temp dir");
        let config_path = temp.path().join("config.toml");
        std::fs::write(&config_path, "timeout_secs = \"soon\"\n").expect("write config");

        let config = LbtreeConfig::load_from_path(&config_path);
        assert_eq!(config, LbtreeConfig::default());
    }

    #[test]
    fn test_load_empty_config() {
        let temp = TempDir::new().expect("temp dir");
        let config_path = temp.path().join("config.toml");
        std::fs::File::create(&config_path).expect("create empty config");

        let config = LbtreeConfig::load_from_path(&config_path);
        assert_eq!(config, LbtreeConfig::default());
    }
}
