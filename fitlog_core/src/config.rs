//! Configuration file support for Fitlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/fitlog/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CLIENT_ID_ENV: &str = "FITLOG_STRAVA_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "FITLOG_STRAVA_CLIENT_SECRET";

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub strava: StravaConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Activity API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StravaConfig {
    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_oauth_url")]
    pub oauth_url: String,

    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for StravaConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_base: default_api_base(),
            oauth_url: default_oauth_url(),
            per_page: default_per_page(),
        }
    }
}

impl StravaConfig {
    /// Client id and secret, required for token refresh
    pub fn credentials(&self) -> Result<(&str, &str)> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(Error::Config(format!(
                "strava client_id and client_secret must be set in the config file or via {} / {}",
                CLIENT_ID_ENV, CLIENT_SECRET_ENV
            ))),
        }
    }
}

/// Default output locations
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_feed_path")]
    pub feed_path: PathBuf,

    #[serde(default = "default_strava_path")]
    pub strava_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            feed_path: default_feed_path(),
            strava_path: default_strava_path(),
        }
    }
}

// Default value functions
fn default_api_base() -> String {
    "https://www.strava.com/api/v3".into()
}

fn default_oauth_url() -> String {
    "https://www.strava.com/oauth/token".into()
}

fn default_per_page() -> u32 {
    100
}

fn default_feed_path() -> PathBuf {
    PathBuf::from("output.json")
}

fn default_strava_path() -> PathBuf {
    PathBuf::from("strava_output.json")
}

impl Config {
    /// Load configuration from the standard config path, then apply env overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fitlog")
            .join("config.toml")
    }

    /// Replace credentials with values found through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(id) = lookup(CLIENT_ID_ENV) {
            self.strava.client_id = Some(id);
        }
        if let Some(secret) = lookup(CLIENT_SECRET_ENV) {
            self.strava.client_secret = Some(secret);
        }
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.strava.per_page, 100);
        assert_eq!(config.strava.api_base, "https://www.strava.com/api/v3");
        assert_eq!(config.output.feed_path, PathBuf::from("output.json"));
        assert!(config.strava.credentials().is_err());
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("fitlog").join("config.toml");

        let mut config = Config::default();
        config.strava.client_id = Some("1234".into());
        config.save_to(&path).unwrap();

        let parsed = Config::load_from(&path).unwrap();
        assert_eq!(parsed.strava.client_id.as_deref(), Some("1234"));
        assert_eq!(parsed.output.strava_path, config.output.strava_path);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[strava]
per_page = 30
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.strava.per_page, 30);
        assert_eq!(config.strava.oauth_url, "https://www.strava.com/oauth/token"); // default
        assert_eq!(config.output.feed_path, PathBuf::from("output.json"));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut config: Config = toml::from_str(
            r#"
[strava]
client_id = "from-file"
client_secret = "file-secret"
"#,
        )
        .unwrap();

        config.apply_overrides(|key| (key == CLIENT_ID_ENV).then(|| "from-env".to_string()));

        assert_eq!(config.strava.credentials().unwrap(), ("from-env", "file-secret"));
    }
}
