use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "deskmate";
const CONFIG_FILE: &str = "config.toml";
const SERVER_URL_ENV: &str = "DESKMATE_SERVER_URL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Base URL of the assistant backend
    pub server_url: String,

    #[serde(default)]
    pub speed_test: SpeedTestSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedTestSettings {
    pub download_url: String,
    pub download_bytes: u64,
    pub ping_url: String,
    /// Delay before the automatic test that follows a successful init
    pub auto_start_delay_secs: u64,
}

impl Default for SpeedTestSettings {
    fn default() -> Self {
        Self {
            download_url: "https://speed.cloudflare.com/__down".to_string(),
            download_bytes: 5_000_000,
            ping_url: "https://www.cloudflare.com/cdn-cgi/trace".to_string(),
            auto_start_delay_secs: 2,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".to_string(),
            speed_test: SpeedTestSettings::default(),
        }
    }
}

impl Settings {
    /// Load from the user config directory, writing defaults on first run.
    pub fn load() -> Result<Self> {
        let path = config_dir().join(CONFIG_FILE);
        let mut settings = Self::load_from(&path)?;

        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            tracing::info!("Server URL overridden by {}", SERVER_URL_ENV);
            settings.server_url = url;
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let settings = Self::default();
            if let Err(e) = settings.save_to(path) {
                tracing::warn!("Could not write default config to {}: {:#}", path.display(), e);
            }
            return Ok(settings);
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let settings: Settings =
            toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents).context("Failed to write config file")?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.server_url)
            .with_context(|| format!("server_url is not a valid URL: {}", self.server_url))?;
        Url::parse(&self.speed_test.download_url).with_context(|| {
            format!(
                "speed_test.download_url is not a valid URL: {}",
                self.speed_test.download_url
            )
        })?;
        Url::parse(&self.speed_test.ping_url).with_context(|| {
            format!("speed_test.ping_url is not a valid URL: {}", self.speed_test.ping_url)
        })?;
        if self.speed_test.download_bytes == 0 {
            anyhow::bail!("speed_test.download_bytes must be greater than zero");
        }
        Ok(())
    }

    pub fn auto_start_delay(&self) -> Duration {
        Duration::from_secs(self.speed_test.auto_start_delay_secs)
    }
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults_and_writes_them() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let settings = Settings::load_from(&path).unwrap();

        assert_eq!(settings.speed_test.download_bytes, 5_000_000);
        assert!(path.exists());
    }

    #[test]
    fn partial_file_fills_speed_test_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "server_url = \"http://assistant.local:8080\"\n").unwrap();

        let settings = Settings::load_from(&path).unwrap();

        assert_eq!(settings.server_url, "http://assistant.local:8080");
        assert_eq!(settings.speed_test.auto_start_delay_secs, 2);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn rejects_bad_url_and_zero_size() {
        let mut settings = Settings::default();
        settings.server_url = "not a url".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.speed_test.download_bytes = 0;
        assert!(settings.validate().is_err());
    }
}
