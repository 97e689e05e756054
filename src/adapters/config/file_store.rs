use crate::ports::{AppConfig, ConfigError, ConfigResult, ConfigStore};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    server_url: Option<String>,
    sounds_enabled: Option<bool>,
    celebrations_enabled: Option<bool>,
}

pub struct FileConfigStore {
    config_path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> ConfigResult<Self> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::ReadError("Cannot determine config directory".to_string())
        })?;

        Ok(Self::with_path(config_dir.join("todo-tui").join("config.json")))
    }

    pub fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    async fn ensure_config_dir(&self) -> ConfigResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load_config(&self) -> ConfigResult<AppConfig> {
        let content = match fs::read_to_string(&self.config_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", self.config_path.display());
                return Ok(AppConfig::default());
            }
            Err(e) => return Err(ConfigError::ReadError(e.to_string())),
        };

        let config_file: ConfigFile = serde_json::from_str(&content)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        let defaults = AppConfig::default();
        Ok(AppConfig {
            server_url: config_file.server_url.unwrap_or(defaults.server_url),
            sounds_enabled: config_file.sounds_enabled.unwrap_or(defaults.sounds_enabled),
            celebrations_enabled: config_file
                .celebrations_enabled
                .unwrap_or(defaults.celebrations_enabled),
        })
    }

    async fn save_config(&self, config: &AppConfig) -> ConfigResult<()> {
        self.ensure_config_dir().await?;

        let config_file = ConfigFile {
            server_url: Some(config.server_url.clone()),
            sounds_enabled: Some(config.sounds_enabled),
            celebrations_enabled: Some(config.celebrations_enabled),
        };

        let content = serde_json::to_string_pretty(&config_file)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        fs::write(&self.config_path, content)
            .await
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }
}
