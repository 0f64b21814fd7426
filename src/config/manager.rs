use super::search::SearchConfig;
use crate::error::{EvoClassError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub search: SearchConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        self.search.validate()
    }
}

/// Shared, validated application configuration with TOML persistence.
pub struct ConfigManager {
    config: Arc<RwLock<AppConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(AppConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| EvoClassError::Configuration(format!("failed to read config: {e}")))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| EvoClassError::Configuration(format!("failed to parse config: {e}")))?;

        config.validate()?;

        *self.config.write().unwrap() = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config = self.config.read().unwrap();
        let toml_str = toml::to_string_pretty(&*config)
            .map_err(|e| EvoClassError::Configuration(format!("failed to serialize: {e}")))?;

        std::fs::write(path, toml_str)
            .map_err(|e| EvoClassError::Configuration(format!("failed to write config: {e}")))?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config.read().unwrap().clone()
    }

    pub fn update<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.write().unwrap();
        f(&mut config);
        config.validate()?;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
