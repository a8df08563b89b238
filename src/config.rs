use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

/// Server configuration, loaded from a YAML file. Any value can be
/// overridden by a CLI flag.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServerConfig {
    pub database: String,
    pub uploads_dir: String,
    pub port: u16,
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database: "validata.db".to_string(),
            uploads_dir: "uploads".to_string(),
            port: 3000,
            cors_origin: None,
        }
    }
}

impl ServerConfig {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;
        Ok(config)
    }
}
