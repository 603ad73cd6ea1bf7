use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::RAYDIUM_AMM_PROGRAM_ID;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub rpc_url: String,
    #[serde(default = "default_amm_program_id")]
    pub amm_program_id: String,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

fn default_amm_program_id() -> String {
    RAYDIUM_AMM_PROGRAM_ID.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            amm_program_id: default_amm_program_id(),
            database: DatabaseConfig {
                path: "pools.db".to_string(),
            },
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            let default_config = Self::default();
            default_config.save(path)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        // Validate required fields
        if config.rpc_url.is_empty() {
            return Err(anyhow::anyhow!("rpc_url is required in config"));
        }
        if config.amm_program_id.is_empty() {
            return Err(anyhow::anyhow!("amm_program_id is required in config"));
        }

        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let path = path.to_str().unwrap();

        let config = Config::load(path).unwrap();
        assert_eq!(config.amm_program_id, RAYDIUM_AMM_PROGRAM_ID);
        assert!(Path::new(path).exists());

        // Second load reads the file written on first load
        let reloaded = Config::load(path).unwrap();
        assert_eq!(reloaded.rpc_url, config.rpc_url);
    }

    #[test]
    fn empty_rpc_url_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"rpc_url":"","database":{"path":"pools.db"}}"#,
        )
        .unwrap();

        assert!(Config::load(path.to_str().unwrap()).is_err());
    }
}
