use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;
use crate::negotiator::EXPORT_ENDPOINT;

pub const DEFAULT_BASE_URL: &str = "https://directory.bbmri-eric.eu";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub negotiator_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub negotiator_endpoint: String,
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolve the effective configuration. Without an explicit path a
    /// missing `bbdir.json` falls back to defaults; an explicit path must
    /// be readable.
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, DirectoryError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from("bbdir.json"),
        };

        if path.is_none() && !config_path.exists() {
            return Ok(Self::resolve_config(Config::default()));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| DirectoryError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| DirectoryError::ConfigParse(err.to_string()))?;

        Ok(Self::resolve_config(config))
    }

    pub fn resolve_config(config: Config) -> ResolvedConfig {
        ResolvedConfig {
            base_url: config
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            negotiator_endpoint: config
                .negotiator_endpoint
                .unwrap_or_else(|| EXPORT_ENDPOINT.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let resolved = ConfigLoader::resolve_config(Config::default());
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.negotiator_endpoint, EXPORT_ENDPOINT);
    }

    #[test]
    fn explicit_values_win() {
        let config = Config {
            base_url: Some("http://localhost:8080".to_string()),
            negotiator_endpoint: Some("/negotiate".to_string()),
        };
        let resolved = ConfigLoader::resolve_config(config);
        assert_eq!(resolved.base_url, "http://localhost:8080");
        assert_eq!(resolved.negotiator_endpoint, "/negotiate");
    }
}
