use crate::carrier::fmcsa::DEFAULT_BASE_URL;
use std::collections::HashMap;
use std::net::IpAddr;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_path: String,
    pub internal_api_key: String,
    pub fmcsa_api_key: String,
    pub fmcsa_base_url: String,
    pub cors_origins: Vec<String>,
    pub rate_limit_per_minute: u32,
    pub seed_on_startup: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let host = env_map
            .get("HOST")
            .map(|s| s.as_str())
            .unwrap_or("0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|_| {
                ConfigError::InvalidValue("HOST".to_string(), "must be an IP address".to_string())
            })?;

        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let internal_api_key = env_map
            .get("INTERNAL_API_KEY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingEnv("INTERNAL_API_KEY".to_string()))?;

        let fmcsa_api_key = env_map
            .get("FMCSA_API_KEY")
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        let fmcsa_base_url = env_map
            .get("FMCSA_BASE_URL")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let cors_origins = match env_map.get("CORS_ORIGINS") {
            Some(raw) => parse_cors_origins(raw)?,
            None => vec!["http://localhost:3000".to_string()],
        };

        let rate_limit_per_minute = env_map
            .get("RATE_LIMIT_PER_MINUTE")
            .map(|s| s.as_str())
            .unwrap_or("120")
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "RATE_LIMIT_PER_MINUTE".to_string(),
                    "must be a positive integer".to_string(),
                )
            })?;

        let seed_on_startup = match env_map
            .get("SEED_ON_STARTUP")
            .map(|s| s.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("true") | Some("1") | Some("yes") => true,
            Some("false") | Some("0") | Some("no") => false,
            Some(other) => {
                return Err(ConfigError::InvalidValue(
                    "SEED_ON_STARTUP".to_string(),
                    format!("must be true or false, got {}", other),
                ))
            }
        };

        Ok(Config {
            host,
            port,
            database_path,
            internal_api_key,
            fmcsa_api_key,
            fmcsa_base_url,
            cors_origins,
            rate_limit_per_minute,
            seed_on_startup,
        })
    }
}

/// Accepts `a,b` or a JSON array `["a", "b"]`.
fn parse_cors_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    let trimmed = raw.trim();
    let origins: Vec<String> = if trimmed.starts_with('[') {
        serde_json::from_str::<Vec<String>>(trimmed).map_err(|e| {
            ConfigError::InvalidValue("CORS_ORIGINS".to_string(), format!("invalid JSON: {}", e))
        })?
    } else {
        trimmed.split(',').map(str::to_string).collect()
    };

    Ok(origins
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}
