// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development.

use std::env;
use std::str::FromStr;

/// Where documents live, parsed from `STORE_URL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// `firestore://<project-id>`
    Firestore { project_id: String },
    /// `memory://` (data is lost on restart)
    Memory,
}

impl FromStr for StoreLocation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "memory://" || s == "memory" {
            return Ok(StoreLocation::Memory);
        }
        match s.strip_prefix("firestore://") {
            Some(project_id) if !project_id.is_empty() => Ok(StoreLocation::Firestore {
                project_id: project_id.trim_end_matches('/').to_string(),
            }),
            _ => Err(ConfigError::Invalid("STORE_URL", s.to_string())),
        }
    }
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::Invalid("APP_ENV", other.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Document store location
    pub store: StoreLocation,
    /// Server port
    pub port: u16,
    /// Deployment environment (controls `Secure` cookies)
    pub environment: Environment,

    // --- Secrets ---
    /// JWT signing key for bearer tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// HMAC key for the session cookie (raw bytes)
    pub session_secret: Vec<u8>,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            store: StoreLocation::Memory,
            port: 3000,
            environment: Environment::Development,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            session_secret: b"test_session_secret_32_bytes!!!".to_vec(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            store: env::var("STORE_URL")
                .unwrap_or_else(|_| "memory://".to_string())
                .parse()?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            environment: env::var("APP_ENV")
                .unwrap_or_else(|_| "development".to_string())
                .parse()?,

            jwt_signing_key: required_secret("JWT_SIGNING_KEY")?,
            session_secret: required_secret("SESSION_SECRET")?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn required_secret(name: &'static str) -> Result<Vec<u8>, ConfigError> {
    let value = env::var(name).map_err(|_| ConfigError::Missing(name))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Missing(name));
    }
    Ok(value.as_bytes().to_vec())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required env vars for test
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");
        env::set_var("SESSION_SECRET", "test_session_secret");
        env::set_var("STORE_URL", "firestore://port-office-dev");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.jwt_signing_key, b"test_jwt_key_32_bytes_minimum!!");
        assert_eq!(
            config.store,
            StoreLocation::Firestore {
                project_id: "port-office-dev".to_string()
            }
        );
    }

    #[test]
    fn test_store_location_parsing() {
        assert_eq!("memory://".parse::<StoreLocation>().unwrap(), StoreLocation::Memory);
        assert!("firestore://".parse::<StoreLocation>().is_err());
        assert!("mongodb://localhost".parse::<StoreLocation>().is_err());
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            "Production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert!("staging".parse::<Environment>().is_err());
    }
}
