//! Runtime configuration read from the environment (and `.env` via dotenvy).

use std::env;
use std::net::SocketAddr;

use crate::error::{EarningsError, Result};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://gig_earnings.db?mode=rwc";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_REGISTRY_KEY: &str = "platforms";

/// `DATABASE_URL=memory` keeps everything in process memory (lost on exit).
pub const MEMORY_STORE_URL: &str = "memory";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub registry_key: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|e| {
            EarningsError::Config(format!("BIND_ADDR '{}' is not a socket address: {}", bind_raw, e))
        })?;

        let registry_key = lookup("REGISTRY_KEY")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| DEFAULT_REGISTRY_KEY.to_string());
        if registry_key.is_empty() || registry_key.len() > 100 {
            return Err(EarningsError::Config(
                "REGISTRY_KEY must be between 1 and 100 characters".to_string(),
            ));
        }

        Ok(Self {
            database_url,
            bind_addr,
            registry_key,
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url == MEMORY_STORE_URL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.registry_key, "platforms");
        assert!(!config.uses_memory_store());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "memory"),
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("REGISTRY_KEY", " earnings "),
        ]))
        .unwrap();
        assert!(config.uses_memory_store());
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.registry_key, "earnings");
    }

    #[test]
    fn test_invalid_bind_addr() {
        let result = AppConfig::from_lookup(lookup_from(&[("BIND_ADDR", "localhost")]));
        assert!(matches!(result, Err(EarningsError::Config(_))));
    }

    #[test]
    fn test_empty_registry_key_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[("REGISTRY_KEY", "  ")]));
        assert!(result.is_err());
    }
}
