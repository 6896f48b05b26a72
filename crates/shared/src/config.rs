// ABOUTME: Companion-server settings read from the process environment.
// ABOUTME: HOST, PORT, SERVICE_NAME, SERVICE_VERSION, NODE_ENV and LOG_LEVEL.

use crate::error::SharedError;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SERVICE_NAME: &str = "minitools";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub service_name: String,
    pub service_version: String,
    pub node_env: Option<String>,
    pub log_level: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            service_name: DEFAULT_SERVICE_NAME.into(),
            service_version: env!("CARGO_PKG_VERSION").into(),
            node_env: None,
            log_level: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, SharedError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SharedError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| SharedError::Config(format!("PORT must be a port number, got {raw:?}")))?,
            None => defaults.port,
        };

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            service_name: get("SERVICE_NAME").unwrap_or(defaults.service_name),
            service_version: get("SERVICE_VERSION").unwrap_or(defaults.service_version),
            node_env: get("NODE_ENV"),
            log_level: get("LOG_LEVEL"),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reported environment name; unset means production.
    pub fn environment(&self) -> &str {
        self.node_env.as_deref().unwrap_or("production")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr(), "0.0.0.0:3000");
        assert_eq!(config.environment(), "production");
    }

    #[test]
    fn reads_values() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("SERVICE_NAME", "feed-tools"),
            ("NODE_ENV", "development"),
            ("LOG_LEVEL", " "),
        ]))
        .unwrap();
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert_eq!(config.service_name, "feed-tools");
        assert_eq!(config.environment(), "development");
        assert_eq!(config.log_level, None);
    }

    #[test]
    fn bad_port_is_an_error() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
