//! Server configuration read from environment variables.
//!
//! - `HBNB_API_HOST`: listen host (default: "0.0.0.0")
//! - `HBNB_API_PORT`: listen port (default: "5000")
//! - storage selection, see [`StorageConfig`]

use hbnb_storage::{StorageConfig, StorageError};

pub const HOST_VAR: &str = "HBNB_API_HOST";
pub const PORT_VAR: &str = "HBNB_API_PORT";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("HBNB_API_PORT must be a port number, got '{value}'")]
    InvalidPort { value: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageConfig,
}

impl ServerConfig {
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_VAR).unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup(PORT_VAR) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort { value })?,
            None => 5000,
        };
        let storage = StorageConfig::from_lookup(&lookup)?;
        Ok(ServerConfig {
            host,
            port,
            storage,
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// `host:port`, ready for `TcpListener::bind`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.addr(), "0.0.0.0:5000");
        assert!(matches!(config.storage, StorageConfig::File { .. }));
    }

    #[test]
    fn overrides() {
        let config = ServerConfig::from_lookup(|var| match var {
            "HBNB_API_HOST" => Some("127.0.0.1".into()),
            "HBNB_API_PORT" => Some("8080".into()),
            "HBNB_TYPE_STORAGE" => Some("db".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.addr(), "127.0.0.1:8080");
        assert!(matches!(config.storage, StorageConfig::Database { .. }));
    }

    #[test]
    fn bad_port_is_rejected() {
        let err = ServerConfig::from_lookup(|var| (var == "HBNB_API_PORT").then(|| "http".into()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
    }
}
