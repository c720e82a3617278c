use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Number of readings `/query` returns when the config does not say otherwise.
pub const DEFAULT_QUERY_LIMIT: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address for the HTTP server to listen on
    pub http_addr: SocketAddr,
}

#[derive(Debug, Default, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RegistryConfig {
    #[default]
    Memory,
    Sqlite {
        path: PathBuf,
    },
}

#[derive(Debug, Deserialize)]
pub struct QueryConfig {
    /// Maximum number of datapoints served per `/query` call
    pub limit: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_QUERY_LIMIT,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                http_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            },
            registry: RegistryConfig::Memory,
            query: QueryConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sqlite_registry() {
        let config: Config = toml::from_str(
            r#"
            [server]
            http_addr = "127.0.0.1:8080"

            [registry]
            type = "sqlite"
            path = "readings.db"

            [query]
            limit = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.server.http_addr.port(), 8080);
        assert!(matches!(config.registry, RegistryConfig::Sqlite { ref path } if path == Path::new("readings.db")));
        assert_eq!(config.query.limit, 50);
    }

    #[test]
    fn registry_and_query_default_when_omitted() {
        let config: Config = toml::from_str(
            r#"
            [server]
            http_addr = "0.0.0.0:5000"
            "#,
        )
        .unwrap();

        assert!(matches!(config.registry, RegistryConfig::Memory));
        assert_eq!(config.query.limit, DEFAULT_QUERY_LIMIT);
    }
}
