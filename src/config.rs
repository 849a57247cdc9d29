// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{Result, TodoError};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub pagination: PaginationConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin allowed by CORS, i.e. where the front end is served from.
    pub cors_origin: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub uri: String,
    pub tasks_table: String,
    pub categories_table: String,
    /// 0 retries forever.
    pub max_connect_retries: u32,
    pub retry_base_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaginationConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Layers, lowest first: built-in defaults, the TOML file, `WHATTODO__*`
    /// environment variables. An explicit `path` must exist; the default
    /// `config/default.toml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| TodoError::Config(e.to_string()))?;

        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::from(Path::new("config/default.toml")).required(false),
        };

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("WHATTODO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| TodoError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| TodoError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
                cors_origin: "http://localhost:5173".to_string(),
            },
            database: DatabaseConfig {
                uri: "data/whattodo".to_string(),
                tasks_table: "tasks".to_string(),
                categories_table: "categories".to_string(),
                max_connect_retries: 5,
                retry_base_delay_ms: 2000,
            },
            pagination: PaginationConfig {
                default_limit: 20,
                max_limit: 100,
            },
            client: ClientConfig {
                base_url: "http://localhost:5000".to_string(),
                timeout_secs: 5,
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(TodoError::Config("server.port cannot be 0".to_string()));
        }

        if self.database.uri.trim().is_empty() {
            return Err(TodoError::Config("database.uri is required".to_string()));
        }

        if self.database.tasks_table.trim().is_empty()
            || self.database.categories_table.trim().is_empty()
        {
            return Err(TodoError::Config(
                "table names must not be empty".to_string(),
            ));
        }

        if self.database.tasks_table == self.database.categories_table {
            return Err(TodoError::Config(
                "tasks_table and categories_table must differ".to_string(),
            ));
        }

        if self.pagination.default_limit == 0 {
            return Err(TodoError::Config(
                "pagination.default_limit must be greater than 0".to_string(),
            ));
        }

        if self.pagination.default_limit > self.pagination.max_limit {
            return Err(TodoError::Config(format!(
                "pagination.default_limit ({}) exceeds max_limit ({})",
                self.pagination.default_limit, self.pagination.max_limit
            )));
        }

        if self.client.timeout_secs == 0 {
            return Err(TodoError::Config(
                "client.timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
