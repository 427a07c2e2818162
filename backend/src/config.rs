//! Server configuration: defaults, an optional YAML file, then environment
//! overrides.
//!
//! ```yaml
//! database_url: sqlite:planner.db
//! bind_address: 127.0.0.1:3000
//! allowed_origin: http://localhost:8080
//! log_filter: info,sqlx=warn
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use tracing::debug;

pub const CONFIG_PATH_ENV: &str = "PLANNER_CONFIG";

const DATABASE_URL_ENV: &str = "PLANNER_DATABASE_URL";
const BIND_ADDRESS_ENV: &str = "PLANNER_BIND_ADDRESS";
const ALLOWED_ORIGIN_ENV: &str = "PLANNER_ALLOWED_ORIGIN";
const LOG_FILTER_ENV: &str = "PLANNER_LOG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub database_url: String,
    pub bind_address: String,
    /// Single origin allowed by CORS
    pub allowed_origin: String,
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set
    pub log_filter: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:planner.db".to_string(),
            bind_address: "127.0.0.1:3000".to_string(),
            allowed_origin: "http://localhost:8080".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl PlannerConfig {
    /// Defaults, overlaid by the file at `path` if given, overlaid by the
    /// process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.socket_addr()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: PlannerConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Replace fields whose override variable `lookup` returns a non-empty value for
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let fields = [
            (DATABASE_URL_ENV, &mut self.database_url),
            (BIND_ADDRESS_ENV, &mut self.bind_address),
            (ALLOWED_ORIGIN_ENV, &mut self.allowed_origin),
            (LOG_FILTER_ENV, &mut self.log_filter),
        ];
        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|value| !value.trim().is_empty()) {
                debug!("{} overrides configured value", key);
                *field = value;
            }
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", self.bind_address))
    }
}
