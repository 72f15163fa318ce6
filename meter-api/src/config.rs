use serde::Deserialize;
use std::{fs, io, path::Path};

use anyhow::{ensure, Context};

pub const CONFIG_PATH_ENV: &str = "METER_API_CONFIG";
pub const HOST_ENV: &str = "METER_API_HOST";
pub const PORT_ENV: &str = "METER_API_PORT";

const DEFAULT_CONFIG_PATH: &str = "meter-api.toml";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7777,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
    pub size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            size: meter_core::catalog::DEFAULT_CATALOG_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Per client address, per one-second window.
    pub requests_per_second: u32,
    pub max_range_minutes: i64,
    /// Artificial latency added to data endpoints to mimic a real backend.
    pub response_delay_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 20,
            max_range_minutes: 1440,
            response_delay_ms: 100,
        }
    }
}

impl LimitsConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.max_range_minutes > 0,
            "limits.max_range_minutes must be positive, got {}",
            self.max_range_minutes
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub limits: LimitsConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    /// Reads the TOML file named by `METER_API_CONFIG` (or `meter-api.toml`),
    /// falling back to defaults when it does not exist, then applies the
    /// host/port environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut cfg = Self::from_file(&path)?;

        if let Ok(host) = env::var(HOST_ENV) {
            cfg.server.host = host;
        }
        if let Ok(port) = env::var(PORT_ENV) {
            cfg.server.port = port
                .parse()
                .with_context(|| format!("{PORT_ENV} is not a valid port: {port}"))?;
        }

        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents)
                .with_context(|| format!("failed to parse config file {}", path.display())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("failed to read config file {}", path.display())),
        }
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        cfg.limits.validate()?;
        Ok(cfg)
    }
}
