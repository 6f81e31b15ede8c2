use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::proximity::{DEFAULT_RADIUS_KM, MAX_RADIUS_KM};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub schedule: ScheduleSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_catalog_ttl")]
    pub catalog_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            catalog_ttl_secs: default_catalog_ttl(),
        }
    }
}

fn default_catalog_ttl() -> u64 { 60 }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_radius")]
    pub default_radius_km: f64,
    #[serde(default = "default_max_radius")]
    pub max_radius_km: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_radius_km: default_radius(),
            max_radius_km: default_max_radius(),
        }
    }
}

fn default_radius() -> f64 { DEFAULT_RADIUS_KM }
fn default_max_radius() -> f64 { MAX_RADIUS_KM }

/// Time zone used for open/closed status
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleSettings {
    /// Fixed offset from UTC in minutes; server local time when unset
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with NEARBUY__)
    /// 5. DATABASE_URL, if set
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., NEARBUY__SERVER__PORT -> server.port
            .add_source(environment());

        if let Ok(database_url) = std::env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let search = &self.search;
        if !(search.default_radius_km > 0.0) || !(search.max_radius_km >= search.default_radius_km) {
            return Err(ConfigError::Message(format!(
                "search radii must satisfy 0 < default_radius_km ({}) <= max_radius_km ({})",
                search.default_radius_km, search.max_radius_km
            )));
        }

        if let Some(minutes) = self.schedule.utc_offset_minutes {
            if self.schedule.utc_offset().is_none() {
                return Err(ConfigError::Message(format!(
                    "schedule.utc_offset_minutes out of range: {}",
                    minutes
                )));
            }
        }

        Ok(())
    }
}

impl ScheduleSettings {
    /// Configured offset, if any and valid
    pub fn utc_offset(&self) -> Option<chrono::FixedOffset> {
        self.utc_offset_minutes
            .and_then(|minutes| minutes.checked_mul(60))
            .and_then(chrono::FixedOffset::east_opt)
    }
}

fn environment() -> Environment {
    Environment::with_prefix("NEARBUY")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
