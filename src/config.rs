// config.rs
use thiserror::Error;

use crate::service::geo;

pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 3.0;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{0} has an invalid value: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    // Default search radius for nearby provider lookups
    pub nearby_radius_km: f64,
    pub log_level: String,
}

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::Invalid("DATABASE_MAX_CONNECTIONS", raw)),
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let nearby_radius_km = match lookup("NEARBY_RADIUS_KM") {
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(km) if km >= 0.0 && geo::is_reported_precision(km) => km,
                _ => return Err(ConfigError::Invalid("NEARBY_RADIUS_KM", raw)),
            },
            None => DEFAULT_NEARBY_RADIUS_KM,
        };

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "debug".to_string());
        if log_level.parse::<tracing_subscriber::filter::LevelFilter>().is_err() {
            return Err(ConfigError::Invalid("LOG_LEVEL", log_level));
        }

        Ok(Config {
            database_url,
            max_connections,
            nearby_radius_km,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/servicehub")])).unwrap();
        assert_eq!(config.database_url, "postgres://localhost/servicehub");
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.nearby_radius_km, DEFAULT_NEARBY_RADIUS_KM);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_missing_database_url() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn test_radius_override() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/servicehub"),
            ("NEARBY_RADIUS_KM", "5.5"),
            ("LOG_LEVEL", "info"),
        ]))
        .unwrap();
        assert_eq!(config.nearby_radius_km, 5.5);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/servicehub"),
            ("NEARBY_RADIUS_KM", "-1"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("NEARBY_RADIUS_KM", "-1".to_string()));

        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/servicehub"),
            ("NEARBY_RADIUS_KM", "2.505"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("NEARBY_RADIUS_KM", "2.505".to_string()));

        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/servicehub"),
            ("DATABASE_MAX_CONNECTIONS", "zero"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("DATABASE_MAX_CONNECTIONS", "zero".to_string()));

        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/servicehub"),
            ("LOG_LEVEL", "loud"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("LOG_LEVEL", "loud".to_string()));
    }
}
