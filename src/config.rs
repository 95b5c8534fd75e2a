//! Service configuration from the environment

use std::time::Duration;
use thiserror::Error;

use crate::source::{resilient::DEFAULT_REMOTE_TIMEOUT, DEFAULT_SIMILAR_LIMIT, MAX_SIMILAR_LIMIT};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required for the {1} catalog backend")]
    Missing(&'static str, &'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Where the remote tier of the catalog lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Postgres { url: String, max_connections: u32 },
    Rest { url: String, api_key: Option<String> },
    /// Bundled data only.
    Static,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub backend: Backend,
    pub remote_timeout: Duration,
    pub similar_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = parse_or(&lookup, "PORT", 8083)?;
        let remote_timeout = Duration::from_millis(parse_or(&lookup, "CATALOG_TIMEOUT_MS", DEFAULT_REMOTE_TIMEOUT.as_millis() as u64)?);
        let similar_limit = parse_or(&lookup, "SIMILAR_LIMIT", DEFAULT_SIMILAR_LIMIT)?;
        if !(1..=MAX_SIMILAR_LIMIT).contains(&similar_limit) {
            return Err(ConfigError::Invalid { name: "SIMILAR_LIMIT", value: similar_limit.to_string() });
        }

        let database_url = lookup("DATABASE_URL");
        let kind = lookup("CATALOG_BACKEND")
            .unwrap_or_else(|| if database_url.is_some() { "postgres".into() } else { "static".into() });
        let backend = match kind.as_str() {
            "postgres" => Backend::Postgres {
                url: database_url.ok_or(ConfigError::Missing("DATABASE_URL", "postgres"))?,
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            },
            "rest" => Backend::Rest {
                url: lookup("CATALOG_REST_URL").ok_or(ConfigError::Missing("CATALOG_REST_URL", "rest"))?,
                api_key: lookup("CATALOG_API_KEY"),
            },
            "static" => Backend::Static,
            _ => return Err(ConfigError::Invalid { name: "CATALOG_BACKEND", value: kind }),
        };

        Ok(Self { port, backend, remote_timeout, similar_limit })
    }
}

fn parse_or<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &'static str, default: T) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let c = config(&[]).unwrap();
        assert_eq!(c.port, 8083);
        assert_eq!(c.backend, Backend::Static);
        assert_eq!(c.remote_timeout, Duration::from_secs(5));
        assert_eq!(c.similar_limit, 4);
    }

    #[test]
    fn test_database_url_implies_postgres() {
        let c = config(&[("DATABASE_URL", "postgres://localhost/shop")]).unwrap();
        assert_eq!(c.backend, Backend::Postgres { url: "postgres://localhost/shop".into(), max_connections: 10 });
    }

    #[test]
    fn test_rest_backend() {
        let c = config(&[("CATALOG_BACKEND", "rest"), ("CATALOG_REST_URL", "https://x.supabase.co"), ("CATALOG_TIMEOUT_MS", "1500")]).unwrap();
        assert_eq!(c.backend, Backend::Rest { url: "https://x.supabase.co".into(), api_key: None });
        assert_eq!(c.remote_timeout, Duration::from_millis(1500));
        assert_eq!(config(&[("CATALOG_BACKEND", "rest")]), Err(ConfigError::Missing("CATALOG_REST_URL", "rest")));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(config(&[("PORT", "eighty")]), Err(ConfigError::Invalid { name: "PORT", .. })));
        assert!(matches!(config(&[("CATALOG_BACKEND", "mongo")]), Err(ConfigError::Invalid { name: "CATALOG_BACKEND", .. })));
    }

    #[test]
    fn test_similar_limit_bounds() {
        assert_eq!(config(&[("SIMILAR_LIMIT", "24")]).unwrap().similar_limit, 24);
        assert_eq!(config(&[("SIMILAR_LIMIT", "1")]).unwrap().similar_limit, 1);
        for value in ["0", "25", "10000"] {
            assert_eq!(
                config(&[("SIMILAR_LIMIT", value)]),
                Err(ConfigError::Invalid { name: "SIMILAR_LIMIT", value: value.into() })
            );
        }
    }
}
