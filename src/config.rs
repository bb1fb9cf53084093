//! Runtime configuration, read from the environment.

use anyhow::{Context, Result};
use std::net::SocketAddr;

use crate::constants::{
    ADDR_KEY, DATABASE_MAX_CONNECTIONS_KEY, DATABASE_URL_KEY, DEFAULT_ADDR,
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_DATABASE_URL,
};

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SQLite connection URL. The database file is created if it does not exist.
    pub database_url: String,
    /// Address to bind to.
    pub addr: SocketAddr,
    /// Upper bound on pooled store connections.
    pub max_connections: u32,
}

impl Config {
    /// Build a config from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup, falling back to defaults for missing keys.
    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup(DATABASE_URL_KEY).unwrap_or_else(|| DEFAULT_DATABASE_URL.into());

        let addr = lookup(ADDR_KEY)
            .unwrap_or_else(|| DEFAULT_ADDR.into())
            .parse()
            .with_context(|| format!("{} is not a valid socket address", ADDR_KEY))?;

        let max_connections = match lookup(DATABASE_MAX_CONNECTIONS_KEY) {
            Some(raw) => raw.parse::<u32>().with_context(|| {
                format!("{} must be a positive integer", DATABASE_MAX_CONNECTIONS_KEY)
            })?,
            None => DEFAULT_DATABASE_MAX_CONNECTIONS,
        };
        if max_connections == 0 {
            anyhow::bail!("{} must be a positive integer", DATABASE_MAX_CONNECTIONS_KEY);
        }

        Ok(Config {
            database_url,
            addr,
            max_connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = Config::from_lookup(lookup_in(&[])).unwrap();

        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.addr, DEFAULT_ADDR.parse().unwrap());
        assert_eq!(config.max_connections, DEFAULT_DATABASE_MAX_CONNECTIONS);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::from_lookup(lookup_in(&[
            (DATABASE_URL_KEY, "sqlite://other.db"),
            (ADDR_KEY, "0.0.0.0:9000"),
            (DATABASE_MAX_CONNECTIONS_KEY, "2"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "sqlite://other.db");
        assert_eq!(config.addr, "0.0.0.0:9000".parse().unwrap());
        assert_eq!(config.max_connections, 2);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(Config::from_lookup(lookup_in(&[(ADDR_KEY, "not an address")])).is_err());
        assert!(Config::from_lookup(lookup_in(&[(DATABASE_MAX_CONNECTIONS_KEY, "many")])).is_err());
        assert!(Config::from_lookup(lookup_in(&[(DATABASE_MAX_CONNECTIONS_KEY, "0")])).is_err());
    }
}
