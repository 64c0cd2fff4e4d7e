//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::{DEFAULT_CAPACITY, DEFAULT_TTL_MS};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of cached responses
    pub cache_capacity: usize,
    /// Cached response lifetime in milliseconds
    pub cache_ttl_ms: u64,
    /// Result count used by /search when `limit` is absent or invalid
    pub default_search_limit: u32,
    /// Upper bound on the /search result count forwarded upstream
    pub max_search_limit: u32,
    /// Number of candidates requested when resolving a SKU for /prices
    pub price_candidates: u32,
    /// Base URL of the upstream product service
    pub upstream_url: String,
    /// Per-request timeout towards the upstream, in seconds
    pub upstream_timeout_secs: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 4000)
    /// - `CACHE_CAPACITY` - Maximum cached responses (default: 500)
    /// - `CACHE_TTL_MS` - Cache lifetime in milliseconds (default: 600000)
    /// - `SEARCH_DEFAULT_LIMIT` - Default /search result count (default: 5)
    /// - `SEARCH_MAX_LIMIT` - Largest /search result count sent upstream (default: 50)
    /// - `PRICE_CANDIDATES` - Candidates fetched per /prices lookup (default: 3)
    /// - `UPSTREAM_URL` - Upstream product service (default: http://127.0.0.1:4100)
    /// - `UPSTREAM_TIMEOUT_SECS` - Upstream request timeout (default: 30)
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            server_port: parse_var(&lookup, "PORT").unwrap_or(defaults.server_port),
            cache_capacity: parse_var(&lookup, "CACHE_CAPACITY").unwrap_or(defaults.cache_capacity),
            cache_ttl_ms: parse_var(&lookup, "CACHE_TTL_MS").unwrap_or(defaults.cache_ttl_ms),
            default_search_limit: parse_var(&lookup, "SEARCH_DEFAULT_LIMIT")
                .filter(|n: &u32| *n > 0)
                .unwrap_or(defaults.default_search_limit),
            max_search_limit: parse_var(&lookup, "SEARCH_MAX_LIMIT")
                .filter(|n: &u32| *n > 0)
                .unwrap_or(defaults.max_search_limit),
            price_candidates: parse_var(&lookup, "PRICE_CANDIDATES")
                .filter(|n: &u32| *n > 0)
                .unwrap_or(defaults.price_candidates),
            upstream_url: lookup("UPSTREAM_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.upstream_url),
            upstream_timeout_secs: parse_var(&lookup, "UPSTREAM_TIMEOUT_SECS")
                .unwrap_or(defaults.upstream_timeout_secs),
        }
    }
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(name).and_then(|v| v.trim().parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 4000,
            cache_capacity: DEFAULT_CAPACITY,
            cache_ttl_ms: DEFAULT_TTL_MS,
            default_search_limit: 5,
            max_search_limit: 50,
            price_candidates: 3,
            upstream_url: "http://127.0.0.1:4100".to_string(),
            upstream_timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 4000);
        assert_eq!(config.cache_capacity, 500);
        assert_eq!(config.cache_ttl_ms, 600_000);
        assert_eq!(config.default_search_limit, 5);
        assert_eq!(config.max_search_limit, 50);
        assert_eq!(config.price_candidates, 3);
    }

    #[test]
    fn test_config_no_vars_uses_defaults() {
        let config = from_map(&[]);
        assert_eq!(config.server_port, 4000);
        assert_eq!(config.upstream_url, "http://127.0.0.1:4100");
        assert_eq!(config.upstream_timeout_secs, 30);
    }

    #[test]
    fn test_config_overrides() {
        let config = from_map(&[
            ("PORT", "8080"),
            ("CACHE_CAPACITY", "50"),
            ("CACHE_TTL_MS", " 1000 "),
            ("UPSTREAM_URL", "http://sneaks:4100"),
            ("PRICE_CANDIDATES", "5"),
            ("SEARCH_MAX_LIMIT", "20"),
        ]);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.cache_capacity, 50);
        assert_eq!(config.cache_ttl_ms, 1000);
        assert_eq!(config.upstream_url, "http://sneaks:4100");
        assert_eq!(config.price_candidates, 5);
        assert_eq!(config.max_search_limit, 20);
    }

    #[test]
    fn test_config_invalid_values_fall_back() {
        let config = from_map(&[
            ("PORT", "not-a-port"),
            ("SEARCH_DEFAULT_LIMIT", "0"),
            ("PRICE_CANDIDATES", "-3"),
            ("SEARCH_MAX_LIMIT", "0"),
            ("UPSTREAM_URL", "  "),
        ]);
        assert_eq!(config.server_port, 4000);
        assert_eq!(config.default_search_limit, 5);
        assert_eq!(config.price_candidates, 3);
        assert_eq!(config.max_search_limit, 50);
        assert_eq!(config.upstream_url, "http://127.0.0.1:4100");
    }
}
