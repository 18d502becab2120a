use std::env;
use std::time::Duration;

use crate::types::{
    DEFAULT_ENRICH_CONCURRENCY, DEFAULT_ENRICH_TIMEOUT_SECS, DEFAULT_LOOKBACK_MONTHS,
    DEFAULT_TOP_N,
};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Neo4j
    pub neo4j_uri: String,
    pub neo4j_user: String,
    pub neo4j_password: String,

    // Upstream content services
    pub rec_reads_url: String,
    pub content_api_url: String,
    pub api_key: String,
    pub http_timeout_secs: u64,

    // Web server
    pub api_host: String,
    pub port: u16,

    // Engine tuning
    pub lookback_months: u32,
    pub top_n: usize,
    pub enrich_concurrency: usize,
    pub enrich_timeout_secs: u64,

    // Result cache; `None` means unbounded / never expires
    pub cache_ttl_secs: Option<u64>,
    pub cache_max_entries: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            neo4j_uri: required_env("NEO4J_URI"),
            neo4j_user: required_env("NEO4J_USER"),
            neo4j_password: required_env("NEO4J_PASSWORD"),
            rec_reads_url: required_env("REC_READS_URL"),
            content_api_url: env::var("CONTENT_API_URL")
                .unwrap_or_else(|_| "https://api.ft.com".to_string()),
            api_key: required_env("API_KEY"),
            http_timeout_secs: parsed_env("HTTP_TIMEOUT_SECS").unwrap_or(30),
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parsed_env("PORT").unwrap_or(8000),
            lookback_months: parsed_env("LOOKBACK_MONTHS").unwrap_or(DEFAULT_LOOKBACK_MONTHS),
            top_n: parsed_env("TOP_N").unwrap_or(DEFAULT_TOP_N),
            enrich_concurrency: parsed_env("ENRICH_CONCURRENCY")
                .unwrap_or(DEFAULT_ENRICH_CONCURRENCY),
            enrich_timeout_secs: parsed_env("ENRICH_TIMEOUT_SECS")
                .unwrap_or(DEFAULT_ENRICH_TIMEOUT_SECS),
            cache_ttl_secs: parsed_env("CACHE_TTL_SECS"),
            cache_max_entries: parsed_env("CACHE_MAX_ENTRIES"),
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            lookback_months: self.lookback_months,
            top_n: self.top_n,
            enrich_concurrency: self.enrich_concurrency.max(1),
            enrich_timeout: Duration::from_secs(self.enrich_timeout_secs),
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Engine-wide tuning shared by the query composer, the aggregator and the
/// enricher. Never varies per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub lookback_months: u32,
    pub top_n: usize,
    pub enrich_concurrency: usize,
    pub enrich_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            lookback_months: DEFAULT_LOOKBACK_MONTHS,
            top_n: DEFAULT_TOP_N,
            enrich_concurrency: DEFAULT_ENRICH_CONCURRENCY,
            enrich_timeout: Duration::from_secs(DEFAULT_ENRICH_TIMEOUT_SECS),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| panic!("{key} environment variable is required"))
}

fn parsed_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => panic!("{key} must be a valid number, got {raw:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_use_named_constants() {
        let settings = EngineSettings::default();
        assert_eq!(settings.lookback_months, 3);
        assert_eq!(settings.top_n, 10);
        assert_eq!(settings.enrich_timeout, Duration::from_secs(10));
    }

    #[test]
    fn engine_settings_never_allow_zero_concurrency() {
        let config = Config {
            neo4j_uri: "bolt://localhost:7687".into(),
            neo4j_user: "neo4j".into(),
            neo4j_password: "test".into(),
            rec_reads_url: "http://rec".into(),
            content_api_url: "http://content".into(),
            api_key: "key".into(),
            http_timeout_secs: 30,
            api_host: "0.0.0.0".into(),
            port: 8000,
            lookback_months: 1,
            top_n: 5,
            enrich_concurrency: 0,
            enrich_timeout_secs: 2,
            cache_ttl_secs: None,
            cache_max_entries: None,
        };
        let settings = config.engine_settings();
        assert_eq!(settings.enrich_concurrency, 1);
        assert_eq!(settings.lookback_months, 1);
        assert_eq!(settings.top_n, 5);
    }
}
