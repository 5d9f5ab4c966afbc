// ⚙️ Configuration - environment driven settings for server and client
//
// Unset or invalid values fall back to defaults; invalid ones are logged.

use std::env;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const LISTEN_ADDR_VAR: &str = "DENOMINATION_LISTEN_ADDR";
pub const CORS_ORIGINS_VAR: &str = "DENOMINATION_CORS_ORIGINS";
pub const LOG_FORMAT_VAR: &str = "DENOMINATION_LOG_FORMAT";
pub const API_URL_VAR: &str = "DENOMINATION_API_URL";
pub const TIMEOUT_VAR: &str = "DENOMINATION_TIMEOUT_SECS";

pub const DEFAULT_LISTEN_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 8080));
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// LOG FORMAT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

// ============================================================================
// SERVER CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,

    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,

    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen_addr: DEFAULT_LISTEN_ADDR,
            cors_origins: Vec::new(),
            log_format: LogFormat::Text,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr = lookup(LISTEN_ADDR_VAR)
            .and_then(|raw| parse_or_warn(LISTEN_ADDR_VAR, &raw))
            .unwrap_or(DEFAULT_LISTEN_ADDR);

        let cors_origins = lookup(CORS_ORIGINS_VAR)
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let log_format = lookup(LOG_FORMAT_VAR)
            .and_then(|raw| parse_or_warn(LOG_FORMAT_VAR, &raw))
            .unwrap_or_default();

        ServerConfig {
            listen_addr,
            cors_origins,
            log_format,
        }
    }
}

// ============================================================================
// CLIENT CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the API, without trailing slash
    pub api_url: String,

    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup(API_URL_VAR)
            .map(|raw| raw.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_secs = lookup(TIMEOUT_VAR)
            .and_then(|raw| parse_or_warn::<u64>(TIMEOUT_VAR, &raw))
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        ClientConfig {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

fn parse_or_warn<T>(key: &str, raw: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, value = raw, error = %e, "invalid configuration value, using default");
            None
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::from_lookup(|_| None);
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
        assert_eq!(config.listen_addr.to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_server_from_values() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            (LISTEN_ADDR_VAR, "127.0.0.1:9000"),
            (CORS_ORIGINS_VAR, "http://localhost:4200, https://example.org,"),
            (LOG_FORMAT_VAR, "JSON"),
        ]));

        assert_eq!(config.listen_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:4200".to_string(), "https://example.org".to_string()]
        );
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_server_invalid_values_fall_back() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            (LISTEN_ADDR_VAR, "not-an-address"),
            (LOG_FORMAT_VAR, "yaml"),
        ]));
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_client_config() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (API_URL_VAR, "http://calc.local/api/"),
            (TIMEOUT_VAR, "2"),
        ]));

        assert_eq!(config.api_url, "http://calc.local/api");
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.endpoint("/calculate"), "http://calc.local/api/calculate");
    }

    #[test]
    fn test_client_zero_timeout_falls_back() {
        let config = ClientConfig::from_lookup(lookup_from(&[(TIMEOUT_VAR, "0")]));
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }
}
