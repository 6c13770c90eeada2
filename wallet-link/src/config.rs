//! Linking flow configuration from environment variables
//!
//! Everything the flow used to read from ambient globals (API location, polling
//! cadence, export location) is carried here and passed in at construction.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::LinkError;

/// Default backend base URL
const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";

/// Default external wallet JSON-RPC endpoint
const DEFAULT_PROVIDER_RPC_URL: &str = "http://127.0.0.1:1248";

#[derive(Clone, Debug, PartialEq)]
pub struct LinkConfig {
    /// Settings backend base URL (no trailing slash)
    pub api_base_url: String,
    /// Bearer token for the backend session, if the backend requires one
    pub api_token: Option<String>,
    /// Per-request timeout enforced by the HTTP client
    pub request_timeout: Duration,
    /// External wallet JSON-RPC endpoint
    pub provider_rpc_url: String,
    /// Interval between external address samples
    pub poll_interval: Duration,
    /// Samples taken before external detection gives up
    pub max_poll_attempts: u32,
    /// Ask the provider to encrypt generated key material
    pub encrypt_generated_keys: bool,
    /// Directory receiving exported private key artifacts
    pub export_dir: PathBuf,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            request_timeout: Duration::from_secs(10),
            provider_rpc_url: DEFAULT_PROVIDER_RPC_URL.to_string(),
            poll_interval: Duration::from_secs(1),
            max_poll_attempts: 300,
            encrypt_generated_keys: false,
            export_dir: PathBuf::from("exports"),
        }
    }
}

impl LinkConfig {
    /// Load configuration from environment variables
    ///
    /// | Variable                        | Default                  |
    /// |---------------------------------|--------------------------|
    /// | `WALLET_LINK_API_URL`           | `http://127.0.0.1:8080`  |
    /// | `WALLET_LINK_API_TOKEN`         | unset                    |
    /// | `WALLET_LINK_REQUEST_TIMEOUT_MS`| `10000`                  |
    /// | `WALLET_LINK_PROVIDER_RPC_URL`  | `http://127.0.0.1:1248`  |
    /// | `WALLET_LINK_POLL_INTERVAL_MS`  | `1000`                   |
    /// | `WALLET_LINK_MAX_POLL_ATTEMPTS` | `300`                    |
    /// | `WALLET_LINK_ENCRYPT_KEYS`      | `0`                      |
    /// | `WALLET_LINK_EXPORT_DIR`        | `exports`                |
    pub fn from_env() -> Result<Self, LinkError> {
        let defaults = Self::default();

        let api_base_url = env::var("WALLET_LINK_API_URL")
            .unwrap_or(defaults.api_base_url)
            .trim_end_matches('/')
            .to_string();

        let api_token = env::var("WALLET_LINK_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        let request_timeout = match env::var("WALLET_LINK_REQUEST_TIMEOUT_MS") {
            Ok(raw) => Duration::from_millis(parse_number(&raw, "WALLET_LINK_REQUEST_TIMEOUT_MS")?),
            Err(_) => defaults.request_timeout,
        };

        let provider_rpc_url =
            env::var("WALLET_LINK_PROVIDER_RPC_URL").unwrap_or(defaults.provider_rpc_url);

        let poll_interval = match env::var("WALLET_LINK_POLL_INTERVAL_MS") {
            Ok(raw) => Duration::from_millis(parse_number(&raw, "WALLET_LINK_POLL_INTERVAL_MS")?),
            Err(_) => defaults.poll_interval,
        };

        let max_poll_attempts = match env::var("WALLET_LINK_MAX_POLL_ATTEMPTS") {
            Ok(raw) => parse_number::<u32>(&raw, "WALLET_LINK_MAX_POLL_ATTEMPTS")?,
            Err(_) => defaults.max_poll_attempts,
        };

        let encrypt_generated_keys = env::var("WALLET_LINK_ENCRYPT_KEYS")
            .map(|v| v == "1")
            .unwrap_or(defaults.encrypt_generated_keys);

        let export_dir = env::var("WALLET_LINK_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.export_dir);

        let config = Self {
            api_base_url,
            api_token,
            request_timeout,
            provider_rpc_url,
            poll_interval,
            max_poll_attempts,
            encrypt_generated_keys,
            export_dir,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LinkError> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(LinkError::Config(
                "WALLET_LINK_API_URL must be an http(s) URL".to_string(),
            ));
        }

        if !self.provider_rpc_url.starts_with("http://")
            && !self.provider_rpc_url.starts_with("https://")
        {
            return Err(LinkError::Config(
                "WALLET_LINK_PROVIDER_RPC_URL must be an http(s) URL".to_string(),
            ));
        }

        if self.poll_interval < Duration::from_millis(50) {
            return Err(LinkError::Config(
                "WALLET_LINK_POLL_INTERVAL_MS must be at least 50".to_string(),
            ));
        }

        if self.max_poll_attempts == 0 {
            return Err(LinkError::Config(
                "WALLET_LINK_MAX_POLL_ATTEMPTS must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(LinkError::Config(
                "WALLET_LINK_REQUEST_TIMEOUT_MS must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Upper bound on how long external detection may run.
    pub fn max_detection_time(&self) -> Duration {
        self.poll_interval
            .checked_mul(self.max_poll_attempts)
            .unwrap_or(Duration::MAX)
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, name: &str) -> Result<T, LinkError> {
    raw.trim()
        .parse()
        .map_err(|_| LinkError::Config(format!("{} must be a valid number", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = LinkConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.max_detection_time(), Duration::from_secs(300));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = LinkConfig {
            api_base_url: "ftp://example.com".to_string(),
            ..LinkConfig::default()
        };
        assert!(matches!(config.validate(), Err(LinkError::Config(_))));

        let config = LinkConfig {
            max_poll_attempts: 0,
            ..LinkConfig::default()
        };
        assert!(matches!(config.validate(), Err(LinkError::Config(_))));

        let config = LinkConfig {
            poll_interval: Duration::from_millis(1),
            ..LinkConfig::default()
        };
        assert!(matches!(config.validate(), Err(LinkError::Config(_))));
    }

    #[test]
    fn test_max_detection_time_saturates() {
        let config = LinkConfig {
            poll_interval: Duration::from_secs(u64::MAX),
            max_poll_attempts: 2,
            ..LinkConfig::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.max_detection_time(), Duration::MAX);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number::<u32>(" 42 ", "X").unwrap(), 42);
        assert!(parse_number::<u32>("-1", "X").is_err());
    }
}
