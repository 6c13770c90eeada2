//! Diagnostics configuration from environment variables

use std::path::PathBuf;

const DEFAULT_LOG_LEVEL: &str = "wallet_link=info,warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugConfig {
    /// Directory holding the rotated log files
    pub log_dir: PathBuf,
    /// File name prefix of the rotated logs
    pub log_file_prefix: String,
    /// Fallback filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Mirror logs to stderr
    pub log_to_stderr: bool,
    /// Write the log file as JSON lines
    pub json_logs: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            log_file_prefix: "wallet-link.log".to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_to_stderr: false,
            json_logs: false,
        }
    }
}

impl DebugConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            log_dir: std::env::var("WALLET_LINK_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_file_prefix: defaults.log_file_prefix,
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            log_to_stderr: std::env::var("WALLET_LINK_LOG_STDERR")
                .map(|v| v == "1")
                .unwrap_or(defaults.log_to_stderr),
            json_logs: std::env::var("WALLET_LINK_LOG_JSON")
                .map(|v| v == "1")
                .unwrap_or(defaults.json_logs),
        }
    }

    /// Current log file path prefix (rotation appends the date)
    pub fn log_path(&self) -> PathBuf {
        self.log_dir.join(&self.log_file_prefix)
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.log_level.contains("debug") || self.log_level.contains("trace")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = DebugConfig::default();
        assert_eq!(config.log_path(), PathBuf::from("logs/wallet-link.log"));
        assert!(!config.is_debug_enabled());

        let verbose = DebugConfig {
            log_level: "wallet_link=debug".to_string(),
            ..DebugConfig::default()
        };
        assert!(verbose.is_debug_enabled());
    }
}
