//! # Diagnostics
//!
//! Logging setup and background task tracking.
//!
//! - **File logging**: `logs/wallet-link.log` with daily rotation
//! - **Stderr logging**: optional, for interactive CLI use
//! - **Task tracking**: lifecycle logs for spawned background tasks
//!
//! ## Configuration
//!
//! - `RUST_LOG`: Log level filter (e.g., `wallet_link=debug,info`)
//! - `WALLET_LINK_LOG_DIR`: Log directory (default: `logs`)
//! - `WALLET_LINK_LOG_STDERR`: Also log to stderr (1=on, 0=off)
//! - `WALLET_LINK_LOG_JSON`: Write the log file as JSON lines (1=on, 0=off)

pub mod config;
pub mod logger;
pub mod task_tracker;

pub use config::DebugConfig;
pub use logger::init as init_logger;
pub use task_tracker::{active_task_count, spawn_tracked};

/// Initialize diagnostics from the environment
///
/// Call once at startup, before the flow is constructed.
pub fn init() {
    init_logger(&DebugConfig::from_env());
}
