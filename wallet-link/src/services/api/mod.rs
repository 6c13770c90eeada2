//! # Backend API Client Module
//!
//! HTTP client for the account settings backend.
//!
//! ## Module Structure
//!
//! ```text
//! api/
//! ├── mod.rs      - Module exports and documentation
//! ├── client.rs   - ApiClient struct, SettingsBackend implementation
//! ├── session.rs  - Logged-in account endpoint
//! └── wallet.rs   - Wallet settings endpoints (read, set address)
//! ```

pub mod client;
pub mod session;
pub mod wallet;

pub use client::ApiClient;
