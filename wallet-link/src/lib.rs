//! # Wallet Link - Library Root
//!
//! Links exactly one EVM wallet address to a user's account settings.
//! This library crate contains all modules used by the binary crate (`main.rs`).
//!
//! ## Features
//!
//! - **Custodial addresses**: Generate a secp256k1 key pair locally, register the
//!   address, then export the private key once
//! - **External wallets**: Detect the active address of a wallet exposed over JSON-RPC
//! - **Manual entry**: Validate and register an address typed by the user
//! - **Recoverable failures**: Backend rejections roll the flow back and notify the user
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              wallet-link (this crate)                  │
//! ├────────────────────────────────────────────────────────┤
//! │  Tokio         - Async runtime, polling timers         │
//! │  Reqwest       - HTTP client (backend + JSON-RPC)      │
//! │  k256 / sha3   - Key generation, address derivation    │
//! │  tracing       - Structured logging                    │
//! └────────────────────────────────────────────────────────┘
//!          │                              │
//!          │ HTTP                         │ JSON-RPC
//!          ▼                              ▼
//! ┌─────────────────┐          ┌─────────────────────────┐
//! │  Settings API   │          │   External wallet       │
//! │  (backend)      │          │   (eth_accounts)        │
//! └─────────────────┘          └─────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - **app**: The [`LinkingFlow`] state machine, its events, form and polling
//! - **core**: Address types, errors and collaborator traits
//! - **services**: Concrete collaborators
//!   - `api`: Settings backend HTTP client
//!   - `wallet`: Local key generation
//!   - `provider`: External wallet over JSON-RPC
//!   - `session`: Logged-in account context
//!   - `export`: Private key artifact delivery
//!   - `install`: Wallet extension install links
//! - **config**: [`LinkConfig`] loaded from the environment
//! - **debug**: Logging setup and task tracking
//! - **utils**: Input validation
//!
//! ### Module Dependency Graph
//!
//! ```text
//! main.rs
//!   │
//!   ├── config, debug
//!   │
//!   └── app::LinkingFlow
//!         ├── core::service traits ◀── services::* implementations
//!         ├── core::address (WalletAddress, GeneratedAccount)
//!         └── utils::validation
//! ```
//!
//! ## Core Concepts
//!
//! ### Registration Before Linked
//!
//! The flow only reports [`LinkingState::Linked`] after the backend confirmed the
//! address. A rejected registration restores the previous state and emits a
//! [`LinkEvent::Toast`].
//!
//! ### Key Material
//!
//! Generated private keys live in a zeroize-on-drop buffer owned by the flow and
//! are released as soon as the export is attempted, whatever its outcome.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wallet_link::{LinkConfig, LinkingFlow};
//! use wallet_link::services::{ApiClient, FileExporter, LocalWalletProvider, Session};
//!
//! let config = LinkConfig::from_env()?;
//! let api = Arc::new(ApiClient::new(&config)?);
//! let session = Session::from_api(&api).await?;
//! let flow = LinkingFlow::new(
//!     config.clone(),
//!     Arc::new(LocalWalletProvider::new()),
//!     api,
//!     Arc::new(session),
//!     Arc::new(FileExporter::new(&config.export_dir)),
//! );
//!
//! flow.initialize().await?;
//! if !flow.state().is_linked() {
//!     flow.create_custodial_address().await?;
//!     flow.export_private_key().await?;
//! }
//! ```

pub mod app;
pub mod config;
pub mod core;
pub mod debug;
pub mod services;
pub mod utils;

pub use app::{LinkEvent, LinkingFlow, LinkingState};
pub use config::LinkConfig;
pub use self::core::{LinkError, Result, WalletAddress};
