//! # Services
//!
//! Concrete collaborators of the linking flow.
//!
//! - **[`api`]**: HTTP client for the account settings backend
//! - **[`wallet`]**: In-process key generation (custodial path)
//! - **[`provider`]**: External wallet over JSON-RPC
//! - **[`session`]**: Logged-in account context
//! - **[`export`]**: Artifact delivery to disk
//! - **[`install`]**: Wallet extension install links

pub mod api;
pub mod export;
pub mod install;
pub mod provider;
pub mod session;
pub mod wallet;

pub use api::ApiClient;
pub use export::{private_key_artifact, FileExporter};
pub use install::{open_install_page, Browser};
pub use provider::RpcWalletProvider;
pub use session::Session;
pub use wallet::LocalWalletProvider;
