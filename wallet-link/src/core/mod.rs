//! # Core Abstractions
//!
//! Core types, traits and errors shared by the linking flow and its collaborators.
//!
//! ## Modules
//!
//! - **[`address`]**: [`WalletAddress`] and the ephemeral [`GeneratedAccount`]
//! - **[`error`]**: Error taxonomy (`LinkError`, `Result<T>`)
//! - **[`service`]**: Collaborator traits for dependency injection
//!
//! ## Dependency Injection
//!
//! Every collaborator of the flow is a trait object, so tests swap in mocks:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wallet_link::core::service::{SettingsBackend, WalletProvider};
//!
//! // In production: real implementations
//! let backend: Arc<dyn SettingsBackend> = Arc::new(ApiClient::new(&config)?);
//! let provider: Arc<dyn WalletProvider> = Arc::new(LocalWalletProvider::new());
//!
//! // In tests: mock implementations
//! let backend: Arc<dyn SettingsBackend> = Arc::new(MockBackend::default());
//! ```

pub mod address;
pub mod error;
pub mod service;

pub use address::{GeneratedAccount, WalletAddress};
pub use error::{LinkError, Result};
pub use service::{AccountContext, ArtifactExporter, ExportArtifact, SettingsBackend, WalletProvider};
