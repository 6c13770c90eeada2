//! # Service Traits
//!
//! Collaborator traits injected into [`crate::app::LinkingFlow`], enabling
//! dependency injection and mocking in tests.
//!
//! | Trait                | Production implementation                         |
//! |----------------------|---------------------------------------------------|
//! | [`WalletProvider`]   | `LocalWalletProvider`, `RpcWalletProvider`        |
//! | [`SettingsBackend`]  | `ApiClient`                                       |
//! | [`AccountContext`]   | `Session`                                         |
//! | [`ArtifactExporter`] | `FileExporter`                                    |

use async_trait::async_trait;
use shared::WalletSettingsResponse;
use zeroize::Zeroizing;

use super::address::{GeneratedAccount, WalletAddress};
use super::error::LinkError;

/// Wallet provider operations
///
/// The provider owns every cryptographic concern; the flow only sequences calls.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Resolve once the provider is able to answer address queries.
    async fn ready(&self) -> Result<(), LinkError>;

    /// Address of the provider's active account, or `None` when locked/empty.
    ///
    /// The value is returned unvalidated; the flow checks its format.
    async fn active_address(&self, force_refresh: bool) -> Result<Option<String>, LinkError>;

    /// Generate a new key pair held by this client.
    async fn create_local_account(&self, encrypt: bool) -> Result<GeneratedAccount, LinkError>;

    /// Whether the provider is the in-process local one rather than an external wallet.
    async fn is_using_local_provider(&self) -> Result<bool, LinkError>;
}

/// Account settings backend
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    /// Idempotent upsert of the account's linked wallet address.
    async fn set_wallet_address(&self, address: &WalletAddress) -> Result<(), LinkError>;

    /// Current wallet settings of the account.
    async fn wallet_settings(&self) -> Result<WalletSettingsResponse, LinkError>;
}

/// Read-only view of the logged-in account
pub trait AccountContext: Send + Sync {
    /// The wallet address already configured on the account, if any.
    fn linked_wallet_address(&self) -> Option<String>;
}

/// A file to be handed to the user.
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Zeroizing<Vec<u8>>,
}

impl std::fmt::Debug for ExportArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportArtifact")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Delivers export artifacts to the user through the platform's native mechanism.
#[async_trait]
pub trait ArtifactExporter: Send + Sync {
    /// Deliver `artifact`. Returns a human-readable location on success.
    async fn deliver(&self, artifact: &ExportArtifact) -> Result<String, LinkError>;
}
