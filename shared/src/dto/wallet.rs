//! # Wallet Settings Data Transfer Objects
//!
//! Request and response structures for the account wallet settings endpoints.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/v2/blockchain/wallet`.
///
/// The backend treats this as an idempotent upsert of the account's linked address.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetWalletRequest {
    pub address: String,
}

/// Response after setting the wallet address
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetWalletResponse {
    pub status: String,
}

/// Where on-chain payouts for the account are received
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReceiverInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Response of `GET /api/v2/wallet`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletSettingsResponse {
    #[serde(default)]
    pub receiver: ReceiverInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
}

impl WalletSettingsResponse {
    /// The receiver address, treating an empty string the same as an absent one.
    pub fn receiver_address(&self) -> Option<&str> {
        self.receiver
            .address
            .as_deref()
            .filter(|address| !address.is_empty())
    }
}
