//! # Wallet Settings Endpoints
//!
//! Reads and writes the wallet address linked to the logged-in account.
//!
//! - `GET /api/v2/wallet` - current wallet settings (receiver address)
//! - `POST /api/v2/blockchain/wallet` - set the linked address (idempotent upsert)

use reqwest::Method;
use shared::{SetWalletRequest, SetWalletResponse, WalletSettingsResponse};
use tracing::{debug, warn};

use super::client::{error_message, ApiClient};

/// Get the account's current wallet settings.
pub async fn get_wallet_settings(client: &ApiClient) -> Result<WalletSettingsResponse, String> {
    let response = client
        .request(Method::GET, "/api/v2/wallet")
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.status().is_success() {
        response
            .json::<WalletSettingsResponse>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        Err(error_message("Failed to fetch wallet settings", response).await)
    }
}

/// Link `request.address` to the account.
pub async fn set_wallet(
    client: &ApiClient,
    request: &SetWalletRequest,
) -> Result<SetWalletResponse, String> {
    debug!(address = %request.address, "Registering wallet address with backend");

    let response = client
        .request(Method::POST, "/api/v2/blockchain/wallet")
        .json(request)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.status().is_success() {
        // Some deployments answer 204 with no body; treat that as success too
        let body = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response: {}", e))?;
        if body.trim().is_empty() {
            return Ok(SetWalletResponse {
                status: "success".to_string(),
            });
        }
        let parsed: SetWalletResponse =
            serde_json::from_str(&body).map_err(|e| format!("Failed to parse response: {}", e))?;
        if parsed.status != "success" {
            warn!(status = %parsed.status, "Backend did not confirm wallet address");
            return Err(format!("Backend reported status '{}'", parsed.status));
        }
        Ok(parsed)
    } else {
        Err(error_message("Failed to set wallet address", response).await)
    }
}
