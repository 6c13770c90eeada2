//! # Session Endpoint
//!
//! Fetches the logged-in account, including any wallet address already linked.

use reqwest::Method;
use shared::AccountInfo;

use super::client::{error_message, ApiClient};

/// Get the logged-in account.
pub async fn get_session_account(client: &ApiClient) -> Result<AccountInfo, String> {
    let response = client
        .request(Method::GET, "/api/v1/session")
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if response.status().is_success() {
        response
            .json::<AccountInfo>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    } else {
        Err(error_message("Failed to fetch session", response).await)
    }
}
