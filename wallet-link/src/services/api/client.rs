//! # API Client
//!
//! Main HTTP client for account settings backend communication.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use shared::{ErrorResponse, SetWalletRequest, WalletSettingsResponse};

use crate::config::LinkConfig;
use crate::core::address::WalletAddress;
use crate::core::error::LinkError;
use crate::core::service::SettingsBackend;

/// HTTP client for communicating with the settings backend.
///
/// Base URL, bearer token and timeout come from [`LinkConfig`]; the client keeps
/// a connection pool for the life of the flow.
pub struct ApiClient {
    pub(crate) client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client from configuration.
    ///
    /// The configured request timeout bounds every backend call.
    pub fn new(config: &LinkConfig) -> Result<Self, LinkError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LinkError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    /// Get the base URL for API requests.
    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a request against `path`, attaching the session token when present.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url(), path);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

/// Turn a non-2xx response into a message, preferring the backend's `ErrorResponse` body.
pub(crate) async fn error_message(context: &str, response: Response) -> String {
    let status = response.status();
    match response.json::<ErrorResponse>().await {
        Ok(body) if !body.error.is_empty() => format!("{}: {} ({})", context, body.error, status),
        _ => format!("{}: {}", context, status),
    }
}

#[async_trait]
impl SettingsBackend for ApiClient {
    async fn set_wallet_address(&self, address: &WalletAddress) -> Result<(), LinkError> {
        let request = SetWalletRequest {
            address: address.as_str().to_string(),
        };
        crate::services::api::wallet::set_wallet(self, &request)
            .await
            .map(|_| ())
            .map_err(LinkError::BackendRejected)
    }

    async fn wallet_settings(&self) -> Result<WalletSettingsResponse, LinkError> {
        crate::services::api::wallet::get_wallet_settings(self)
            .await
            .map_err(LinkError::BackendRejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = LinkConfig {
            api_base_url: "https://api.example.com/".to_string(),
            ..LinkConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "https://api.example.com");
    }

    #[test]
    fn test_request_carries_bearer_token() {
        let config = LinkConfig {
            api_base_url: "https://api.example.com".to_string(),
            api_token: Some("session-token".to_string()),
            ..LinkConfig::default()
        };
        let client = ApiClient::new(&config).unwrap();
        let request = client
            .request(Method::GET, "/api/v2/wallet")
            .build()
            .unwrap();

        assert_eq!(request.url().as_str(), "https://api.example.com/api/v2/wallet");
        assert_eq!(
            request.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer session-token"
        );
    }
}
