//! # External Wallet Provider
//!
//! [`RpcWalletProvider`] talks to a user-controlled wallet over Ethereum JSON-RPC
//! (desktop wallets and local nodes expose `eth_accounts` on a loopback port).
//!
//! ## Calls
//!
//! - `web3_clientVersion`: readiness probe
//! - `eth_accounts`: the first entry is the active account
//!
//! The provider never creates accounts; the user manages keys in their wallet.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::address::GeneratedAccount;
use crate::core::error::LinkError;
use crate::core::service::WalletProvider;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Wallet provider reached over JSON-RPC
pub struct RpcWalletProvider {
    client: Client,
    endpoint: String,
    next_id: AtomicU64,
    ready_attempts: u32,
    ready_retry_delay: Duration,
    /// Last address answered by `eth_accounts`
    cached: RwLock<Option<String>>,
}

impl RpcWalletProvider {
    /// Create a provider for `endpoint` with the given per-request timeout.
    pub fn new(endpoint: &str, request_timeout: Duration) -> Result<Self, LinkError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| LinkError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            next_id: AtomicU64::new(1),
            ready_attempts: 5,
            ready_retry_delay: Duration::from_millis(500),
            cached: RwLock::new(None),
        })
    }

    /// Override how long [`WalletProvider::ready`] keeps probing.
    pub fn with_ready_retries(mut self, attempts: u32, delay: Duration) -> Self {
        self.ready_attempts = attempts.max(1);
        self.ready_retry_delay = delay;
        self
    }

    async fn call<T: DeserializeOwned>(&self, method: &str) -> Result<T, LinkError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params: Vec::new(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| LinkError::ProviderUnavailable(format!("{}: {}", method, e)))?;

        if !response.status().is_success() {
            return Err(LinkError::ProviderUnavailable(format!(
                "{}: HTTP {}",
                method,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LinkError::ProviderUnavailable(format!("{}: {}", method, e)))?;
        decode_response(method, &body)
    }
}

/// Decode a JSON-RPC response body, surfacing RPC errors as `ProviderUnavailable`.
fn decode_response<T: DeserializeOwned>(method: &str, body: &str) -> Result<T, LinkError> {
    let parsed: RpcResponse<T> = serde_json::from_str(body)
        .map_err(|e| LinkError::ProviderUnavailable(format!("{}: malformed response: {}", method, e)))?;

    if let Some(error) = parsed.error {
        return Err(LinkError::ProviderUnavailable(format!(
            "{}: RPC error {}: {}",
            method, error.code, error.message
        )));
    }

    parsed
        .result
        .ok_or_else(|| LinkError::ProviderUnavailable(format!("{}: response has no result", method)))
}

#[async_trait]
impl WalletProvider for RpcWalletProvider {
    async fn ready(&self) -> Result<(), LinkError> {
        let mut last_error = None;

        for attempt in 1..=self.ready_attempts {
            match self.call::<String>("web3_clientVersion").await {
                Ok(version) => {
                    debug!(endpoint = %self.endpoint, version = %version, "Wallet provider ready");
                    return Ok(());
                }
                Err(e) => {
                    warn!(
                        endpoint = %self.endpoint,
                        attempt = attempt,
                        error = %e,
                        "Wallet provider not ready"
                    );
                    last_error = Some(e);
                }
            }

            if attempt < self.ready_attempts {
                tokio::time::sleep(self.ready_retry_delay).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            LinkError::ProviderUnavailable("wallet provider never became ready".to_string())
        }))
    }

    async fn active_address(&self, force_refresh: bool) -> Result<Option<String>, LinkError> {
        if !force_refresh {
            let cached = self.cached.read().clone();
            if cached.is_some() {
                return Ok(cached);
            }
        }

        let accounts: Vec<String> = self.call("eth_accounts").await?;
        let active = accounts.into_iter().next().filter(|a| !a.is_empty());
        *self.cached.write() = active.clone();
        Ok(active)
    }

    async fn create_local_account(&self, _encrypt: bool) -> Result<GeneratedAccount, LinkError> {
        Err(LinkError::ProviderUnavailable(
            "External wallets manage their own keys; use the local provider to generate one"
                .to_string(),
        ))
    }

    async fn is_using_local_provider(&self) -> Result<bool, LinkError> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 7,
            method: "eth_accounts",
            params: Vec::new(),
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"jsonrpc":"2.0","id":7,"method":"eth_accounts","params":[]}"#
        );
    }

    #[test]
    fn test_decode_accounts() {
        let accounts: Vec<String> = decode_response(
            "eth_accounts",
            r#"{"jsonrpc":"2.0","id":1,"result":["0x1111111111111111111111111111111111111111"]}"#,
        )
        .unwrap();
        assert_eq!(accounts, vec!["0x1111111111111111111111111111111111111111"]);

        let empty: Vec<String> =
            decode_response("eth_accounts", r#"{"jsonrpc":"2.0","id":1,"result":[]}"#).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_decode_rpc_error() {
        let err = decode_response::<Vec<String>>(
            "eth_accounts",
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":4100,"message":"Unauthorized"}}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            LinkError::ProviderUnavailable("eth_accounts: RPC error 4100: Unauthorized".to_string())
        );

        assert!(matches!(
            decode_response::<String>("web3_clientVersion", "not json"),
            Err(LinkError::ProviderUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_unavailable() {
        // Port 9 (discard) on loopback is closed in test environments
        let provider = RpcWalletProvider::new("http://127.0.0.1:9", Duration::from_millis(500))
            .unwrap()
            .with_ready_retries(1, Duration::from_millis(1));

        assert!(matches!(provider.ready().await, Err(LinkError::ProviderUnavailable(_))));
        assert!(!provider.is_using_local_provider().await.unwrap());
        assert!(provider.create_local_account(false).await.is_err());
    }
}
