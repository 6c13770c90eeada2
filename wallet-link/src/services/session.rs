//! Logged-in account context
//!
//! [`Session`] answers "is a wallet already linked?" from the account info the
//! backend returned when the session was established.

use shared::AccountInfo;
use tracing::debug;

use super::api::{session, ApiClient};
use crate::core::error::LinkError;
use crate::core::service::AccountContext;

/// Snapshot of the logged-in account
#[derive(Debug, Clone, Default)]
pub struct Session {
    account: Option<AccountInfo>,
}

impl Session {
    pub fn new(account: Option<AccountInfo>) -> Self {
        Self { account }
    }

    /// Fetch the session account from the backend.
    pub async fn from_api(client: &ApiClient) -> Result<Self, LinkError> {
        let account = session::get_session_account(client)
            .await
            .map_err(LinkError::BackendRejected)?;

        debug!(
            guid = %account.guid,
            has_wallet = account.eth_wallet.is_some(),
            "Session account loaded"
        );
        Ok(Self::new(Some(account)))
    }

    pub fn account(&self) -> Option<&AccountInfo> {
        self.account.as_ref()
    }
}

impl AccountContext for Session {
    fn linked_wallet_address(&self) -> Option<String> {
        self.account
            .as_ref()
            .and_then(|account| account.eth_wallet.clone())
            .filter(|address| !address.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(eth_wallet: Option<&str>) -> AccountInfo {
        AccountInfo {
            guid: "guid-1".to_string(),
            username: "alice".to_string(),
            eth_wallet: eth_wallet.map(str::to_string),
        }
    }

    #[test]
    fn test_linked_wallet_address() {
        assert_eq!(Session::default().linked_wallet_address(), None);
        assert_eq!(Session::new(Some(account(None))).linked_wallet_address(), None);
        assert_eq!(Session::new(Some(account(Some("")))).linked_wallet_address(), None);
        assert_eq!(
            Session::new(Some(account(Some("0xabc")))).linked_wallet_address(),
            Some("0xabc".to_string())
        );
    }
}
