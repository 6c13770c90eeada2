use serde::{Deserialize, Serialize};

/// Logged-in account information (public, safe to send to client)
///
/// `eth_wallet` carries the wallet address already linked to the account, if any.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountInfo {
    pub guid: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eth_wallet: Option<String>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_without_wallet_omits_field() {
        let account = AccountInfo {
            guid: "1001".to_string(),
            username: "alice".to_string(),
            eth_wallet: None,
        };

        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("eth_wallet").is_none());

        let parsed: AccountInfo =
            serde_json::from_str(r#"{"guid":"1001","username":"alice"}"#).unwrap();
        assert_eq!(parsed, account);
    }
}
