//! # Local Wallet Service
//!
//! In-process wallet provider used for the custodial path.
//!
//! ## Features
//! - Generate new secp256k1 key pairs
//! - Derive the Keccak-256 wallet address of a key
//! - Track the most recently generated account as the active one
//!
//! The provider never stores private keys. The generated key is handed to the
//! caller inside a [`GeneratedAccount`], whose buffer is wiped on drop.

use async_trait::async_trait;
use k256::ecdsa::SigningKey;
use parking_lot::RwLock;
use rand::RngCore;
use tracing::info;
use zeroize::Zeroizing;

use crate::core::address::{GeneratedAccount, WalletAddress};
use crate::core::error::LinkError;
use crate::core::service::WalletProvider;

/// Key generation gives up after this many out-of-range scalars (practically never hit)
const MAX_KEYGEN_ATTEMPTS: usize = 8;

/// Wallet provider backed by keys generated in this process
#[derive(Default)]
pub struct LocalWalletProvider {
    /// Address of the last generated account (the provider's default account)
    active: RwLock<Option<WalletAddress>>,
}

impl LocalWalletProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a new random key pair
    ///
    /// # Returns
    /// The account with its address and private key material
    pub fn generate_account(&self) -> Result<GeneratedAccount, LinkError> {
        let mut rng = rand::rng();

        for _ in 0..MAX_KEYGEN_ATTEMPTS {
            let mut secret = Zeroizing::new([0u8; 32]);
            rng.fill_bytes(&mut secret[..]);

            // Zero and values at or above the curve order are not valid scalars
            let Ok(signing_key) = SigningKey::from_slice(&secret[..]) else {
                continue;
            };

            let account = account_from_signing_key(&signing_key)?;
            *self.active.write() = Some(account.address().clone());
            return Ok(account);
        }

        Err(LinkError::ProviderUnavailable(
            "Failed to generate a valid secp256k1 key".to_string(),
        ))
    }

    /// Address of the most recently generated account
    pub fn active_account(&self) -> Option<WalletAddress> {
        self.active.read().clone()
    }
}

/// Build a [`GeneratedAccount`] from a signing key
pub fn account_from_signing_key(signing_key: &SigningKey) -> Result<GeneratedAccount, LinkError> {
    let encoded = signing_key.verifying_key().to_encoded_point(false);
    let address = WalletAddress::from_uncompressed_public_key(encoded.as_bytes())?;
    let private_key = Zeroizing::new(signing_key.to_bytes().to_vec());
    Ok(GeneratedAccount::new(address, private_key))
}

#[async_trait]
impl WalletProvider for LocalWalletProvider {
    async fn ready(&self) -> Result<(), LinkError> {
        Ok(())
    }

    async fn active_address(&self, _force_refresh: bool) -> Result<Option<String>, LinkError> {
        Ok(self.active_account().map(|address| address.to_string()))
    }

    async fn create_local_account(&self, encrypt: bool) -> Result<GeneratedAccount, LinkError> {
        if encrypt {
            return Err(LinkError::ProviderUnavailable(
                "Encrypted local accounts are not supported by the local provider".to_string(),
            ));
        }

        let account = self.generate_account()?;
        info!(address = %account.address(), "Generated local account");
        Ok(account)
    }

    async fn is_using_local_provider(&self) -> Result<bool, LinkError> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_key_derives_known_address() {
        let secret =
            hex::decode("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80").unwrap();
        let signing_key = SigningKey::from_slice(&secret).unwrap();
        let account = account_from_signing_key(&signing_key).unwrap();

        assert_eq!(
            account.address().to_checksum(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
        assert_eq!(account.private_key(), secret.as_slice());
    }

    #[test]
    fn test_generate_new_account() {
        let provider = LocalWalletProvider::new();
        assert!(provider.active_account().is_none());

        let first = provider.generate_account().unwrap();
        let second = provider.generate_account().unwrap();

        assert_ne!(first.address(), second.address());
        assert_eq!(first.private_key().len(), 32);
        assert_eq!(provider.active_account().as_ref(), Some(second.address()));
    }

    #[tokio::test]
    async fn test_provider_trait_behaviour() {
        let provider = LocalWalletProvider::new();
        provider.ready().await.unwrap();
        assert!(provider.is_using_local_provider().await.unwrap());
        assert_eq!(provider.active_address(true).await.unwrap(), None);

        let account = provider.create_local_account(false).await.unwrap();
        assert_eq!(
            provider.active_address(true).await.unwrap(),
            Some(account.address().to_string())
        );

        assert!(matches!(
            provider.create_local_account(true).await,
            Err(LinkError::ProviderUnavailable(_))
        ));
    }
}
