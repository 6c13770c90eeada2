//! # Wallet Address Types
//!
//! [`WalletAddress`] is the validated 20-byte account identifier the flow links to
//! account settings. [`GeneratedAccount`] is the short-lived custodial key pair
//! that exists between generation and export.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use zeroize::Zeroizing;

use super::error::LinkError;

/// `0x` followed by exactly 40 hex digits, either case.
pub(crate) static ADDRESS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("address pattern is a valid regex")
});

/// A `0x`-prefixed, 40-hex-digit wallet address.
///
/// The textual form is kept exactly as provided so the backend receives the
/// address the user entered. Equality and hashing use the decoded bytes, so
/// comparisons are case-insensitive.
///
/// # Example
///
/// ```rust
/// use wallet_link::core::address::WalletAddress;
///
/// let upper: WalletAddress = "0xABCDEF0000000000000000000000000000000001".parse().unwrap();
/// let lower: WalletAddress = "0xabcdef0000000000000000000000000000000001".parse().unwrap();
/// assert_eq!(upper, lower);
/// assert_eq!(upper.as_str(), "0xABCDEF0000000000000000000000000000000001");
/// assert!("0x123".parse::<WalletAddress>().is_err());
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress {
    text: String,
    bytes: [u8; 20],
}

impl WalletAddress {
    /// Parse an address, rejecting anything that is not `0x` + 40 hex digits.
    pub fn parse(candidate: &str) -> Result<Self, LinkError> {
        if !ADDRESS_PATTERN.is_match(candidate) {
            return Err(LinkError::FormatInvalid(format!(
                "'{}' is not a 0x-prefixed 40 character hex address",
                candidate
            )));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(&candidate[2..], &mut bytes)
            .map_err(|e| LinkError::FormatInvalid(format!("Invalid hex: {}", e)))?;

        Ok(Self {
            text: candidate.to_string(),
            bytes,
        })
    }

    /// Build an address from raw bytes, rendered lowercase.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self {
            text: format!("0x{}", hex::encode(bytes)),
            bytes,
        }
    }

    /// Derive the address of an uncompressed secp256k1 public key
    /// (`0x04 || X || Y`, 65 bytes): the last 20 bytes of Keccak-256 over `X || Y`.
    pub fn from_uncompressed_public_key(public_key: &[u8]) -> Result<Self, LinkError> {
        if public_key.len() != 65 || public_key[0] != 0x04 {
            return Err(LinkError::ProviderUnavailable(
                "unexpected public key encoding".to_string(),
            ));
        }

        let digest = Keccak256::digest(&public_key[1..]);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[12..]);
        Ok(Self::from_bytes(bytes))
    }

    /// The address exactly as it was provided.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The 20 raw address bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.bytes
    }

    /// Lowercase canonical rendering.
    pub fn canonical(&self) -> String {
        format!("0x{}", hex::encode(self.bytes))
    }

    /// EIP-55 mixed-case checksum rendering.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.bytes);
        let hash = Keccak256::digest(lower.as_bytes());

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl PartialEq for WalletAddress {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for WalletAddress {}

impl Hash for WalletAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl FromStr for WalletAddress {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = LinkError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(address: WalletAddress) -> Self {
        address.text
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl fmt::Debug for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WalletAddress").field(&self.text).finish()
    }
}

/// A custodial key pair generated by the client.
///
/// Never persisted. The private key lives in a [`Zeroizing`] buffer that is
/// wiped when the account is dropped, and `Debug` output never includes it.
pub struct GeneratedAccount {
    address: WalletAddress,
    private_key: Zeroizing<Vec<u8>>,
}

impl GeneratedAccount {
    pub fn new(address: WalletAddress, private_key: Zeroizing<Vec<u8>>) -> Self {
        Self {
            address,
            private_key,
        }
    }

    pub fn address(&self) -> &WalletAddress {
        &self.address
    }

    /// Raw private key material.
    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }

    /// `0x`-prefixed hex rendering of the private key, itself zeroized on drop.
    pub fn private_key_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("0x{}", hex::encode(self.private_key.as_slice())))
    }
}

impl fmt::Debug for GeneratedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedAccount")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_accepts_both_cases() {
        let addr = WalletAddress::parse("0xABCDEF0000000000000000000000000000000001").unwrap();
        assert_eq!(addr.as_bytes()[0], 0xab);
        assert_eq!(addr.as_bytes()[19], 0x01);
        assert_eq!(addr.canonical(), "0xabcdef0000000000000000000000000000000001");
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for bad in [
            "",
            "0x",
            "abcdef0000000000000000000000000000000001",
            "0Xabcdef0000000000000000000000000000000001",
            "0xabcdef000000000000000000000000000000001",
            "0xabcdef00000000000000000000000000000000011",
            "0xgbcdef0000000000000000000000000000000001",
            " 0xabcdef0000000000000000000000000000000001",
        ] {
            assert!(
                matches!(WalletAddress::parse(bad), Err(LinkError::FormatInvalid(_))),
                "expected rejection for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_equality_and_hash_ignore_case() {
        let a: WalletAddress = "0x1111111111111111111111111111111111111aBc".parse().unwrap();
        let b: WalletAddress = "0x1111111111111111111111111111111111111ABC".parse().unwrap();
        assert_eq!(a, b);

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_checksum_vectors() {
        // Reference vectors from EIP-55
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let addr = WalletAddress::parse(&expected.to_lowercase()).unwrap();
            assert_eq!(addr.to_checksum(), expected);
        }
    }

    #[test]
    fn test_serde_validates() {
        let addr: WalletAddress =
            serde_json::from_str(r#""0x1111111111111111111111111111111111111111""#).unwrap();
        assert_eq!(
            serde_json::to_string(&addr).unwrap(),
            r#""0x1111111111111111111111111111111111111111""#
        );
        assert!(serde_json::from_str::<WalletAddress>(r#""0x1234""#).is_err());
    }

    #[test]
    fn test_generated_account_debug_is_redacted() {
        let account = GeneratedAccount::new(
            WalletAddress::from_bytes([0x22; 20]),
            Zeroizing::new(vec![0xaa; 32]),
        );
        let debug = format!("{:?}", account);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("aaaa"));
        assert_eq!(account.private_key_hex().len(), 66);
    }
}
