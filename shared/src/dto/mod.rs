//! # Data Transfer Objects (DTOs)
//!
//! This module contains all data structures exchanged with the account
//! settings backend via the REST API.
//!
//! ## Module Organization
//!
//! - [`account`] - Session account information and error responses
//! - [`wallet`] - Wallet settings payloads (read current receiver, set address)
//!
//! ## Serialization Format
//!
//! All DTOs use `serde_json` for JSON serialization:
//!
//! - **Field naming**: snake_case (default serde behavior)
//! - **Optional fields**: Omitted when `None` using `#[serde(skip_serializing_if = "Option::is_none")]`
//! - **Missing fields**: Tolerated on read with `#[serde(default)]` where the backend may omit them
//! - **All types**: Implement both `Serialize` and `Deserialize`
//!
//! ## Example JSON Communication
//!
//! ### Request/Response Pair
//!
//! ```text
//! POST /api/v2/blockchain/wallet
//! Content-Type: application/json
//!
//! {
//!   "address": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
//! }
//! ```
//!
//! ```text
//! HTTP/1.1 200 OK
//! Content-Type: application/json
//!
//! {
//!   "status": "success"
//! }
//! ```

pub mod account;
pub mod wallet;

pub use account::*;
pub use wallet::*;
