//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the wallet linking client and the
//! account settings backend. All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::account`]**: Session account information and error bodies
//!   - **[`dto::wallet`]**: Wallet settings read/write payloads
//! - **[`utils`]**: Shared utility functions
//!   - **[`utils::format_address`]**: Format wallet addresses for display
//!   - **[`utils::truncate_address`]**: Truncate addresses with ellipsis
//!
//! ## Wire Format
//!
//! All DTOs serialize to JSON using the default `serde` behavior:
//! - Field names use **snake_case** in Rust, which maps to **snake_case** in JSON by default
//! - Optional fields are omitted from JSON when `None` (using `#[serde(skip_serializing_if = "Option::is_none")]`)
//! - All structs implement both `Serialize` and `Deserialize` for bidirectional communication
//!
//! ## Usage in the Client
//!
//! ```rust,no_run
//! use shared::dto::wallet::SetWalletRequest;
//! use shared::utils::truncate_address;
//!
//! let request = SetWalletRequest {
//!     address: "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".to_string(),
//! };
//!
//! let body = serde_json::to_string(&request).unwrap();
//! assert_eq!(truncate_address(&request.address), "0xf39f...2266");
//! # let _ = body;
//! ```

pub mod dto;
pub mod utils;

// Re-export commonly used types for convenience
// Note: Wildcard re-exports are used here since shared is a DTO library
// where all exports are meant to be public API
pub use dto::*;
pub use utils::*;
