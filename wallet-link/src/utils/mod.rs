//! # Utility Functions
//!
//! Shared utility functions used across the wallet linking client.
//!
//! ## Modules
//!
//! - **[`validation`]**: Input validation utilities (required fields, address format)
//!
//! ## Related Modules
//!
//! - [`shared::utils`]: Cross-crate utilities (address formatting)
//! - [`crate::core`]: Core abstractions and error types

pub mod validation;
