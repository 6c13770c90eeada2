//! # Common Error Types
//!
//! Consolidated error handling for the wallet linking flow.
//!
//! This module provides a centralized error type [`LinkError`] that covers every
//! failure the flow and its collaborators can surface.
//!
//! ## Error Categories
//!
//! - **FormatInvalid**: Client-side address validation failed, submission blocked
//! - **AlreadyInProgress**: A mutating operation was invoked while another is in flight
//! - **ProviderUnavailable**: The wallet provider could not be reached or refused the call
//! - **BackendRejected**: The settings backend failed or refused to store the address
//! - **Export**: The private key artifact could not be delivered
//! - **State**: The operation is not valid in the current linking state
//! - **DetectionExhausted**: External detection ran out of polling attempts
//! - **Config**: Invalid configuration values
//!
//! None of these are fatal; every one is recoverable by a user retry.
//!
//! ## Usage Pattern
//!
//! ```rust,no_run
//! use wallet_link::core::error::LinkError;
//!
//! fn require_address(input: &str) -> Result<&str, LinkError> {
//!     if input.is_empty() {
//!         return Err(LinkError::FormatInvalid("Wallet address is required".to_string()));
//!     }
//!     Ok(input)
//! }
//! ```
//!
//! ## Related Types
//!
//! - [`crate::core::service`]: Collaborator traits returning these errors
//! - [`crate::app::LinkingFlow`]: Maps these errors to user-visible toasts

use thiserror::Error;

/// Error type for every failure in the wallet linking flow.
///
/// The `#[error]` attribute from `thiserror` provides `Display` and `Error`.
///
/// # Example
///
/// ```rust
/// use wallet_link::core::error::LinkError;
///
/// let err = LinkError::BackendRejected("HTTP 500".to_string());
/// assert_eq!(err.to_string(), "Backend rejected wallet address: HTTP 500");
/// assert!(LinkError::AlreadyInProgress.to_string().contains("in progress"));
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LinkError {
    /// Address did not pass the synchronous form validators.
    #[error("Invalid wallet address: {0}")]
    FormatInvalid(String),

    /// A mutating operation is already in flight; the call was rejected, not queued.
    #[error("Another wallet operation is already in progress")]
    AlreadyInProgress,

    /// Wallet provider communication failure.
    ///
    /// Transient during external detection: the next polling tick retries.
    #[error("Wallet provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Settings backend failure.
    ///
    /// Covers network errors, non-2xx responses and malformed bodies.
    #[error("Backend rejected wallet address: {0}")]
    BackendRejected(String),

    /// Private key artifact delivery failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Operation not valid in the current linking state.
    #[error("Invalid state: {0}")]
    State(String),

    /// External detection stopped without seeing an address.
    #[error("No external wallet address detected after {attempts} attempts")]
    DetectionExhausted { attempts: u32 },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LinkError {
    /// Whether retrying the same call later may succeed without user changes.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LinkError::AlreadyInProgress
                | LinkError::ProviderUnavailable(_)
                | LinkError::BackendRejected(_)
                | LinkError::DetectionExhausted { .. }
        )
    }
}

/// Convenience type alias for `Result<T, LinkError>`.
pub type Result<T> = std::result::Result<T, LinkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            LinkError::FormatInvalid("bad".to_string()).to_string(),
            "Invalid wallet address: bad"
        );
        assert_eq!(
            LinkError::DetectionExhausted { attempts: 3 }.to_string(),
            "No external wallet address detected after 3 attempts"
        );
    }

    #[test]
    fn test_retryable_classification() {
        assert!(LinkError::ProviderUnavailable("offline".to_string()).is_retryable());
        assert!(LinkError::BackendRejected("503".to_string()).is_retryable());
        assert!(!LinkError::FormatInvalid("x".to_string()).is_retryable());
        assert!(!LinkError::Config("x".to_string()).is_retryable());
    }
}
