//! # Link Events
//!
//! Notifications sent from the flow to the front end over a bounded channel.

use crate::app::state::LinkingState;
use crate::core::address::WalletAddress;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// The flow moved to a new state
    StateChanged(LinkingState),
    /// An address is linked to the account and no further setup is needed
    AddressSetupComplete(WalletAddress),
    /// Result of the external provider probe (`true` when an external wallet is present)
    ExternalProviderDetected(bool),
    /// User-visible error message
    Toast(String),
}
