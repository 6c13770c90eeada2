//! # Linking State
//!
//! Which acquisition path the flow is on.

use std::fmt;

/// Flow state; exactly one is active per flow instance.
///
/// ```text
///                    create_custodial_address          export_private_key
///   AwaitingAddress ──────────────────────────▶ GeneratingCustodial ──────────▶ Linked
///        │   ▲                                                                   ▲
///        │   └─── exhausted / rejected / teardown ───┐                           │
///        │ begin_external_detection                  │                           │
///        └──────────────────────────▶ PendingExternalDetection ──────────────────┘
///                                                      address detected + registered
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinkingState {
    /// No address yet; the user picks a path
    #[default]
    AwaitingAddress,
    /// Address generated and registered, private key awaiting export
    GeneratingCustodial,
    /// Polling the external provider for its active address
    PendingExternalDetection,
    /// Address registered with the backend
    Linked,
}

impl LinkingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkingState::AwaitingAddress => "awaiting-address",
            LinkingState::GeneratingCustodial => "generating-custodial",
            LinkingState::PendingExternalDetection => "pending-external-detection",
            LinkingState::Linked => "linked",
        }
    }

    pub fn is_linked(&self) -> bool {
        matches!(self, LinkingState::Linked)
    }
}

impl fmt::Display for LinkingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_and_display() {
        assert_eq!(LinkingState::default(), LinkingState::AwaitingAddress);
        assert_eq!(LinkingState::PendingExternalDetection.to_string(), "pending-external-detection");
        assert!(LinkingState::Linked.is_linked());
        assert!(!LinkingState::GeneratingCustodial.is_linked());
    }
}
