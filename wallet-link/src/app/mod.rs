//! # Linking Flow
//!
//! The [`LinkingFlow`] orchestrates address acquisition and reports progress to
//! the front end as [`LinkEvent`]s.
//!
//! ```text
//! ┌──────────────────────────────┐        LinkEvent         ┌──────────────┐
//! │  LinkingFlow                 │ ──── async_channel ─────▶ │  Front end   │
//! │  - initialize()              │         (bounded)        │  (CLI, UI)   │
//! │  - create_custodial_address()│                          └──────┬───────┘
//! │  - export_private_key()      │ ◀──────── calls ───────────────┘
//! │  - submit_provided_address() │
//! │  - begin_external_detection()│──▶ external_detection task (PollingHandle)
//! │  - teardown()                │
//! └──────────────┬───────────────┘
//!                │ trait objects
//!   WalletProvider · SettingsBackend · AccountContext · ArtifactExporter
//! ```
//!
//! ## Modules
//!
//! - **[`flow`]**: The flow itself
//! - **[`state`]**: [`LinkingState`]
//! - **[`events`]**: [`LinkEvent`]
//! - **[`form`]**: Manual entry form with its validators
//! - **[`polling`]**: Cancellable bounded polling

pub mod events;
pub mod flow;
pub mod form;
pub mod polling;
pub mod state;


pub use events::LinkEvent;
pub use flow::{LinkingFlow, EVENT_CAPACITY};
pub use form::AddressForm;
pub use polling::{CancelToken, PollSchedule, PollingHandle};
pub use state::LinkingState;
