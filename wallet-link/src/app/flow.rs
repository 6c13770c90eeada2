//! # Wallet Address Linking Flow
//!
//! Drives one of three ways of getting a wallet address onto the account:
//!
//! 1. **Custodial**: generate a key pair, register its address, export the key
//! 2. **External**: poll an external wallet provider until it reports an address
//! 3. **Manual**: validate and submit an address typed by the user
//!
//! ## Concurrency
//!
//! ```text
//! LinkingFlow (Clone) ──Arc──▶ FlowInner ◀──Weak── external_detection task
//!                               ├─ in_progress: AtomicBool   (one mutating op at a time)
//!                               ├─ state: Mutex<FlowState>   (never held across .await)
//!                               └─ events: async_channel     (bounded, oldest dropped)
//! ```
//!
//! Mutating operations (`create_custodial_address`, `export_private_key`,
//! `submit_provided_address`) take the in-progress flag on entry and are
//! rejected with [`LinkError::AlreadyInProgress`] rather than queued. The flag
//! is released by an RAII guard on every return path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use async_channel::{Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::events::LinkEvent;
use super::form::AddressForm;
use super::polling::{CancelToken, PollSchedule, PollingHandle, Tick, Ticker};
use super::state::LinkingState;
use crate::config::LinkConfig;
use crate::core::address::{GeneratedAccount, WalletAddress};
use crate::core::error::{LinkError, Result};
use crate::core::service::{AccountContext, ArtifactExporter, SettingsBackend, WalletProvider};
use crate::debug::spawn_tracked;
use crate::services::export::private_key_artifact;
use crate::utils::validation;

/// Undelivered events kept for the front end
pub const EVENT_CAPACITY: usize = 64;

/// Mutable flow state, guarded by a single mutex
struct FlowState {
    linking: LinkingState,
    current_address: Option<WalletAddress>,
    generated: Option<GeneratedAccount>,
    form: AddressForm,
    has_external_provider: bool,
    poll: Option<PollingHandle>,
    /// Bumped whenever a detection is started or abandoned
    detection_generation: u64,
}

struct FlowInner {
    id: Uuid,
    config: LinkConfig,
    provider: Arc<dyn WalletProvider>,
    backend: Arc<dyn SettingsBackend>,
    account: Arc<dyn AccountContext>,
    exporter: Arc<dyn ArtifactExporter>,
    in_progress: AtomicBool,
    state: Mutex<FlowState>,
    events_tx: Sender<LinkEvent>,
    events_rx: Receiver<LinkEvent>,
}

impl Drop for FlowInner {
    fn drop(&mut self) {
        if let Some(poll) = self.state.get_mut().poll.take() {
            poll.abort();
            debug!(flow_id = %self.id, "Flow dropped, external detection stopped");
        }
    }
}

/// Clears the in-progress flag when dropped
struct InProgressGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Handle to a linking flow. Clones share the same flow.
#[derive(Clone)]
pub struct LinkingFlow {
    inner: Arc<FlowInner>,
}

impl LinkingFlow {
    pub fn new(
        config: LinkConfig,
        provider: Arc<dyn WalletProvider>,
        backend: Arc<dyn SettingsBackend>,
        account: Arc<dyn AccountContext>,
        exporter: Arc<dyn ArtifactExporter>,
    ) -> Self {
        let (events_tx, events_rx) = async_channel::bounded(EVENT_CAPACITY);
        let id = Uuid::new_v4();
        debug!(flow_id = %id, "Linking flow created");

        Self {
            inner: Arc::new(FlowInner {
                id,
                config,
                provider,
                backend,
                account,
                exporter,
                in_progress: AtomicBool::new(false),
                state: Mutex::new(FlowState {
                    linking: LinkingState::AwaitingAddress,
                    current_address: None,
                    generated: None,
                    form: AddressForm::new(),
                    has_external_provider: false,
                    poll: None,
                    detection_generation: 0,
                }),
                events_tx,
                events_rx,
            }),
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn state(&self) -> LinkingState {
        self.inner.state.lock().linking
    }

    pub fn current_address(&self) -> Option<WalletAddress> {
        self.inner.state.lock().current_address.clone()
    }

    /// Address of the generated account still waiting for its key export
    pub fn pending_export_address(&self) -> Option<WalletAddress> {
        self.inner
            .state
            .lock()
            .generated
            .as_ref()
            .map(|account| account.address().clone())
    }

    pub fn in_progress(&self) -> bool {
        self.inner.in_progress.load(Ordering::Acquire)
    }

    pub fn has_external_provider(&self) -> bool {
        self.inner.state.lock().has_external_provider
    }

    pub fn is_detecting(&self) -> bool {
        self.inner
            .state
            .lock()
            .poll
            .as_ref()
            .is_some_and(|poll| !poll.is_cancelled())
    }

    pub fn set_address_input(&self, value: &str) {
        self.inner.state.lock().form.set_value(value);
    }

    pub fn address_input(&self) -> String {
        self.inner.state.lock().form.value().to_string()
    }

    pub fn form_errors(&self) -> Vec<String> {
        self.inner.state.lock().form.error_messages()
    }

    /// Receiver of flow events.
    ///
    /// The channel is multi-consumer: each event goes to exactly one receiver,
    /// so a front end should hold a single subscription. It keeps the most
    /// recent [`EVENT_CAPACITY`] events; older undelivered ones are dropped.
    pub fn subscribe(&self) -> Receiver<LinkEvent> {
        self.inner.events_rx.clone()
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Load the account's current wallet configuration.
    ///
    /// An address already on the account moves the flow straight to
    /// [`LinkingState::Linked`] without registering anything.
    pub async fn initialize(&self) -> Result<()> {
        let inner = &self.inner;

        let existing = match inner.account.linked_wallet_address() {
            Some(address) => Some(address),
            None => match inner.backend.wallet_settings().await {
                Ok(settings) => settings.receiver_address().map(str::to_string),
                Err(e) => {
                    error!(flow_id = %inner.id, error = %e, "Failed to load wallet settings");
                    inner.state.lock().form.reset();
                    inner.toast(&e);
                    return Err(e);
                }
            },
        };

        let linked = match existing.as_deref().map(WalletAddress::parse) {
            Some(Ok(address)) => Some(address),
            Some(Err(e)) => {
                warn!(
                    flow_id = %inner.id,
                    error = %e,
                    "Stored wallet address is malformed, treating account as unlinked"
                );
                None
            }
            None => None,
        };

        {
            let mut state = inner.state.lock();
            state.form.reset();
            if let Some(address) = &linked {
                state.current_address = Some(address.clone());
            }
        }

        if let Some(address) = linked {
            info!(flow_id = %inner.id, address = %address, "Account already has a wallet address");
            inner.set_state(LinkingState::Linked);
            inner.emit(LinkEvent::AddressSetupComplete(address));
        }

        let has_external = match inner.provider.is_using_local_provider().await {
            Ok(is_local) => !is_local,
            Err(e) => {
                warn!(flow_id = %inner.id, error = %e, "External provider probe failed");
                false
            }
        };
        inner.state.lock().has_external_provider = has_external;
        inner.emit(LinkEvent::ExternalProviderDetected(has_external));

        Ok(())
    }

    /// Generate a custodial address and register it with the backend.
    ///
    /// The private key stays in the flow until [`export_private_key`](Self::export_private_key).
    pub async fn create_custodial_address(&self) -> Result<WalletAddress> {
        let inner = &self.inner;
        let _guard = inner.begin_operation()?;

        let previous = {
            let mut state = inner.state.lock();
            if state.generated.is_some() {
                return Err(LinkError::State(
                    "A generated key is still waiting to be exported".to_string(),
                ));
            }
            if state.linking == LinkingState::PendingExternalDetection {
                inner.abandon_detection(&mut state);
                LinkingState::AwaitingAddress
            } else {
                state.linking
            }
        };
        inner.set_state(LinkingState::GeneratingCustodial);

        let account = match inner
            .provider
            .create_local_account(inner.config.encrypt_generated_keys)
            .await
        {
            Ok(account) => account,
            Err(e) => {
                error!(flow_id = %inner.id, error = %e, "Failed to generate custodial account");
                inner.fail(previous, &e);
                return Err(e);
            }
        };

        let address = account.address().clone();
        if let Err(e) = inner.backend.set_wallet_address(&address).await {
            error!(
                flow_id = %inner.id,
                address = %address,
                error = %e,
                "Backend rejected custodial address, discarding key"
            );
            drop(account);
            inner.fail(previous, &e);
            return Err(e);
        }

        {
            let mut state = inner.state.lock();
            state.generated = Some(account);
            state.current_address = Some(address.clone());
        }

        info!(flow_id = %inner.id, address = %address, "Custodial address registered, awaiting key export");
        Ok(address)
    }

    /// Hand the generated private key to the exporter and finish linking.
    ///
    /// The key leaves the flow before delivery is attempted, so it is released
    /// whether or not delivery succeeds. Returns the delivery location.
    pub async fn export_private_key(&self) -> Result<String> {
        let inner = &self.inner;
        let _guard = inner.begin_operation()?;

        let account = inner.state.lock().generated.take().ok_or_else(|| {
            LinkError::State("There is no generated key to export".to_string())
        })?;
        let address = account.address().clone();
        let artifact = private_key_artifact(&account);
        drop(account);

        let delivered = inner.exporter.deliver(&artifact).await;
        drop(artifact);

        match delivered {
            Ok(location) => {
                inner.state.lock().current_address = Some(address.clone());
                inner.set_state(LinkingState::Linked);
                inner.emit(LinkEvent::AddressSetupComplete(address.clone()));
                info!(flow_id = %inner.id, address = %address, location = %location, "Private key exported");
                Ok(location)
            }
            Err(e) => {
                error!(flow_id = %inner.id, address = %address, error = %e, "Private key export failed");
                inner.state.lock().current_address = None;
                inner.fail(LinkingState::AwaitingAddress, &e);
                Err(e)
            }
        }
    }

    /// Check an address candidate. Empty input passes; `required` is the form's concern.
    pub fn validate_address_format(candidate: &str) -> Result<()> {
        let result = validation::validate_address_format(candidate);
        match result.error {
            None => Ok(()),
            Some(message) => Err(LinkError::FormatInvalid(message)),
        }
    }

    /// Register the address in the manual-entry form.
    ///
    /// The flow only becomes [`LinkingState::Linked`] after the backend confirms.
    pub async fn submit_provided_address(&self) -> Result<WalletAddress> {
        self.submit(false).await
    }

    /// Start polling the external provider for its active address.
    ///
    /// Returns once polling has started. Starting again replaces the running poll.
    pub async fn begin_external_detection(&self) -> Result<()> {
        let inner = &self.inner;
        if self.in_progress() {
            return Err(LinkError::AlreadyInProgress);
        }

        let generation = {
            let mut state = inner.state.lock();
            if state.linking == LinkingState::Linked {
                return Err(LinkError::State("A wallet address is already linked".to_string()));
            }
            if state.generated.is_some() {
                return Err(LinkError::State(
                    "A generated key is still waiting to be exported".to_string(),
                ));
            }
            inner.abandon_detection(&mut state);
            state.detection_generation
        };
        inner.set_state(LinkingState::PendingExternalDetection);

        if let Err(e) = inner.provider.ready().await {
            warn!(flow_id = %inner.id, error = %e, "Wallet provider did not become ready");
            let current = inner.state.lock().detection_generation == generation;
            if current {
                inner.fail(LinkingState::AwaitingAddress, &e);
            }
            return Err(e);
        }

        let schedule = PollSchedule::new(inner.config.poll_interval, inner.config.max_poll_attempts);
        let mut state = inner.state.lock();
        if state.detection_generation != generation
            || state.linking != LinkingState::PendingExternalDetection
        {
            debug!(flow_id = %inner.id, "Detection superseded before polling started");
            return Ok(());
        }

        let token = CancelToken::new();
        let ticker = Ticker::new(schedule, token.clone());
        let task = spawn_tracked(
            "external_detection",
            run_detection(Arc::downgrade(&self.inner), ticker, generation),
        );
        state.poll = Some(PollingHandle::new(token, task));

        info!(
            flow_id = %inner.id,
            interval_ms = schedule.interval.as_millis(),
            max_attempts = schedule.max_attempts,
            "External wallet detection started"
        );
        Ok(())
    }

    /// Stop detection and discard any unexported key. Idempotent.
    pub fn teardown(&self) {
        let inner = &self.inner;

        let next = {
            let mut state = inner.state.lock();
            if state.poll.is_some() {
                debug!(
                    flow_id = %inner.id,
                    active_tasks = crate::debug::active_task_count(),
                    "External detection stopped"
                );
            }
            inner.abandon_detection(&mut state);

            if let Some(account) = state.generated.take() {
                warn!(
                    flow_id = %inner.id,
                    address = %account.address(),
                    "Discarding generated key that was never exported"
                );
                if state.current_address.as_ref() == Some(account.address()) {
                    state.current_address = None;
                }
            }

            match state.linking {
                LinkingState::GeneratingCustodial | LinkingState::PendingExternalDetection => {
                    LinkingState::AwaitingAddress
                }
                other => other,
            }
        };
        inner.set_state(next);
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    async fn submit(&self, from_detection: bool) -> Result<WalletAddress> {
        let inner = &self.inner;

        let address = {
            let state = inner.state.lock();
            if state.generated.is_some() {
                return Err(LinkError::State(
                    "A generated key is still waiting to be exported".to_string(),
                ));
            }
            match state.form.address() {
                Some(address) => address,
                None => {
                    let message = state
                        .form
                        .error_messages()
                        .into_iter()
                        .next()
                        .unwrap_or_else(|| "Wallet address is invalid".to_string());
                    return Err(LinkError::FormatInvalid(message));
                }
            }
        };

        let _guard = inner.begin_operation()?;
        let previous = inner.state.lock().linking;

        if let Err(e) = inner.backend.set_wallet_address(&address).await {
            error!(
                flow_id = %inner.id,
                address = %address,
                error = %e,
                "Backend rejected provided address"
            );
            let restore = {
                let mut state = inner.state.lock();
                let detecting = state.poll.as_ref().is_some_and(|poll| !poll.is_cancelled());
                // A detected address means the poll already stopped
                if from_detection || !detecting {
                    state.poll = None;
                }
                if from_detection
                    || (previous == LinkingState::PendingExternalDetection && !detecting)
                {
                    LinkingState::AwaitingAddress
                } else {
                    previous
                }
            };
            inner.fail(restore, &e);
            return Err(e);
        }

        {
            let mut state = inner.state.lock();
            if let Some(poll) = state.poll.take() {
                poll.cancel();
            }
            state.current_address = Some(address.clone());
        }
        inner.set_state(LinkingState::Linked);
        inner.emit(LinkEvent::AddressSetupComplete(address.clone()));

        info!(flow_id = %inner.id, address = %address, from_detection = from_detection, "Wallet address linked");
        Ok(address)
    }

    /// Submit an address found by the detection poll
    async fn complete_detection(&self, detected: String, generation: u64) {
        let inner = &self.inner;

        {
            let mut state = inner.state.lock();
            if state.detection_generation != generation
                || state.linking != LinkingState::PendingExternalDetection
            {
                debug!(flow_id = %inner.id, "Detected address arrived after detection ended");
                return;
            }

            if let Err(e) = Self::validate_address_format(&detected) {
                state.poll = None;
                drop(state);
                warn!(flow_id = %inner.id, address = %detected, "Provider reported a malformed address");
                inner.fail(LinkingState::AwaitingAddress, &e);
                return;
            }
            state.form.set_value(detected.as_str());
        }

        match self.submit(true).await {
            Ok(_) => {}
            Err(LinkError::AlreadyInProgress) => {
                warn!(flow_id = %inner.id, "Detected address dropped, another operation was running");
                {
                    let mut state = inner.state.lock();
                    state.poll = None;
                    state.detection_generation += 1;
                }
                inner.fail(LinkingState::AwaitingAddress, &LinkError::AlreadyInProgress);
            }
            // Rollback and toast already happened inside submit
            Err(_) => {}
        }
    }
}

impl FlowInner {
    fn begin_operation(&self) -> Result<InProgressGuard<'_>> {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| LinkError::AlreadyInProgress)?;
        Ok(InProgressGuard {
            flag: &self.in_progress,
        })
    }

    fn set_state(&self, next: LinkingState) {
        let changed = {
            let mut state = self.state.lock();
            let changed = state.linking != next;
            state.linking = next;
            changed
        };
        if changed {
            debug!(flow_id = %self.id, state = %next, "Linking state changed");
            self.emit(LinkEvent::StateChanged(next));
        }
    }

    /// Restore `state` after a failed operation and tell the user why
    fn fail(&self, state: LinkingState, error: &LinkError) {
        self.toast(error);
        self.set_state(state);
    }

    fn toast(&self, error: &LinkError) {
        self.emit(LinkEvent::Toast(error.to_string()));
    }

    fn emit(&self, mut event: LinkEvent) {
        // The flow owns a receiver, so the channel never closes while it is alive
        while let Err(TrySendError::Full(rejected)) = self.events_tx.try_send(event) {
            let _ = self.events_rx.try_recv();
            event = rejected;
        }
    }

    /// Cancel any running poll and invalidate results it may still produce
    fn abandon_detection(&self, state: &mut FlowState) {
        if let Some(poll) = state.poll.take() {
            poll.abort();
        }
        state.detection_generation += 1;
    }
}

/// Background loop sampling the provider's active address
async fn run_detection(flow: Weak<FlowInner>, mut ticker: Ticker, generation: u64) {
    let mut last_seen = String::new();

    let detected = loop {
        match ticker.next().await {
            Tick::Cancelled => return,
            Tick::Exhausted { attempts } => {
                let Some(inner) = flow.upgrade() else { return };
                let current = {
                    let mut state = inner.state.lock();
                    let current = state.detection_generation == generation
                        && state.linking == LinkingState::PendingExternalDetection;
                    if current {
                        state.poll = None;
                        state.detection_generation += 1;
                    }
                    current
                };
                if current {
                    warn!(flow_id = %inner.id, attempts = attempts, "External wallet detection gave up");
                    inner.fail(
                        LinkingState::AwaitingAddress,
                        &LinkError::DetectionExhausted { attempts },
                    );
                }
                return;
            }
            Tick::Attempt(attempt) => {
                let Some(inner) = flow.upgrade() else { return };
                let provider = Arc::clone(&inner.provider);
                let flow_id = inner.id;
                drop(inner);

                match provider.active_address(true).await {
                    Ok(address) => {
                        let address = address.unwrap_or_default();
                        if address != last_seen {
                            debug!(flow_id = %flow_id, attempt = attempt, address = %address, "Provider address changed");
                            last_seen = address;
                            if !last_seen.is_empty() {
                                ticker.token().cancel();
                                break last_seen;
                            }
                        }
                    }
                    Err(e) => {
                        warn!(
                            flow_id = %flow_id,
                            attempt = attempt,
                            error = %e,
                            "Provider unavailable during detection, retrying next tick"
                        );
                    }
                }
            }
        }
    };

    let Some(inner) = flow.upgrade() else { return };
    LinkingFlow { inner }.complete_detection(detected, generation).await;
}
