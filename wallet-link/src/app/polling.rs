//! # Polling
//!
//! Bounded, cancellable repetition for background detection.
//!
//! ```text
//! Ticker::next()   attempt 1 ──sleep(interval)── attempt 2 ── ... ── attempt N ──sleep── Exhausted
//!                      │                 ▲
//!                      └── cancel() ─────┴── wakes the sleep, next() returns Cancelled
//! ```
//!
//! The first attempt is immediate. Cancellation is idempotent and wakes a
//! ticker that is waiting between attempts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Interval and attempt budget of a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollSchedule {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Returns `true` only for the call that performed it.
    pub fn cancel(&self) -> bool {
        if self
            .cancelled
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        self.notify.notify_waiters();
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Resolve once the token is cancelled.
    pub async fn cancelled(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a concurrent cancel is not missed
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

/// What the next poll step should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Take sample number `n` (1-based)
    Attempt(u32),
    /// The token was cancelled
    Cancelled,
    /// Every attempt was used without the poll being stopped
    Exhausted { attempts: u32 },
}

/// Paces attempts according to a [`PollSchedule`]
#[derive(Debug)]
pub struct Ticker {
    schedule: PollSchedule,
    token: CancelToken,
    attempts: u32,
}

impl Ticker {
    pub fn new(schedule: PollSchedule, token: CancelToken) -> Self {
        Self {
            schedule,
            token,
            attempts: 0,
        }
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Wait for the next step. The first call returns immediately.
    pub async fn next(&mut self) -> Tick {
        if self.attempts > 0 {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => return Tick::Cancelled,
                _ = tokio::time::sleep(self.schedule.interval) => {}
            }
        }

        if self.token.is_cancelled() {
            return Tick::Cancelled;
        }
        if self.attempts >= self.schedule.max_attempts {
            return Tick::Exhausted {
                attempts: self.attempts,
            };
        }

        self.attempts += 1;
        Tick::Attempt(self.attempts)
    }
}

/// A running poll task together with its cancellation token
#[derive(Debug)]
pub struct PollingHandle {
    token: CancelToken,
    task: JoinHandle<()>,
}

impl PollingHandle {
    pub fn new(token: CancelToken, task: JoinHandle<()>) -> Self {
        Self { token, task }
    }

    /// Stop the poll at its next step. Idempotent; returns `true` for the call
    /// that performed the cancellation.
    ///
    /// Work the task is already doing after its last tick (such as submitting a
    /// detected address) is allowed to finish.
    pub fn cancel(&self) -> bool {
        self.token.cancel()
    }

    /// Cancel and abort the task outright.
    pub fn abort(&self) {
        self.token.cancel();
        self.task.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
