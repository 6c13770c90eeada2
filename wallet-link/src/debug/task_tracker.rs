//! Async task lifecycle tracking

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tokio::task::JoinHandle;

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(0);
static ACTIVE_TASKS: AtomicU64 = AtomicU64::new(0);

/// Number of tracked tasks still running
pub fn active_task_count() -> u64 {
    ACTIVE_TASKS.load(Ordering::Relaxed)
}

/// Decrements the active count however the task ends (including abort)
struct ActiveTask {
    name: &'static str,
    task_id: u64,
    start: Instant,
}

impl Drop for ActiveTask {
    fn drop(&mut self) {
        ACTIVE_TASKS.fetch_sub(1, Ordering::Relaxed);
        tracing::debug!(
            task = %self.name,
            task_id = self.task_id,
            duration_ms = self.start.elapsed().as_millis(),
            "Task finished"
        );
    }
}

/// Spawn an instrumented async task with lifecycle tracking
///
/// # Arguments
///
/// * `name` - Task name for logging (e.g., "external_detection")
/// * `future` - The async task to execute
pub fn spawn_tracked<F>(name: &'static str, future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let task_id = NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed);
    ACTIVE_TASKS.fetch_add(1, Ordering::Relaxed);

    tracing::debug!(task = %name, task_id = task_id, "Task spawned");

    let active = ActiveTask {
        name,
        task_id,
        start: Instant::now(),
    };

    tokio::spawn(async move {
        let _active = active;
        future.await
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spawn_tracked_returns_output() {
        let handle = spawn_tracked("answer", async { 42 });
        assert_eq!(handle.await.unwrap(), 42);
    }
}
