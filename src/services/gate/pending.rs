use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;

struct PendingCleanup {
    user_id: u64,
    handle: AbortHandle,
}

/// Scheduled cleanups for unconfirmed members, keyed by (channel_id, prompt_message_id)
#[derive(Default)]
pub struct PendingConfirmations {
    tasks: DashMap<(u64, u64), PendingCleanup>,
}

impl PendingConfirmations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cleanup task. A task already stored under the same key is aborted.
    pub fn track(&self, channel_id: u64, message_id: u64, user_id: u64, handle: AbortHandle) {
        if let Some(previous) = self
            .tasks
            .insert((channel_id, message_id), PendingCleanup { user_id, handle })
        {
            previous.handle.abort();
        }
    }

    /// Run `work` after `delay` unless the user confirms first.
    /// The task is registered before its timer starts, so `finish` always sees its own entry.
    pub fn schedule<F>(
        self: &Arc<Self>,
        channel_id: u64,
        message_id: u64,
        user_id: u64,
        delay: Duration,
        work: F,
    ) where
        F: Future<Output = ()> + Send + 'static,
    {
        let (registered_tx, registered_rx) = oneshot::channel::<()>();
        let registry = Arc::clone(self);

        let handle = tokio::spawn(async move {
            if registered_rx.await.is_err() {
                return;
            }
            tokio::time::sleep(delay).await;

            // Gone means cancelled or replaced
            if registry.finish(channel_id, message_id) {
                work.await;
            }
        });

        self.track(channel_id, message_id, user_id, handle.abort_handle());
        let _ = registered_tx.send(());
    }

    /// Forget a task that woke up on its own. Returns false if it had been cancelled.
    pub fn finish(&self, channel_id: u64, message_id: u64) -> bool {
        self.tasks.remove(&(channel_id, message_id)).is_some()
    }

    /// Abort every pending cleanup for a user, returning how many were stopped
    pub fn cancel_for_user(&self, user_id: u64) -> usize {
        let keys: Vec<(u64, u64)> = self
            .tasks
            .iter()
            .filter(|entry| entry.value().user_id == user_id)
            .map(|entry| *entry.key())
            .collect();

        let mut cancelled = 0;
        for key in keys {
            if let Some((_, pending)) = self.tasks.remove(&key) {
                pending.handle.abort();
                cancelled += 1;
            }
        }
        cancelled
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl std::fmt::Debug for PendingConfirmations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingConfirmations")
            .field("pending", &self.tasks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sleeper() -> tokio::task::JoinHandle<()> {
        tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        })
    }

    #[tokio::test]
    async fn test_cancel_for_user_aborts_only_their_tasks() {
        let pending = PendingConfirmations::new();
        let first = sleeper();
        let second = sleeper();
        let other = sleeper();

        pending.track(1, 10, 100, first.abort_handle());
        pending.track(1, 11, 100, second.abort_handle());
        pending.track(2, 12, 200, other.abort_handle());

        assert_eq!(pending.cancel_for_user(100), 2);
        assert_eq!(pending.len(), 1);

        assert!(first.await.unwrap_err().is_cancelled());
        assert!(second.await.unwrap_err().is_cancelled());
        assert!(!other.is_finished());

        other.abort();
    }

    #[tokio::test]
    async fn test_finish_removes_without_abort() {
        let pending = PendingConfirmations::new();
        let task = tokio::spawn(async {});
        pending.track(1, 10, 100, task.abort_handle());

        assert!(pending.finish(1, 10));
        assert!(!pending.finish(1, 10));
        assert!(pending.is_empty());
        assert!(task.await.is_ok());
    }

    #[tokio::test]
    async fn test_same_key_replaces_previous() {
        let pending = PendingConfirmations::new();
        let old = sleeper();
        let new = sleeper();

        pending.track(1, 10, 100, old.abort_handle());
        pending.track(1, 10, 100, new.abort_handle());

        assert_eq!(pending.len(), 1);
        assert!(old.await.unwrap_err().is_cancelled());

        assert_eq!(pending.cancel_for_user(100), 1);
        assert!(new.await.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn test_scheduled_work_sees_its_own_entry() {
        let pending = Arc::new(PendingConfirmations::new());
        let (done_tx, done_rx) = oneshot::channel();

        // Zero delay: the task must still wait for its registration
        pending.schedule(1, 10, 100, Duration::ZERO, async move {
            let _ = done_tx.send(());
        });

        assert!(done_rx.await.is_ok());
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn test_scheduled_work_cancelled_by_confirm() {
        let pending = Arc::new(PendingConfirmations::new());
        let (done_tx, mut done_rx) = oneshot::channel::<()>();

        pending.schedule(1, 10, 100, Duration::from_secs(3600), async move {
            let _ = done_tx.send(());
        });

        assert_eq!(pending.len(), 1);
        assert_eq!(pending.cancel_for_user(100), 1);
        assert!(pending.is_empty());

        // Aborting the task drops the sender unused
        tokio::time::timeout(Duration::from_secs(5), &mut done_rx)
            .await
            .expect("aborted task should drop its sender")
            .unwrap_err();
    }

    #[test]
    fn test_cancel_unknown_user() {
        let pending = PendingConfirmations::new();
        assert_eq!(pending.cancel_for_user(42), 0);
    }
}
