//! Per-session concurrency control.
//!
//! Exactly one graph traversal may be in flight per session id. A second
//! invocation for the same session waits for the current traversal to
//! finish; different sessions never contend with each other.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Maps each session id to a one-permit semaphore.
///
/// The permit is held for the whole traversal — including any slow
/// action handler — and releases on drop.
pub struct SessionLocks {
    locks: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl Default for SessionLocks {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLocks {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Acquire the traversal lock for a session, waiting if a traversal
    /// is already running. Hold the returned permit for the duration of
    /// the traversal.
    pub async fn acquire(&self, session_id: &str) -> OwnedSemaphorePermit {
        let sem = {
            let mut locks = self.locks.lock();
            locks
                .entry(session_id.to_owned())
                .or_insert_with(|| Arc::new(Semaphore::new(1)))
                .clone()
        };

        // The semaphore is never closed, so acquisition cannot fail.
        sem.acquire_owned()
            .await
            .unwrap_or_else(|_| unreachable!("session semaphore closed"))
    }

    /// Number of tracked sessions (for the diagnostic listing).
    pub fn session_count(&self) -> usize {
        self.locks.lock().len()
    }

    /// Drop lock entries for sessions with no traversal in flight.
    pub fn prune_idle(&self) {
        let mut locks = self.locks.lock();
        locks.retain(|_, sem| sem.available_permits() == 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sequential_acquire_release() {
        let locks = SessionLocks::new();
        drop(locks.acquire("s1").await);
        drop(locks.acquire("s1").await);
    }

    #[tokio::test]
    async fn different_sessions_do_not_contend() {
        let locks = Arc::new(SessionLocks::new());
        let p1 = locks.acquire("s1").await;
        let p2 = locks.acquire("s2").await;
        assert_eq!(locks.session_count(), 2);
        drop(p1);
        drop(p2);
    }

    #[tokio::test]
    async fn same_session_serializes() {
        let locks = Arc::new(SessionLocks::new());
        let locks2 = locks.clone();

        let permit = locks.acquire("s1").await;
        let waiter = tokio::spawn(async move {
            let _p = locks2.acquire("s1").await;
            42
        });

        // Let the waiter queue up, then release.
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        drop(permit);

        assert_eq!(waiter.await.unwrap(), 42);
    }

    #[tokio::test]
    async fn prune_drops_only_idle_entries() {
        let locks = SessionLocks::new();
        let held = locks.acquire("busy").await;
        drop(locks.acquire("idle").await);

        locks.prune_idle();
        assert_eq!(locks.session_count(), 1);
        drop(held);
    }
}
