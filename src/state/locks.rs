//! Per-session lock registry
//!
//! The telecom gateway is synchronous per session, but it retries on
//! timeout without knowing whether the earlier request's writes landed.
//! Serializing hops per session id turns two near-simultaneous duplicates
//! into a strict sequence, so the second one sees the first one's session
//! state (and its submission receipt) instead of racing the read-modify-
//! write.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Clone, Default)]
pub struct SessionLocks {
    inner: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one session id, waiting if another hop for the
    /// same session is in flight.
    pub async fn acquire(&self, session_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.inner.lock().await;
            if locks.len() > PRUNE_THRESHOLD {
                // A lock held by a guard has a second Arc reference
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            locks
                .entry(session_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        lock.lock_owned().await
    }
}
