//! Per-user serialization of scenario exchanges.
//!
//! Two requests carrying the same user id never interleave their
//! load → complete → persist sequence. Entries are dropped once the last
//! waiter releases its guard.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Mutex, OwnedMutexGuard};

type GateMap = Arc<StdMutex<HashMap<String, Arc<GateEntry>>>>;

#[derive(Clone, Default)]
pub struct SessionGate {
    inner: GateMap,
}

#[derive(Default)]
struct GateEntry {
    lock: Arc<Mutex<()>>,
    permits: AtomicUsize,
}

/// Held for the duration of one exchange.
pub struct SessionGuard {
    _lock_guard: OwnedMutexGuard<()>,
    _permit: SessionPermit,
}

struct SessionPermit {
    user_id: String,
    inner: GateMap,
    entry: Arc<GateEntry>,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, user_id: &str) -> SessionGuard {
        // Counted under the map lock: a release that sees zero permits and
        // removes the entry can never race with a caller that already holds it.
        let entry = {
            let mut map = self
                .inner
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let entry = map
                .entry(user_id.to_string())
                .or_insert_with(|| Arc::new(GateEntry::default()))
                .clone();
            entry.permits.fetch_add(1, Ordering::AcqRel);
            entry
        };

        let permit = SessionPermit {
            user_id: user_id.to_string(),
            inner: Arc::clone(&self.inner),
            entry: Arc::clone(&entry),
        };
        let lock_guard = entry.lock.clone().lock_owned().await;
        SessionGuard {
            _lock_guard: lock_guard,
            _permit: permit,
        }
    }

    /// Users currently holding or waiting on the gate.
    pub fn active_sessions(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

impl Drop for SessionPermit {
    fn drop(&mut self) {
        let previous = self.entry.permits.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "session gate permit underflow");
        if previous != 1 {
            return;
        }

        let mut map = self
            .inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let should_remove = map
            .get(&self.user_id)
            .is_some_and(|current| Arc::ptr_eq(current, &self.entry))
            && self.entry.permits.load(Ordering::Acquire) == 0;
        if should_remove {
            map.remove(&self.user_id);
        }
    }
}
