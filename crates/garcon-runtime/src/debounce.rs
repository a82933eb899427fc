//! Debounce scheduler: coalesces inbound-message bursts per conversation.
//!
//! One shared map of `key → last request time` behind a `parking_lot`
//! mutex. `request()` inserts or overwrites; `take_due()` atomically drains
//! every entry that has been quiet for the window. Execution always happens
//! outside the lock, after the drained entries have been handed back, so a
//! `request()` landing mid-flush seeds a fresh entry for the next cycle
//! instead of being lost or double-run.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use parking_lot::Mutex;
// tokio's Instant so paused-clock tests govern due-ness like real time.
use tokio::time::Instant;
use tracing::debug;

/// Per-conversation pending-turn map.
///
/// Generic over the key so tests can use a plain conversation ID while the
/// orchestrator keys by (establishment, conversation).
pub struct DebounceScheduler<K> {
    pending: Mutex<HashMap<K, Instant>>,
}

impl<K: Eq + Hash + Clone> DebounceScheduler<K> {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Record "now" as the key's last request time.
    ///
    /// Rapid repeated calls only ever postpone the eventual turn, never
    /// duplicate it.
    pub fn request(&self, key: K) {
        self.request_at(key, Instant::now());
    }

    /// Record an explicit request time. Overwrites any pending timestamp.
    pub fn request_at(&self, key: K, at: Instant) {
        let _ = self.pending.lock().insert(key, at);
    }

    /// Atomically remove and return every key quiet for at least `window`.
    ///
    /// The lock is held only for the scan; the caller executes the returned
    /// turns afterwards.
    pub fn take_due(&self, now: Instant, window: Duration) -> Vec<K> {
        let mut pending = self.pending.lock();
        let due: Vec<K> = pending
            .iter()
            .filter(|&(_, &at)| now.duration_since(at) >= window)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &due {
            let _ = pending.remove(key);
        }
        drop(pending);
        if !due.is_empty() {
            debug!(due = due.len(), "conversations due");
        }
        due
    }

    /// Number of conversations with a pending turn.
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Whether no turn is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl<K: Eq + Hash + Clone> Default for DebounceScheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}
