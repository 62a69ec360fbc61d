//! Reconciled in-memory notification state.
//!
//! The single source of truth for what the user currently sees. Two
//! independent update paths feed it — push inserts and pull replacements —
//! and every operation holds the one internal lock for its full duration,
//! so no caller ever observes a partially applied mutation. The unread
//! count is adjusted in the same critical section as the membership or
//! read-state change it reflects; it is never tracked independently.
//!
//! Operations are synchronous and free of side effects beyond the store's
//! own state: network calls live in the controller, never here.

use bellbox_protocol::Notification;
use parking_lot::RwLock;

/// Ordered notification sequence (most-recent-first) plus the derived
/// unread counter.
pub struct NotificationStore {
    inner: RwLock<StoreState>,
}

#[derive(Default)]
struct StoreState {
    entries: Vec<Notification>,
    unread: usize,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreState::default()),
        }
    }

    /// Prepend a notification if its id is not already present.
    ///
    /// Returns whether the entry was actually inserted. A duplicate id is a
    /// no-op — this defends against overlapping push/pull delivery.
    pub fn insert(&self, notification: Notification) -> bool {
        let mut state = self.inner.write();
        if state.entries.iter().any(|e| e.id == notification.id) {
            return false;
        }
        if !notification.is_read {
            state.unread += 1;
        }
        state.entries.insert(0, notification);
        true
    }

    /// Replace the entire sequence with a freshly pulled snapshot, keeping
    /// server order, and recompute the unread count from scratch.
    ///
    /// This is the authoritative reconciliation point: any drift introduced
    /// by partial push updates is corrected here.
    pub fn replace_all(&self, notifications: Vec<Notification>) {
        let mut state = self.inner.write();
        state.unread = notifications.iter().filter(|n| !n.is_read).count();
        state.entries = notifications;
    }

    /// Mark one entry read. Idempotent: the count moves only on the
    /// unread→read transition. Returns whether anything changed.
    pub fn mark_read(&self, id: &str) -> bool {
        let mut state = self.inner.write();
        let Some(entry) = state.entries.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        if entry.is_read {
            return false;
        }
        entry.is_read = true;
        state.unread -= 1;
        true
    }

    /// Mark every entry read and zero the count unconditionally.
    pub fn mark_all_read(&self) {
        let mut state = self.inner.write();
        for entry in &mut state.entries {
            entry.is_read = true;
        }
        state.unread = 0;
    }

    /// Remove an entry if present. Returns whether anything was removed.
    pub fn remove(&self, id: &str) -> bool {
        let mut state = self.inner.write();
        let Some(position) = state.entries.iter().position(|e| e.id == id) else {
            return false;
        };
        let removed = state.entries.remove(position);
        if !removed.is_read {
            state.unread -= 1;
        }
        true
    }

    /// Copy of the current sequence, most-recent-first.
    pub fn snapshot(&self) -> Vec<Notification> {
        self.inner.read().entries.clone()
    }

    pub fn get(&self, id: &str) -> Option<Notification> {
        self.inner.read().entries.iter().find(|e| e.id == id).cloned()
    }

    pub fn unread_count(&self) -> usize {
        self.inner.read().unread
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }
}

impl Default for NotificationStore {
    fn default() -> Self {
        Self::new()
    }
}
