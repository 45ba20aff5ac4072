//! Copy acknowledgment flags
//!
//! Each slot (one per result item, one for the combined summary) gets its
//! own delayed reset task. Acknowledging a slot again cancels that slot's
//! pending reset and starts a fresh window; other slots are untouched.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

/// How long a "copied" acknowledgment stays visible
pub const ACK_WINDOW: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AckSlot {
    Item(usize),
    Combined,
}

struct PendingReset {
    token: u64,
    handle: JoinHandle<()>,
}

type SlotMap = Arc<Mutex<HashMap<AckSlot, PendingReset>>>;

pub struct AcknowledgmentTimers {
    window: Duration,
    slots: SlotMap,
    next_token: AtomicU64,
}

fn lock(slots: &SlotMap) -> std::sync::MutexGuard<'_, HashMap<AckSlot, PendingReset>> {
    slots.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("[Ack] Slot map mutex was poisoned, recovering...");
        poisoned.into_inner()
    })
}

impl AcknowledgmentTimers {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            slots: Arc::new(Mutex::new(HashMap::new())),
            next_token: AtomicU64::new(0),
        }
    }

    /// Raise the flag for `slot` and schedule its reset
    ///
    /// Must be called from within a Tokio runtime.
    pub fn acknowledge(&self, slot: AckSlot) {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let slots = Arc::clone(&self.slots);
        let window = self.window;

        let mut guard = lock(&self.slots);
        if let Some(previous) = guard.remove(&slot) {
            previous.handle.abort();
        }

        let handle = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let mut guard = lock(&slots);
            // A newer acknowledgment owns the slot now
            if guard.get(&slot).map(|p| p.token) == Some(token) {
                guard.remove(&slot);
            }
        });

        guard.insert(slot, PendingReset { token, handle });
    }

    pub fn is_acknowledged(&self, slot: AckSlot) -> bool {
        lock(&self.slots).contains_key(&slot)
    }

    /// Drop every flag and cancel every pending reset
    pub fn clear_all(&self) {
        let mut guard = lock(&self.slots);
        for (_, pending) in guard.drain() {
            pending.handle.abort();
        }
    }
}

impl Default for AcknowledgmentTimers {
    fn default() -> Self {
        Self::new(ACK_WINDOW)
    }
}

impl Drop for AcknowledgmentTimers {
    fn drop(&mut self) {
        self.clear_all();
    }
}
