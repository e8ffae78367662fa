//! The pending-document cell shared by the listener and the dispatcher.
//!
//! Holds at most one value. Publishing while a value is still pending
//! replaces it (last write wins) and hands the displaced value back so the
//! caller can report it.

use parking_lot::Mutex;

#[derive(Debug)]
struct SlotState<T> {
    value: Option<T>,
    published: u64,
    dropped: u64,
}

/// Counters describing slot traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotStats {
    /// Values published since creation.
    pub published: u64,
    /// Values overwritten before anyone took them.
    pub dropped: u64,
}

/// Single-value handoff cell; the value being present is the "ready" signal.
#[derive(Debug)]
pub struct PendingSlot<T> {
    state: Mutex<SlotState<T>>,
}

impl<T> PendingSlot<T> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                value: None,
                published: 0,
                dropped: 0,
            }),
        }
    }

    /// Store `value` and raise the ready signal.
    ///
    /// Returns the previously pending value if it was never taken.
    pub fn publish(&self, value: T) -> Option<T> {
        let mut state = self.state.lock();
        state.published += 1;
        let displaced = state.value.replace(value);
        if displaced.is_some() {
            state.dropped += 1;
        }
        displaced
    }

    /// Take the pending value and clear the ready signal.
    pub fn take(&self) -> Option<T> {
        self.state.lock().value.take()
    }

    /// Whether a value is waiting.
    pub fn is_ready(&self) -> bool {
        self.state.lock().value.is_some()
    }

    /// Traffic counters.
    pub fn stats(&self) -> SlotStats {
        let state = self.state.lock();
        SlotStats {
            published: state.published,
            dropped: state.dropped,
        }
    }
}

impl<T> Default for PendingSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
