//! Single-slot state cell
//!
//! Holds exactly one [`UiState`]. New subscribers first receive the current
//! value, then every later change in emission order. Emitting a value equal to
//! the current one is a no-op.

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};

use super::state::UiState;

#[derive(Debug)]
pub struct StateCell {
    slot: watch::Sender<UiState>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<UiState>>>,
}

impl StateCell {
    pub fn new(initial: UiState) -> Self {
        let (slot, _) = watch::channel(initial);
        Self {
            slot,
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn current(&self) -> UiState {
        self.slot.borrow().clone()
    }

    /// Returns false when `state` equals the current value.
    pub fn emit(&self, state: UiState) -> bool {
        let mut subscribers = self.subscribers.lock();
        if *self.slot.borrow() == state {
            return false;
        }
        subscribers.retain(|tx| tx.send(state.clone()).is_ok());
        self.slot.send_replace(state);
        true
    }

    pub fn subscribe(&self) -> StateSubscription {
        let mut subscribers = self.subscribers.lock();
        let (tx, rx) = mpsc::unbounded_channel();
        // Receiver is alive, send cannot fail
        let _ = tx.send(self.current());
        subscribers.push(tx);
        StateSubscription { rx }
    }

    /// Conflated view that only ever exposes the latest value.
    pub fn watch(&self) -> watch::Receiver<UiState> {
        self.slot.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new(UiState::Loading)
    }
}

/// Lossless, ordered stream of states for one observer
#[derive(Debug)]
pub struct StateSubscription {
    rx: mpsc::UnboundedReceiver<UiState>,
}

impl StateSubscription {
    /// Next state, or `None` once the owning cell is gone.
    pub async fn next(&mut self) -> Option<UiState> {
        self.rx.recv().await
    }

    /// Next state if one is already queued.
    pub fn try_next(&mut self) -> Option<UiState> {
        self.rx.try_recv().ok()
    }

    /// Wait for the first Normal or Error state.
    pub async fn settled(&mut self) -> Option<UiState> {
        while let Some(state) = self.next().await {
            if state.is_settled() {
                return Some(state);
            }
        }
        None
    }
}
