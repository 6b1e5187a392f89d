//! Records published home states for assertions

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::domains::home::{HomeCoordinator, UiState};
use crate::infra::scope::LifecycleScope;

#[derive(Debug, Clone, Default)]
pub struct StateRecorder {
    states: Arc<Mutex<Vec<UiState>>>,
    changed: Arc<Notify>,
}

impl StateRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every state `coordinator` publishes while `scope` is alive.
    pub fn attach(coordinator: &HomeCoordinator, scope: &LifecycleScope) -> Self {
        let recorder = Self::new();
        let sink = recorder.clone();
        coordinator.on_ui_state(scope, move |state| sink.record(state));
        recorder
    }

    pub fn record(&self, state: UiState) {
        self.states.lock().push(state);
        self.changed.notify_waiters();
    }

    pub fn states(&self) -> Vec<UiState> {
        self.states.lock().clone()
    }

    pub fn last(&self) -> Option<UiState> {
        self.states.lock().last().cloned()
    }

    /// Wait until at least `count` states were recorded, or `timeout` passes.
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<UiState> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let notified = self.changed.notified();
            let states = self.states();
            if states.len() >= count {
                return states;
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.states();
            }
        }
    }
}
