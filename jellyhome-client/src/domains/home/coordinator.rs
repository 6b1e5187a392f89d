//! Home screen coordinator
//!
//! Runs load cycles against the media repository and publishes the outcome
//! into a [`StateCell`]. A cycle always emits `Loading` first and then exactly
//! one of `Normal` or `Error`; partial results are never published.
//!
//! Overlapping cycles (a `refresh` while another cycle is still running) are
//! neither serialized nor cancelled. Whichever finishes last decides the
//! visible state.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domains::playback::{ProgressStore, sync_playback_progress};
use crate::infra::repository::{RepositoryError, RepositoryResult};
use crate::infra::scope::LifecycleScope;
use crate::infra::services::MediaRepository;
use crate::infra::strings::StringResource;

use super::cell::{StateCell, StateSubscription};
use super::sections;
use super::state::{HomeItem, UiState};

/// Collaborators supplied at composition time
#[derive(Debug, Clone)]
pub struct HomeDependencies {
    pub repository: Arc<dyn MediaRepository>,
    pub strings: Arc<dyn StringResource>,
    pub progress_store: Arc<dyn ProgressStore>,
}

#[derive(Debug)]
struct Shared {
    deps: HomeDependencies,
    state: StateCell,
    in_flight: AtomicUsize,
}

/// Handle of a spawned load cycle; resolves to `None` if the coordinator's
/// scope was cancelled before the cycle finished.
pub type LoadHandle = JoinHandle<Option<()>>;

#[derive(Debug)]
pub struct HomeCoordinator {
    shared: Arc<Shared>,
    scope: LifecycleScope,
    initial_load: Mutex<Option<LoadHandle>>,
}

impl HomeCoordinator {
    /// Build the coordinator and start the initial load, which also posts
    /// client capabilities. Cycles run in a child of `scope`.
    pub fn new(deps: HomeDependencies, scope: &LifecycleScope) -> Self {
        let coordinator = Self {
            shared: Arc::new(Shared {
                deps,
                state: StateCell::new(UiState::Loading),
                in_flight: AtomicUsize::new(0),
            }),
            scope: scope.child(),
            initial_load: Mutex::new(None),
        };
        let handle = coordinator.spawn_load(true);
        *coordinator.initial_load.lock() = Some(handle);
        coordinator
    }

    /// Handle of the load started by [`HomeCoordinator::new`]; `None` after
    /// the first call.
    pub fn take_initial_load(&self) -> Option<LoadHandle> {
        self.initial_load.lock().take()
    }

    /// Start a load cycle without re-posting capabilities.
    pub fn refresh(&self) -> LoadHandle {
        self.spawn_load(false)
    }

    pub fn current_state(&self) -> UiState {
        self.shared.state.current()
    }

    /// Ordered stream starting with the current state.
    pub fn subscribe(&self) -> StateSubscription {
        self.shared.state.subscribe()
    }

    /// Conflated view for consumers that only render the latest state.
    pub fn watch(&self) -> watch::Receiver<UiState> {
        self.shared.state.watch()
    }

    /// Feed every state, current one first, to `collector` until `scope` is
    /// cancelled or the coordinator is dropped.
    pub fn on_ui_state<F>(
        &self,
        scope: &LifecycleScope,
        mut collector: F,
    ) -> JoinHandle<Option<()>>
    where
        F: FnMut(UiState) + Send + 'static,
    {
        let mut subscription = self.subscribe();
        scope.spawn(async move {
            while let Some(state) = subscription.next().await {
                collector(state);
            }
        })
    }

    /// Stop in-flight cycles. Also happens on drop.
    pub fn close(&self) {
        self.scope.cancel();
    }

    fn spawn_load(&self, update_capabilities: bool) -> LoadHandle {
        let shared = Arc::clone(&self.shared);
        let scope = self.scope.clone();
        self.scope
            .spawn(load_data(shared, scope, update_capabilities))
    }
}

impl Drop for HomeCoordinator {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> (Self, usize) {
        let others = counter.fetch_add(1, Ordering::AcqRel);
        (Self(counter), others)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

async fn load_data(
    shared: Arc<Shared>,
    scope: LifecycleScope,
    update_capabilities: bool,
) {
    let (_guard, others) = InFlight::enter(&shared.in_flight);
    if others > 0 {
        log::debug!(
            "[Home] Load cycle started while {others} other cycle(s) are in flight; last to finish wins"
        );
    }
    log::debug!(
        "[Home] Load cycle started (update_capabilities = {update_capabilities})"
    );

    shared.state.emit(UiState::Loading);

    let next = match run_cycle(&shared, &scope, update_capabilities).await {
        Ok(items) => {
            log::debug!("[Home] Load cycle finished with {} rows", items.len());
            UiState::Normal(items)
        }
        Err(err) => UiState::Error(err.message()),
    };
    shared.state.emit(next);
}

async fn run_cycle(
    shared: &Shared,
    scope: &LifecycleScope,
    update_capabilities: bool,
) -> RepositoryResult<Vec<HomeItem>> {
    let repository = shared.deps.repository.as_ref();

    if update_capabilities {
        repository.post_capabilities().await?;
    }

    let mut items =
        sections::load_dynamic_items(repository, shared.deps.strings.as_ref())
            .await?;
    items.extend(sections::load_views(repository).await?);

    // Progress sync runs as its own task, off the fetch path
    let sync = scope.spawn(sync_playback_progress(
        Arc::clone(&shared.deps.repository),
        Arc::clone(&shared.deps.progress_store),
    ));
    match sync.await? {
        Some(report) => {
            report?;
        }
        None => {
            return Err(RepositoryError::Task(
                "playback progress sync cancelled".into(),
            ));
        }
    }

    Ok(items)
}
