//! Scripted in-memory media repository

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use jellyhome_model::{
    CollectionType, ItemId, ItemKind, LibraryView, MediaItem, UserItemData,
    ViewId,
};
use parking_lot::Mutex;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::infra::repository::{RepositoryError, RepositoryResult};
use crate::infra::services::MediaRepository;

/// Repository operations, for failure injection and gating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StubOperation {
    PostCapabilities,
    ResumeItems,
    NextUp,
    UserViews,
    LatestMedia,
    ItemUserData,
    PostPlaybackProgress,
    MarkPlayed,
}

/// One call as the stub saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    PostCapabilities,
    ResumeItems,
    NextUp,
    UserViews,
    LatestMedia(ViewId),
    ItemUserData(ItemId),
    PostPlaybackProgress(ItemId, i64),
    MarkPlayed(ItemId),
}

impl RecordedCall {
    pub fn operation(&self) -> StubOperation {
        match self {
            RecordedCall::PostCapabilities => StubOperation::PostCapabilities,
            RecordedCall::ResumeItems => StubOperation::ResumeItems,
            RecordedCall::NextUp => StubOperation::NextUp,
            RecordedCall::UserViews => StubOperation::UserViews,
            RecordedCall::LatestMedia(_) => StubOperation::LatestMedia,
            RecordedCall::ItemUserData(_) => StubOperation::ItemUserData,
            RecordedCall::PostPlaybackProgress(..) => {
                StubOperation::PostPlaybackProgress
            }
            RecordedCall::MarkPlayed(_) => StubOperation::MarkPlayed,
        }
    }
}

#[derive(Debug, Default)]
struct StubState {
    resume: Vec<MediaItem>,
    next_up: Vec<MediaItem>,
    views: Vec<LibraryView>,
    latest: HashMap<ViewId, Vec<MediaItem>>,
    user_data: HashMap<ItemId, UserItemData>,
    failures: HashMap<StubOperation, RepositoryError>,
    gates: HashMap<StubOperation, Arc<Notify>>,
    calls: Vec<RecordedCall>,
}

/// Cloning shares the script and call log
#[derive(Debug, Clone, Default)]
pub struct StubMediaRepository {
    inner: Arc<Mutex<StubState>>,
}

impl StubMediaRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resume(self, items: Vec<MediaItem>) -> Self {
        self.inner.lock().resume = items;
        self
    }

    pub fn with_next_up(self, items: Vec<MediaItem>) -> Self {
        self.inner.lock().next_up = items;
        self
    }

    pub fn with_views(self, views: Vec<LibraryView>) -> Self {
        self.inner.lock().views = views;
        self
    }

    pub fn with_latest(self, view_id: ViewId, items: Vec<MediaItem>) -> Self {
        self.inner.lock().latest.insert(view_id, items);
        self
    }

    pub fn with_user_data(self, item_id: ItemId, data: UserItemData) -> Self {
        self.inner.lock().user_data.insert(item_id, data);
        self
    }

    pub fn failing(self, operation: StubOperation, error: RepositoryError) -> Self {
        self.fail(operation, error);
        self
    }

    pub fn set_resume(&self, items: Vec<MediaItem>) {
        self.inner.lock().resume = items;
    }

    pub fn fail(&self, operation: StubOperation, error: RepositoryError) {
        self.inner.lock().failures.insert(operation, error);
    }

    pub fn clear_failure(&self, operation: StubOperation) {
        self.inner.lock().failures.remove(&operation);
    }

    /// The next call of `operation` waits until the returned notify fires.
    pub fn hold(&self, operation: StubOperation) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.inner.lock().gates.insert(operation, Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.lock().calls.clone()
    }

    pub fn count(&self, operation: StubOperation) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    pub fn user_data(&self, item_id: ItemId) -> Option<UserItemData> {
        self.inner.lock().user_data.get(&item_id).cloned()
    }

    async fn enter(&self, call: RecordedCall) -> RepositoryResult<()> {
        let operation = call.operation();
        let gate = {
            let mut state = self.inner.lock();
            state.calls.push(call);
            state.gates.remove(&operation)
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match self.inner.lock().failures.get(&operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MediaRepository for StubMediaRepository {
    async fn post_capabilities(&self) -> RepositoryResult<()> {
        self.enter(RecordedCall::PostCapabilities).await
    }

    async fn resume_items(&self) -> RepositoryResult<Vec<MediaItem>> {
        self.enter(RecordedCall::ResumeItems).await?;
        Ok(self.inner.lock().resume.clone())
    }

    async fn next_up(&self) -> RepositoryResult<Vec<MediaItem>> {
        self.enter(RecordedCall::NextUp).await?;
        Ok(self.inner.lock().next_up.clone())
    }

    async fn user_views(&self) -> RepositoryResult<Vec<LibraryView>> {
        self.enter(RecordedCall::UserViews).await?;
        Ok(self.inner.lock().views.clone())
    }

    async fn latest_media(
        &self,
        view_id: ViewId,
    ) -> RepositoryResult<Vec<MediaItem>> {
        self.enter(RecordedCall::LatestMedia(view_id)).await?;
        Ok(self
            .inner
            .lock()
            .latest
            .get(&view_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn item_user_data(
        &self,
        item_id: ItemId,
    ) -> RepositoryResult<UserItemData> {
        self.enter(RecordedCall::ItemUserData(item_id)).await?;
        self.inner
            .lock()
            .user_data
            .get(&item_id)
            .cloned()
            .ok_or_else(|| RepositoryError::Status {
                status: 404,
                body: format!("item {item_id} not found"),
            })
    }

    async fn post_playback_progress(
        &self,
        item_id: ItemId,
        position_ticks: i64,
    ) -> RepositoryResult<()> {
        self.enter(RecordedCall::PostPlaybackProgress(item_id, position_ticks))
            .await?;
        let mut state = self.inner.lock();
        let data = state.user_data.entry(item_id).or_default();
        data.playback_position_ticks = position_ticks;
        Ok(())
    }

    async fn mark_played(&self, item_id: ItemId) -> RepositoryResult<()> {
        self.enter(RecordedCall::MarkPlayed(item_id)).await?;
        let mut state = self.inner.lock();
        let data = state.user_data.entry(item_id).or_default();
        data.played = true;
        data.playback_position_ticks = 0;
        Ok(())
    }
}

pub fn media_item(name: &str, kind: ItemKind) -> MediaItem {
    MediaItem::new(ItemId(Uuid::new_v4()), name, kind)
}

pub fn library_view(
    name: &str,
    collection_type: Option<CollectionType>,
) -> LibraryView {
    LibraryView {
        id: ViewId(Uuid::new_v4()),
        name: name.to_string(),
        collection_type,
    }
}
