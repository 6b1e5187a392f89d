//! Media repository trait

use async_trait::async_trait;
use jellyhome_model::{ItemId, LibraryView, MediaItem, UserItemData, ViewId};
use std::fmt::Debug;

use crate::infra::repository::RepositoryResult;

/// Read and bookkeeping operations against the user's media server
#[async_trait]
pub trait MediaRepository: Send + Sync + Debug {
    /// Announce what this client can play and which remote commands it
    /// accepts for the current session
    async fn post_capabilities(&self) -> RepositoryResult<()>;

    /// Partially watched items eligible for "continue watching"
    async fn resume_items(&self) -> RepositoryResult<Vec<MediaItem>>;

    /// Next unwatched episode of every in-progress series
    async fn next_up(&self) -> RepositoryResult<Vec<MediaItem>>;

    /// Library views visible to the user, in server order
    async fn user_views(&self) -> RepositoryResult<Vec<LibraryView>>;

    /// Most recently added items within a view
    async fn latest_media(
        &self,
        view_id: ViewId,
    ) -> RepositoryResult<Vec<MediaItem>>;

    // === Playback progress ===

    /// Server-side playback state for one item
    async fn item_user_data(
        &self,
        item_id: ItemId,
    ) -> RepositoryResult<UserItemData>;

    /// Report a playback position for an item
    async fn post_playback_progress(
        &self,
        item_id: ItemId,
        position_ticks: i64,
    ) -> RepositoryResult<()>;

    /// Flag an item as fully watched
    async fn mark_played(&self, item_id: ItemId) -> RepositoryResult<()>;
}
