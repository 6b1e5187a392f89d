//! Playback progress bookkeeping and server reconciliation

pub mod progress_store;
pub mod progress_sync;

pub use progress_store::{
    JsonProgressStore, LocalProgress, MemoryProgressStore, ProgressStore,
};
pub use progress_sync::{
    Resolution, SyncReport, reconcile, sync_playback_progress,
};
