//! Playback progress reconciliation against a scripted server

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use jellyhome_client::domains::playback::{
    JsonProgressStore, LocalProgress, MemoryProgressStore, ProgressStore,
    SyncReport, sync_playback_progress,
};
use jellyhome_client::infra::RepositoryError;
use jellyhome_client::infra::testing::{
    RecordedCall, StubMediaRepository, StubOperation,
};
use jellyhome_model::{ItemId, UserItemData};
use uuid::Uuid;

fn item_id() -> ItemId {
    ItemId(Uuid::new_v4())
}

fn server_at(position_ticks: i64) -> UserItemData {
    UserItemData {
        playback_position_ticks: position_ticks,
        ..Default::default()
    }
}

#[tokio::test]
async fn empty_store_makes_no_requests() {
    let repo = StubMediaRepository::new();
    let report = sync_playback_progress(
        Arc::new(repo.clone()),
        Arc::new(MemoryProgressStore::default()),
    )
    .await
    .unwrap();

    assert_eq!(report, SyncReport::default());
    assert!(repo.calls().is_empty());
}

#[tokio::test]
async fn local_progress_ahead_is_pushed() {
    let id = item_id();
    let repo = StubMediaRepository::new().with_user_data(id, server_at(1_000));
    let store = Arc::new(MemoryProgressStore::new(vec![LocalProgress::new(
        id, 4_000,
    )]));

    let report = sync_playback_progress(Arc::new(repo.clone()), store.clone())
        .await
        .unwrap();

    assert_eq!(report.pushed, 1);
    assert_eq!(
        repo.calls(),
        vec![
            RecordedCall::ItemUserData(id),
            RecordedCall::PostPlaybackProgress(id, 4_000),
        ]
    );
    // Server caught up, so the local record is dropped
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn locally_played_item_is_marked_played() {
    let id = item_id();
    let repo = StubMediaRepository::new().with_user_data(id, server_at(7_000));
    let store = Arc::new(MemoryProgressStore::new(vec![LocalProgress {
        played: true,
        ..LocalProgress::new(id, 0)
    }]));

    sync_playback_progress(Arc::new(repo.clone()), store.clone())
        .await
        .unwrap();

    assert!(store.snapshot().is_empty());
    assert_eq!(repo.count(StubOperation::MarkPlayed), 1);
    assert_eq!(repo.count(StubOperation::PostPlaybackProgress), 0);
    assert!(repo.user_data(id).unwrap().played);
}

#[tokio::test]
async fn server_progress_ahead_is_pulled_into_the_store() {
    let id = item_id();
    let watched_at = Utc.with_ymd_and_hms(2024, 5, 1, 20, 15, 0).unwrap();
    let repo = StubMediaRepository::new().with_user_data(
        id,
        UserItemData {
            playback_position_ticks: 9_000,
            last_played_date: Some(watched_at),
            ..Default::default()
        },
    );
    let store = Arc::new(MemoryProgressStore::new(vec![LocalProgress::new(
        id, 2_000,
    )]));

    let report = sync_playback_progress(Arc::new(repo.clone()), store.clone())
        .await
        .unwrap();

    assert_eq!(report.pulled, 1);
    assert_eq!(repo.count(StubOperation::PostPlaybackProgress), 0);
    let record = &store.snapshot()[0];
    assert_eq!(record.position_ticks, 9_000);
    assert_eq!(record.updated_at, watched_at);
}

#[tokio::test]
async fn matching_records_are_left_alone() {
    let id = item_id();
    let repo = StubMediaRepository::new().with_user_data(id, server_at(3_000));
    let store = Arc::new(MemoryProgressStore::new(vec![LocalProgress::new(
        id, 3_000,
    )]));

    let report = sync_playback_progress(Arc::new(repo.clone()), store.clone())
        .await
        .unwrap();

    assert_eq!(store.snapshot().len(), 1);
    assert_eq!(
        report,
        SyncReport {
            pushed: 0,
            pulled: 0,
            unchanged: 1
        }
    );
    assert_eq!(repo.calls(), vec![RecordedCall::ItemUserData(id)]);
}

#[tokio::test]
async fn repository_failure_aborts_the_sync() {
    let first = item_id();
    let second = item_id();
    let repo = StubMediaRepository::new()
        .with_user_data(first, server_at(0))
        .with_user_data(second, server_at(0))
        .failing(
            StubOperation::PostPlaybackProgress,
            RepositoryError::Network("network down".into()),
        );
    let store = Arc::new(MemoryProgressStore::new(vec![
        LocalProgress::new(first, 10),
        LocalProgress::new(second, 20),
    ]));

    let err = sync_playback_progress(Arc::new(repo.clone()), store)
        .await
        .unwrap_err();

    assert_eq!(err, RepositoryError::Network("network down".into()));
    assert_eq!(repo.count(StubOperation::ItemUserData), 1);
}

#[tokio::test]
async fn pulled_progress_persists_to_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("playback_progress.json");
    let id = item_id();
    let store = JsonProgressStore::new(&path);
    store.save(&[LocalProgress::new(id, 100)]).unwrap();

    let repo = StubMediaRepository::new().with_user_data(
        id,
        UserItemData {
            played: true,
            ..Default::default()
        },
    );
    sync_playback_progress(Arc::new(repo), Arc::new(store))
        .await
        .unwrap();

    let reloaded = JsonProgressStore::new(&path).load().unwrap();
    assert_eq!(reloaded.len(), 1);
    assert!(reloaded[0].played);
    assert_eq!(reloaded[0].item_id, id);
}

#[tokio::test]
async fn records_played_on_both_sides_stop_being_checked() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("playback_progress.json");
    let id = item_id();
    JsonProgressStore::new(&path)
        .save(&[LocalProgress::new(id, 100)])
        .unwrap();
    let repo = StubMediaRepository::new().with_user_data(
        id,
        UserItemData {
            played: true,
            ..Default::default()
        },
    );

    // First pass pulls the played flag, second finds both sides played
    for _ in 0..2 {
        sync_playback_progress(
            Arc::new(repo.clone()),
            Arc::new(JsonProgressStore::new(&path)),
        )
        .await
        .unwrap();
    }
    assert!(JsonProgressStore::new(&path).load().unwrap().is_empty());

    let report = sync_playback_progress(
        Arc::new(repo.clone()),
        Arc::new(JsonProgressStore::new(&path)),
    )
    .await
    .unwrap();
    assert_eq!(report, SyncReport::default());
    assert_eq!(repo.count(StubOperation::ItemUserData), 2);
}

#[tokio::test]
async fn corrupt_store_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("playback_progress.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = sync_playback_progress(
        Arc::new(StubMediaRepository::new()),
        Arc::new(JsonProgressStore::new(&path)),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, RepositoryError::Storage(_)));
}
