//! Reconcile local playback progress with the server
//!
//! The further-along side wins: progress made on this device is pushed to the
//! server, progress made elsewhere is pulled into the local records.

use std::sync::Arc;

use chrono::Utc;
use jellyhome_model::UserItemData;

use crate::infra::repository::RepositoryResult;
use crate::infra::services::MediaRepository;

use super::progress_store::{LocalProgress, ProgressStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    PushLocal,
    PullServer,
    InSync,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub pushed: usize,
    pub pulled: usize,
    pub unchanged: usize,
}

pub fn reconcile(local: &LocalProgress, server: &UserItemData) -> Resolution {
    match (local.played, server.played) {
        (true, false) => Resolution::PushLocal,
        (false, true) => Resolution::PullServer,
        (true, true) => Resolution::InSync,
        (false, false) => {
            match local.position_ticks.cmp(&server.playback_position_ticks) {
                std::cmp::Ordering::Greater => Resolution::PushLocal,
                std::cmp::Ordering::Less => Resolution::PullServer,
                std::cmp::Ordering::Equal => Resolution::InSync,
            }
        }
    }
}

/// Walk every local record and bring it and the server in line. Records the
/// server has caught up with (pushed, or played on both sides) are dropped
/// from the store. Store I/O runs on the blocking pool; the first repository
/// or store error aborts.
pub async fn sync_playback_progress(
    repository: Arc<dyn MediaRepository>,
    store: Arc<dyn ProgressStore>,
) -> RepositoryResult<SyncReport> {
    let loader = Arc::clone(&store);
    let records = tokio::task::spawn_blocking(move || loader.load()).await??;

    let mut report = SyncReport::default();
    if records.is_empty() {
        return Ok(report);
    }

    let loaded = records.len();
    let mut kept = Vec::with_capacity(loaded);
    for mut record in records {
        let server = repository.item_user_data(record.item_id).await?;
        match reconcile(&record, &server) {
            Resolution::PushLocal => {
                if record.played {
                    repository.mark_played(record.item_id).await?;
                } else {
                    repository
                        .post_playback_progress(
                            record.item_id,
                            record.position_ticks,
                        )
                        .await?;
                }
                report.pushed += 1;
                // Server now holds this progress
                continue;
            }
            Resolution::PullServer => {
                record.position_ticks = server.playback_position_ticks;
                record.played = server.played;
                record.updated_at =
                    server.last_played_date.unwrap_or_else(Utc::now);
                report.pulled += 1;
            }
            Resolution::InSync => {
                report.unchanged += 1;
                if record.played {
                    continue;
                }
            }
        }
        kept.push(record);
    }

    if report.pulled > 0 || kept.len() != loaded {
        tokio::task::spawn_blocking(move || store.save(&kept)).await??;
    }

    log::debug!(
        "[ProgressSync] pushed {}, pulled {}, unchanged {}",
        report.pushed,
        report.pulled,
        report.unchanged
    );
    Ok(report)
}
