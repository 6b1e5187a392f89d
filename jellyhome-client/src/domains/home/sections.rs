//! Assembly of home rows from repository fetches
//!
//! Fetches are issued one at a time; the first failure aborts assembly.

use crate::infra::repository::RepositoryResult;
use crate::infra::services::MediaRepository;
use crate::infra::strings::{StringKey, StringResource};

use super::state::{HomeItem, HomeSection, SectionKind};

/// "Continue watching" then "next up", each only when non-empty.
pub async fn load_dynamic_items(
    repository: &dyn MediaRepository,
    strings: &dyn StringResource,
) -> RepositoryResult<Vec<HomeItem>> {
    let resume_items = repository.resume_items().await?;
    let next_up_items = repository.next_up().await?;

    let sections = [
        HomeSection::non_empty(
            SectionKind::ContinueWatching,
            strings.resolve(StringKey::ContinueWatching),
            resume_items,
        ),
        HomeSection::non_empty(
            SectionKind::NextUp,
            strings.resolve(StringKey::NextUp),
            next_up_items,
        ),
    ];

    Ok(sections
        .into_iter()
        .flatten()
        .map(HomeItem::Section)
        .collect())
}

/// Supported views with at least one latest item, in server order.
pub async fn load_views(
    repository: &dyn MediaRepository,
) -> RepositoryResult<Vec<HomeItem>> {
    let views = repository.user_views().await?;

    let mut items = Vec::with_capacity(views.len());
    for view in views.into_iter().filter(|view| view.is_supported()) {
        let latest = repository.latest_media(view.id).await?;
        if latest.is_empty() {
            log::trace!("[Home] Skipping view '{}': no latest media", view.name);
            continue;
        }
        items.push(HomeItem::ViewItem(view.into_home_view(latest)));
    }

    Ok(items)
}
