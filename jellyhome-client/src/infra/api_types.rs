//! Wire types for the Jellyfin REST API and their conversion into models

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use jellyhome_model::{
    CollectionType, ItemId, ItemKind, LibraryView, MediaItem, UserItemData,
    ViewId,
};
use serde::{Deserialize, Serialize};

use crate::infra::repository::{RepositoryError, RepositoryResult};

/// Paged envelope used by list endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryResult<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total_record_count: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserItemDataDto {
    #[serde(default)]
    pub playback_position_ticks: i64,
    pub played_percentage: Option<f64>,
    #[serde(default)]
    pub played: bool,
    #[serde(default)]
    pub is_favorite: bool,
    pub last_played_date: Option<DateTime<Utc>>,
}

impl From<UserItemDataDto> for UserItemData {
    fn from(dto: UserItemDataDto) -> Self {
        Self {
            playback_position_ticks: dto.playback_position_ticks,
            played_percentage: dto.played_percentage,
            played: dto.played,
            is_favorite: dto.is_favorite,
            last_played_date: dto.last_played_date,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BaseItemDto {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "Type", default)]
    pub item_type: Option<String>,
    pub collection_type: Option<String>,
    pub series_name: Option<String>,
    pub parent_index_number: Option<u32>,
    pub index_number: Option<u32>,
    pub production_year: Option<i32>,
    pub run_time_ticks: Option<i64>,
    #[serde(default)]
    pub image_tags: HashMap<String, String>,
    pub user_data: Option<UserItemDataDto>,
}

impl BaseItemDto {
    fn parse_id<T: std::str::FromStr>(&self) -> RepositoryResult<T> {
        self.id.parse().map_err(|_| {
            RepositoryError::Deserialization(format!(
                "invalid item id '{}'",
                self.id
            ))
        })
    }

    pub fn into_media_item(self) -> RepositoryResult<MediaItem> {
        let id: ItemId = self.parse_id()?;
        let kind = self
            .item_type
            .as_deref()
            .map(ItemKind::from)
            .unwrap_or_else(|| ItemKind::Other(String::new()));
        Ok(MediaItem {
            id,
            name: self.name.unwrap_or_default(),
            kind,
            series_name: self.series_name,
            season_number: self.parent_index_number,
            episode_number: self.index_number,
            production_year: self.production_year,
            run_time_ticks: self.run_time_ticks,
            primary_image_tag: self.image_tags.get("Primary").cloned(),
            user_data: self.user_data.map(UserItemData::from),
        })
    }

    pub fn into_library_view(self) -> RepositoryResult<LibraryView> {
        let id: ViewId = self.parse_id()?;
        Ok(LibraryView {
            id,
            name: self.name.unwrap_or_default(),
            collection_type: self
                .collection_type
                .as_deref()
                .map(CollectionType::from),
        })
    }
}

pub fn into_media_items(
    dtos: Vec<BaseItemDto>,
) -> RepositoryResult<Vec<MediaItem>> {
    dtos.into_iter().map(BaseItemDto::into_media_item).collect()
}

pub fn into_library_views(
    dtos: Vec<BaseItemDto>,
) -> RepositoryResult<Vec<LibraryView>> {
    dtos.into_iter().map(BaseItemDto::into_library_view).collect()
}

/// Body of `POST /Sessions/Playing/Progress`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PlaybackProgressInfo {
    pub item_id: String,
    pub position_ticks: i64,
    pub is_paused: bool,
    pub can_seek: bool,
    pub play_method: &'static str,
}

impl PlaybackProgressInfo {
    pub fn paused_at(item_id: ItemId, position_ticks: i64) -> Self {
        Self {
            item_id: item_id.as_str(),
            position_ticks,
            is_paused: true,
            can_seek: true,
            play_method: "DirectPlay",
        }
    }
}
