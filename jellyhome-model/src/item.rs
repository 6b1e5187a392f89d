use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};

use crate::ids::ItemId;

/// Server clock ticks per millisecond (100ns resolution).
pub const TICKS_PER_MILLISECOND: i64 = 10_000;

/// Server clock ticks per second.
pub const TICKS_PER_SECOND: i64 = TICKS_PER_MILLISECOND * 1_000;

/// Kind of an item as reported by the server
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum ItemKind {
    Movie,
    Series,
    Season,
    Episode,
    Video,
    BoxSet,
    Folder,
    Other(String),
}

impl ItemKind {
    pub fn as_str(&self) -> &str {
        match self {
            ItemKind::Movie => "Movie",
            ItemKind::Series => "Series",
            ItemKind::Season => "Season",
            ItemKind::Episode => "Episode",
            ItemKind::Video => "Video",
            ItemKind::BoxSet => "BoxSet",
            ItemKind::Folder => "Folder",
            ItemKind::Other(raw) => raw,
        }
    }
}

impl From<&str> for ItemKind {
    fn from(value: &str) -> Self {
        match value {
            "Movie" => ItemKind::Movie,
            "Series" => ItemKind::Series,
            "Season" => ItemKind::Season,
            "Episode" => ItemKind::Episode,
            "Video" => ItemKind::Video,
            "BoxSet" => ItemKind::BoxSet,
            "Folder" | "CollectionFolder" => ItemKind::Folder,
            other => ItemKind::Other(other.to_string()),
        }
    }
}

impl From<String> for ItemKind {
    fn from(value: String) -> Self {
        ItemKind::from(value.as_str())
    }
}

impl From<ItemKind> for String {
    fn from(kind: ItemKind) -> Self {
        kind.as_str().to_string()
    }
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-user playback bookkeeping the server keeps for an item
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserItemData {
    pub playback_position_ticks: i64,
    pub played_percentage: Option<f64>,
    pub played: bool,
    pub is_favorite: bool,
    pub last_played_date: Option<DateTime<Utc>>,
}

/// Summary of a media item as shown on the home screen
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaItem {
    pub id: ItemId,
    pub name: String,
    pub kind: ItemKind,
    /// Owning series for episodes
    pub series_name: Option<String>,
    pub season_number: Option<u32>,
    pub episode_number: Option<u32>,
    pub production_year: Option<i32>,
    pub run_time_ticks: Option<i64>,
    pub primary_image_tag: Option<String>,
    pub user_data: Option<UserItemData>,
}

impl MediaItem {
    pub fn new(id: ItemId, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            series_name: None,
            season_number: None,
            episode_number: None,
            production_year: None,
            run_time_ticks: None,
            primary_image_tag: None,
            user_data: None,
        }
    }

    /// Fraction of the runtime already watched, in `0.0..=1.0`.
    pub fn progress(&self) -> Option<f64> {
        let data = self.user_data.as_ref()?;
        if let Some(percentage) = data.played_percentage {
            return Some((percentage / 100.0).clamp(0.0, 1.0));
        }
        let total = self.run_time_ticks.filter(|t| *t > 0)?;
        Some((data.playback_position_ticks as f64 / total as f64).clamp(0.0, 1.0))
    }

    /// "S01E02 - Title" style label for episodes, plain name otherwise.
    pub fn display_title(&self) -> String {
        match (&self.kind, self.season_number, self.episode_number) {
            (ItemKind::Episode, Some(season), Some(episode)) => {
                format!("S{season:02}E{episode:02} - {}", self.name)
            }
            _ => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn item(kind: ItemKind) -> MediaItem {
        MediaItem::new(ItemId(Uuid::nil()), "Pilot", kind)
    }

    #[test]
    fn unknown_kinds_are_preserved() {
        let kind = ItemKind::from("AudioBook");
        assert_eq!(kind, ItemKind::Other("AudioBook".into()));
        assert_eq!(kind.to_string(), "AudioBook");
    }

    #[test]
    fn episode_titles_carry_numbering() {
        let mut episode = item(ItemKind::Episode);
        episode.season_number = Some(1);
        episode.episode_number = Some(2);
        assert_eq!(episode.display_title(), "S01E02 - Pilot");
        assert_eq!(item(ItemKind::Movie).display_title(), "Pilot");
    }

    #[test]
    fn progress_prefers_reported_percentage() {
        let mut movie = item(ItemKind::Movie);
        movie.run_time_ticks = Some(100 * TICKS_PER_SECOND);
        movie.user_data = Some(UserItemData {
            playback_position_ticks: 25 * TICKS_PER_SECOND,
            ..Default::default()
        });
        assert_eq!(movie.progress(), Some(0.25));

        if let Some(data) = movie.user_data.as_mut() {
            data.played_percentage = Some(50.0);
        }
        assert_eq!(movie.progress(), Some(0.5));
    }
}
