use std::fmt::{self, Display, Formatter};

use crate::ids::ViewId;
use crate::item::MediaItem;

/// The kind of content a library view holds
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum CollectionType {
    Movies,
    TvShows,
    Music,
    MusicVideos,
    HomeVideos,
    BoxSets,
    Books,
    Photos,
    LiveTv,
    Playlists,
    Folders,
    Unknown(String),
}

/// Collection types the home screen never shows.
pub const UNSUPPORTED_COLLECTIONS: [CollectionType; 6] = [
    CollectionType::HomeVideos,
    CollectionType::Music,
    CollectionType::Playlists,
    CollectionType::Books,
    CollectionType::LiveTv,
    CollectionType::BoxSets,
];

impl CollectionType {
    pub fn as_str(&self) -> &str {
        match self {
            CollectionType::Movies => "movies",
            CollectionType::TvShows => "tvshows",
            CollectionType::Music => "music",
            CollectionType::MusicVideos => "musicvideos",
            CollectionType::HomeVideos => "homevideos",
            CollectionType::BoxSets => "boxsets",
            CollectionType::Books => "books",
            CollectionType::Photos => "photos",
            CollectionType::LiveTv => "livetv",
            CollectionType::Playlists => "playlists",
            CollectionType::Folders => "folders",
            CollectionType::Unknown(raw) => raw,
        }
    }

    pub fn is_supported(&self) -> bool {
        !UNSUPPORTED_COLLECTIONS.contains(self)
    }
}

impl From<&str> for CollectionType {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "movies" => CollectionType::Movies,
            "tvshows" => CollectionType::TvShows,
            "music" => CollectionType::Music,
            "musicvideos" => CollectionType::MusicVideos,
            "homevideos" => CollectionType::HomeVideos,
            "boxsets" => CollectionType::BoxSets,
            "books" => CollectionType::Books,
            "photos" => CollectionType::Photos,
            "livetv" => CollectionType::LiveTv,
            "playlists" => CollectionType::Playlists,
            "folders" => CollectionType::Folders,
            _ => CollectionType::Unknown(value.to_string()),
        }
    }
}

impl From<String> for CollectionType {
    fn from(value: String) -> Self {
        CollectionType::from(value.as_str())
    }
}

impl From<CollectionType> for String {
    fn from(kind: CollectionType) -> Self {
        kind.as_str().to_string()
    }
}

impl Display for CollectionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CollectionType::Movies => write!(f, "Movies"),
            CollectionType::TvShows => write!(f, "TV Shows"),
            CollectionType::Music => write!(f, "Music"),
            CollectionType::MusicVideos => write!(f, "Music Videos"),
            CollectionType::HomeVideos => write!(f, "Home Videos"),
            CollectionType::BoxSets => write!(f, "Collections"),
            CollectionType::Books => write!(f, "Books"),
            CollectionType::Photos => write!(f, "Photos"),
            CollectionType::LiveTv => write!(f, "Live TV"),
            CollectionType::Playlists => write!(f, "Playlists"),
            CollectionType::Folders => write!(f, "Folders"),
            CollectionType::Unknown(raw) => write!(f, "{raw}"),
        }
    }
}

/// A user-visible media collection as listed by the server
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LibraryView {
    pub id: ViewId,
    pub name: String,
    /// Mixed-content folders report no collection type
    pub collection_type: Option<CollectionType>,
}

impl LibraryView {
    /// Views without a collection type are shown.
    pub fn is_supported(&self) -> bool {
        self.collection_type
            .as_ref()
            .is_none_or(CollectionType::is_supported)
    }

    /// Attach the latest items fetched for this view.
    pub fn into_home_view(self, latest: Vec<MediaItem>) -> HomeView {
        HomeView {
            id: self.id,
            name: self.name,
            collection_type: self.collection_type,
            items: latest,
        }
    }
}

/// A library view carrying its most recently added items
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HomeView {
    pub id: ViewId,
    pub name: String,
    pub collection_type: Option<CollectionType>,
    pub items: Vec<MediaItem>,
}
