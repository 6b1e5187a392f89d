//! Home screen display state

use jellyhome_model::{HomeView, MediaItem};

/// Which dynamic row a section represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    ContinueWatching,
    NextUp,
}

/// A titled row of media; never built for an empty fetch
#[derive(Debug, Clone, PartialEq)]
pub struct HomeSection {
    pub kind: SectionKind,
    pub title: String,
    pub items: Vec<MediaItem>,
}

impl HomeSection {
    /// `None` when there is nothing to show.
    pub fn non_empty(
        kind: SectionKind,
        title: String,
        items: Vec<MediaItem>,
    ) -> Option<Self> {
        if items.is_empty() {
            None
        } else {
            Some(Self { kind, title, items })
        }
    }
}

/// One row of the home screen, in display order
#[derive(Debug, Clone, PartialEq)]
pub enum HomeItem {
    Section(HomeSection),
    ViewItem(HomeView),
}

impl HomeItem {
    pub fn title(&self) -> &str {
        match self {
            HomeItem::Section(section) => &section.title,
            HomeItem::ViewItem(view) => &view.name,
        }
    }

    pub fn items(&self) -> &[MediaItem] {
        match self {
            HomeItem::Section(section) => &section.items,
            HomeItem::ViewItem(view) => &view.items,
        }
    }
}

/// Snapshot published to home screen observers
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState {
    #[default]
    Loading,
    Normal(Vec<HomeItem>),
    Error(Option<String>),
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    /// Normal or Error: the cycle that produced it has finished.
    pub fn is_settled(&self) -> bool {
        !self.is_loading()
    }
}
