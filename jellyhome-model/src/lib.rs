//! Data model definitions shared across jellyhome crates.
#![allow(missing_docs)]

pub mod ids;
pub mod item;
pub mod library;

pub use ids::{ItemId, UserId, ViewId};
pub use item::{
    ItemKind, MediaItem, TICKS_PER_MILLISECOND, TICKS_PER_SECOND,
    UserItemData,
};
pub use library::{
    CollectionType, HomeView, LibraryView, UNSUPPORTED_COLLECTIONS,
};
