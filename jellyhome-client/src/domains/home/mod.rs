//! Home screen domain
//!
//! [`HomeCoordinator`] loads the "continue watching", "next up" and
//! per-library "latest" rows and publishes them as a [`UiState`].

pub mod cell;
pub mod coordinator;
pub mod sections;
pub mod state;

pub use cell::{StateCell, StateSubscription};
pub use coordinator::{HomeCoordinator, HomeDependencies, LoadHandle};
pub use state::{HomeItem, HomeSection, SectionKind, UiState};
