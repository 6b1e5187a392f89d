//! jellyhome client library
//!
//! `infra` holds the media-server seam (repository trait, HTTP client,
//! configuration, localization, task scopes); `domains` holds the home screen
//! coordinator and playback progress bookkeeping built on top of it.

pub mod domains;
pub mod infra;

pub use domains::home::{
    HomeCoordinator, HomeDependencies, HomeItem, HomeSection, UiState,
};
pub use infra::{
    BundledStrings, ClientConfig, JellyfinClient, LifecycleScope,
    RepositoryError, RepositoryResult,
};
