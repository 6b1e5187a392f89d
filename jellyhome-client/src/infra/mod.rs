pub mod api_client;
pub mod api_types;
pub mod capabilities;
pub mod config;
pub mod repository;
pub mod scope;
pub mod services;
pub mod strings;
pub mod testing;

pub use api_client::JellyfinClient;
pub use config::{ClientConfig, ConfigError};
pub use repository::{RepositoryError, RepositoryResult};
pub use scope::LifecycleScope;
pub use strings::{BundledStrings, StringKey, StringResource};
