use std::path::{Path, PathBuf};
use std::time::Duration;

use jellyhome_model::UserId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_SERVER_URL: &str = "JELLYHOME_SERVER_URL";
pub const ENV_USER_ID: &str = "JELLYHOME_USER_ID";
pub const ENV_ACCESS_TOKEN: &str = "JELLYHOME_ACCESS_TOKEN";

const APP_DIR: &str = "jellyhome";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config file {0} does not exist")]
    Missing(PathBuf),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Base URL with a lowercase `http`/`https` scheme (`http` when none is
/// given) and no trailing slash.
pub fn normalize_server_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid("server_url is empty".into()));
    }

    let normalized = match trimmed.split_once("://") {
        Some((scheme, rest)) => {
            let scheme = scheme.to_ascii_lowercase();
            if scheme != "http" && scheme != "https" {
                return Err(ConfigError::Invalid(format!(
                    "server_url '{raw}' must use http or https"
                )));
            }
            format!("{scheme}://{rest}")
        }
        None => format!("http://{trimmed}"),
    };

    url::Url::parse(&normalized).map_err(|e| {
        ConfigError::Invalid(format!("server_url '{raw}' is not a valid URL: {e}"))
    })?;
    Ok(normalized)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    pub user_id: Option<UserId>,
    pub access_token: Option<String>,
    pub client_name: String,
    pub client_version: String,
    pub device_name: String,
    pub device_id: String,
    /// BCP 47 tag used for section titles
    pub locale: String,
    pub request_timeout_secs: u64,
    /// Local playback progress records; defaults under the data dir
    pub progress_store_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8096".to_string(),
            user_id: None,
            access_token: None,
            client_name: "jellyhome".to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            device_name: "jellyhome".to_string(),
            device_id: uuid::Uuid::new_v4().simple().to_string(),
            locale: "en".to_string(),
            request_timeout_secs: 30,
            progress_store_path: None,
        }
    }
}

impl ClientConfig {
    /// Default location of the config file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from the default path and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_path().as_deref(), |key| {
            std::env::var(key).ok()
        })
    }

    /// Like [`ClientConfig::load_from`], but the file must already exist.
    pub fn open(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }
        Self::load_from(Some(path), env)
    }

    /// Config file (or defaults), then environment overrides for server and
    /// credentials.
    ///
    /// The device id must stay stable across runs, so when the file is
    /// missing or has none, the file is written back with the generated id.
    /// Environment overrides are never written.
    pub fn load_from(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::read_or_init(path)?,
            None => Self::default(),
        };

        if let Some(server_url) = env(ENV_SERVER_URL) {
            config.server_url = server_url;
        }
        if let Some(raw) = env(ENV_USER_ID) {
            let user_id = raw.parse().map_err(|_| {
                ConfigError::Invalid(format!("{ENV_USER_ID} is not an id: {raw}"))
            })?;
            config.user_id = Some(user_id);
        }
        if let Some(token) = env(ENV_ACCESS_TOKEN) {
            config.access_token = Some(token);
        }

        Ok(config)
    }

    fn read_or_init(path: &Path) -> Result<Self, ConfigError> {
        let parse_err = |source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        };

        let (config, has_device_id) = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            let value: serde_json::Value =
                serde_json::from_str(&content).map_err(parse_err)?;
            let has_device_id = value
                .get("device_id")
                .and_then(serde_json::Value::as_str)
                .is_some_and(|id| !id.trim().is_empty());
            let config: Self =
                serde_json::from_value(value).map_err(parse_err)?;
            (config, has_device_id)
        } else {
            (Self::default(), false)
        };

        if !has_device_id {
            match config.save_to(path) {
                Ok(()) => log::info!(
                    "[Config] Stored device id {} in {}",
                    config.device_id,
                    path.display()
                ),
                // Unwritable config dir: run with an ephemeral device id
                Err(e) => log::warn!("[Config] {e}"),
            }
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_server_url(&self.server_url)?;
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than zero".into(),
            ));
        }
        if self.device_id.trim().is_empty() {
            return Err(ConfigError::Invalid("device_id is empty".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn progress_store_path(&self) -> Option<PathBuf> {
        self.progress_store_path.clone().or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join(APP_DIR).join("playback_progress.json"))
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        std::fs::write(path, content).map_err(io_err)
    }
}
