use async_trait::async_trait;
use jellyhome_model::{ItemId, LibraryView, MediaItem, UserId, UserItemData, ViewId};
use log::{info, warn};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use crate::infra::api_types::{
    BaseItemDto, PlaybackProgressInfo, QueryResult, into_library_views,
    into_media_items,
};
use crate::infra::capabilities::ClientCapabilities;
use crate::infra::config::{ClientConfig, normalize_server_url};
use crate::infra::repository::{RepositoryError, RepositoryResult};
use crate::infra::services::MediaRepository;

/// Image types requested alongside list results
const IMAGE_TYPES: &str = "Primary,Backdrop,Thumb";
const FIELDS: &str = "PrimaryImageAspectRatio,DateCreated";

/// Jellyfin HTTP client implementing [`MediaRepository`]
#[derive(Clone)]
pub struct JellyfinClient {
    client: Client,
    base_url: String,
    user_id: Option<UserId>,
    authorization: String,
    capabilities: ClientCapabilities,
}

impl std::fmt::Debug for JellyfinClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JellyfinClient")
            .field("base_url", &self.base_url)
            .field("user_id", &self.user_id)
            .field("has_token", &self.authorization.contains("Token="))
            .finish()
    }
}

/// Server URL in canonical form; warns when normalization changed it.
pub fn normalize_base_url(raw: &str) -> RepositoryResult<String> {
    let normalized = normalize_server_url(raw)
        .map_err(|e| RepositoryError::NotConfigured(e.to_string()))?;
    if normalized != raw {
        warn!(
            "[JellyfinClient] Normalized base URL from '{}' to '{}'",
            raw, normalized
        );
    }
    Ok(normalized)
}

/// `MediaBrowser` authorization header value identifying this client.
pub fn authorization_header(config: &ClientConfig) -> String {
    fn quoted(value: &str) -> String {
        value.replace('"', "'")
    }

    let mut header = format!(
        "MediaBrowser Client=\"{}\", Device=\"{}\", DeviceId=\"{}\", Version=\"{}\"",
        quoted(&config.client_name),
        quoted(&config.device_name),
        quoted(&config.device_id),
        quoted(&config.client_version),
    );
    if let Some(token) = config.access_token.as_deref()
        && !token.is_empty()
    {
        header.push_str(&format!(", Token=\"{}\"", quoted(token)));
    }
    header
}

impl JellyfinClient {
    pub fn new(config: &ClientConfig) -> RepositoryResult<Self> {
        let base_url = normalize_base_url(&config.server_url)?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| {
                RepositoryError::Network(format!(
                    "failed to create HTTP client: {e}"
                ))
            })?;

        info!(
            "[JellyfinClient] Creating client for {} (user: {})",
            base_url,
            config
                .user_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "<none>".to_string())
        );

        Ok(Self {
            client,
            base_url,
            user_id: config.user_id,
            authorization: authorization_header(config),
            capabilities: ClientCapabilities::default(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path with query parameters.
    pub fn endpoint(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> RepositoryResult<Url> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut url = Url::parse(&raw).map_err(|e| {
            RepositoryError::NotConfigured(format!("invalid URL '{raw}': {e}"))
        })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn require_user(&self) -> RepositoryResult<UserId> {
        self.user_id.ok_or_else(|| {
            RepositoryError::NotConfigured("no user id set".to_string())
        })
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("Authorization", &self.authorization)
    }

    async fn execute(&self, request: RequestBuilder) -> RepositoryResult<Response> {
        let response = request.send().await.map_err(|e| {
            warn!("[JellyfinClient] Request failed: {}", e);
            RepositoryError::from(e)
        })?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED => Err(RepositoryError::Unauthorized),
            status => {
                let path = response.url().path().to_string();
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                warn!(
                    "[JellyfinClient] {} responded with {}: {}",
                    path,
                    status,
                    truncated(&body)
                );
                Err(RepositoryError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> RepositoryResult<T> {
        let request = self.authorized(self.client.get(url));
        let response = self.execute(request).await?;
        response.json::<T>().await.map_err(|e| {
            RepositoryError::Deserialization(e.to_string())
        })
    }

    async fn post<B: Serialize>(
        &self,
        url: Url,
        body: Option<&B>,
    ) -> RepositoryResult<()> {
        let mut request = self.authorized(self.client.post(url));
        request = match body {
            Some(body) => request.json(body),
            None => request,
        };
        self.execute(request).await?;
        Ok(())
    }

    async fn get_items(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> RepositoryResult<Vec<MediaItem>> {
        let url = self.endpoint(path, query)?;
        let page: QueryResult<BaseItemDto> = self.get_json(url).await?;
        into_media_items(page.items)
    }
}

/// First 120 characters of a response body, for log lines
fn truncated(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(120)
        .map(|(idx, _)| idx)
        .unwrap_or(body.len());
    &body[..end]
}

#[async_trait]
impl MediaRepository for JellyfinClient {
    async fn post_capabilities(&self) -> RepositoryResult<()> {
        let url = self.endpoint("Sessions/Capabilities/Full", &[])?;
        self.post(url, Some(&self.capabilities)).await
    }

    async fn resume_items(&self) -> RepositoryResult<Vec<MediaItem>> {
        let user = self.require_user()?;
        self.get_items(
            &format!("Users/{user}/Items/Resume"),
            &[
                ("MediaTypes", "Video".to_string()),
                ("Fields", FIELDS.to_string()),
                ("EnableUserData", "true".to_string()),
                ("EnableImageTypes", IMAGE_TYPES.to_string()),
            ],
        )
        .await
    }

    async fn next_up(&self) -> RepositoryResult<Vec<MediaItem>> {
        let user = self.require_user()?;
        self.get_items(
            "Shows/NextUp",
            &[
                ("UserId", user.as_str()),
                ("Fields", FIELDS.to_string()),
                ("EnableUserData", "true".to_string()),
                ("EnableImageTypes", IMAGE_TYPES.to_string()),
            ],
        )
        .await
    }

    async fn user_views(&self) -> RepositoryResult<Vec<LibraryView>> {
        let user = self.require_user()?;
        let url = self.endpoint(&format!("Users/{user}/Views"), &[])?;
        let page: QueryResult<BaseItemDto> = self.get_json(url).await?;
        into_library_views(page.items)
    }

    async fn latest_media(
        &self,
        view_id: ViewId,
    ) -> RepositoryResult<Vec<MediaItem>> {
        let user = self.require_user()?;
        let url = self.endpoint(
            &format!("Users/{user}/Items/Latest"),
            &[
                ("ParentId", view_id.as_str()),
                ("Fields", FIELDS.to_string()),
                ("EnableUserData", "true".to_string()),
                ("EnableImageTypes", IMAGE_TYPES.to_string()),
            ],
        )?;
        // Latest returns a bare array, not a paged envelope
        let items: Vec<BaseItemDto> = self.get_json(url).await?;
        into_media_items(items)
    }

    async fn item_user_data(
        &self,
        item_id: ItemId,
    ) -> RepositoryResult<UserItemData> {
        let user = self.require_user()?;
        let url = self.endpoint(&format!("Users/{user}/Items/{item_id}"), &[])?;
        let item: BaseItemDto = self.get_json(url).await?;
        Ok(item.user_data.map(UserItemData::from).unwrap_or_default())
    }

    async fn post_playback_progress(
        &self,
        item_id: ItemId,
        position_ticks: i64,
    ) -> RepositoryResult<()> {
        let url = self.endpoint("Sessions/Playing/Progress", &[])?;
        let body = PlaybackProgressInfo::paused_at(item_id, position_ticks);
        self.post(url, Some(&body)).await
    }

    async fn mark_played(&self, item_id: ItemId) -> RepositoryResult<()> {
        let user = self.require_user()?;
        let url =
            self.endpoint(&format!("Users/{user}/PlayedItems/{item_id}"), &[])?;
        self.post::<()>(url, None).await
    }
}
