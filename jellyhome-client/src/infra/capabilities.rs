//! Client capabilities announced to the server for the current session

use serde::Serialize;

/// Body of `POST /Sessions/Capabilities/Full`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClientCapabilities {
    pub playable_media_types: Vec<String>,
    pub supported_commands: Vec<String>,
    pub supports_media_control: bool,
    pub supports_persistent_identifier: bool,
}

impl Default for ClientCapabilities {
    fn default() -> Self {
        Self {
            playable_media_types: vec!["Video".to_string()],
            supported_commands: vec!["DisplayMessage".to_string()],
            supports_media_control: false,
            supports_persistent_identifier: true,
        }
    }
}
