//! REST request/response DTOs.
//!
//! The backend authenticates every call by the credentials embedded in the
//! request body and answers errors as a JSON `{"state": "..."}` envelope,
//! often with a non-2xx status code. Response DTOs therefore keep every
//! field optional and let the caller inspect `state`.

use serde::{Deserialize, Serialize};

/// Credentials sent in the body of every REST call and as the first
/// WebSocket frame.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Request body for `/sign-up`.
#[derive(Debug, Serialize)]
pub struct SignUpRequest {
    pub username: String,
    pub password: String,
    pub name: String,
}

/// Request body for `/send-message/{channel_id}`.
#[derive(Debug, Serialize)]
pub struct SendMessageRequest {
    pub username: String,
    pub password: String,
    pub message: String,
}

/// Request body for `/create-channel`.
#[derive(Debug, Serialize)]
pub struct CreateChannelRequest {
    pub username: String,
    pub password: String,
    pub channel_name: String,
    pub members: Vec<String>,
}

/// Generic `{"state": "..."}` response envelope.
#[derive(Debug, Deserialize)]
pub struct StateResponse {
    pub state: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// A single message as returned by `/get-messages/{channel_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageDto {
    pub author_name: String,
    pub content: String,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

/// Response body of `/get-messages/{channel_id}`.
///
/// Carries either a message list or an error `state`, never both.
#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<MessageDto>>,
}

/// A single channel as returned by `/get-channels`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelDto {
    pub channel_id: String,
    pub channel_name: String,
}

/// Response body of `/get-channels`.
#[derive(Debug, Deserialize)]
pub struct ChannelsResponse {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub channels: Option<Vec<ChannelDto>>,
}
