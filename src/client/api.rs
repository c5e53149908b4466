//! REST calls against the chat backend.
//!
//! Every route is a POST with a JSON body carrying the credentials. The
//! backend reports errors as a `{"state": "..."}` body, sometimes with a
//! non-2xx status, so responses are decoded regardless of status code and
//! the caller inspects `state`.

use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::dto::http::{
    ChannelDto, ChannelsResponse, CreateChannelRequest, Credentials, MessagesResponse,
    SendMessageRequest, SignUpRequest, StateResponse,
};
use crate::error::ClientError;

/// HTTP client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `/sign-up`.
    pub async fn sign_up(
        &self,
        username: &str,
        password: &str,
        name: &str,
    ) -> Result<StateResponse, ClientError> {
        let request = SignUpRequest {
            username: username.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        };
        self.post("/sign-up", &request).await
    }

    /// POST `/get-channels`.
    pub async fn fetch_channels(
        &self,
        credentials: &Credentials,
    ) -> Result<Vec<ChannelDto>, ClientError> {
        let response: ChannelsResponse = self.post("/get-channels", credentials).await?;
        Ok(response.channels.unwrap_or_default())
    }

    /// POST `/get-messages/{channel_id}`.
    pub async fn fetch_messages(
        &self,
        credentials: &Credentials,
        channel_id: &str,
    ) -> Result<MessagesResponse, ClientError> {
        let path = format!("/get-messages/{}", channel_id);
        self.post(&path, credentials).await
    }

    /// POST `/send-message/{channel_id}`.
    pub async fn send_message(
        &self,
        credentials: &Credentials,
        channel_id: &str,
        content: &str,
    ) -> Result<StateResponse, ClientError> {
        let request = SendMessageRequest {
            username: credentials.username.clone(),
            password: credentials.password.clone(),
            message: content.to_string(),
        };
        let path = format!("/send-message/{}", channel_id);
        self.post(&path, &request).await
    }

    /// POST `/create-channel`.
    pub async fn create_channel(
        &self,
        credentials: &Credentials,
        channel_name: &str,
        members: Vec<String>,
    ) -> Result<StateResponse, ClientError> {
        let request = CreateChannelRequest {
            username: credentials.username.clone(),
            password: credentials.password.clone(),
            channel_name: channel_name.to_string(),
            members,
        };
        self.post("/create-channel", &request).await
    }

    /// POST `/start-dm/{user_id}`.
    pub async fn start_dm(
        &self,
        credentials: &Credentials,
        user_id: &str,
    ) -> Result<StateResponse, ClientError> {
        let path = format!("/start-dm/{}", user_id);
        self.post(&path, credentials).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("POST {}", url);

        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        match serde_json::from_str(&text) {
            Ok(decoded) => Ok(decoded),
            Err(e) => {
                tracing::warn!("Failed to decode response from {} ({}): {}", path, status, e);
                dump_response_body(path, &text);
                Err(e.into())
            }
        }
    }
}

/// Write an undecodable response body to the temp directory for inspection.
///
/// A debugging aid, not recovery: failures to write are logged and swallowed.
fn dump_response_body(path: &str, body: &str) {
    let file = dump_file_path(path);
    match std::fs::write(&file, body) {
        Ok(()) => tracing::warn!("Raw response body written to {}", file.display()),
        Err(e) => tracing::warn!("Could not write response dump to {}: {}", file.display(), e),
    }
}

fn dump_file_path(path: &str) -> PathBuf {
    let slug: String = path
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    std::env::temp_dir().join(format!("idobata-response{}.txt", slug))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        // テスト項目: base URL 末尾のスラッシュが取り除かれる
        // given (前提条件):
        let api = ApiClient::new("http://127.0.0.1:8000/");

        // when (操作):
        let base_url = api.base_url();

        // then (期待する結果):
        assert_eq!(base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_dump_file_path_is_sanitized() {
        // テスト項目: ダンプファイル名にパス区切り文字が含まれない
        // given (前提条件):
        let path = "/get-messages/public-chat";

        // when (操作):
        let file = dump_file_path(path);

        // then (期待する結果):
        let name = file.file_name().unwrap().to_string_lossy().into_owned();
        assert!(!name.contains('/'));
        assert!(name.starts_with("idobata-response"));
        assert!(name.contains("get-messages"));
    }
}
