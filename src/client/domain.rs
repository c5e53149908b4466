//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

/// Check whether a message should be sent at all.
///
/// Empty or whitespace-only content performs no network call.
pub fn should_send(content: &str) -> bool {
    !content.trim().is_empty()
}

/// Derive the WebSocket endpoint from the HTTP base URL.
///
/// `http` maps to `ws`, `https` to `wss`; anything else is passed through
/// unchanged and left to the connect call to reject.
pub fn websocket_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}/ws", rest)
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{}/ws", rest)
    } else {
        format!("{}/ws", base)
    }
}

/// Check whether a pushed message belongs in the visible list.
///
/// Frames without a channel id count as matching: the backend omits the id
/// on echoes and the client has nothing to compare against.
pub fn is_for_active_channel(event_channel_id: Option<&str>, active_id: &str) -> bool {
    match event_channel_id {
        Some(channel_id) => channel_id == active_id,
        None => true,
    }
}
