//! WebSocket frame DTOs.
//!
//! Server frames carry a `state` discriminator. The client sends exactly one
//! frame per connection: the credential object, immediately after the socket
//! opens (see [`crate::client::socket`]).

use serde::Deserialize;

/// A server-pushed event, dispatched by its `state` tag.
///
/// Frames with a `state` the client does not know map to [`ServerEvent::Unknown`]
/// and are dropped by the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// The credential handshake was rejected; the socket is about to be useless.
    WrongCredentials,

    /// The handshake succeeded; carries the server-assigned identity.
    Authenticated { user_id: String, name: String },

    /// A message was posted to some channel.
    NewMessage {
        author_name: String,
        content: String,
        #[serde(default)]
        channel_id: Option<String>,
        #[serde(default)]
        created_at: Option<i64>,
    },

    /// A channel visible to this user was created.
    NewChannel {
        #[serde(default)]
        channel_id: Option<String>,
        #[serde(default)]
        channel_name: Option<String>,
    },

    /// Any state tag this client does not understand.
    #[serde(other)]
    Unknown,
}
