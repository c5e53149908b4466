//! The duplex channel: one WebSocket per session.
//!
//! The client writes exactly one frame, the credential object, right after
//! the socket opens; the connect-time handshake of this protocol, not a
//! standard header. Everything after that is server push, forwarded to the
//! interactive loop as parsed [`ServerEvent`]s.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use crate::dto::http::Credentials;
use crate::dto::ws::ServerEvent;
use crate::error::ClientError;

/// The connected socket type.
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
/// Write half, kept by the loop so it can close the socket on rejection.
pub type WsSink = SplitSink<WsStream, Message>;
/// Read half, consumed by the reader task.
pub type WsSource = SplitStream<WsStream>;

/// Open the socket and perform the credential handshake.
pub async fn connect(ws_url: &str, credentials: &Credentials) -> Result<WsStream, ClientError> {
    let (mut ws_stream, _response) = connect_async(ws_url)
        .await
        .map_err(|e| ClientError::Connection(e.to_string()))?;

    let handshake = serde_json::to_string(credentials)?;
    ws_stream
        .send(Message::Text(handshake.into()))
        .await
        .map_err(|e| ClientError::Connection(e.to_string()))?;

    tracing::info!("Connected to {}", ws_url);
    Ok(ws_stream)
}

/// Parse one text frame into a [`ServerEvent`].
///
/// Frames that are not JSON objects with a `state` tag yield `None` and are
/// dropped by the caller.
pub fn parse_event(text: &str) -> Option<ServerEvent> {
    match serde_json::from_str::<ServerEvent>(text) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::debug!("Dropping undecodable frame: {} ({})", text, e);
            None
        }
    }
}

/// Forward parsed events from the read half to the interactive loop.
///
/// Resolves to `true` if the connection ended on an error or a server-side
/// close, `false` on a clean local shutdown.
pub fn spawn_reader(
    mut source: WsSource,
    events: mpsc::UnboundedSender<ServerEvent>,
) -> JoinHandle<bool> {
    tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = source.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    if let Some(event) = parse_event(&text)
                        && events.send(event).is_err()
                    {
                        // The loop is gone; nothing left to deliver to.
                        break;
                    }
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
            }
        }

        connection_error
    })
}
