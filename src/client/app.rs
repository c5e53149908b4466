//! `ChatClient`: session, channel directory, message view, and the
//! operations that tie REST calls to state changes.

use crate::client::api::ApiClient;
use crate::client::channels::{ChannelDirectory, PUBLIC_CHANNEL_ID};
use crate::client::domain::is_for_active_channel;
use crate::client::session::Session;
use crate::client::view::{MessageView, RenderedMessage};
use crate::dto::ws::ServerEvent;
use crate::error::ClientError;

/// What the interactive loop should do after an event was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The handshake succeeded; the identity banner can be printed.
    Authenticated,
    /// A message landed in the visible list.
    Appended(RenderedMessage),
    /// The channel directory is stale and must be re-fetched.
    RefreshChannels,
    /// The server rejected the handshake; the socket must be closed.
    CredentialsRejected,
    /// Nothing changed.
    Ignored,
}

/// The single client component: credentials, active channel, visible
/// messages, and the REST handle.
#[derive(Debug)]
pub struct ChatClient {
    api: ApiClient,
    session: Session,
    channels: ChannelDirectory,
    view: MessageView,
}

impl ChatClient {
    pub fn new(api: ApiClient, session: Session) -> Self {
        Self {
            api,
            session,
            channels: ChannelDirectory::new(),
            view: MessageView::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn channels(&self) -> &ChannelDirectory {
        &self.channels
    }

    pub fn view(&self) -> &MessageView {
        &self.view
    }

    /// Authenticate by probing the public-chat history.
    ///
    /// The backend has no dedicated login round-trip for this client; a
    /// history fetch doubles as the credential check. On success the public
    /// history fills the view and the channel directory is loaded.
    pub async fn login(&mut self) -> Result<(), ClientError> {
        let response = self
            .api
            .fetch_messages(&self.session.credentials(), PUBLIC_CHANNEL_ID)
            .await?;

        if response.state.as_deref() == Some("wrong-credentials") {
            return Err(ClientError::WrongCredentials(
                self.session.username().to_string(),
            ));
        }

        self.view.replace(response.messages.unwrap_or_default());
        self.refresh_channels().await?;
        Ok(())
    }

    /// Re-fetch the channel directory from the server.
    pub async fn refresh_channels(&mut self) -> Result<(), ClientError> {
        let channels = self
            .api
            .fetch_channels(&self.session.credentials())
            .await?;
        self.channels.replace(channels);
        Ok(())
    }

    /// Make a channel active and reload its history.
    ///
    /// The history is fetched twice in direct succession with a clear in
    /// between; the second result wins. There is no guarantee the two
    /// results agree in a race against concurrent sends.
    pub async fn switch_channel(&mut self, channel_id: &str) -> Result<(), ClientError> {
        self.channels.set_active(channel_id)?;
        tracing::info!("Switching to channel '{}'", channel_id);

        let credentials = self.session.credentials();
        let first = self.api.fetch_messages(&credentials, channel_id).await?;
        self.view.replace(first.messages.unwrap_or_default());

        self.view.clear();
        let second = self.api.fetch_messages(&credentials, channel_id).await?;
        self.view.replace(second.messages.unwrap_or_default());
        Ok(())
    }

    /// Post a message to the active channel and echo it locally.
    ///
    /// Empty content performs no network call and returns `None`. The echo
    /// is optimistic: it is appended whatever the server answers, and a
    /// server-side echo over the socket is not de-duplicated against it.
    pub async fn send_message(
        &mut self,
        content: &str,
    ) -> Result<Option<RenderedMessage>, ClientError> {
        if !crate::client::domain::should_send(content) {
            return Ok(None);
        }
        let content = content.trim();

        let response = self
            .api
            .send_message(&self.session.credentials(), self.channels.active_id(), content)
            .await?;
        if response.state != "message-sent" {
            tracing::warn!("Server answered send with state '{}'", response.state);
        }

        let message = RenderedMessage {
            author_name: self.session.display_name().to_string(),
            content: content.to_string(),
            created_at: None,
        };
        self.view.append(message.clone());
        Ok(Some(message))
    }

    /// Create a group channel and refresh the directory.
    pub async fn create_channel(
        &mut self,
        name: &str,
        members: Vec<String>,
    ) -> Result<(), ClientError> {
        let response = self
            .api
            .create_channel(&self.session.credentials(), name, members)
            .await?;
        if response.state != "channel-created" {
            return Err(ClientError::Rejected(response.state));
        }
        self.refresh_channels().await
    }

    /// Start a direct-message channel and refresh the directory.
    pub async fn start_dm(&mut self, user_id: &str) -> Result<(), ClientError> {
        let response = self
            .api
            .start_dm(&self.session.credentials(), user_id)
            .await?;
        if response.state != "dm-started" {
            return Err(ClientError::Rejected(response.state));
        }
        self.refresh_channels().await
    }

    /// Apply one server-pushed event to the client state.
    ///
    /// Network follow-ups (directory refresh, socket close) are reported via
    /// the returned [`EventOutcome`] and performed by the caller.
    pub fn apply_event(&mut self, event: ServerEvent) -> EventOutcome {
        match event {
            ServerEvent::WrongCredentials => EventOutcome::CredentialsRejected,
            ServerEvent::Authenticated { user_id, name } => {
                self.session.authenticate(user_id, name);
                EventOutcome::Authenticated
            }
            ServerEvent::NewMessage {
                author_name,
                content,
                channel_id,
                created_at,
            } => {
                if !is_for_active_channel(channel_id.as_deref(), self.channels.active_id()) {
                    tracing::debug!(
                        "Ignoring message for channel {:?} (active: '{}')",
                        channel_id,
                        self.channels.active_id()
                    );
                    return EventOutcome::Ignored;
                }
                let message = RenderedMessage {
                    author_name,
                    content,
                    created_at,
                };
                self.view.append(message.clone());
                EventOutcome::Appended(message)
            }
            ServerEvent::NewChannel {
                channel_id,
                channel_name,
            } => {
                tracing::info!("New channel pushed: {:?} ({:?})", channel_name, channel_id);
                EventOutcome::RefreshChannels
            }
            ServerEvent::Unknown => EventOutcome::Ignored,
        }
    }
}
