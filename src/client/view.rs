//! Ephemeral message view for the active channel.

use crate::dto::http::MessageDto;

/// One rendered line of the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub author_name: String,
    pub content: String,
    pub created_at: Option<i64>,
}

impl From<MessageDto> for RenderedMessage {
    fn from(dto: MessageDto) -> Self {
        Self {
            author_name: dto.author_name,
            content: dto.content,
            created_at: dto.created_at,
        }
    }
}

/// In-memory message list for the active channel.
///
/// Discarded wholesale on every channel switch; nothing here survives the
/// process.
#[derive(Debug, Clone, Default)]
pub struct MessageView {
    messages: Vec<RenderedMessage>,
}

impl MessageView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: RenderedMessage) {
        self.messages.push(message);
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Drop the current content and take a fresh history snapshot.
    pub fn replace(&mut self, messages: Vec<MessageDto>) {
        self.messages = messages.into_iter().map(RenderedMessage::from).collect();
    }

    pub fn messages(&self) -> &[RenderedMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
