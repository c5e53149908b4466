//! Channel directory with a single canonical active channel.

use crate::dto::http::ChannelDto;
use crate::error::ClientError;

/// The channel every user can always read and write.
pub const PUBLIC_CHANNEL_ID: &str = "public-chat";
/// Display name of the public channel.
pub const PUBLIC_CHANNEL_NAME: &str = "Public Chat";

/// One entry in the channel directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEntry {
    pub id: String,
    pub name: String,
}

/// Channel list mirrored from the server, plus the active channel id.
///
/// "At most one channel is active" is held by a single `active_id` field
/// rather than scanning per-entry flags, so two channels sharing a display
/// name cannot both end up marked active.
#[derive(Debug, Clone)]
pub struct ChannelDirectory {
    entries: Vec<ChannelEntry>,
    active_id: String,
}

impl ChannelDirectory {
    /// A directory seeded with the public channel, which starts active.
    pub fn new() -> Self {
        Self {
            entries: vec![ChannelEntry {
                id: PUBLIC_CHANNEL_ID.to_string(),
                name: PUBLIC_CHANNEL_NAME.to_string(),
            }],
            active_id: PUBLIC_CHANNEL_ID.to_string(),
        }
    }

    /// Replace the directory contents with a server response.
    ///
    /// The public channel always stays first; the rest keeps server order.
    /// The active id is left untouched even if its channel disappeared from
    /// the listing.
    pub fn replace(&mut self, channels: Vec<ChannelDto>) {
        let mut entries = vec![ChannelEntry {
            id: PUBLIC_CHANNEL_ID.to_string(),
            name: PUBLIC_CHANNEL_NAME.to_string(),
        }];
        entries.extend(
            channels
                .into_iter()
                .filter(|channel| channel.channel_id != PUBLIC_CHANNEL_ID)
                .map(|channel| ChannelEntry {
                    id: channel.channel_id,
                    name: channel.channel_name,
                }),
        );
        self.entries = entries;
    }

    /// Mark a channel active, returning its entry.
    pub fn set_active(&mut self, id: &str) -> Result<&ChannelEntry, ClientError> {
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.id == id)
            .ok_or_else(|| ClientError::UnknownChannel(id.to_string()))?;
        self.active_id = entry.id.clone();
        Ok(entry)
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    /// Display name of the active channel, or its id if it is no longer listed.
    pub fn active_name(&self) -> &str {
        self.entries
            .iter()
            .find(|entry| entry.id == self.active_id)
            .map(|entry| entry.name.as_str())
            .unwrap_or(&self.active_id)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active_id == id
    }

    pub fn entries(&self) -> &[ChannelEntry] {
        &self.entries
    }
}

impl Default for ChannelDirectory {
    fn default() -> Self {
        Self::new()
    }
}
