//! Message formatting utilities for client display.

use crate::client::channels::ChannelDirectory;
use crate::client::session::Session;
use crate::client::view::RenderedMessage;
use crate::common::time::timestamp_to_rfc3339;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format one transcript line.
    ///
    /// Timestamped lines come from history; pushed and optimistic messages
    /// usually carry no timestamp.
    pub fn format_message(message: &RenderedMessage) -> String {
        match message.created_at {
            Some(created_at) => format!(
                "[{}] {}: {}\n",
                timestamp_to_rfc3339(created_at),
                message.author_name,
                message.content
            ),
            None => format!("{}: {}\n", message.author_name, message.content),
        }
    }

    /// Format the full transcript of the active channel.
    pub fn format_transcript(channel_name: &str, messages: &[RenderedMessage]) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "\n============ {} ============\n",
            channel_name
        ));
        if messages.is_empty() {
            output.push_str("(no messages yet)\n");
        } else {
            for message in messages {
                output.push_str(&Self::format_message(message));
            }
        }
        output
    }

    /// Format the channel directory, marking the active channel.
    pub fn format_channel_list(directory: &ChannelDirectory) -> String {
        let mut output = String::new();
        output.push_str("\nChannels:\n");
        for entry in directory.entries() {
            let marker = if directory.is_active(&entry.id) {
                "*"
            } else {
                " "
            };
            output.push_str(&format!("{} {} ({})\n", marker, entry.name, entry.id));
        }
        output
    }

    /// Format the identity banner printed after authentication.
    pub fn format_identity(session: &Session) -> String {
        match session.identity() {
            Some(identity) => format!(
                "\nDisplay Name: {}\nUsername: {}\nID: {}\n",
                identity.display_name,
                session.username(),
                identity.user_id
            ),
            None => format!("\nUsername: {} (not authenticated)\n", session.username()),
        }
    }

    /// Format the command usage text.
    pub fn format_help() -> String {
        "\nCommands:\n\
         /channels                  list channels\n\
         /switch <channel_id>       switch the active channel\n\
         /create <name> <m1,m2,..>  create a group channel\n\
         /dm <user_id>              start a direct message\n\
         /whoami                    show your identity\n\
         /quit                      leave\n\
         anything else              send to the active channel\n"
            .to_string()
    }
}
