//! Slash-command parsing for the interactive loop.

/// A parsed input line.
///
/// Lines starting with `/` are commands; everything else is sent to the
/// active channel as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/channels` — print the channel directory.
    Channels,
    /// `/switch <channel_id>` — make a channel active and reload its history.
    Switch(String),
    /// `/create <name> <member,member,...>` — create a group channel.
    Create { name: String, members: Vec<String> },
    /// `/dm <user_id>` — start a direct-message channel.
    Dm(String),
    /// `/whoami` — print the session identity.
    Whoami,
    /// `/help` — print command usage.
    Help,
    /// `/quit` — leave the client.
    Quit,
    /// Plain text to send to the active channel.
    Say(String),
    /// A `/` line that did not parse; carries the offending input.
    Invalid(String),
}

/// Parse one input line into a [`Command`].
pub fn parse(line: &str) -> Command {
    let line = line.trim();
    if !line.starts_with('/') {
        return Command::Say(line.to_string());
    }

    let mut parts = line.split_whitespace();
    let head = parts.next().unwrap_or_default();
    match head {
        "/channels" => Command::Channels,
        "/switch" => match parts.next() {
            Some(id) => Command::Switch(id.to_string()),
            None => Command::Invalid(line.to_string()),
        },
        "/create" => {
            let name = parts.next();
            // The member list may be split across tokens ("a, b, c"); join
            // everything after the name before splitting on commas.
            let rest = parts.collect::<Vec<_>>().concat();
            match name {
                Some(name) if !rest.is_empty() => Command::Create {
                    name: name.to_string(),
                    members: rest
                        .split(',')
                        .map(str::trim)
                        .filter(|member| !member.is_empty())
                        .map(str::to_string)
                        .collect(),
                },
                _ => Command::Invalid(line.to_string()),
            }
        }
        "/dm" => match parts.next() {
            Some(user_id) => Command::Dm(user_id.to_string()),
            None => Command::Invalid(line.to_string()),
        },
        "/whoami" => Command::Whoami,
        "/help" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        _ => Command::Invalid(line.to_string()),
    }
}
