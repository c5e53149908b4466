//! Client execution logic: login, socket, and the interactive loop.

use std::io::Write;

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;

use crate::client::api::ApiClient;
use crate::client::app::{ChatClient, EventOutcome};
use crate::client::command::{self, Command};
use crate::client::domain::websocket_url;
use crate::client::formatter::MessageFormatter;
use crate::client::session::Session;
use crate::client::socket::{self, WsSink};
use crate::error::ClientError;

/// Run the chat client until the user quits or the connection dies.
///
/// Authentication happens twice, as the backend wants it: a REST probe that
/// gates the interactive session, then the credential frame on the socket
/// whose `authenticated` push carries the server-assigned identity. There is
/// no retry and no reconnection; any failure ends the session.
pub async fn run_client(
    base_url: String,
    username: String,
    password: String,
    register_name: Option<String>,
) -> Result<(), ClientError> {
    let api = ApiClient::new(&base_url);

    if let Some(name) = register_name {
        let response = api.sign_up(&username, &password, &name).await?;
        if response.state != "user-created" {
            return Err(ClientError::Rejected(response.state));
        }
        tracing::info!("Signed up as '{}' ({})", username, name);
    }

    let mut chat = ChatClient::new(api, Session::new(&username, &password));
    chat.login().await?;
    tracing::info!("Logged in as '{}'", username);

    print!(
        "{}",
        MessageFormatter::format_transcript(chat.channels().active_name(), chat.view().messages())
    );
    print!("{}", MessageFormatter::format_channel_list(chat.channels()));
    print!("{}", MessageFormatter::format_help());

    // The one socket of this session.
    let ws_url = websocket_url(&base_url);
    let ws_stream = socket::connect(&ws_url, &chat.session().credentials()).await?;
    let (mut sink, source) = ws_stream.split();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let mut read_task = socket::spawn_reader(source, event_tx);

    // Blocking thread for rustyline (synchronous readline).
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let prompt_name = username.clone();
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", prompt_name);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    loop {
        tokio::select! {
            maybe_event = event_rx.recv() => {
                match maybe_event {
                    Some(event) => {
                        if !handle_event(&mut chat, &mut sink, event, &username).await? {
                            break;
                        }
                    }
                    None => {
                        // Reader task finished; the socket is gone.
                        let connection_error = (&mut read_task).await.unwrap_or(false);
                        if connection_error {
                            return Err(ClientError::Connection("connection lost".to_string()));
                        }
                        break;
                    }
                }
            }
            maybe_line = input_rx.recv() => {
                match maybe_line {
                    Some(line) => {
                        if !handle_line(&mut chat, &line).await {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    read_task.abort();
    Ok(())
}

/// Apply a pushed event. Returns `false` when the loop should stop.
async fn handle_event(
    chat: &mut ChatClient,
    sink: &mut WsSink,
    event: crate::dto::ws::ServerEvent,
    username: &str,
) -> Result<bool, ClientError> {
    match chat.apply_event(event) {
        EventOutcome::Authenticated => {
            print!("{}", MessageFormatter::format_identity(chat.session()));
            redisplay_prompt(username);
        }
        EventOutcome::Appended(message) => {
            print!("\n{}", MessageFormatter::format_message(&message));
            redisplay_prompt(username);
        }
        EventOutcome::RefreshChannels => {
            if let Err(e) = chat.refresh_channels().await {
                tracing::warn!("Channel refresh failed: {}", e);
            } else {
                print!("{}", MessageFormatter::format_channel_list(chat.channels()));
                redisplay_prompt(username);
            }
        }
        EventOutcome::CredentialsRejected => {
            // The only deliberate close of the session.
            sink.close().await.ok();
            return Err(ClientError::WrongCredentials(username.to_string()));
        }
        EventOutcome::Ignored => {}
    }
    Ok(true)
}

/// Handle one input line. Returns `false` when the user quits.
///
/// Operation failures are surfaced as log lines and the loop continues;
/// nothing is retried.
async fn handle_line(chat: &mut ChatClient, line: &str) -> bool {
    match command::parse(line) {
        Command::Say(content) => match chat.send_message(&content).await {
            Ok(Some(_)) => {}
            Ok(None) => {}
            Err(e) => tracing::error!("Failed to send message: {}", e),
        },
        Command::Channels => {
            print!("{}", MessageFormatter::format_channel_list(chat.channels()));
        }
        Command::Switch(channel_id) => match chat.switch_channel(&channel_id).await {
            Ok(()) => print!(
                "{}",
                MessageFormatter::format_transcript(
                    chat.channels().active_name(),
                    chat.view().messages()
                )
            ),
            Err(e) => tracing::error!("Failed to switch channel: {}", e),
        },
        Command::Create { name, members } => match chat.create_channel(&name, members).await {
            Ok(()) => {
                tracing::info!("Channel '{}' created", name);
                print!("{}", MessageFormatter::format_channel_list(chat.channels()));
            }
            Err(e) => tracing::error!("Failed to create channel: {}", e),
        },
        Command::Dm(user_id) => match chat.start_dm(&user_id).await {
            Ok(()) => {
                tracing::info!("DM with '{}' started", user_id);
                print!("{}", MessageFormatter::format_channel_list(chat.channels()));
            }
            Err(e) => tracing::error!("Failed to start DM: {}", e),
        },
        Command::Whoami => {
            print!("{}", MessageFormatter::format_identity(chat.session()));
        }
        Command::Help => {
            print!("{}", MessageFormatter::format_help());
        }
        Command::Invalid(input) => {
            tracing::warn!("Unrecognized command: {}", input);
            print!("{}", MessageFormatter::format_help());
        }
        Command::Quit => return false,
    }
    true
}

/// Redisplay the prompt after printing pushed output.
fn redisplay_prompt(username: &str) {
    print!("{}> ", username);
    std::io::stdout().flush().ok();
}
