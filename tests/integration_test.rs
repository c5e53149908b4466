//! Integration tests against an in-process mock chat backend.
//!
//! The mock speaks the backend's protocol: POST-only JSON routes that
//! authenticate by the credentials in the body and answer errors as a
//! `{"state": "..."}` envelope, plus a `/ws` endpoint whose first client
//! frame is the credential object.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

use idobata::client::api::ApiClient;
use idobata::client::app::{ChatClient, EventOutcome};
use idobata::client::channels::PUBLIC_CHANNEL_ID;
use idobata::client::domain::websocket_url;
use idobata::client::session::Session;
use idobata::client::socket;
use idobata::dto::ws::ServerEvent;
use idobata::error::ClientError;

const USERNAME: &str = "alice";
const PASSWORD: &str = "secret";

/// Request log and canned data behind the mock routes.
#[derive(Default)]
struct MockState {
    /// (channel_id, message) pairs received by /send-message
    sent: Mutex<Vec<(String, String)>>,
    /// channel ids requested via /get-messages
    history_requests: Mutex<Vec<String>>,
}

fn credentials_ok(body: &Value) -> bool {
    body["username"] == USERNAME && body["password"] == PASSWORD
}

async fn sign_up(Json(body): Json<Value>) -> Json<Value> {
    if body["username"] == "taken" {
        return Json(json!({"state": "user-already-exists"}));
    }
    Json(json!({"state": "user-created", "user_id": Uuid::new_v4().to_string()}))
}

async fn get_channels(Json(body): Json<Value>) -> Json<Value> {
    if !credentials_ok(&body) {
        return Json(json!({"state": "wrong-credentials"}));
    }
    Json(json!({"channels": [
        {"channel_id": "ch-rust", "channel_name": "Rust Talk"},
        {"channel_id": "ch-brew", "channel_name": "Coffee"}
    ]}))
}

async fn get_messages(
    State(state): State<Arc<MockState>>,
    Path(channel_id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    if !credentials_ok(&body) {
        return Json(json!({"state": "wrong-credentials"}));
    }
    state.history_requests.lock().await.push(channel_id.clone());

    let messages = match channel_id.as_str() {
        PUBLIC_CHANNEL_ID => json!([
            {"author_name": "Bob", "content": "welcome", "channel_id": PUBLIC_CHANNEL_ID, "created_at": 1672531200}
        ]),
        "ch-rust" => json!([
            {"author_name": "Carol", "content": "borrow checker", "channel_id": "ch-rust", "created_at": 1672531300}
        ]),
        _ => json!([]),
    };
    Json(json!({"messages": messages}))
}

async fn send_message(
    State(state): State<Arc<MockState>>,
    Path(channel_id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    if !credentials_ok(&body) {
        return Json(json!({"state": "wrong-credentials"}));
    }
    let message = body["message"].as_str().unwrap_or_default().to_string();
    let rejected = message == "reject me";
    state.sent.lock().await.push((channel_id, message));
    if rejected {
        return Json(json!({"state": "no-access"}));
    }
    Json(json!({"state": "message-sent"}))
}

async fn create_channel(Json(body): Json<Value>) -> Json<Value> {
    if !credentials_ok(&body) {
        return Json(json!({"state": "wrong-credentials"}));
    }
    if body["channel_name"] == "taken" {
        return Json(json!({"state": "channel-already-exists"}));
    }
    Json(json!({"state": "channel-created", "channel_id": Uuid::new_v4().to_string()}))
}

async fn start_dm(Path(_user_id): Path<String>, Json(body): Json<Value>) -> Json<Value> {
    if !credentials_ok(&body) {
        return Json(json!({"state": "wrong-credentials"}));
    }
    Json(json!({"state": "dm-started"}))
}

async fn ws_handler(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(handle_socket)
}

/// Mock push sequence: handshake check, then a fixed series of frames.
async fn handle_socket(mut socket: WebSocket) {
    let Some(Ok(Message::Text(first))) = socket.recv().await else {
        return;
    };
    let handshake: Value = serde_json::from_str(&first).unwrap_or(Value::Null);

    if !credentials_ok(&handshake) {
        let frame = json!({"state": "wrong-credentials"}).to_string();
        let _ = socket.send(Message::Text(frame.into())).await;
        return;
    }

    let frames = [
        json!({"state": "authenticated", "user_id": "u-1", "name": "Alice"}),
        json!({
            "state": "new-message",
            "author_name": "Bob",
            "content": "hello alice",
            "channel_id": PUBLIC_CHANNEL_ID
        }),
        json!({"state": "typing-indicator", "user_id": "u-2"}),
        json!({
            "state": "new-message",
            "author_name": "Carol",
            "content": "not for you",
            "channel_id": "ch-rust"
        }),
        json!({"state": "new-channel", "channel_id": "ch-new", "channel_name": "Fresh"}),
    ];
    for frame in frames {
        if socket
            .send(Message::Text(frame.to_string().into()))
            .await
            .is_err()
        {
            return;
        }
    }

    // Keep the socket open until the client goes away.
    while socket.recv().await.is_some() {}
}

/// Start the mock backend on an ephemeral port; returns its base URL.
async fn spawn_mock_server() -> (String, Arc<MockState>) {
    let state = Arc::new(MockState::default());

    let app = Router::new()
        .route("/sign-up", post(sign_up))
        .route("/get-channels", post(get_channels))
        .route("/get-messages/{channel_id}", post(get_messages))
        .route("/send-message/{channel_id}", post(send_message))
        .route("/create-channel", post(create_channel))
        .route("/start-dm/{user_id}", post(start_dm))
        .route("/ws", get(ws_handler))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Mock server died");
    });

    (format!("http://{}", addr), state)
}

fn chat_client(base_url: &str) -> ChatClient {
    ChatClient::new(ApiClient::new(base_url), Session::new(USERNAME, PASSWORD))
}

async fn next_event(events: &mut mpsc::UnboundedReceiver<ServerEvent>) -> ServerEvent {
    tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("Timed out waiting for a server event")
        .expect("Event stream closed early")
}

#[tokio::test]
async fn test_login_loads_history_and_channels() {
    // テスト項目: ログイン成功で履歴とチャンネル一覧が読み込まれる
    // given (前提条件):
    let (base_url, _state) = spawn_mock_server().await;
    let mut chat = chat_client(&base_url);

    // when (操作):
    chat.login().await.expect("Login should succeed");

    // then (期待する結果):
    assert_eq!(chat.view().len(), 1);
    assert_eq!(chat.view().messages()[0].author_name, "Bob");
    let ids: Vec<&str> = chat
        .channels()
        .entries()
        .iter()
        .map(|entry| entry.id.as_str())
        .collect();
    assert_eq!(ids, vec![PUBLIC_CHANNEL_ID, "ch-rust", "ch-brew"]);
    assert_eq!(chat.channels().active_id(), PUBLIC_CHANNEL_ID);
}

#[tokio::test]
async fn test_login_with_wrong_credentials_fails() {
    // テスト項目: 誤った認証情報でのログインがエラーになる
    // given (前提条件):
    let (base_url, _state) = spawn_mock_server().await;
    let mut chat = ChatClient::new(
        ApiClient::new(&base_url),
        Session::new(USERNAME, "wrong-password"),
    );

    // when (操作):
    let result = chat.login().await;

    // then (期待する結果):
    assert!(matches!(
        result,
        Err(ClientError::WrongCredentials(username)) if username == USERNAME
    ));
    assert!(chat.view().is_empty());
}

#[tokio::test]
async fn test_empty_send_performs_no_network_call() {
    // テスト項目: 空メッセージの送信でネットワーク呼び出しが発生しない
    // given (前提条件):
    let (base_url, state) = spawn_mock_server().await;
    let mut chat = chat_client(&base_url);
    chat.login().await.expect("Login should succeed");

    // when (操作):
    let echo = chat.send_message("   ").await.expect("Send should not fail");

    // then (期待する結果):
    assert!(echo.is_none());
    assert!(state.sent.lock().await.is_empty());
    assert_eq!(chat.view().len(), 1);
}

#[tokio::test]
async fn test_send_echoes_locally_even_when_rejected() {
    // テスト項目: サーバーが拒否しても楽観的エコーがローカルに表示される
    // given (前提条件):
    let (base_url, state) = spawn_mock_server().await;
    let mut chat = chat_client(&base_url);
    chat.login().await.expect("Login should succeed");

    // when (操作):
    let echo = chat
        .send_message("reject me")
        .await
        .expect("Send should not fail");

    // then (期待する結果):
    let echo = echo.expect("Non-empty content should produce an echo");
    assert_eq!(echo.author_name, USERNAME);
    assert_eq!(echo.content, "reject me");
    assert_eq!(chat.view().len(), 2);
    let sent = state.sent.lock().await;
    assert_eq!(
        sent.as_slice(),
        &[(PUBLIC_CHANNEL_ID.to_string(), "reject me".to_string())]
    );
}

#[tokio::test]
async fn test_switch_channel_fetches_history_twice() {
    // テスト項目: チャンネル切り替えで履歴が 2 回取得され 2 回目が残る
    // given (前提条件):
    let (base_url, state) = spawn_mock_server().await;
    let mut chat = chat_client(&base_url);
    chat.login().await.expect("Login should succeed");

    // when (操作):
    chat.switch_channel("ch-rust")
        .await
        .expect("Switch should succeed");

    // then (期待する結果):
    assert_eq!(chat.channels().active_id(), "ch-rust");
    assert_eq!(chat.view().len(), 1);
    assert_eq!(chat.view().messages()[0].author_name, "Carol");
    let history_requests = state.history_requests.lock().await;
    let rust_fetches = history_requests
        .iter()
        .filter(|id| id.as_str() == "ch-rust")
        .count();
    assert_eq!(rust_fetches, 2);
}

#[tokio::test]
async fn test_switch_to_unknown_channel_is_rejected_locally() {
    // テスト項目: ディレクトリに無いチャンネルへの切り替えはローカルで拒否される
    // given (前提条件):
    let (base_url, state) = spawn_mock_server().await;
    let mut chat = chat_client(&base_url);
    chat.login().await.expect("Login should succeed");
    let before = state.history_requests.lock().await.len();

    // when (操作):
    let result = chat.switch_channel("ch-ghost").await;

    // then (期待する結果):
    assert!(matches!(result, Err(ClientError::UnknownChannel(_))));
    assert_eq!(chat.channels().active_id(), PUBLIC_CHANNEL_ID);
    assert_eq!(state.history_requests.lock().await.len(), before);
}

#[tokio::test]
async fn test_create_channel_rejection_is_an_error() {
    // テスト項目: チャンネル作成の拒否が state 付きのエラーになる
    // given (前提条件):
    let (base_url, _state) = spawn_mock_server().await;
    let mut chat = chat_client(&base_url);
    chat.login().await.expect("Login should succeed");

    // when (操作):
    let result = chat
        .create_channel("taken", vec!["bob".to_string()])
        .await;

    // then (期待する結果):
    assert!(matches!(
        result,
        Err(ClientError::Rejected(state)) if state == "channel-already-exists"
    ));
}

#[tokio::test]
async fn test_create_channel_success_refreshes_directory() {
    // テスト項目: チャンネル作成成功後にディレクトリが更新される
    // given (前提条件):
    let (base_url, _state) = spawn_mock_server().await;
    let mut chat = chat_client(&base_url);
    chat.login().await.expect("Login should succeed");

    // when (操作):
    let result = chat
        .create_channel("rustaceans", vec!["bob".to_string(), "carol".to_string()])
        .await;

    // then (期待する結果):
    assert!(result.is_ok());
    assert_eq!(chat.channels().entries().len(), 3);
}

#[tokio::test]
async fn test_start_dm_success() {
    // テスト項目: DM 開始の成功でエラーが出ない
    // given (前提条件):
    let (base_url, _state) = spawn_mock_server().await;
    let mut chat = chat_client(&base_url);
    chat.login().await.expect("Login should succeed");

    // when (操作):
    let result = chat.start_dm("u-7").await;

    // then (期待する結果):
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_sign_up_duplicate_username_is_rejected() {
    // テスト項目: 既存ユーザー名でのサインアップが拒否される
    // given (前提条件):
    let (base_url, _state) = spawn_mock_server().await;
    let api = ApiClient::new(&base_url);

    // when (操作):
    let response = api
        .sign_up("taken", "pw", "Somebody")
        .await
        .expect("Request should complete");

    // then (期待する結果):
    assert_eq!(response.state, "user-already-exists");
}

#[tokio::test]
async fn test_socket_handshake_and_event_dispatch() {
    // テスト項目: ソケットのハンドシェイク後、push イベントが契約どおりに反映される
    // given (前提条件):
    let (base_url, _state) = spawn_mock_server().await;
    let mut chat = chat_client(&base_url);
    chat.login().await.expect("Login should succeed");

    let ws_url = websocket_url(&base_url);
    let ws_stream = socket::connect(&ws_url, &chat.session().credentials())
        .await
        .expect("Socket should connect");
    use futures_util::StreamExt;
    let (_sink, source) = ws_stream.split();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let _reader = socket::spawn_reader(source, event_tx);

    // when (操作):
    let authenticated = chat.apply_event(next_event(&mut event_rx).await);
    let active_message = chat.apply_event(next_event(&mut event_rx).await);
    let unknown = chat.apply_event(next_event(&mut event_rx).await);
    let other_channel = chat.apply_event(next_event(&mut event_rx).await);
    let new_channel = chat.apply_event(next_event(&mut event_rx).await);

    // then (期待する結果):
    assert_eq!(authenticated, EventOutcome::Authenticated);
    assert_eq!(chat.session().display_name(), "Alice");
    assert_eq!(
        chat.session().identity().map(|identity| identity.user_id.as_str()),
        Some("u-1")
    );

    assert!(matches!(active_message, EventOutcome::Appended(_)));
    assert_eq!(chat.view().len(), 2);

    assert_eq!(unknown, EventOutcome::Ignored);
    assert_eq!(other_channel, EventOutcome::Ignored);
    assert_eq!(chat.view().len(), 2);

    assert_eq!(new_channel, EventOutcome::RefreshChannels);
    chat.refresh_channels()
        .await
        .expect("Refresh should succeed");
}

#[tokio::test]
async fn test_socket_rejects_wrong_credentials() {
    // テスト項目: 誤った認証情報でのハンドシェイクに wrong-credentials が返る
    // given (前提条件):
    let (base_url, _state) = spawn_mock_server().await;
    let ws_url = websocket_url(&base_url);
    let bad_session = Session::new(USERNAME, "wrong-password");

    let ws_stream = socket::connect(&ws_url, &bad_session.credentials())
        .await
        .expect("Socket should connect before the handshake is judged");
    use futures_util::StreamExt;
    let (_sink, source) = ws_stream.split();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let _reader = socket::spawn_reader(source, event_tx);

    // when (操作):
    let event = next_event(&mut event_rx).await;

    // then (期待する結果):
    assert!(matches!(event, ServerEvent::WrongCredentials));
}
