//! Client session: credentials plus server-assigned identity.

use crate::dto::http::Credentials;

/// Identity assigned by the server once the socket handshake succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub display_name: String,
}

/// Client-held session state.
///
/// The password stays in memory in plaintext because the backend expects it
/// in the body of every call; there is no token exchange in this protocol.
/// The identity is empty until the socket reports `authenticated`.
#[derive(Debug, Clone)]
pub struct Session {
    username: String,
    password: String,
    identity: Option<Identity>,
}

impl Session {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            identity: None,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Credentials body for REST calls and the socket handshake frame.
    pub fn credentials(&self) -> Credentials {
        Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        }
    }

    /// Record the identity from an `authenticated` push.
    pub fn authenticate(&mut self, user_id: impl Into<String>, display_name: impl Into<String>) {
        self.identity = Some(Identity {
            user_id: user_id.into(),
            display_name: display_name.into(),
        });
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Display name for optimistic local echoes.
    ///
    /// Falls back to the username until the server has assigned one.
    pub fn display_name(&self) -> &str {
        self.identity
            .as_ref()
            .map(|identity| identity.display_name.as_str())
            .unwrap_or(&self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_not_authenticated() {
        // テスト項目: 作成直後のセッションは未認証である
        // given (前提条件):
        let session = Session::new("alice", "secret");

        // when (操作):
        let authenticated = session.is_authenticated();

        // then (期待する結果):
        assert!(!authenticated);
        assert!(session.identity().is_none());
    }

    #[test]
    fn test_authenticate_populates_identity() {
        // テスト項目: authenticate によりサーバー割り当ての ID が設定される
        // given (前提条件):
        let mut session = Session::new("alice", "secret");

        // when (操作):
        session.authenticate("u-1", "Alice");

        // then (期待する結果):
        assert!(session.is_authenticated());
        let identity = session.identity().unwrap();
        assert_eq!(identity.user_id, "u-1");
        assert_eq!(identity.display_name, "Alice");
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        // テスト項目: 未認証の間は表示名としてユーザー名が使われる
        // given (前提条件):
        let mut session = Session::new("alice", "secret");

        // when (操作):
        let before = session.display_name().to_string();
        session.authenticate("u-1", "Alice the Great");
        let after = session.display_name().to_string();

        // then (期待する結果):
        assert_eq!(before, "alice");
        assert_eq!(after, "Alice the Great");
    }

    #[test]
    fn test_credentials_carry_username_and_password() {
        // テスト項目: credentials がユーザー名とパスワードを保持する
        // given (前提条件):
        let session = Session::new("alice", "secret");

        // when (操作):
        let credentials = session.credentials();

        // then (期待する結果):
        assert_eq!(credentials.username, "alice");
        assert_eq!(credentials.password, "secret");
    }
}
