//! End-to-end session behavior against a mock backend: state transitions,
//! persisted identifiers, and the account-state alerts.

use anyhow::{anyhow, Result};
use ensaluti::api::ApiClient;
use ensaluti::session::notify::Notifier;
use ensaluti::session::store::{MemoryStore, SessionStore, KEY_ROLE, KEY_USER_ID};
use ensaluti::session::{AuthSession, User, DEFAULT_ROLE};
use secrecy::SecretString;
use serde_json::json;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn password(raw: &str) -> SecretString {
    SecretString::from(raw.to_string())
}

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("notifier lock").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.messages
            .lock()
            .expect("notifier lock")
            .push(message.to_string());
    }
}

fn session_over(server: &MockServer, store: Arc<MemoryStore>) -> Result<AuthSession> {
    let api = ApiClient::new(&server.uri())?;
    Ok(AuthSession::new(api, store))
}

async fn mount_login_success(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Login successful",
            "userId": "u42",
            "userRole": "admin"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_persists_user_and_role() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_login_success(&server).await;

    let store = Arc::new(MemoryStore::new());
    let mut session = session_over(&server, store.clone())?;

    let message = session.login("a@x.com", &password("pw")).await?;
    assert_eq!(message, "Login successful");

    let user = session.user().ok_or_else(|| anyhow!("expected user"))?;
    assert_eq!(user.user_id, "u42");
    assert_eq!(user.email.as_deref(), Some("a@x.com"));
    assert_eq!(user.name, None);
    assert_eq!(session.role(), "admin");

    assert_eq!(store.get(KEY_USER_ID).as_deref(), Some("u42"));
    assert_eq!(store.get(KEY_ROLE).as_deref(), Some("admin"));
    Ok(())
}

#[tokio::test]
async fn login_role_falls_back_to_user() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Login successful",
            "userId": "u42"
        })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let mut session = session_over(&server, store.clone())?;

    session.login("a@x.com", &password("pw")).await?;

    assert_eq!(session.role(), DEFAULT_ROLE);
    assert_eq!(store.get(KEY_ROLE).as_deref(), Some(DEFAULT_ROLE));
    Ok(())
}

#[tokio::test]
async fn login_rejected_message_leaves_state_untouched() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Login failed" })),
        )
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let mut session = session_over(&server, store.clone())?;

    let result = session.login("a@x.com", &password("pw")).await;
    assert!(result.is_err());

    assert!(session.user().is_none());
    assert_eq!(session.role(), DEFAULT_ROLE);
    assert_eq!(store.get(KEY_USER_ID), None);
    assert_eq!(store.get(KEY_ROLE), None);
    Ok(())
}

#[tokio::test]
async fn login_suspended_alerts_once_then_errors() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "error": "Account is suspended" })),
        )
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let api = ApiClient::new(&server.uri())?;
    let mut session = AuthSession::with_notifier(api, store.clone(), notifier.clone());

    let result = session.login("a@x.com", &password("pw")).await;
    assert!(result.is_err());

    assert_eq!(
        notifier.messages(),
        vec!["Your account is suspended from further notice due to unusual activity".to_string()]
    );
    assert!(session.user().is_none());
    assert_eq!(store.get(KEY_USER_ID), None);
    Ok(())
}

#[tokio::test]
async fn login_blocked_alerts_termination() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({ "error": "Account is blocked" })),
        )
        .mount(&server)
        .await;

    let notifier = Arc::new(RecordingNotifier::default());
    let api = ApiClient::new(&server.uri())?;
    let mut session =
        AuthSession::with_notifier(api, Arc::new(MemoryStore::new()), notifier.clone());

    let result = session.login("a@x.com", &password("pw")).await;
    assert!(result.is_err());

    assert_eq!(
        notifier.messages(),
        vec!["Your account has been terminated".to_string()]
    );
    Ok(())
}

#[tokio::test]
async fn login_other_http_error_does_not_alert() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let notifier = Arc::new(RecordingNotifier::default());
    let api = ApiClient::new(&server.uri())?;
    let mut session =
        AuthSession::with_notifier(api, Arc::new(MemoryStore::new()), notifier.clone());

    let result = session.login("a@x.com", &password("pw")).await;
    assert!(result.is_err());
    assert!(notifier.messages().is_empty());
    Ok(())
}

#[tokio::test]
async fn signup_sets_user_and_persists() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .and(body_json(json!({
            "name": "A",
            "email": "a@x.com",
            "password": "pw"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "userId": "u1" })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let mut session = session_over(&server, store.clone())?;

    let user_id = session.signup("A", "a@x.com", &password("pw")).await?;
    assert_eq!(user_id, "u1");

    assert_eq!(
        session.user(),
        Some(&User {
            name: Some("A".to_string()),
            email: Some("a@x.com".to_string()),
            user_id: "u1".to_string(),
        })
    );
    assert_eq!(session.role(), DEFAULT_ROLE);
    assert_eq!(store.get(KEY_USER_ID).as_deref(), Some("u1"));
    assert_eq!(store.get(KEY_ROLE).as_deref(), Some(DEFAULT_ROLE));
    Ok(())
}

#[tokio::test]
async fn signup_failure_propagates_without_state() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/signup"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "error": "User already exists" })),
        )
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let mut session = session_over(&server, store.clone())?;

    let err = session
        .signup("A", "a@x.com", &password("pw"))
        .await
        .err()
        .ok_or_else(|| anyhow!("expected error"))?;
    assert!(err.to_string().contains("User already exists"));

    assert!(session.user().is_none());
    assert_eq!(store.get(KEY_USER_ID), None);
    Ok(())
}

#[tokio::test]
async fn logout_clears_state_even_when_server_fails() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    mount_login_success(&server).await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    let mut session = session_over(&server, store.clone())?;

    session.login("a@x.com", &password("pw")).await?;
    session.logout().await;

    assert!(session.user().is_none());
    assert_eq!(session.role(), DEFAULT_ROLE);
    assert_eq!(store.get(KEY_USER_ID), None);
    assert_eq!(store.get(KEY_ROLE), None);
    Ok(())
}

#[tokio::test]
async fn restore_populates_name_and_stored_role() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/user/u7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Ada" })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    store.set(KEY_USER_ID, "u7");
    store.set(KEY_ROLE, "admin");

    let mut session = session_over(&server, store.clone())?;
    session.restore().await;

    assert_eq!(
        session.user(),
        Some(&User {
            name: Some("Ada".to_string()),
            email: None,
            user_id: "u7".to_string(),
        })
    );
    assert_eq!(session.role(), "admin");
    Ok(())
}

#[tokio::test]
async fn restore_defaults_role_when_missing() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/user/u7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Ada" })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    store.set(KEY_USER_ID, "u7");

    let mut session = session_over(&server, store.clone())?;
    session.restore().await;

    assert_eq!(session.role(), DEFAULT_ROLE);
    Ok(())
}

#[tokio::test]
async fn restore_failure_matches_logout_state() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/user/u9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "User not found" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryStore::new());
    store.set(KEY_USER_ID, "u9");
    store.set(KEY_ROLE, "admin");

    let mut session = session_over(&server, store.clone())?;
    session.restore().await;

    assert!(session.user().is_none());
    assert_eq!(session.role(), DEFAULT_ROLE);
    assert_eq!(store.get(KEY_USER_ID), None);
    assert_eq!(store.get(KEY_ROLE), None);
    Ok(())
}

#[tokio::test]
async fn restore_without_stored_id_is_a_noop() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    let store = Arc::new(MemoryStore::new());
    let mut session = session_over(&server, store.clone())?;
    session.restore().await;

    assert!(session.user().is_none());
    assert_eq!(session.role(), DEFAULT_ROLE);
    // No requests were issued, so nothing to assert against the server; the
    // store must still be empty.
    assert_eq!(store.get(KEY_USER_ID), None);
    Ok(())
}

#[tokio::test]
async fn fetch_user_name_propagates_errors_raw() -> Result<()> {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/user/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "Ada" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/user/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "User not found" })))
        .mount(&server)
        .await;

    let session = session_over(&server, Arc::new(MemoryStore::new()))?;

    assert_eq!(session.fetch_user_name("u1").await?, "Ada");

    let err = session
        .fetch_user_name("nope")
        .await
        .err()
        .ok_or_else(|| anyhow!("expected error"))?;
    assert!(err.to_string().contains("User not found"));
    Ok(())
}
