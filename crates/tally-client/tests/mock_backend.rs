//! Mock backend tests for the tally client.
//!
//! These tests use wiremock to simulate the REST backend and exercise the
//! request pipeline, session lifecycle, and credential storage without
//! network access or a real server.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tally_client::api::auth::LoginRequest;
use tally_client::{ApiClient, ClientContext, RequestOptions, SessionStore, TokenStore};
use tally_core::error::Error;
use tally_core::traits::{LoadingSink, Notice, NoticeSink, SessionGuard, TokenProvider};
use tally_core::types::{AccessToken, BaseUrl, Credential, RefreshToken};

// ============================================================================
// Test harness
// ============================================================================

fn mock_base_url(server: &MockServer) -> BaseUrl {
    BaseUrl::new(server.uri()).unwrap()
}

/// A JWT whose claims segment decodes but whose signature is junk.
fn jwt_expiring_at(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(json!({"exp": exp, "sub": "alice"}).to_string());
    format!("{header}.{payload}.signature")
}

fn user_json() -> serde_json::Value {
    json!({
        "id": 1,
        "username": "alice",
        "email": "alice@example.com",
        "is_active": true,
        "created_at": "2024-01-01T00:00:00"
    })
}

struct StaticTokens(Option<AccessToken>);

impl TokenProvider for StaticTokens {
    fn access_token(&self) -> Option<AccessToken> {
        self.0.clone()
    }
}

struct NoAuthorizationHeader;

impl wiremock::Match for NoAuthorizationHeader {
    fn matches(&self, request: &wiremock::Request) -> bool {
        !request.headers.contains_key("authorization")
    }
}

#[derive(Default)]
struct RecordingNotices {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotices {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl NoticeSink for RecordingNotices {
    fn surface(&self, notice: Notice) {
        self.messages.lock().unwrap().push(notice.message);
    }
}

#[derive(Default)]
struct CountingLoading {
    started: AtomicUsize,
    finished: AtomicUsize,
}

impl LoadingSink for CountingLoading {
    fn loading_started(&self) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }
    fn loading_finished(&self) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct CountingGuard {
    invalidated: AtomicUsize,
    redirects: AtomicUsize,
    last_return_to: Mutex<Option<String>>,
}

impl SessionGuard for CountingGuard {
    fn invalidate(&self) {
        self.invalidated.fetch_add(1, Ordering::SeqCst);
    }
    fn redirect_to_login(&self, return_to: Option<&str>) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
        *self.last_return_to.lock().unwrap() = return_to.map(str::to_string);
    }
}

struct Harness {
    client: ApiClient,
    notices: Arc<RecordingNotices>,
    loading: Arc<CountingLoading>,
}

fn harness(server: &MockServer, token: Option<&str>) -> Harness {
    let notices = Arc::new(RecordingNotices::default());
    let loading = Arc::new(CountingLoading::default());
    let ctx = Arc::new(ClientContext::with_sinks(
        Arc::new(StaticTokens(token.map(AccessToken::new))),
        notices.clone(),
        loading.clone(),
    ));
    Harness {
        client: ApiClient::new(mock_base_url(server), ctx),
        notices,
        loading,
    }
}

// ============================================================================
// Envelope normalization
// ============================================================================

#[tokio::test]
async fn bare_body_is_wrapped_as_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pong": true})))
        .mount(&server)
        .await;

    let h = harness(&server, None);
    let envelope = h.client.get("/ping", RequestOptions::default()).await.unwrap();

    assert_eq!(envelope.code, 200);
    assert!(envelope.success);
    assert_eq!(envelope.data, Some(json!({"pong": true})));
}

#[tokio::test]
async fn enveloped_success_passes_through() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "ok",
            "data": [],
            "success": true
        })))
        .mount(&server)
        .await;

    let h = harness(&server, None);
    let envelope = h
        .client
        .get("/accounts", RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(envelope.message, "ok");
    assert!(h.notices.messages().is_empty());
}

#[tokio::test]
async fn envelope_failure_rejects_with_backend_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 400,
            "message": "account already exists",
            "success": false
        })))
        .mount(&server)
        .await;

    let h = harness(&server, None);
    let err = h
        .client
        .get("/accounts", RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.message(), "account already exists");
    assert_eq!(h.notices.messages(), vec!["account already exists"]);
}

#[tokio::test]
async fn envelope_failure_notice_respects_show_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 400,
            "message": "account already exists",
            "success": false
        })))
        .mount(&server)
        .await;

    let h = harness(&server, None);
    let err = h
        .client
        .get("/accounts", RequestOptions::default().without_error_notice())
        .await
        .unwrap_err();

    // The call still rejects; only the surfacing is suppressed.
    assert_eq!(err.message(), "account already exists");
    assert!(h.notices.messages().is_empty());
}

// ============================================================================
// Bearer attachment
// ============================================================================

#[tokio::test]
async fn bearer_token_is_attached_when_present() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let h = harness(&server, Some("test-token"));
    h.client
        .get("/accounts", RequestOptions::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn skip_auth_omits_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(NoAuthorizationHeader)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let h = harness(&server, Some("test-token"));
    let result = h
        .client
        .post("/auth/login", &json!({}), RequestOptions::unauthenticated())
        .await;

    assert!(result.is_ok());
}

// ============================================================================
// Loading indicator
// ============================================================================

#[tokio::test]
async fn loading_indicator_tracks_in_flight_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true}))
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;

    let h = harness(&server, None);
    let (a, b) = tokio::join!(
        h.client.get("/slow", RequestOptions::default()),
        h.client.get("/slow", RequestOptions::default()),
    );
    a.unwrap();
    b.unwrap();

    // Two overlapping requests produce one show and one hide.
    assert_eq!(h.loading.started.load(Ordering::SeqCst), 1);
    assert_eq!(h.loading.finished.load(Ordering::SeqCst), 1);
    assert_eq!(h.client.context().pending_requests(), 0);
}

#[tokio::test]
async fn loading_indicator_fires_even_on_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/boom"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({})))
        .mount(&server)
        .await;

    let h = harness(&server, None);
    let _ = h.client.get("/boom", RequestOptions::default()).await;

    assert_eq!(h.loading.started.load(Ordering::SeqCst), 1);
    assert_eq!(h.loading.finished.load(Ordering::SeqCst), 1);
    assert_eq!(h.client.context().pending_requests(), 0);
}

#[tokio::test]
async fn silent_requests_do_not_touch_the_indicator() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/quiet"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let h = harness(&server, None);
    h.client.get("/quiet", RequestOptions::silent()).await.unwrap();

    assert_eq!(h.loading.started.load(Ordering::SeqCst), 0);
    assert_eq!(h.loading.finished.load(Ordering::SeqCst), 0);
}

// ============================================================================
// Status-code branch table
// ============================================================================

#[tokio::test]
async fn not_found_surfaces_generic_notice() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts/999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({})))
        .mount(&server)
        .await;

    let h = harness(&server, None);
    let err = h
        .client
        .get("/accounts/999", RequestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(ref e) if e.status == 404));
    assert_eq!(h.notices.messages(), vec!["requested resource does not exist"]);
}

#[tokio::test]
async fn validation_errors_join_into_one_notice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "code": 422,
            "message": "validation failed",
            "data": [
                {"message": "amount required"},
                {"message": "date invalid"}
            ],
            "success": false
        })))
        .mount(&server)
        .await;

    let h = harness(&server, None);
    let err = h
        .client
        .post("/transactions", &json!({}), RequestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
    assert_eq!(err.message(), "amount required, date invalid");
    assert_eq!(h.notices.messages(), vec!["amount required, date invalid"]);
}

#[tokio::test]
async fn validation_without_detail_is_generic() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": "no"})))
        .mount(&server)
        .await;

    let h = harness(&server, None);
    let err = h
        .client
        .post("/transactions", &json!({}), RequestOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.message(), "invalid request parameters");
}

#[tokio::test]
async fn server_error_surfaces_generic_notice() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({})))
        .mount(&server)
        .await;

    let h = harness(&server, None);
    let err = h
        .client
        .get("/accounts", RequestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(ref e) if e.status == 500));
    assert_eq!(h.notices.messages(), vec!["internal server error"]);
}

#[tokio::test]
async fn network_failure_is_a_transport_error() {
    // Nothing listens on this port; the connection is refused.
    let notices = Arc::new(RecordingNotices::default());
    let ctx = Arc::new(ClientContext::with_sinks(
        Arc::new(StaticTokens(None)),
        notices.clone(),
        Arc::new(CountingLoading::default()),
    ));
    let client = ApiClient::new(BaseUrl::new("http://127.0.0.1:9").unwrap(), ctx);

    let err = client
        .get("/accounts", RequestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(
        notices.messages(),
        vec!["network unreachable, check your connection"]
    );
}

#[tokio::test]
async fn forbidden_with_marker_is_treated_as_session_expiry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "Not authenticated"
        })))
        .mount(&server)
        .await;

    let h = harness(&server, Some("stale-token"));
    let guard = Arc::new(CountingGuard::default());
    h.client.context().install_guard(guard.clone());

    let err = h
        .client
        .get("/accounts", RequestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Auth(_)));
    assert_eq!(guard.invalidated.load(Ordering::SeqCst), 1);
    assert_eq!(guard.redirects.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn forbidden_without_marker_is_a_permission_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "admin only"
        })))
        .mount(&server)
        .await;

    let h = harness(&server, Some("token"));
    let guard = Arc::new(CountingGuard::default());
    h.client.context().install_guard(guard.clone());

    let err = h
        .client
        .get("/accounts", RequestOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(ref e) if e.status == 403));
    assert_eq!(err.message(), "admin only");
    assert_eq!(guard.invalidated.load(Ordering::SeqCst), 0);
}

// ============================================================================
// 401 single flight
// ============================================================================

#[tokio::test]
async fn concurrent_unauthorized_responses_redirect_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "token expired"
        })))
        .mount(&server)
        .await;

    let h = harness(&server, Some("stale-token"));
    let guard = Arc::new(CountingGuard::default());
    h.client.context().install_guard(guard.clone());

    let opts = RequestOptions::default();
    let (a, b, c, d, e) = tokio::join!(
        h.client.get("/accounts", opts),
        h.client.get("/accounts", opts),
        h.client.get("/accounts", opts),
        h.client.get("/accounts", opts),
        h.client.get("/accounts", opts),
    );
    for result in [a, b, c, d, e] {
        assert!(matches!(result.unwrap_err(), Error::Auth(_)));
    }

    // Exactly one logout and one navigation, no matter how many 401s
    // arrived together.
    assert_eq!(guard.invalidated.load(Ordering::SeqCst), 1);
    assert_eq!(guard.redirects.load(Ordering::SeqCst), 1);
    assert_eq!(
        guard.last_return_to.lock().unwrap().as_deref(),
        Some("/accounts")
    );

    let session_notices: Vec<_> = h
        .notices
        .messages()
        .into_iter()
        .filter(|m| m.contains("session expired"))
        .collect();
    assert_eq!(session_notices.len(), 1);
}

// ============================================================================
// Session store
// ============================================================================

#[tokio::test]
async fn login_transitions_to_authenticated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "username": "alice",
            "password": "secret123"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "login succeeded",
            "data": {
                "access_token": jwt_expiring_at(Utc::now().timestamp() + 3600),
                "refresh_token": "refresh-token-value",
                "token_type": "bearer",
                "user": user_json()
            },
            "success": true
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let tokens = Arc::new(TokenStore::open(dir.path().join("session")).unwrap());
    let ctx = Arc::new(ClientContext::new(tokens.clone()));
    let client = ApiClient::new(mock_base_url(&server), ctx);
    let session = SessionStore::new(client, tokens.clone());

    assert!(!session.is_authenticated());
    let user = session
        .login(LoginRequest::new("alice", "secret123"))
        .await
        .unwrap();

    assert_eq!(user.username, "alice");
    assert!(session.is_authenticated());
    assert!(tokens.access_token().is_some());
    assert_eq!(
        tokens.refresh_token().unwrap().as_str(),
        "refresh-token-value"
    );
}

#[tokio::test]
async fn failed_login_stays_anonymous() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 401,
            "message": "invalid username or password",
            "success": false
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let tokens = Arc::new(TokenStore::open(dir.path().join("session")).unwrap());
    let ctx = Arc::new(ClientContext::new(tokens.clone()));
    let client = ApiClient::new(mock_base_url(&server), ctx);
    let session = SessionStore::new(client, tokens.clone());

    let err = session
        .login(LoginRequest::new("alice", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.message(), "invalid username or password");
    assert!(!session.is_authenticated());
    assert!(tokens.access_token().is_none());
}

#[tokio::test]
async fn logout_clears_state_even_when_backend_is_down() {
    // No server at all; the logout call fails at the transport layer.
    let dir = tempfile::tempdir().unwrap();
    let tokens = Arc::new(TokenStore::open(dir.path().join("session")).unwrap());
    tokens
        .save(&Credential::new(
            AccessToken::new(jwt_expiring_at(Utc::now().timestamp() + 3600)),
            RefreshToken::new("refresh-token-value"),
        ))
        .unwrap();
    let user: tally_core::model::User = serde_json::from_value(user_json()).unwrap();
    tokens.save_user(&user).unwrap();

    let ctx = Arc::new(ClientContext::new(tokens.clone()));
    let client = ApiClient::new(BaseUrl::new("http://127.0.0.1:9").unwrap(), ctx);
    let session = SessionStore::new(client, tokens.clone());

    assert!(session.is_authenticated());
    session.logout().await.unwrap();

    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
    assert!(tokens.access_token().is_none());
    assert!(tokens.refresh_token().is_none());
}

#[tokio::test]
async fn initialize_auth_restores_a_valid_session() {
    let server = MockServer::start().await;
    let token = jwt_expiring_at(Utc::now().timestamp() + 3600);

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "ok",
            "data": user_json(),
            "success": true
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let tokens = Arc::new(TokenStore::open(dir.path().join("session")).unwrap());
    tokens
        .save(&Credential::new(
            AccessToken::new(token),
            RefreshToken::new("refresh-token-value"),
        ))
        .unwrap();

    let ctx = Arc::new(ClientContext::new(tokens.clone()));
    let client = ApiClient::new(mock_base_url(&server), ctx);
    let session = SessionStore::new(client, tokens.clone());

    session.initialize_auth().await.unwrap();

    assert!(session.is_authenticated());
    assert_eq!(session.user().unwrap().username, "alice");
    assert!(!session.is_loading());
}

#[tokio::test]
async fn initialize_auth_with_failing_refresh_ends_anonymous() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "refresh token expired"
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let tokens = Arc::new(TokenStore::open(dir.path().join("session")).unwrap());
    tokens
        .save(&Credential::new(
            AccessToken::new(jwt_expiring_at(Utc::now().timestamp() - 3600)),
            RefreshToken::new("stale-refresh-token"),
        ))
        .unwrap();

    let ctx = Arc::new(ClientContext::new(tokens.clone()));
    let client = ApiClient::new(mock_base_url(&server), ctx);
    let session = SessionStore::new(client, tokens.clone());

    session.initialize_auth().await.unwrap();

    assert!(!session.is_authenticated());
    assert!(tokens.access_token().is_none());
    assert!(tokens.refresh_token().is_none());
    assert!(!session.is_loading());
}

#[tokio::test]
async fn initialize_auth_with_expired_token_uses_refreshed_credential() {
    let server = MockServer::start().await;
    let fresh = jwt_expiring_at(Utc::now().timestamp() + 3600);

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(body_json(json!({"refresh_token": "good-refresh-token"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "ok",
            "data": {
                "access_token": fresh.clone(),
                "refresh_token": "rotated-refresh-token",
                "token_type": "bearer",
                "user": user_json()
            },
            "success": true
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("authorization", format!("Bearer {fresh}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "ok",
            "data": user_json(),
            "success": true
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let tokens = Arc::new(TokenStore::open(dir.path().join("session")).unwrap());
    tokens
        .save(&Credential::new(
            AccessToken::new(jwt_expiring_at(Utc::now().timestamp() - 60)),
            RefreshToken::new("good-refresh-token"),
        ))
        .unwrap();

    let ctx = Arc::new(ClientContext::new(tokens.clone()));
    let client = ApiClient::new(mock_base_url(&server), ctx);
    let session = SessionStore::new(client, tokens.clone());

    session.initialize_auth().await.unwrap();

    assert!(session.is_authenticated());
    assert_eq!(
        tokens.refresh_token().unwrap().as_str(),
        "rotated-refresh-token"
    );
}

// ============================================================================
// Domain stores
// ============================================================================

#[tokio::test]
async fn account_store_keeps_its_cache_in_sync() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "ok",
            "data": [{
                "id": 1,
                "user_id": 1,
                "name": "Cash",
                "type": "cash",
                "balance": 100.0,
                "initial_balance": 100.0,
                "is_enabled": true,
                "created_at": "2024-01-01T00:00:00"
            }],
            "success": true
        })))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/accounts/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "deleted",
            "success": true
        })))
        .mount(&server)
        .await;

    let h = harness(&server, Some("token"));
    let store = tally_client::stores::AccountStore::new(h.client.clone());

    store.fetch_accounts().await.unwrap();
    assert_eq!(store.accounts().len(), 1);
    assert_eq!(store.total_balance(), 100.0);
    assert_eq!(store.enabled_accounts().len(), 1);
    assert!(store.account_by_id(1).is_some());

    store.delete_account(1).await.unwrap();
    assert!(store.accounts().is_empty());
}

#[tokio::test]
async fn transaction_store_prepends_created_entries() {
    let server = MockServer::start().await;

    let entry = |id: i64, amount: f64| {
        json!({
            "id": id,
            "user_id": 1,
            "type": "expense",
            "amount": amount,
            "category_id": 3,
            "account_id": 1,
            "transaction_date": "2024-05-01",
            "created_at": "2024-05-01T12:00:00"
        })
    };

    Mock::given(method("GET"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "ok",
            "data": [entry(1, 10.0)],
            "success": true,
            "pagination": {"page": 1, "page_size": 20, "total": 1, "total_pages": 1}
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "created",
            "data": entry(2, 25.5),
            "success": true
        })))
        .mount(&server)
        .await;

    let h = harness(&server, Some("token"));
    let store = tally_client::stores::TransactionStore::new(h.client.clone());

    store
        .fetch_transactions(&tally_core::model::TransactionFilter::default())
        .await
        .unwrap();
    assert_eq!(store.transactions().len(), 1);
    assert_eq!(store.pagination().unwrap().total, 1);

    let request = tally_core::model::TransactionCreate {
        kind: tally_core::model::TransactionType::Expense,
        amount: 25.5,
        category_id: 3,
        account_id: 1,
        to_account_id: None,
        transaction_date: chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        remark: None,
        images: Vec::new(),
        tags: None,
        location: None,
    };
    store.create_transaction(&request).await.unwrap();

    let cached = store.transactions();
    assert_eq!(cached.len(), 2);
    assert_eq!(cached[0].id, 2);
}

// ============================================================================
// Upload and download
// ============================================================================

#[tokio::test]
async fn multipart_import_posts_the_file() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/transactions/import"))
        .and(header("authorization", "Bearer import-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": "imported",
            "success": true
        })))
        .mount(&server)
        .await;

    let h = harness(&server, Some("import-token"));
    tally_client::api::transactions::import_file(&h.client, "data.csv", b"id,amount\n".to_vec())
        .await
        .unwrap();
}

#[tokio::test]
async fn download_materializes_the_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/export"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"id,amount\n1,42.00\n".to_vec()))
        .mount(&server)
        .await;

    let h = harness(&server, None);
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("export.csv");

    h.client
        .download("/export", &dest, RequestOptions::default())
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(&dest).unwrap(),
        "id,amount\n1,42.00\n"
    );
    // Only the destination file remains; the temporary is gone.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}
