//! End-to-end flows: real HTTP client and file storage against an in-process
//! fake of the auth API.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use gatehouse::api::HttpAuthApi;
use gatehouse::config::{ApiConfig, ApiTimeouts};
use gatehouse::forms::{SignInForm, SignUpForm};
use gatehouse::gate::Route;
use gatehouse::pages::{Navigator, View};
use gatehouse::session::{AuthContext, SessionState};
use gatehouse::storage::{FileStore, TOKEN_KEY, TokenStore};
use serde_json::{Value, json};

// =============================================================================
// Fake auth API
// =============================================================================

struct FakeAuth {
    valid_tokens: Mutex<HashSet<String>>,
    emails: Mutex<HashSet<String>>,
    validate_calls: AtomicUsize,
}

impl FakeAuth {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            valid_tokens: Mutex::new(HashSet::from(["abc123".to_owned()])),
            emails: Mutex::new(HashSet::from(["a@b.com".to_owned()])),
            validate_calls: AtomicUsize::new(0),
        })
    }

    fn issue(&self, token: &str) -> Response {
        self.valid_tokens.lock().unwrap().insert(token.to_owned());
        (StatusCode::CREATED, Json(json!({ "token": token }))).into_response()
    }
}

async fn validate(State(auth): State<Arc<FakeAuth>>, headers: HeaderMap) -> StatusCode {
    auth.validate_calls.fetch_add(1, Ordering::SeqCst);
    let token = headers.get("authorization").and_then(|v| v.to_str().ok()).unwrap_or_default();
    if token == "slow" {
        tokio::time::sleep(Duration::from_secs(5)).await;
        return StatusCode::OK;
    }
    if auth.valid_tokens.lock().unwrap().contains(token) { StatusCode::OK } else { StatusCode::UNAUTHORIZED }
}

async fn signin(State(auth): State<Arc<FakeAuth>>, Json(body): Json<Value>) -> Response {
    if body["email"] == "a@b.com" && body["password"] == "pw" {
        return auth.issue("xyz");
    }
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid email or password." }))).into_response()
}

async fn signup(State(auth): State<Arc<FakeAuth>>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_owned();
    if !auth.emails.lock().unwrap().insert(email.clone()) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "Email already exists." }))).into_response();
    }
    auth.issue(&format!("token-for-{email}"))
}

struct Env {
    auth: Arc<FakeAuth>,
    store: Arc<FileStore>,
    ctx: AuthContext,
    _dir: tempfile::TempDir,
}

impl Env {
    fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY).unwrap()
    }

    fn navigator(&self) -> Navigator {
        Navigator::new(self.ctx.clone())
    }

    fn validate_calls(&self) -> usize {
        self.auth.validate_calls.load(Ordering::SeqCst)
    }
}

async fn setup() -> Env {
    setup_with(ApiTimeouts::default()).await
}

async fn setup_with(timeouts: ApiTimeouts) -> Env {
    let auth = FakeAuth::new();
    let app = Router::new()
        .route("/auth/validate", get(validate))
        .route("/auth/signin", post(signin))
        .route("/auth/signup", post(signup))
        .with_state(auth.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::new(dir.path().join("storage.json")));
    let mut config = ApiConfig::new(&format!("http://{addr}/"));
    config.timeouts = timeouts;
    let api = Arc::new(HttpAuthApi::new(&config).unwrap());
    let ctx = AuthContext::new(store.clone(), api);
    Env { auth, store, ctx, _dir: dir }
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn valid_token_renders_welcome_and_sign_out() {
    let env = setup().await;
    env.store.set(TOKEN_KEY, "abc123").unwrap();

    let view = env.navigator().open(Route::Application).await;
    let text = view.to_string();
    assert!(text.contains("Welcome to the application."));
    assert!(text.contains("Sign Out"));
    assert_eq!(env.validate_calls(), 1);
}

#[tokio::test]
async fn absent_token_renders_notice_with_sign_in_link() {
    let env = setup().await;

    let view = env.navigator().open(Route::Application).await;
    assert!(matches!(view, View::NotAuthenticated(_)));
    let text = view.to_string();
    assert!(text.contains("You are not logged in."));
    assert!(text.contains("/signin"));
    assert_eq!(env.validate_calls(), 0);
}

#[tokio::test]
async fn tampered_token_is_treated_as_absent_but_kept() {
    let env = setup().await;
    env.store.set(TOKEN_KEY, "abc123-tampered").unwrap();

    assert_eq!(env.ctx.resolve().await, SessionState::Unauthenticated);
    assert_eq!(env.token().as_deref(), Some("abc123-tampered"));
}

#[tokio::test]
async fn slow_validation_times_out_and_keeps_token() {
    let env = setup_with(ApiTimeouts { request_secs: 1, ..ApiTimeouts::default() }).await;
    env.store.set(TOKEN_KEY, "slow").unwrap();

    assert_eq!(env.ctx.resolve().await, SessionState::Unauthenticated);
    assert_eq!(env.token().as_deref(), Some("slow"));

    let view = env.navigator().open(Route::Application).await;
    assert!(matches!(view, View::NotAuthenticated(_)));
}

#[tokio::test]
async fn sign_in_stores_token_and_navigates_to_application() {
    let env = setup().await;
    let mut nav = env.navigator();

    let view = nav.submit_sign_in(SignInForm { email: "a@b.com".into(), password: "pw".into() }).await;
    assert!(matches!(view, View::Application(_)));
    assert_eq!(env.token().as_deref(), Some("xyz"));
    assert_eq!(nav.current(), Some(Route::Application));
}

#[tokio::test]
async fn duplicate_sign_up_shows_server_message_and_stores_nothing() {
    let env = setup().await;

    let form = SignUpForm { email: "a@b.com".into(), name: "Ada".into(), password: "Passw0rd!".into() };
    let view = env.navigator().submit_sign_up(form).await;
    let View::SignUp(form) = view else { panic!("expected sign-up form") };
    assert_eq!(form.submit_error.as_deref(), Some("Email already exists."));
    assert_eq!(env.token(), None);
}

#[tokio::test]
async fn sign_up_then_sign_out_round_trip() {
    let env = setup().await;
    let mut nav = env.navigator();

    let form = SignUpForm { email: "new@b.com".into(), name: "New".into(), password: "Passw0rd!".into() };
    assert!(matches!(nav.submit_sign_up(form).await, View::Application(_)));
    assert_eq!(env.token().as_deref(), Some("token-for-new@b.com"));

    let calls_before = env.validate_calls();
    let view = nav.sign_out().await;
    assert!(matches!(view, View::SignIn(_)));
    assert_eq!(env.token(), None);
    assert_eq!(env.validate_calls(), calls_before);
}

#[tokio::test]
async fn signed_in_user_is_bounced_from_auth_forms() {
    let env = setup().await;
    env.store.set(TOKEN_KEY, "abc123").unwrap();

    for route in [Route::SignIn, Route::SignUp] {
        let mut nav = env.navigator();
        let view = nav.open(route).await;
        assert!(matches!(view, View::Application(_)), "{route} should redirect");
        assert_eq!(nav.history(), &[route, Route::Application]);
    }
}

#[tokio::test]
async fn unreachable_server_fails_closed() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::new(dir.path().join("storage.json")));
    store.set(TOKEN_KEY, "abc123").unwrap();
    let api = Arc::new(HttpAuthApi::new(&ApiConfig::new(&format!("http://{addr}"))).unwrap());
    let mut nav = Navigator::new(AuthContext::new(store.clone(), api));

    assert!(matches!(nav.open(Route::Application).await, View::NotAuthenticated(_)));
    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("abc123"));

    let view = nav.submit_sign_in(SignInForm { email: "a@b.com".into(), password: "pw".into() }).await;
    let View::SignIn(form) = view else { panic!("expected sign-in form") };
    assert!(form.submit_error.unwrap().starts_with("Could not reach the server"));
}
