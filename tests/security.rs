//! Security-focused test suite.
//!
//! Exercises the session gate through the HTTP router: every way a request
//! can fail authentication must end in 401 without touching the resource.
//! Run with: `cargo test --features mocks --test security`

#![cfg(feature = "mocks")]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use blogkit::api::axum::{AppState, router};
use blogkit::cache::DEFAULT_TTL;
use blogkit::crypto::{Argon2Hasher, PasswordHasher};
use blogkit::jwt::{JwtConfig, JwtService};
use blogkit::{
    Article, Category, InMemoryCache, InMemorySessionStore, MockRepository, SessionGate,
    SessionStore, User,
};
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

const SECRET: &str = "the-real-signing-secret-0123456789";

struct Harness {
    app: Router,
    jwt: JwtService,
    sessions: InMemorySessionStore,
    categories: MockRepository<Category>,
}

fn harness() -> Harness {
    let jwt = JwtService::new(JwtConfig::new(SECRET).unwrap());
    let sessions = InMemorySessionStore::new();
    let categories = MockRepository::<Category>::new();

    let state = AppState::new(
        MockRepository::<User>::new(),
        MockRepository::<Article>::new(),
        categories.clone(),
        InMemoryCache::new(),
        DEFAULT_TTL,
        SessionGate::new(jwt.clone(), sessions.clone()),
        Argon2Hasher::new(4096, 1, 1),
    );

    Harness {
        app: router(state),
        jwt,
        sessions,
        categories,
    }
}

impl Harness {
    async fn get_with_header(&self, authorization: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::builder().method("GET").uri("/api/v1/categories");
        if let Some(value) = authorization {
            request = request.header(header::AUTHORIZATION, value);
        }

        let response = self
            .app
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn assert_rejected(&self, authorization: Option<&str>) {
        let reads = self.categories.read_count();
        let (status, body) = self.get_with_header(authorization).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{authorization:?}");
        assert_eq!(body["status"], "error");
        assert_eq!(body["translate"], "unauthorized");
        assert!(body.get("data").is_none());
        assert_eq!(self.categories.read_count(), reads);
    }

    /// Issues a token for `user_id` and makes it the live session.
    async fn session_token(&self, user_id: i64) -> String {
        let issued = self.jwt.issue(user_id).unwrap();
        self.sessions
            .put(user_id, &issued.token, Duration::hours(1))
            .await
            .unwrap();
        issued.token
    }
}

// =============================================================================
// Password Hashing
// =============================================================================

#[test]
fn argon2_produces_different_hashes_for_same_password() {
    let hasher = Argon2Hasher::new(4096, 1, 1);

    let hash1 = hasher.hash("testpassword123").unwrap();
    let hash2 = hasher.hash("testpassword123").unwrap();

    assert_ne!(hash1, hash2);
    assert!(hasher.verify("testpassword123", &hash1).unwrap());
    assert!(hasher.verify("testpassword123", &hash2).unwrap());
}

#[test]
fn argon2_verifies_with_parameters_from_the_hash() {
    let weak = Argon2Hasher::new(4096, 1, 1);
    let hash = weak.hash("testpassword").unwrap();

    assert!(hash.starts_with("$argon2id$"));
    assert!(Argon2Hasher::default().verify("testpassword", &hash).unwrap());
    assert!(!Argon2Hasher::default().verify("testpassword!", &hash).unwrap());
}

// =============================================================================
// Authorization Header
// =============================================================================

#[tokio::test]
async fn valid_session_token_is_accepted() {
    let h = harness();
    let token = h.session_token(1).await;

    let (status, body) = h.get_with_header(Some(&format!("Bearer {token}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn missing_or_malformed_header_is_rejected() {
    let h = harness();
    let token = h.session_token(1).await;

    h.assert_rejected(None).await;
    h.assert_rejected(Some("")).await;
    h.assert_rejected(Some("Bearer")).await;
    h.assert_rejected(Some("Bearer    ")).await;
    h.assert_rejected(Some(&format!("Basic {token}"))).await;
    h.assert_rejected(Some(&token)).await;
    h.assert_rejected(Some("Bearer not-a-jwt")).await;
}

// =============================================================================
// Token Signature and Expiry
// =============================================================================

#[tokio::test]
async fn tampered_signature_is_rejected() {
    let h = harness();
    let token = h.session_token(1).await;

    let mut chars: Vec<char> = token.chars().collect();
    let at = chars.len() - 5;
    chars[at] = if chars[at] == 'A' { 'B' } else { 'A' };
    let tampered: String = chars.into_iter().collect();

    h.assert_rejected(Some(&format!("Bearer {tampered}"))).await;
}

#[tokio::test]
async fn token_signed_with_another_secret_is_rejected() {
    let h = harness();
    let forged = JwtService::new(JwtConfig::new("some-other-signing-secret-987654321").unwrap())
        .issue(1)
        .unwrap();
    // even if the session slot somehow held the forged token
    h.sessions
        .put(1, &forged.token, Duration::hours(1))
        .await
        .unwrap();

    h.assert_rejected(Some(&format!("Bearer {}", forged.token)))
        .await;
}

#[tokio::test]
async fn token_from_another_issuer_is_rejected() {
    let h = harness();
    let foreign = JwtService::new(JwtConfig::new(SECRET).unwrap().with_issuer("elsewhere"))
        .issue(1)
        .unwrap();
    h.sessions
        .put(1, &foreign.token, Duration::hours(1))
        .await
        .unwrap();

    h.assert_rejected(Some(&format!("Bearer {}", foreign.token)))
        .await;
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let h = harness();
    let expired = JwtService::new(
        JwtConfig::new(SECRET)
            .unwrap()
            .with_expiry(Duration::seconds(-10)),
    )
    .issue(1)
    .unwrap();
    h.sessions
        .put(1, &expired.token, Duration::hours(1))
        .await
        .unwrap();

    h.assert_rejected(Some(&format!("Bearer {}", expired.token)))
        .await;
}

// =============================================================================
// Session Binding
// =============================================================================

#[tokio::test]
async fn signed_token_without_session_is_rejected() {
    let h = harness();
    let issued = h.jwt.issue(1).unwrap();

    h.assert_rejected(Some(&format!("Bearer {}", issued.token)))
        .await;
}

#[tokio::test]
async fn token_of_another_user_session_is_rejected() {
    let h = harness();
    let user_two = h.session_token(2).await;
    let user_one = h.jwt.issue(1).unwrap();
    // user 1's slot holds user 2's token
    h.sessions
        .put(1, &user_two, Duration::hours(1))
        .await
        .unwrap();

    h.assert_rejected(Some(&format!("Bearer {}", user_one.token)))
        .await;
}

#[tokio::test]
async fn deleted_session_rejects_token() {
    let h = harness();
    let token = h.session_token(1).await;
    h.sessions.delete(1).await.unwrap();

    h.assert_rejected(Some(&format!("Bearer {token}"))).await;
}

#[tokio::test]
async fn expired_session_entry_rejects_valid_token() {
    let h = harness();
    let issued = h.jwt.issue(1).unwrap();
    h.sessions
        .put(1, &issued.token, Duration::seconds(-1))
        .await
        .unwrap();

    h.assert_rejected(Some(&format!("Bearer {}", issued.token)))
        .await;
}
