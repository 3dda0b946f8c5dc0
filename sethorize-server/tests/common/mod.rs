#![allow(dead_code)]

use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD},
    Engine as _,
};
use serde_json::json;
use sethorize_auth::AuthState;
use sethorize_config::AppConfig;
use sethorize_crypto::KeyManager;
use sethorize_db::{
    Client, ClientOperations, Db, NewClient, NewUser, Tenant, TenantOperations, User,
    UserOperations,
};
use tower::util::ServiceExt;
use uuid::Uuid;

pub const CLIENT_SECRET: &str = "s3cret";
pub const USER_PASSWORD: &str = "pw!";
pub const REDIRECT_URI: &str = "https://app/cb";

pub struct TestApp {
    pub db: Db,
    pub app: axum::Router,
    pub cfg: AppConfig,
}

/// Builds the full router against the database named by
/// `SETHORIZE_TEST_DATABASE_URL`. Returns `None` (and the test passes as a
/// skip) when no test database is configured.
pub async fn test_app() -> Option<TestApp> {
    let Ok(url) = std::env::var("SETHORIZE_TEST_DATABASE_URL") else {
        eprintln!("SETHORIZE_TEST_DATABASE_URL not set; skipping database-backed test");
        return None;
    };
    let db = Db::connect(&url).await.expect("connect test database");
    let mut cfg = AppConfig::default_for_tests();
    let key_path = std::env::temp_dir().join(format!("sethorize-test-{}.pem", Uuid::new_v4()));
    cfg.private_key_path = key_path.to_string_lossy().into_owned();
    let keys = KeyManager::load_or_generate(&cfg.private_key_path).expect("key material");
    let state = AuthState {
        db: db.clone(),
        cfg: cfg.clone(),
        keys,
    };
    Some(TestApp {
        db: db.clone(),
        app: sethorize_server::build_router(state),
        cfg,
    })
}

pub struct Fixture {
    pub tenant: Tenant,
    pub client: Client,
    pub user: User,
    pub email: String,
}

/// Seeds a tenant, a client with a known secret and redirect URI, and a
/// verified user. Names are unique per call so suites can rerun against a
/// persistent database.
pub async fn seed_fixture(db: &Db) -> Fixture {
    let tag = Uuid::new_v4().simple().to_string();
    let tenant = db.create_tenant(&format!("tenant-{tag}")).await.unwrap();
    let client = db
        .create_client(NewClient {
            name: format!("client-{tag}"),
            slug: format!("app-{tag}"),
            description: "integration test client".into(),
            secret: CLIENT_SECRET.into(),
            redirect_uris: vec![REDIRECT_URI.into()],
            scopes: vec!["read".into(), "write".into()],
            is_internal: false,
            tenant_id: tenant.id,
        })
        .await
        .unwrap();
    let email = format!("u-{tag}@example.test");
    let user = db
        .create_user(NewUser {
            email: email.clone(),
            first_name: "Test".into(),
            last_name: "User".into(),
            password: USER_PASSWORD.into(),
            is_active: true,
            is_verified: true,
            is_admin: false,
            tenant_id: tenant.id,
        })
        .await
        .unwrap();
    Fixture {
        tenant,
        client,
        user,
        email,
    }
}

async fn read_response(resp: axum::response::Response) -> (StatusCode, serde_json::Value) {
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
    let value = if bytes.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| json!({"raw": String::from_utf8_lossy(&bytes).to_string()}))
    };
    (status, value)
}

pub async fn post_json(
    app: &axum::Router,
    path: &str,
    bearer: Option<&str>,
    body_json: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::post(path).header("content-type", "application/json");
    if let Some(token) = bearer {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let req = builder.body(Body::from(body_json.to_string())).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    read_response(resp).await
}

pub async fn get_with_bearer(
    app: &axum::Router,
    path: &str,
    bearer: &str,
) -> (StatusCode, serde_json::Value) {
    let req = Request::get(path)
        .header("authorization", format!("Bearer {bearer}"))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    read_response(resp).await
}

pub async fn post_form(
    app: &axum::Router,
    path: &str,
    pairs: &[(&str, &str)],
) -> (StatusCode, serde_json::Value) {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    let req = Request::post(path)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(serializer.finish()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    read_response(resp).await
}

/// Password login; panics unless it succeeds.
pub async fn login(app: &axum::Router, username: &str, client_ref: &str) -> String {
    let (status, body) = post_json(
        app,
        "/auth/login",
        None,
        json!({"username": username, "password": USER_PASSWORD, "client_id": client_ref}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["access_token"].as_str().unwrap().to_string()
}

/// Issues an authorization code for the fixture client.
pub async fn authorize(
    app: &axum::Router,
    token: &str,
    client_id: Uuid,
    redirect_uri: &str,
    scope: &str,
) -> (StatusCode, serde_json::Value) {
    post_json(
        app,
        "/auth/authorize",
        Some(token),
        json!({
            "client_id": client_id.to_string(),
            "redirect_uri": redirect_uri,
            "response_type": "code",
            "scope": scope,
            "state": "xyz",
        }),
    )
    .await
}

pub async fn exchange_code(
    app: &axum::Router,
    client_id: Uuid,
    code: &str,
) -> (StatusCode, serde_json::Value) {
    post_form(
        app,
        "/auth/token",
        &[
            ("grant_type", "authorization_code"),
            ("client_id", &client_id.to_string()),
            ("client_secret", CLIENT_SECRET),
            ("code", code),
            ("redirect_uri", REDIRECT_URI),
            ("scope", "read write"),
        ],
    )
    .await
}

/// Basic-style composite bearer for the client guard.
pub fn client_bearer(client_id: Uuid, secret: &str) -> String {
    STANDARD.encode(format!("{client_id}:{secret}"))
}

/// Decodes a JWT payload without verification, for claim assertions.
pub fn decode_jwt_payload(token: &str) -> serde_json::Value {
    let payload = token.split('.').nth(1).expect("jwt payload segment");
    serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap()
}
