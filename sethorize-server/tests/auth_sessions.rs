mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn logout_invalidates_the_session_before_token_expiry() {
    let Some(t) = test_app().await else { return };
    let fx = seed_fixture(&t.db).await;
    let access = login(&t.app, &fx.email, &fx.client.slug).await;

    let (status, body) = get_with_bearer(&t.app, "/auth/session", &access).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["id"].as_str().is_some());

    let (status, _) = get_with_bearer(&t.app, "/auth/logout", &access).await;
    assert_eq!(status, StatusCode::OK);

    // The JWT is still within its exp window, but the session is gone.
    let (status, _) = get_with_bearer(&t.app, "/auth/session", &access).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = get_with_bearer(&t.app, "/auth/logout", &access).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn password_change_requires_current_and_rotates_the_hash() {
    let Some(t) = test_app().await else { return };
    let fx = seed_fixture(&t.db).await;
    let access = login(&t.app, &fx.email, &fx.client.slug).await;

    let (status, _) = post_json(
        &t.app,
        "/account/password",
        Some(&access),
        json!({"current_password": "not-it", "new_password": "pw2!"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        &t.app,
        "/account/password",
        Some(&access),
        json!({"current_password": USER_PASSWORD, "new_password": "pw2!"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Old password is dead, new one logs in.
    let (status, _) = post_json(
        &t.app,
        "/auth/login",
        None,
        json!({"username": fx.email, "password": USER_PASSWORD, "client_id": fx.client.slug}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = post_json(
        &t.app,
        "/auth/login",
        None,
        json!({"username": fx.email, "password": "pw2!", "client_id": fx.client.slug}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn register_creates_an_unverified_user_under_the_default_tenant() {
    let Some(t) = test_app().await else { return };
    // The default tenant comes from the seed routine.
    sethorize_server::bootstrap::ensure_seed_data(&t.db, &t.cfg)
        .await
        .unwrap();

    let email = format!("fresh-{}@example.test", Uuid::new_v4().simple());
    let (status, body) = post_json(
        &t.app,
        "/auth/register",
        None,
        json!({"first_name": "Fresh", "last_name": "User", "email": email, "password": "pw!"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    assert_eq!(body["email"], json!(email));
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());

    // Duplicate registration is refused.
    let (status, _) = post_json(
        &t.app,
        "/auth/register",
        None,
        json!({"first_name": "Fresh", "last_name": "User", "email": email, "password": "pw!"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unverified accounts cannot log in yet.
    let (status, _) = post_json(
        &t.app,
        "/auth/login",
        None,
        json!({"username": email, "password": "pw!", "client_id": "default"}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn client_probe_is_gated_by_client_credentials() {
    let Some(t) = test_app().await else { return };
    let fx = seed_fixture(&t.db).await;
    let probe = json!({"client_id": fx.client.id.to_string(), "user_id": fx.user.id.to_string()});

    // No credentials at all.
    let (status, _) = post_json(&t.app, "/auth/client", None, probe.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Wrong secret.
    let bad = client_bearer(fx.client.id, "wrong");
    let (status, _) = post_json(&t.app, "/auth/client", Some(&bad), probe.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Valid composite bearer, no consent yet.
    let good = client_bearer(fx.client.id, CLIENT_SECRET);
    let (status, body) = post_json(&t.app, "/auth/client", Some(&good), probe.clone()).await;
    assert_eq!(status, StatusCode::OK, "client probe failed: {body}");
    assert_eq!(body["consent"], json!(false));
    assert_eq!(body["scopes"], json!([]));
    assert_eq!(body["slug"], json!(fx.client.slug));
    assert!(body.get("secret_hash").is_none(), "stored hash must not leak");

    // After an authorize, the consent shows up with its scopes.
    let access = login(&t.app, &fx.email, &fx.client.slug).await;
    let (status, _) = authorize(&t.app, &access, fx.client.id, REDIRECT_URI, "read write").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = post_json(&t.app, "/auth/client", Some(&good), probe).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["consent"], json!(true));
    assert_eq!(body["scopes"], json!(["read", "write"]));
}

#[tokio::test]
async fn garbage_bearers_never_pass_the_session_guard() {
    let Some(t) = test_app().await else { return };

    for bearer in ["", "not-a-jwt", "aaaa.bbbb.cccc"] {
        let (status, _) = get_with_bearer(&t.app, "/auth/session", bearer).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "bearer {bearer:?}");
    }
}

#[tokio::test]
async fn healthz_is_public_plain_text() {
    let Some(t) = test_app().await else { return };
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    let resp = t
        .app
        .clone()
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}
