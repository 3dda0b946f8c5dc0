use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use sethorize_auth::{self as auth, AuthState};
use sethorize_middleware::{access_log, client_ip};

/// Assemble the application router: public endpoints, the client-guarded
/// probe, the session-guarded group, and the shared middleware stack.
pub fn build_router(state: AuthState) -> Router {
    let public_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/token", post(auth::token))
        .with_state(state.clone());

    let client_routes = Router::new()
        .route("/auth/client", post(auth::client))
        .layer(from_fn_with_state(state.clone(), auth::client_guard))
        .with_state(state.clone());

    let session_routes = Router::new()
        .route("/auth/authorize", post(auth::authorize))
        .route("/auth/logout", get(auth::logout))
        .route("/auth/session", get(auth::session))
        .route("/account/password", post(auth::change_password))
        .layer(from_fn_with_state(state.clone(), auth::session_guard))
        .with_state(state.clone());

    Router::new()
        .route("/healthz", get(crate::routes::healthz))
        .merge(public_routes)
        .merge(client_routes)
        .merge(session_routes)
        .layer(axum::Extension(state.db.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(access_log::access_log))
        .layer(from_fn(client_ip::extract_client_ip))
}
