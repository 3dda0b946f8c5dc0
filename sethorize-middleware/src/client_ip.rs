use crate::types::ClientIp;
use axum::extract::ConnectInfo;
use axum::http::HeaderMap;
use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::net::SocketAddr;

/// Middleware that resolves the caller address and stores it as a `ClientIp`
/// request extension for the access log.
pub async fn extract_client_ip(mut req: Request<Body>, next: Next) -> Response {
    let peer = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    if let Some(ip) = resolve_client_ip(req.headers(), peer) {
        req.extensions_mut().insert(ClientIp(ip));
    }
    next.run(req).await
}

/// `X-Real-IP` wins over the first `X-Forwarded-For` hop, which wins over
/// the socket peer address.
pub fn resolve_client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<String> {
    if let Some(real_ip) = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return Some(real_ip.to_string());
    }
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        return Some(forwarded.to_string());
    }
    peer.map(|addr| addr.ip().to_string())
}
