use crate::types::ClientIp;
use axum::http::header;
use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::{Duration, Instant};

/// Emits one Apache-common-log-format line per completed request on the
/// `http_access` target.
pub async fn access_log(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let ip = req
        .extensions()
        .get::<ClientIp>()
        .map(|c| c.0.clone())
        .unwrap_or_else(|| "-".to_string());
    let method = req.method().to_string();
    let uri = req.uri().to_string();
    let proto = format!("{:?}", req.version());
    let referer = header_or_dash(req.headers(), header::REFERER);
    let user_agent = header_or_dash(req.headers(), header::USER_AGENT);

    let resp = next.run(req).await;

    let status = resp.status().as_u16();
    let bytes = resp
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);
    let line = format_line(
        &ip,
        &method,
        &uri,
        &proto,
        status,
        bytes,
        &referer,
        &user_agent,
        start.elapsed(),
    );
    tracing::info!(target: "http_access", "{line}");
    resp
}

fn header_or_dash(headers: &axum::http::HeaderMap, name: header::HeaderName) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .unwrap_or("-")
        .to_string()
}

#[allow(clippy::too_many_arguments)]
fn format_line(
    ip: &str,
    method: &str,
    uri: &str,
    proto: &str,
    status: u16,
    bytes: u64,
    referer: &str,
    user_agent: &str,
    duration: Duration,
) -> String {
    format!("{ip} - - \"{method} {uri} {proto}\" {status} {bytes} \"{referer}\" \"{user_agent}\" {duration:?}")
}
