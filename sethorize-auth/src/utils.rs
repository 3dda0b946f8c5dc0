/// Extract a bearer token from an Authorization header value in a
/// case-insensitive manner. Returns the trimmed token when present.
pub fn extract_bearer_token(header: Option<&str>) -> Option<String> {
    let header = header?;
    let mut parts = header.splitn(2, char::is_whitespace);
    let scheme = parts.next()?;
    let token = parts.next()?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim().to_string())
    } else {
        None
    }
}

/// Space-separated scope string into the stored scope set.
pub fn split_scopes(scope: &str) -> Vec<String> {
    scope.split_whitespace().map(str::to_string).collect()
}
