/// `Authorization` header value for a bearer token.
pub fn bearer_header(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Empty or whitespace-only tokens are treated as absent.
pub fn normalize_token(raw: Option<String>) -> Option<String> {
    raw.filter(|t| !t.trim().is_empty())
}
