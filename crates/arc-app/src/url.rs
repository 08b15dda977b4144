//! Turning overlay and bridge queries into URLs.

use std::sync::LazyLock;

use regex::Regex;

static URL_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(https?://|chrome://|about:|file://)").unwrap());

/// Whether `query` should be opened as-is rather than searched for.
pub fn is_url_like(query: &str) -> bool {
    URL_LIKE.is_match(query)
}

/// The URL to open for `query`: itself when URL-like, a search otherwise.
pub fn query_to_url(query: &str, search_url: &str) -> String {
    if is_url_like(query) {
        query.to_string()
    } else {
        format!("{search_url}{}", urlencoding::encode(query))
    }
}
