//! HTTP cache control module
//!
//! Provides `ETag` generation and conditional request handling.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Generate `ETag` using fast hashing
///
/// Returns a quoted `ETag` string, e.g., `"abc123def"`
pub fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let v = hasher.finish();
    format!("\"{v:x}\"")
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports:
/// - Single `ETag`: `"abc123"`
/// - Multiple `ETags`: `"abc123", "def456"`
/// - Wildcard: `*`
///
/// Returns true if matched (should return 304), false otherwise
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        // Handle multiple ETags separated by comma
        client_etag
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}

/// Cache control policy applied to successful responses
///
/// Debug mode serves pages with `NoCache` so template edits reach the
/// browser on the next request; otherwise responses carry a public
/// freshness lifetime.
#[derive(Debug, Clone, Copy)]
pub enum CachePolicy {
    /// Public cache with specified max-age (seconds)
    Public(u32),
    /// Always revalidate with the server
    NoCache,
}

impl CachePolicy {
    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::Public(max_age) => format!("public, max-age={max_age}"),
            Self::NoCache => "no-cache".to_string(),
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::Public(3600) // 1 hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_policy_header_values() {
        assert_eq!(
            CachePolicy::default().to_header_value(),
            "public, max-age=3600"
        );
        assert_eq!(CachePolicy::Public(60).to_header_value(), "public, max-age=60");
        assert_eq!(CachePolicy::NoCache.to_header_value(), "no-cache");
    }

    #[test]
    fn test_etag_is_stable_and_quoted() {
        let a = generate_etag(b"<html></html>");
        let b = generate_etag(b"<html></html>");
        assert_eq!(a, b);
        assert!(a.starts_with('"') && a.ends_with('"'));
    }

    #[test]
    fn test_etag_differs_for_different_content() {
        assert_ne!(generate_etag(b"index"), generate_etag(b"test"));
    }

    #[test]
    fn test_single_etag_match() {
        assert!(check_etag_match(Some("\"abc\""), "\"abc\""));
        assert!(!check_etag_match(Some("\"abc\""), "\"def\""));
    }

    #[test]
    fn test_multiple_and_wildcard() {
        assert!(check_etag_match(Some("\"abc\", \"def\""), "\"def\""));
        assert!(check_etag_match(Some("*"), "\"anything\""));
        assert!(!check_etag_match(None, "\"abc\""));
    }
}
