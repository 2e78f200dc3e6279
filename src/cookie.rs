// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie jar implementation for session-scoped cookie storage
//!
//! Stores cookies in first-set insertion order so merged `Cookie` headers
//! are deterministic across requests. Expired entries are swept lazily
//! during merge and ingestion; there is no background timer.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A single HTTP cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Domain the cookie belongs to (no leading dot, lowercase)
    pub domain: String,
    /// Path the cookie is valid for
    pub path: String,
    /// Expiration time (None = session cookie)
    pub expires: Option<DateTime<Utc>>,
    /// Secure flag (HTTPS only)
    pub secure: bool,
    /// HttpOnly flag (not accessible via JavaScript)
    pub http_only: bool,
}

impl Cookie {
    /// Create a new session cookie
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            path: "/".to_string(),
            expires: None,
            secure: false,
            http_only: false,
        }
    }

    /// Set the domain
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set the path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set expiration time
    pub fn expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Check if the cookie is expired
    pub fn is_expired(&self) -> bool {
        self.expires.map_or(false, |exp| exp < Utc::now())
    }

    /// Check if the cookie should be sent to the given domain
    ///
    /// Exact match, or the stored domain is a parent of the request domain.
    pub fn domain_matches(&self, request_domain: &str) -> bool {
        if self.domain.is_empty() {
            return false;
        }
        let request_domain = request_domain.to_ascii_lowercase();
        request_domain == self.domain
            || request_domain.ends_with(&format!(".{}", self.domain))
    }

    /// Check if the stored path is a prefix of the request path
    pub fn path_matches(&self, request_path: &str) -> bool {
        request_path.starts_with(&self.path)
    }

    /// Parse a raw `Set-Cookie` header value
    ///
    /// `origin_domain` is the domain the response came from; it becomes the
    /// cookie domain when no `Domain` attribute is present. Returns None for
    /// values without a `name=value` first segment.
    pub fn parse(raw: &str, origin_domain: &str) -> Option<Self> {
        let mut parts = raw.split(';');
        let first = parts.next()?.trim();

        let (name, value) = first.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let mut cookie = Cookie::new(name, value.trim());
        cookie.domain = origin_domain.to_ascii_lowercase();

        let mut max_age: Option<i64> = None;
        let mut expires: Option<DateTime<Utc>> = None;

        for part in parts {
            let part = part.trim();
            if let Some((attr, val)) = part.split_once('=') {
                let attr = attr.trim().to_lowercase();
                let val = val.trim();
                match attr.as_str() {
                    "domain" => {
                        cookie.domain = val.trim_start_matches('.').to_ascii_lowercase();
                    }
                    "path" => cookie.path = val.to_string(),
                    "expires" => {
                        if let Ok(dt) = DateTime::parse_from_rfc2822(val) {
                            expires = Some(dt.with_timezone(&Utc));
                        }
                    }
                    "max-age" => {
                        if let Ok(secs) = val.parse::<i64>() {
                            max_age = Some(secs);
                        }
                    }
                    _ => {}
                }
            } else {
                match part.to_lowercase().as_str() {
                    "secure" => cookie.secure = true,
                    "httponly" => cookie.http_only = true,
                    _ => {}
                }
            }
        }

        // Max-Age wins over Expires when both are present
        cookie.expires = match max_age {
            Some(secs) => Some(Utc::now() + chrono::Duration::seconds(secs)),
            None => expires,
        };

        Some(cookie)
    }

    /// Convert to `Cookie` header pair format
    pub fn to_header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }

    fn same_key(&self, other: &Cookie) -> bool {
        self.name == other.name && self.domain == other.domain && self.path == other.path
    }
}

/// Session-scoped cookie storage
///
/// Cloning yields a shared handle to the same store; ingestion and merge
/// each run as one critical section, which keeps the jar consistent under
/// concurrently completing async requests.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: Arc<Mutex<Vec<Cookie>>>,
}

impl CookieJar {
    /// Create a new empty cookie jar
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cookie, overwriting an existing `(name, domain, path)` entry
    ///
    /// An overwritten cookie keeps its original position in the jar.
    pub fn insert(&self, cookie: Cookie) {
        let mut cookies = self.cookies.lock();
        Self::upsert(&mut cookies, cookie);
    }

    /// Ingest raw `Set-Cookie` values from a response
    ///
    /// `origin_domain` is the request's target domain. Malformed values are
    /// skipped, not errors. The whole batch is applied atomically.
    pub fn ingest<'a, I>(&self, origin_domain: &str, set_cookie_values: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut cookies = self.cookies.lock();
        cookies.retain(|c| !c.is_expired());

        for raw in set_cookie_values {
            match Cookie::parse(raw, origin_domain) {
                Some(cookie) => {
                    if cookie.is_expired() {
                        // Past Expires/Max-Age is a deletion request
                        cookies.retain(|c| !c.same_key(&cookie));
                    } else {
                        Self::upsert(&mut cookies, cookie);
                    }
                }
                None => {
                    tracing::warn!(value = raw, domain = origin_domain, "skipping malformed Set-Cookie");
                }
            }
        }
    }

    /// Collect `(name, value)` pairs to attach to a request
    ///
    /// Matches on domain (exact or parent) and path prefix, drops expired
    /// entries, and returns pairs in first-set insertion order.
    pub fn merge_for(&self, domain: &str, path: &str) -> Vec<(String, String)> {
        let mut cookies = self.cookies.lock();
        cookies.retain(|c| !c.is_expired());

        cookies
            .iter()
            .filter(|c| c.domain_matches(domain) && c.path_matches(path))
            .map(|c| (c.name.clone(), c.value.clone()))
            .collect()
    }

    /// Snapshot of all stored cookies
    pub fn all(&self) -> Vec<Cookie> {
        self.cookies.lock().clone()
    }

    /// Get a stored cookie value by name and domain
    pub fn get(&self, domain: &str, name: &str) -> Option<String> {
        self.cookies
            .lock()
            .iter()
            .find(|c| c.domain == domain && c.name == name && !c.is_expired())
            .map(|c| c.value.clone())
    }

    /// Clear all cookies
    pub fn clear(&self) {
        self.cookies.lock().clear();
    }

    /// Total cookie count
    pub fn len(&self) -> usize {
        self.cookies.lock().len()
    }

    /// Check if the jar is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export all cookies as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&*self.cookies.lock())
    }

    /// Import cookies from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let cookies: Vec<Cookie> = serde_json::from_str(json)?;
        let jar = CookieJar::new();
        for cookie in cookies {
            jar.insert(cookie);
        }
        Ok(jar)
    }

    fn upsert(cookies: &mut Vec<Cookie>, cookie: Cookie) {
        if let Some(existing) = cookies.iter_mut().find(|c| c.same_key(&cookie)) {
            *existing = cookie;
        } else {
            cookies.push(cookie);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_parsing() {
        let cookie =
            Cookie::parse("session=abc123; Domain=example.com; Path=/app; Secure; HttpOnly", "www.example.com")
                .unwrap();

        assert_eq!(cookie.name, "session");
        assert_eq!(cookie.value, "abc123");
        assert_eq!(cookie.domain, "example.com");
        assert_eq!(cookie.path, "/app");
        assert!(cookie.secure);
        assert!(cookie.http_only);
        assert!(cookie.expires.is_none());
    }

    #[test]
    fn test_parse_defaults() {
        let cookie = Cookie::parse("sid=1", "Example.COM").unwrap();
        assert_eq!(cookie.domain, "example.com");
        assert_eq!(cookie.path, "/");
        assert!(!cookie.secure);
    }

    #[test]
    fn test_parse_unknown_attributes_ignored() {
        let cookie = Cookie::parse("a=b; SameSite=Lax; Partitioned; X-Weird=1", "example.com").unwrap();
        assert_eq!(cookie.value, "b");
    }

    #[test]
    fn test_parse_malformed_returns_none() {
        assert!(Cookie::parse("no-equals-sign", "example.com").is_none());
        assert!(Cookie::parse("=value-without-name", "example.com").is_none());
        assert!(Cookie::parse("", "example.com").is_none());
    }

    #[test]
    fn test_max_age_wins_over_expires() {
        let raw = "a=b; Expires=Wed, 21 Oct 2015 07:28:00 GMT; Max-Age=3600";
        let cookie = Cookie::parse(raw, "example.com").unwrap();
        assert!(!cookie.is_expired());

        let raw = "a=b; Max-Age=-1; Expires=Wed, 21 Oct 2099 07:28:00 GMT";
        let cookie = Cookie::parse(raw, "example.com").unwrap();
        assert!(cookie.is_expired());
    }

    #[test]
    fn test_domain_matching() {
        let cookie = Cookie::new("a", "b").domain("cebupacificair.com");
        assert!(cookie.domain_matches("cebupacificair.com"));
        assert!(cookie.domain_matches("soar.cebupacificair.com"));
        assert!(!cookie.domain_matches("othercebupacificair.com"));
        assert!(!cookie.domain_matches("example.com"));
    }

    #[test]
    fn test_path_matching() {
        let cookie = Cookie::new("a", "b").path("/app");
        assert!(cookie.path_matches("/app"));
        assert!(cookie.path_matches("/app/login"));
        assert!(!cookie.path_matches("/"));
    }

    #[test]
    fn test_overwrite_keeps_first_set_order() {
        let jar = CookieJar::new();
        jar.ingest("example.com", ["first=1", "second=2"]);
        jar.ingest("example.com", ["first=updated"]);

        let merged = jar.merge_for("example.com", "/");
        assert_eq!(
            merged,
            vec![
                ("first".to_string(), "updated".to_string()),
                ("second".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_same_name_different_path_coexist() {
        let jar = CookieJar::new();
        jar.ingest("example.com", ["tok=root; Path=/", "tok=scoped; Path=/app"]);
        assert_eq!(jar.len(), 2);

        let merged = jar.merge_for("example.com", "/app/x");
        assert_eq!(merged.len(), 2);
        let root_only = jar.merge_for("example.com", "/other");
        assert_eq!(root_only, vec![("tok".to_string(), "root".to_string())]);
    }

    #[test]
    fn test_malformed_value_does_not_fail_batch() {
        let jar = CookieJar::new();
        jar.ingest("example.com", ["good=1", "malformed", "also_good=2"]);
        assert_eq!(jar.len(), 2);
    }

    #[test]
    fn test_expired_swept_on_merge() {
        let jar = CookieJar::new();
        jar.insert(
            Cookie::new("stale", "x")
                .domain("example.com")
                .expires(Utc::now() - chrono::Duration::hours(1)),
        );
        jar.insert(Cookie::new("fresh", "y").domain("example.com"));

        let merged = jar.merge_for("example.com", "/");
        assert_eq!(merged, vec![("fresh".to_string(), "y".to_string())]);
        assert_eq!(jar.len(), 1);
    }

    #[test]
    fn test_past_max_age_deletes_existing() {
        let jar = CookieJar::new();
        jar.ingest("example.com", ["sid=abc"]);
        jar.ingest("example.com", ["sid=gone; Max-Age=0"]);
        assert!(jar.merge_for("example.com", "/").is_empty());
    }

    #[test]
    fn test_jar_json_round_trip() {
        let jar = CookieJar::new();
        jar.ingest("example.com", ["a=1; Path=/x; Secure"]);

        let json = jar.to_json().unwrap();
        let restored = CookieJar::from_json(&json).unwrap();
        let cookies = restored.all();
        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies[0].name, "a");
        assert_eq!(cookies[0].path, "/x");
        assert!(cookies[0].secure);
    }
}
