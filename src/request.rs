// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request assembly
//!
//! `RequestBuilder` collects caller arguments and merges them with session
//! state into a normalized `RequestDescriptor`. All caller mistakes
//! (conflicting bodies, malformed URLs) surface here, before any network
//! attempt.

use bytes::Bytes;
use reqwest::Method;
use serde::Serialize;
use std::time::Duration;
use url::Url;

use crate::cookie::CookieJar;
use crate::error::{Error, Result};
use crate::headers::Headers;

/// Request body variants
///
/// `json`, `form` and raw `content` are mutually exclusive.
#[derive(Debug, Clone)]
enum Body {
    Json(serde_json::Value),
    Form(Vec<(String, String)>),
    Raw(Bytes),
}

/// Normalized outbound request, ready for the relay transport
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// Request method
    pub method: Method,
    /// Validated target URL
    pub url: Url,
    /// Headers in caller order, original casing
    pub headers: Headers,
    /// Merged cookies (session first, call-level overrides applied)
    pub cookies: Vec<(String, String)>,
    /// Serialized body bytes
    pub body: Option<Bytes>,
    /// Effective timeout for this request
    pub timeout: Duration,
}

impl RequestDescriptor {
    /// Target domain, lowercased
    pub fn domain(&self) -> String {
        self.url.host_str().unwrap_or("").to_ascii_lowercase()
    }
}

/// Builder for a single request
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: String,
    headers: Headers,
    cookies: Vec<(String, String)>,
    body: Option<(&'static str, Body)>,
    body_conflict: Option<(&'static str, &'static str)>,
    invalid: Option<String>,
    timeout: Option<Duration>,
}

impl RequestBuilder {
    /// Create a builder for the given method and URL
    ///
    /// The URL is validated at `build`, not here.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            cookies: Vec::new(),
            body: None,
            body_conflict: None,
            invalid: None,
            timeout: None,
        }
    }

    /// Set a header, replacing any previous value for the same name
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set multiple headers, preserving iteration order
    pub fn headers<N, V>(mut self, headers: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.headers.insert(name, value);
        }
        self
    }

    /// Attach a cookie for this call only
    ///
    /// Call-level cookies override same-named session cookies for this one
    /// request and are never written back to the jar.
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push((name.into(), value.into()));
        self
    }

    /// Attach multiple call-level cookies
    pub fn cookies<N, V>(mut self, cookies: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        for (name, value) in cookies {
            self.cookies.push((name.into(), value.into()));
        }
        self
    }

    /// Set a JSON body
    ///
    /// Defaults `Content-Type: application/json` unless the caller set one.
    pub fn json<T: Serialize>(mut self, data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => self.set_body("json", Body::Json(value)),
            Err(e) => self.invalid = Some(format!("unserializable json body: {}", e)),
        }
        self
    }

    /// Set a form-encoded body
    ///
    /// Defaults `Content-Type: application/x-www-form-urlencoded` unless the
    /// caller set one.
    pub fn form<N, V>(mut self, fields: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(n, v)| (n.into(), v.into()))
            .collect();
        self.set_body("data", Body::Form(fields));
        self
    }

    /// Set a raw body, passed through unmodified
    pub fn content(mut self, body: impl Into<Bytes>) -> Self {
        self.set_body("content", Body::Raw(body.into()));
        self
    }

    /// Override the session timeout for this request
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn set_body(&mut self, kind: &'static str, body: Body) {
        match &self.body {
            Some((existing, _)) => self.body_conflict = Some((existing, kind)),
            None => self.body = Some((kind, body)),
        }
    }

    /// Merge with session state and produce a normalized descriptor
    pub fn build(self, jar: &CookieJar, default_timeout: Duration) -> Result<RequestDescriptor> {
        if let Some((first, second)) = self.body_conflict {
            return Err(Error::invalid_request(format!(
                "`{}` and `{}` bodies are mutually exclusive",
                first, second
            )));
        }
        if let Some(reason) = self.invalid {
            return Err(Error::InvalidRequest(reason));
        }

        let url = Url::parse(&self.url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_request(format!(
                "unsupported URL scheme `{}`",
                url.scheme()
            )));
        }
        let domain = match url.host_str() {
            Some(host) => host.to_ascii_lowercase(),
            None => return Err(Error::invalid_request("URL has no host")),
        };

        // Session cookies first, call-level overrides in place
        let mut cookies = jar.merge_for(&domain, url.path());
        for (name, value) in self.cookies {
            match cookies.iter_mut().find(|(n, _)| *n == name) {
                Some(entry) => entry.1 = value,
                None => cookies.push((name, value)),
            }
        }

        // The merged jar replaces any caller-supplied Cookie header
        let mut headers = self.headers;
        headers.remove("cookie");

        let body = match self.body.map(|(_, body)| body) {
            Some(Body::Json(value)) => {
                let bytes = serde_json::to_vec(&value)
                    .map_err(|e| Error::invalid_request(format!("json body: {}", e)))?;
                if !headers.contains("content-type") {
                    headers.insert("content-type", "application/json");
                }
                Some(Bytes::from(bytes))
            }
            Some(Body::Form(fields)) => {
                let encoded = fields
                    .iter()
                    .map(|(k, v)| format!("{}={}", urlencoding_encode(k), urlencoding_encode(v)))
                    .collect::<Vec<_>>()
                    .join("&");
                if !headers.contains("content-type") {
                    headers.insert("content-type", "application/x-www-form-urlencoded");
                }
                Some(Bytes::from(encoded))
            }
            Some(Body::Raw(bytes)) => Some(bytes),
            None => None,
        };

        Ok(RequestDescriptor {
            method: self.method,
            url,
            headers,
            cookies,
            body,
            timeout: self.timeout.unwrap_or(default_timeout),
        })
    }
}

/// URL encode a string (form encoding, space as `+`)
fn urlencoding_encode(s: &str) -> String {
    let mut result = String::new();
    for c in s.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '~' => result.push(c),
            ' ' => result.push('+'),
            _ => {
                for byte in c.to_string().bytes() {
                    result.push_str(&format!("%{:02X}", byte));
                }
            }
        }
    }
    result
}
