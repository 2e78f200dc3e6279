// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response model
//!
//! `content` is the exact byte sequence the relay delivered. `text` and
//! `json()` are derived lazily and cached per instance, so callers that
//! never inspect the body are unaffected by decode issues.

use std::sync::OnceLock;

use bytes::Bytes;
use encoding_rs::Encoding;

use crate::error::{Error, Result};
use crate::headers::Headers;

/// HTTP response delivered through the relay
#[derive(Debug)]
pub struct Response {
    status_code: u16,
    headers: Headers,
    content: Bytes,
    duration_ms: f64,
    text: OnceLock<String>,
    json: OnceLock<serde_json::Value>,
}

impl Response {
    pub(crate) fn new(status_code: u16, headers: Headers, content: Bytes, duration_ms: f64) -> Self {
        Self {
            status_code,
            headers,
            content,
            duration_ms,
            text: OnceLock::new(),
            json: OnceLock::new(),
        }
    }

    /// Response status code
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Response headers
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Raw body bytes, exactly as received
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Wall-clock duration of the request as measured by the relay
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Get the first value of a header
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Get the Content-Type header
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Check if status is client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    /// Check if status is server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code)
    }

    /// Body decoded as text
    ///
    /// Uses the charset declared in Content-Type when recognized, UTF-8
    /// otherwise. Undecodable bytes are replaced, never an error. Computed
    /// once; repeated calls return the identical string.
    pub fn text(&self) -> &str {
        self.text.get_or_init(|| {
            let declared = self
                .content_type()
                .and_then(extract_charset)
                .and_then(|label| Encoding::for_label(label.as_bytes()));
            match declared {
                Some(encoding) => encoding.decode(&self.content).0.into_owned(),
                None => String::from_utf8_lossy(&self.content).into_owned(),
            }
        })
    }

    /// Body parsed as JSON
    ///
    /// Fails with `Error::Decode` on malformed JSON so callers can tell
    /// "not JSON" apart from a valid null/empty document. The parsed value
    /// is cached; repeated calls return equal values.
    pub fn json(&self) -> Result<&serde_json::Value> {
        if let Some(value) = self.json.get() {
            return Ok(value);
        }
        let parsed: serde_json::Value =
            serde_json::from_str(self.text()).map_err(|e| Error::Decode(e.to_string()))?;
        Ok(self.json.get_or_init(|| parsed))
    }
}

/// Pull the charset parameter out of a Content-Type value
fn extract_charset(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"'))
        } else {
            None
        }
    })
}
