// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Relay transport layer
//!
//! The relay exposes one loopback HTTP endpoint. Both transports share the
//! wire encoding in [`wire`]; they differ only in how they wait for the
//! relay's reply.

pub(crate) mod blocking;
pub(crate) mod nonblocking;
pub(crate) mod wire;

use std::time::Duration;

/// Grace added to the loopback call timeout
///
/// The relay enforces the real per-request timeout; the loopback deadline
/// only has to outlive it.
pub(crate) const RELAY_CALL_GRACE: Duration = Duration::from_secs(10);

pub(crate) fn session_endpoint(base_url: &str) -> String {
    format!("{}/session", base_url.trim_end_matches('/'))
}

pub(crate) fn request_endpoint(base_url: &str, session_id: &str) -> String {
    format!("{}/session/{}/request", base_url.trim_end_matches('/'), session_id)
}

pub(crate) fn delete_endpoint(base_url: &str, session_id: &str) -> String {
    format!("{}/session/{}", base_url.trim_end_matches('/'), session_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(
            session_endpoint("http://127.0.0.1:3000/api/v1/"),
            "http://127.0.0.1:3000/api/v1/session"
        );
        assert_eq!(
            request_endpoint("http://127.0.0.1:3000/api/v1", "abc"),
            "http://127.0.0.1:3000/api/v1/session/abc/request"
        );
        assert_eq!(
            delete_endpoint("http://127.0.0.1:3000/api/v1", "abc"),
            "http://127.0.0.1:3000/api/v1/session/abc"
        );
    }
}
