// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Shared mock-relay helpers for integration tests
//!
//! Stands up a wiremock server speaking the relay's forwarding protocol:
//! session create/delete plus per-target forward replies.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SESSION_ID: &str = "sess-0001";

/// Relay base URL for a client config
pub fn base_url(server: &MockServer) -> String {
    format!("{}/api/v1", server.uri())
}

pub fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Response headers in the relay's `{name: {"values": [..]}}` shape
pub fn header_values(pairs: &[(&str, &[&str])]) -> Value {
    let mut map = serde_json::Map::new();
    for (name, values) in pairs {
        map.insert((*name).to_string(), json!({ "values": values }));
    }
    Value::Object(map)
}

/// Successful forward reply envelope
pub fn envelope(status: u16, headers: Value, body: &[u8]) -> Value {
    json!({
        "success": true,
        "duration_ms": 42.0,
        "response": {
            "status_code": status,
            "headers": headers,
            "body": hex(body),
        }
    })
}

/// Failed forward reply envelope
pub fn failure_envelope(message: &str) -> Value {
    json!({ "success": false, "error_message": message })
}

/// Mount session create and delete endpoints
pub async fn mount_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/v1/session"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "session_id": SESSION_ID })),
        )
        .mount(server)
        .await;

    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/session/{}", SESSION_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(server)
        .await;
}

/// Mount a forward reply for any target
pub async fn mount_forward(server: &MockServer, reply: Value) {
    Mock::given(method("POST"))
        .and(path(format!("/api/v1/session/{}/request", SESSION_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply))
        .mount(server)
        .await;
}

/// Mount a forward reply for one specific target URL
pub async fn mount_forward_for(server: &MockServer, target_url: &str, reply: Value) {
    Mock::given(method("POST"))
        .and(path(format!("/api/v1/session/{}/request", SESSION_ID)))
        .and(body_partial_json(json!({ "url": target_url })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply))
        .mount(server)
        .await;
}

/// Mount a delayed forward reply for one specific target URL
pub async fn mount_forward_for_delayed(
    server: &MockServer,
    target_url: &str,
    reply: Value,
    delay: std::time::Duration,
) {
    Mock::given(method("POST"))
        .and(path(format!("/api/v1/session/{}/request", SESSION_ID)))
        .and(body_partial_json(json!({ "url": target_url })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(reply)
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// JSON bodies of session-create calls, in arrival order
pub async fn session_payloads(server: &MockServer) -> Vec<Value> {
    received(server)
        .await
        .into_iter()
        .filter(|r| r.0 == "POST" && r.1 == "/api/v1/session")
        .map(|r| r.2)
        .collect()
}

/// JSON bodies of forward calls, in arrival order
pub async fn forward_payloads(server: &MockServer) -> Vec<Value> {
    received(server)
        .await
        .into_iter()
        .filter(|r| r.1.ends_with("/request"))
        .map(|r| r.2)
        .collect()
}

/// Number of session-delete calls received
pub async fn delete_count(server: &MockServer) -> usize {
    received(server)
        .await
        .iter()
        .filter(|r| r.0 == "DELETE")
        .count()
}

/// Find a header value inside a forward payload, case-insensitive
pub fn payload_header(payload: &Value, name: &str) -> Option<String> {
    payload["headers"].as_array()?.iter().find_map(|pair| {
        let header_name = pair.get(0)?.as_str()?;
        if header_name.eq_ignore_ascii_case(name) {
            Some(pair.get(1)?.as_str()?.to_string())
        } else {
            None
        }
    })
}

async fn received(server: &MockServer) -> Vec<(String, String, Value)> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|r| {
            let body = if r.body.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&r.body).unwrap_or(Value::Null)
            };
            (
                r.method.to_string().to_uppercase(),
                r.url.path().to_string(),
                body,
            )
        })
        .collect()
}
