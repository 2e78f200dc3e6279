// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Relay wire protocol
//!
//! The relay's forwarding API is a fixed external contract: JSON envelopes
//! with hex-encoded bodies, request headers as ordered pairs, response
//! headers as `{name: {"values": [..]}}`. Field names here must not drift.

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::config::{ClientConfig, Proxy};
use crate::error::{Error, Result};
use crate::headers::Headers;
use crate::request::RequestDescriptor;
use crate::response::Response;

/// Session creation payload
#[derive(Debug, Serialize)]
pub(crate) struct SessionConfig {
    skip_cert_verify: bool,
    timeout_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    proxy: Option<ProxyWire>,
}

impl SessionConfig {
    pub(crate) fn from_config(config: &ClientConfig) -> Self {
        Self {
            skip_cert_verify: config.skip_cert_verify,
            timeout_ms: config.timeout.as_millis() as u64,
            proxy: config.proxy.as_ref().map(ProxyWire::from),
        }
    }
}

/// Proxy descriptor as the relay expects it
#[derive(Debug, Serialize)]
pub(crate) struct ProxyWire {
    host: String,
    port: u16,
    #[serde(rename = "type")]
    kind: u8,
    username: String,
    password: String,
}

impl From<&Proxy> for ProxyWire {
    fn from(proxy: &Proxy) -> Self {
        Self {
            host: proxy.host.clone(),
            port: proxy.port,
            kind: proxy.kind.wire_value(),
            username: proxy.username.clone().unwrap_or_default(),
            password: proxy.password.clone().unwrap_or_default(),
        }
    }
}

/// Reply to session creation
#[derive(Debug, Deserialize)]
pub(crate) struct SessionReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

pub(crate) fn decode_session_reply(reply: SessionReply) -> Result<String> {
    if !reply.success {
        return Err(Error::transport(format!(
            "relay refused session: {}",
            reply.error_message.as_deref().unwrap_or("unspecified")
        )));
    }
    reply
        .session_id
        .ok_or_else(|| Error::transport("relay session reply missing session_id"))
}

/// Forwarding payload for one request
#[derive(Debug, Serialize)]
pub(crate) struct ForwardPayload {
    url: String,
    method: String,
    headers: Vec<(String, String)>,
    #[serde(skip_serializing_if = "String::is_empty")]
    body: String,
}

/// Serialize a descriptor into the relay's forwarding payload
///
/// Wire header order is part of the contract: normal headers in caller
/// order, then the merged cookie header, then any `priority` headers last.
pub(crate) fn encode_forward(descriptor: &RequestDescriptor) -> ForwardPayload {
    let mut headers: Vec<(String, String)> = Vec::with_capacity(descriptor.headers.len() + 1);
    let mut priority: Vec<(String, String)> = Vec::new();

    for (name, value) in descriptor.headers.iter() {
        if name.eq_ignore_ascii_case("priority") {
            priority.push((name.to_string(), value.to_string()));
        } else {
            headers.push((name.to_string(), value.to_string()));
        }
    }

    if !descriptor.cookies.is_empty() {
        let cookie = descriptor
            .cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");
        headers.push(("cookie".to_string(), cookie));
    }

    headers.extend(priority);

    ForwardPayload {
        url: descriptor.url.to_string(),
        method: descriptor.method.as_str().to_string(),
        headers,
        body: descriptor.body.as_deref().map(to_hex).unwrap_or_default(),
    }
}

/// Reply envelope for one forwarded request
#[derive(Debug, Deserialize)]
pub(crate) struct ForwardReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    duration_ms: f64,
    #[serde(default)]
    response: Option<WireResponse>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireResponse {
    #[serde(default)]
    status_code: u16,
    #[serde(default)]
    headers: HashMap<String, WireHeaderValues>,
    #[serde(default)]
    body: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireHeaderValues {
    #[serde(default)]
    values: Vec<String>,
}

/// Decode a reply envelope into a response
///
/// `url` and `timeout_ms` only provide error context; a missing response
/// object or undecodable body is a transport fault, not a decode fault.
pub(crate) fn decode_forward(reply: ForwardReply, url: &str, timeout_ms: u64) -> Result<Response> {
    if !reply.success {
        let message = reply
            .error_message
            .unwrap_or_else(|| "unspecified relay failure".to_string());
        return Err(classify_failure(&message, url, timeout_ms));
    }

    let wire = reply
        .response
        .ok_or_else(|| Error::transport("relay reply missing response object"))?;

    let mut headers = Headers::new();
    for (name, values) in wire.headers {
        for value in values.values {
            headers.append(name.clone(), value);
        }
    }

    let content = if wire.body.is_empty() {
        Bytes::new()
    } else {
        Bytes::from(
            from_hex(&wire.body)
                .ok_or_else(|| Error::transport("relay reply body is not valid hex"))?,
        )
    };

    Ok(Response::new(wire.status_code, headers, content, reply.duration_ms))
}

/// The relay reports failures as free text; timeouts are picked out by
/// wording, everything else is a transport fault
fn classify_failure(message: &str, url: &str, timeout_ms: u64) -> Error {
    let lower = message.to_lowercase();
    if lower.contains("timeout") || lower.contains("timed out") {
        Error::timeout(url, timeout_ms)
    } else {
        Error::Transport(format!("relay request failed: {}", message))
    }
}

pub(crate) fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

pub(crate) fn from_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok())
        .collect()
}
