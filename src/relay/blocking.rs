// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Blocking relay transport

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::request::RequestDescriptor;
use crate::response::Response;

use super::wire::{self, ForwardReply, SessionConfig, SessionReply};
use super::{delete_endpoint, request_endpoint, session_endpoint, RELAY_CALL_GRACE};

/// Synchronous transport to the relay
///
/// Holds one loopback HTTP client for the session's lifetime so repeated
/// calls reuse the underlying connection.
#[derive(Debug)]
pub(crate) struct BlockingRelay {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl BlockingRelay {
    pub(crate) fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| Error::transport(format!("failed to build relay client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a relay session, returning its id
    pub(crate) fn open_session(&self, config: &ClientConfig) -> Result<String> {
        let endpoint = session_endpoint(&self.base_url);
        let timeout_ms = config.timeout.as_millis() as u64;

        let reply: SessionReply = self
            .http
            .post(&endpoint)
            .json(&SessionConfig::from_config(config))
            .send()
            .map_err(|e| Error::from_loopback(e, &endpoint, timeout_ms))?
            .json()
            .map_err(|e| Error::transport(format!("malformed relay session reply: {}", e)))?;

        let session_id = wire::decode_session_reply(reply)?;
        tracing::debug!(session = %session_id, relay = %self.base_url, "relay session opened");
        Ok(session_id)
    }

    /// Forward one request through the relay session
    pub(crate) fn forward(
        &self,
        session_id: &str,
        descriptor: &RequestDescriptor,
    ) -> Result<Response> {
        let endpoint = request_endpoint(&self.base_url, session_id);
        let target = descriptor.url.to_string();
        let timeout_ms = descriptor.timeout.as_millis() as u64;

        let reply: ForwardReply = self
            .http
            .post(&endpoint)
            .timeout(descriptor.timeout + RELAY_CALL_GRACE)
            .json(&wire::encode_forward(descriptor))
            .send()
            .map_err(|e| Error::from_loopback(e, &target, timeout_ms))?
            .json()
            .map_err(|e| Error::transport(format!("malformed relay envelope: {}", e)))?;

        wire::decode_forward(reply, &target, timeout_ms)
    }

    /// Delete the relay session, best-effort
    pub(crate) fn close_session(&self, session_id: &str) {
        let endpoint = delete_endpoint(&self.base_url, session_id);
        match self.http.delete(&endpoint).send() {
            Ok(_) => tracing::debug!(session = %session_id, "relay session closed"),
            Err(e) => {
                tracing::warn!(session = %session_id, error = %e, "failed to delete relay session")
            }
        }
    }
}
