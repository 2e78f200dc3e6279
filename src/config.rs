// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Client and proxy configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default relay endpoint
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000/api/v1";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Proxy protocol understood by the relay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProxyKind {
    /// Plain HTTP proxy (wire value 0)
    #[default]
    Http,
    /// SOCKS5 proxy (wire value 1)
    Socks5,
}

impl ProxyKind {
    /// Numeric code used in the relay protocol
    pub fn wire_value(self) -> u8 {
        match self {
            ProxyKind::Http => 0,
            ProxyKind::Socks5 => 1,
        }
    }
}

/// Upstream proxy descriptor, passed through to the relay per session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proxy {
    /// Proxy host
    pub host: String,
    /// Proxy port
    pub port: u16,
    /// Proxy protocol
    pub kind: ProxyKind,
    /// Optional username
    pub username: Option<String>,
    /// Optional password
    pub password: Option<String>,
}

impl Proxy {
    /// Create an HTTP proxy descriptor
    pub fn http(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            kind: ProxyKind::Http,
            username: None,
            password: None,
        }
    }

    /// Create a SOCKS5 proxy descriptor
    pub fn socks5(host: impl Into<String>, port: u16) -> Self {
        Self {
            kind: ProxyKind::Socks5,
            ..Self::http(host, port)
        }
    }

    /// Attach credentials
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

/// Session configuration
///
/// Immutable for the lifetime of the session it is attached to.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Relay endpoint override
    pub base_url: String,
    /// Upstream proxy for every request in the session
    pub proxy: Option<Proxy>,
    /// Per-request timeout, enforced by the relay
    pub timeout: Duration,
    /// Skip TLS certificate verification at the relay
    pub skip_cert_verify: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
            skip_cert_verify: true,
        }
    }
}

impl ClientConfig {
    /// Create a config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the relay endpoint
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the upstream proxy
    pub fn proxy(mut self, proxy: Proxy) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Control TLS certificate verification at the relay
    pub fn skip_cert_verify(mut self, skip: bool) -> Self {
        self.skip_cert_verify = skip;
        self
    }
}
