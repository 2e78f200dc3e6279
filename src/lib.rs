// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Tursas - Relay-backed HTTP Client
//!
//! A browser-style HTTP client that delegates TLS and transport to a local
//! Cronet relay over loopback HTTP. The relay does the fingerprint-sensitive
//! work; this crate is the session layer in front of it.
//!
//! ## Features
//!
//! - Sync and async clients with identical behavior and one wire contract
//! - Session cookie jar: browser-like domain/path matching, lazy expiry
//! - Call-level cookie overrides that never pollute the session jar
//! - Ordered headers: casing and caller order survive to the wire
//! - Proxy passthrough: HTTP and SOCKS5, configured per session
//! - Lazy response decoding: charset-aware `text()`, cached `json()`
//!
//! ## Example
//!
//! ```rust,no_run
//! use tursas::{AsyncClient, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> tursas::Result<()> {
//!     let client = AsyncClient::connect(ClientConfig::default()).await?;
//!
//!     let response = client
//!         .post("https://httpbin.org/post")
//!         .header("accept", "application/json")
//!         .json(&serde_json::json!({"name": "tursas"}))
//!         .send()
//!         .await?;
//!
//!     println!("{} in {}ms", response.status_code(), response.duration_ms());
//!     println!("{}", response.json()?);
//!
//!     Ok(())
//! }
//! ```

pub mod async_client;
pub mod client;
pub mod config;
pub mod cookie;
pub mod error;
pub mod headers;
pub mod request;
pub mod response;

mod relay;

// Clients
pub use async_client::AsyncClient;
pub use client::Client;

// Configuration
pub use config::{ClientConfig, Proxy, ProxyKind, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

// Cookies
pub use cookie::{Cookie, CookieJar};

// Requests and responses
pub use headers::Headers;
pub use request::{RequestBuilder, RequestDescriptor};
pub use response::Response;

// Errors
pub use error::{Error, Result};

// Request methods are plain reqwest methods
pub use reqwest::Method;

/// Tursas version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
