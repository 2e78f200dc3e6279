// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Synchronous session client

use reqwest::Method;

use crate::config::ClientConfig;
use crate::cookie::CookieJar;
use crate::error::{Error, Result};
use crate::relay::blocking::BlockingRelay;
use crate::request::RequestBuilder;
use crate::response::Response;

/// Session lifecycle: `Created -> Open -> Closed`, one-way
#[derive(Debug, Clone)]
pub(crate) enum SessionState {
    Created,
    Open(String),
    Closed,
}

impl SessionState {
    pub(crate) fn session_id(&self) -> Option<&str> {
        match self {
            SessionState::Open(id) => Some(id),
            _ => None,
        }
    }
}

/// Synchronous HTTP session backed by the relay
///
/// Owns one cookie jar and one relay session. Dropping the client closes
/// the relay session, so scoped usage releases the transport on every exit
/// path.
///
/// # Example
///
/// ```rust,no_run
/// use tursas::{Client, ClientConfig};
///
/// fn main() -> tursas::Result<()> {
///     let client = Client::connect(ClientConfig::default())?;
///     let response = client.get("https://httpbin.org/cookies").send()?;
///     println!("{}", response.text());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Client {
    config: ClientConfig,
    relay: BlockingRelay,
    jar: CookieJar,
    state: SessionState,
}

impl Client {
    /// Create a client without opening a relay session
    pub fn new(config: ClientConfig) -> Result<Self> {
        let relay = BlockingRelay::new(&config.base_url)?;
        Ok(Self {
            config,
            relay,
            jar: CookieJar::new(),
            state: SessionState::Created,
        })
    }

    /// Create a client and open its relay session
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let mut client = Self::new(config)?;
        client.open()?;
        Ok(client)
    }

    /// Open the relay session
    ///
    /// A no-op when already open. A closed session cannot be reopened.
    pub fn open(&mut self) -> Result<()> {
        match self.state {
            SessionState::Open(_) => Ok(()),
            SessionState::Closed => Err(Error::SessionClosed),
            SessionState::Created => {
                let session_id = self.relay.open_session(&self.config)?;
                self.state = SessionState::Open(session_id);
                Ok(())
            }
        }
    }

    /// Close the session
    ///
    /// Deletes the relay session best-effort. Further requests fail with
    /// `Error::SessionClosed`; there is no reopening.
    pub fn close(&mut self) {
        if let SessionState::Open(session_id) =
            std::mem::replace(&mut self.state, SessionState::Closed)
        {
            self.relay.close_session(&session_id);
        }
    }

    /// Check whether the session accepts requests
    pub fn is_open(&self) -> bool {
        matches!(self.state, SessionState::Open(_))
    }

    /// Relay session id, when open
    pub fn session_id(&self) -> Option<&str> {
        self.state.session_id()
    }

    /// The session's cookie jar
    pub fn cookie_jar(&self) -> &CookieJar {
        &self.jar
    }

    /// The session's configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Start a GET request
    pub fn get(&self, url: impl Into<String>) -> RequestHandle<'_> {
        self.request(Method::GET, url)
    }

    /// Start a POST request
    pub fn post(&self, url: impl Into<String>) -> RequestHandle<'_> {
        self.request(Method::POST, url)
    }

    /// Start a PUT request
    pub fn put(&self, url: impl Into<String>) -> RequestHandle<'_> {
        self.request(Method::PUT, url)
    }

    /// Start a DELETE request
    pub fn delete(&self, url: impl Into<String>) -> RequestHandle<'_> {
        self.request(Method::DELETE, url)
    }

    /// Start a PATCH request
    pub fn patch(&self, url: impl Into<String>) -> RequestHandle<'_> {
        self.request(Method::PATCH, url)
    }

    /// Start a request with an arbitrary method
    pub fn request(&self, method: Method, url: impl Into<String>) -> RequestHandle<'_> {
        RequestHandle {
            client: self,
            builder: RequestBuilder::new(method, url),
        }
    }

    /// Execute a prepared request
    ///
    /// Builds the descriptor against the current jar, forwards it, then
    /// ingests the response's Set-Cookie values before returning.
    pub fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let session_id = match self.state.session_id() {
            Some(id) => id.to_string(),
            None => return Err(Error::SessionClosed),
        };

        let descriptor = builder.build(&self.jar, self.config.timeout)?;
        let domain = descriptor.domain();
        tracing::debug!(method = %descriptor.method, url = %descriptor.url, "forwarding request");

        let response = self.relay.forward(&session_id, &descriptor)?;
        self.jar.ingest(&domain, response.headers().get_all("set-cookie"));
        Ok(response)
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.close();
    }
}

/// Chainable handle for one request on a [`Client`]
#[derive(Debug)]
pub struct RequestHandle<'a> {
    client: &'a Client,
    builder: RequestBuilder,
}

impl<'a> RequestHandle<'a> {
    /// Set a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.header(name, value);
        self
    }

    /// Set multiple headers
    pub fn headers<N, V>(mut self, headers: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.builder = self.builder.headers(headers);
        self
    }

    /// Attach a call-level cookie
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder = self.builder.cookie(name, value);
        self
    }

    /// Attach multiple call-level cookies
    pub fn cookies<N, V>(mut self, cookies: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.builder = self.builder.cookies(cookies);
        self
    }

    /// Set a JSON body
    pub fn json<T: serde::Serialize>(mut self, data: &T) -> Self {
        self.builder = self.builder.json(data);
        self
    }

    /// Set a form-encoded body
    pub fn form<N, V>(mut self, fields: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        self.builder = self.builder.form(fields);
        self
    }

    /// Set a raw body
    pub fn content(mut self, body: impl Into<bytes::Bytes>) -> Self {
        self.builder = self.builder.content(body);
        self
    }

    /// Override the session timeout for this request
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.builder = self.builder.timeout(timeout);
        self
    }

    /// Send the request
    pub fn send(self) -> Result<Response> {
        self.client.execute(self.builder)
    }
}
