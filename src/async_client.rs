// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Asynchronous session client
//!
//! Same observable behavior as [`crate::client::Client`]; only the waiting
//! differs. Request methods take `&self`, so many requests can be in
//! flight from one session. Cookie ingestion runs only after a full relay
//! envelope is received and is atomic, so concurrently completing requests
//! cannot interleave partial jar updates and a cancelled request applies
//! none.

use reqwest::Method;

use crate::client::SessionState;
use crate::config::ClientConfig;
use crate::cookie::CookieJar;
use crate::error::{Error, Result};
use crate::relay::nonblocking::AsyncRelay;
use crate::request::RequestBuilder;
use crate::response::Response;

/// Asynchronous HTTP session backed by the relay
///
/// # Example
///
/// ```rust,no_run
/// use tursas::{AsyncClient, ClientConfig};
///
/// #[tokio::main]
/// async fn main() -> tursas::Result<()> {
///     let client = AsyncClient::connect(ClientConfig::default()).await?;
///     let response = client.get("https://httpbin.org/get").send().await?;
///     println!("{}", response.status_code());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct AsyncClient {
    config: ClientConfig,
    relay: AsyncRelay,
    jar: CookieJar,
    state: SessionState,
}

impl AsyncClient {
    /// Create a client without opening a relay session
    pub fn new(config: ClientConfig) -> Result<Self> {
        let relay = AsyncRelay::new(&config.base_url)?;
        Ok(Self {
            config,
            relay,
            jar: CookieJar::new(),
            state: SessionState::Created,
        })
    }

    /// Create a client and open its relay session
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let mut client = Self::new(config)?;
        client.open().await?;
        Ok(client)
    }

    /// Open the relay session
    ///
    /// A no-op when already open. A closed session cannot be reopened.
    pub async fn open(&mut self) -> Result<()> {
        match self.state {
            SessionState::Open(_) => Ok(()),
            SessionState::Closed => Err(Error::SessionClosed),
            SessionState::Created => {
                let session_id = self.relay.open_session(&self.config).await?;
                self.state = SessionState::Open(session_id);
                Ok(())
            }
        }
    }

    /// Close the session
    ///
    /// Deletes the relay session best-effort. Taking `&mut self` also
    /// guarantees no request is in flight when the session closes.
    pub async fn close(&mut self) {
        if let SessionState::Open(session_id) =
            std::mem::replace(&mut self.state, SessionState::Closed)
        {
            self.relay.close_session(&session_id).await;
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
    pub fn get(&self, url: impl Into<String>) -> AsyncRequestHandle<'_> {
        self.request(Method::GET, url)
    }

    /// Start a POST request
    pub fn post(&self, url: impl Into<String>) -> AsyncRequestHandle<'_> {
        self.request(Method::POST, url)
    }

    /// Start a PUT request
    pub fn put(&self, url: impl Into<String>) -> AsyncRequestHandle<'_> {
        self.request(Method::PUT, url)
    }

    /// Start a DELETE request
    pub fn delete(&self, url: impl Into<String>) -> AsyncRequestHandle<'_> {
        self.request(Method::DELETE, url)
    }

    /// Start a PATCH request
    pub fn patch(&self, url: impl Into<String>) -> AsyncRequestHandle<'_> {
        self.request(Method::PATCH, url)
    }

    /// Start a request with an arbitrary method
    pub fn request(&self, method: Method, url: impl Into<String>) -> AsyncRequestHandle<'_> {
        AsyncRequestHandle {
            client: self,
            builder: RequestBuilder::new(method, url),
        }
    }

    /// Execute a prepared request
    ///
    /// The descriptor is built against the jar as it stands when the call
    /// starts; requests completed before that point are visible, requests
    /// still in flight are not.
    pub async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let session_id = match self.state.session_id() {
            Some(id) => id.to_string(),
            None => return Err(Error::SessionClosed),
        };

        let descriptor = builder.build(&self.jar, self.config.timeout)?;
        let domain = descriptor.domain();
        tracing::debug!(method = %descriptor.method, url = %descriptor.url, "forwarding request");

        let response = self.relay.forward(&session_id, &descriptor).await?;
        self.jar.ingest(&domain, response.headers().get_all("set-cookie"));
        Ok(response)
    }

    /// Execute several prepared requests concurrently
    pub async fn send_all(&self, builders: Vec<RequestBuilder>) -> Vec<Result<Response>> {
        futures::future::join_all(builders.into_iter().map(|b| self.execute(b))).await
    }
}

impl Drop for AsyncClient {
    fn drop(&mut self) {
        if let SessionState::Open(session_id) =
            std::mem::replace(&mut self.state, SessionState::Closed)
        {
            let relay = self.relay.clone();
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(async move {
                        relay.close_session(&session_id).await;
                    });
                }
                Err(_) => {
                    tracing::warn!(session = %session_id, "async session dropped outside a runtime, relay session not deleted");
                }
            }
        }
    }
}

/// Chainable handle for one request on an [`AsyncClient`]
#[derive(Debug)]
pub struct AsyncRequestHandle<'a> {
    client: &'a AsyncClient,
    builder: RequestBuilder,
}

impl<'a> AsyncRequestHandle<'a> {
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

    /// Detach the underlying builder, e.g. for [`AsyncClient::send_all`]
    pub fn into_builder(self) -> RequestBuilder {
        self.builder
    }

    /// Send the request
    pub async fn send(self) -> Result<Response> {
        self.client.execute(self.builder).await
    }
}
