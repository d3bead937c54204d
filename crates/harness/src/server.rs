//! Mock server lifecycle.
//!
//! [`MockContext`] owns one running mock HTTP server together with a client
//! pointed at it. Tests create a context, register stubs, drive requests and
//! verify what the server received; dropping the context (or calling
//! [`MockContext::stop`]) shuts the server down and frees its port.
//!
//! # Example
//!
//! ```rust,no_run
//! use crud_harness::{HarnessConfig, MockContext};
//! use crud_harness::client::ApiRequest;
//! use crud_harness::stub::{ResponseSpec, StubRule};
//!
//! # async fn example() -> crud_harness::HarnessResult<()> {
//! let mut ctx = MockContext::start(&HarnessConfig::for_testing()).await?;
//!
//! let rule = StubRule::get("/api/users/1")
//!     .respond_with(ResponseSpec::json(200, r#"{"id":1}"#));
//! let pattern = rule.pattern();
//! ctx.register(rule).await?;
//!
//! let response = ctx.client().send(ApiRequest::get("/api/users/1")).await?;
//! assert_eq!(response.status_code(), 200);
//! ctx.verify_once(&pattern).await?;
//!
//! ctx.stop();
//! # Ok(())
//! # }
//! ```

use std::io;
use std::net::{SocketAddr, TcpListener};

use tracing::{debug, info};
use url::Url;
use wiremock::{MockServer, Request};

use crate::client::ApiClient;
use crate::config::HarnessConfig;
use crate::error::{AssertionError, HarnessError, HarnessResult, ServerError};
use crate::stub::{RequestPattern, StubRule};

/// A running mock server and the client that targets it.
pub struct MockContext {
    server: Option<MockServer>,
    address: SocketAddr,
    base_url: Url,
    client: ApiClient,
}

impl MockContext {
    /// Binds the configured address and starts a dedicated mock server on it.
    ///
    /// Port 0 asks the OS for a free port. A taken port is reported as
    /// [`ServerError::Bind`]; there is no fallback to another port.
    pub async fn start(config: &HarnessConfig) -> HarnessResult<Self> {
        let addr = config.socket_addr();
        let bind_error = |source: io::Error| ServerError::Bind {
            addr: addr.clone(),
            source,
        };

        let listener = TcpListener::bind(&addr).map_err(bind_error)?;
        listener.set_nonblocking(true).map_err(bind_error)?;
        let address = listener.local_addr().map_err(bind_error)?;

        let server = MockServer::builder().listener(listener).start().await;
        let uri = server.uri();
        let base_url = Url::parse(&uri).map_err(|source| HarnessError::Url { path: uri, source })?;
        let client = ApiClient::new(base_url.clone(), config.timeout())?;

        info!(base_url = %base_url, "Mock server started");

        Ok(Self {
            server: Some(server),
            address,
            base_url,
            client,
        })
    }

    /// Base URL requests should target, e.g. `http://127.0.0.1:8080`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The bound socket address.
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn is_running(&self) -> bool {
        self.server.is_some()
    }

    /// Client targeting this server.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn server(&self) -> Result<&MockServer, ServerError> {
        self.server.as_ref().ok_or(ServerError::NotRunning)
    }

    /// Registers a stub. It stays active until [`reset`](Self::reset) or
    /// [`stop`](Self::stop).
    pub async fn register(&self, rule: StubRule) -> Result<(), ServerError> {
        let server = self.server()?;
        debug!(stub = %rule.pattern(), status = rule.response().status, "Registering stub");
        rule.into_mock().mount(server).await;
        Ok(())
    }

    /// Every request the server has received since start or the last reset,
    /// matched or not.
    pub async fn received_requests(&self) -> Result<Vec<Request>, ServerError> {
        Ok(self
            .server()?
            .received_requests()
            .await
            .unwrap_or_default())
    }

    /// Number of received requests matching `pattern`.
    pub async fn received(&self, pattern: &RequestPattern) -> Result<usize, ServerError> {
        let requests = self.received_requests().await?;
        Ok(requests.iter().filter(|r| pattern.matches_request(r)).count())
    }

    /// Fails unless exactly `expected` requests matching `pattern` were
    /// received.
    pub async fn verify(&self, pattern: &RequestPattern, expected: usize) -> HarnessResult<()> {
        let actual = self.received(pattern).await?;
        debug!(pattern = %pattern, expected, actual, "Verifying requests");

        if actual == expected {
            Ok(())
        } else {
            Err(AssertionError::Verification {
                method: pattern.method().to_string(),
                path: pattern.path().to_string(),
                expected,
                actual,
            }
            .into())
        }
    }

    /// Fails unless exactly one request matching `pattern` was received.
    pub async fn verify_once(&self, pattern: &RequestPattern) -> HarnessResult<()> {
        self.verify(pattern, 1).await
    }

    /// Drops every registered stub and clears the request journal.
    pub async fn reset(&self) -> Result<(), ServerError> {
        self.server()?.reset().await;
        debug!("Mock server reset");
        Ok(())
    }

    /// Shuts the server down. Calling it again is a no-op.
    pub fn stop(&mut self) {
        if let Some(server) = self.server.take() {
            drop(server);
            info!(base_url = %self.base_url, "Mock server stopped");
        }
    }
}

impl Drop for MockContext {
    fn drop(&mut self) {
        self.stop();
    }
}
