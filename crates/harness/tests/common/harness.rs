//! Test harness owning a running mock server.

use crud_harness::client::ApiRequest;
use crud_harness::{ApiResponse, FixtureLoader, HarnessConfig, MockContext, StubRule};

/// A mock server on an OS-assigned port and the bundled fixture loader.
///
/// Every test gets its own server, so stubs and recorded requests never
/// leak between tests and tests may run in parallel.
pub struct TestHarness {
    /// The running mock server.
    pub ctx: MockContext,

    /// Bundled fixtures.
    pub fixtures: FixtureLoader,
}

impl TestHarness {
    /// Starts a fresh mock server.
    pub async fn start() -> Self {
        let ctx = MockContext::start(&HarnessConfig::for_testing())
            .await
            .expect("Failed to start mock server");

        Self {
            ctx,
            fixtures: FixtureLoader::bundled(),
        }
    }

    /// Loads a bundled fixture.
    pub fn fixture(&self, name: &str) -> String {
        self.fixtures
            .load(name)
            .unwrap_or_else(|e| panic!("Failed to load {name}: {e}"))
    }

    /// Registers a stub.
    pub async fn stub(&self, rule: StubRule) {
        self.ctx.register(rule).await.expect("Failed to register stub");
    }

    /// Sends a request through the context's client.
    pub async fn send(&self, request: ApiRequest) -> ApiResponse {
        self.ctx
            .client()
            .send(request)
            .await
            .expect("Request failed")
    }
}
