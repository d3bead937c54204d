//! # crud-harness - stub-and-verify tests for a users CRUD API
//!
//! This crate drives the four CRUD operations of a users REST API against a
//! local mock HTTP server. Each scenario registers a stub, sends one real HTTP
//! request, checks the status code and selected JSON fields of the response,
//! and finally verifies that the server recorded exactly one matching request.
//!
//! ## Components
//!
//! - [`fixtures`] - loads named JSON payloads from the fixture directory
//! - [`server`] - [`MockContext`], the mock server lifecycle and verification
//! - [`stub`] - stub rules and request patterns
//! - [`client`] - the HTTP client scenarios drive
//! - [`assertions`] - status and field checks
//! - [`scenario`] - the Get, Create, Update and Delete scenarios
//! - [`runner`] - runs scenarios in sequence against one server
//!
//! ## Endpoints
//!
//! | Scenario | HTTP Method | URL Pattern | Status |
//! |----------|-------------|-------------|--------|
//! | get | GET | `/api/users/1` | 200 |
//! | create | POST | `/api/users` | 201 |
//! | update | PUT | `/api/users/1` | 200 |
//! | delete | DELETE | `/api/users/1` | 200 |
//!
//! Create and Update stubs only match requests carrying
//! `Content-Type: application/json`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use crud_harness::{FixtureLoader, HarnessConfig, MockContext, Scenario, run_scenarios};
//!
//! #[tokio::main]
//! async fn main() -> crud_harness::HarnessResult<()> {
//!     let config = HarnessConfig::for_testing();
//!     let mut ctx = MockContext::start(&config).await?;
//!
//!     let summary = run_scenarios(&ctx, &FixtureLoader::bundled(), &Scenario::crud()).await;
//!     assert!(summary.is_success());
//!
//!     ctx.stop();
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod client;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod runner;
pub mod scenario;
pub mod server;
pub mod stub;

pub use client::{ApiClient, ApiRequest, ApiResponse};
pub use config::HarnessConfig;
pub use error::{AssertionError, FixtureError, HarnessError, HarnessResult, ServerError};
pub use fixtures::FixtureLoader;
pub use runner::{RunReport, RunSummary, ScenarioOutcome, ScenarioReport, run_scenarios};
pub use scenario::{Phase, Scenario, ScenarioFailure};
pub use server::MockContext;
pub use stub::{RequestPattern, ResponseSpec, StubRule};

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over `level` when set.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("crud_harness={},wiremock=warn", level)));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
