//! The CRUD scenarios.
//!
//! A [`Scenario`] is declarative: which stub to register, which request to
//! send and which status and body fields to expect. [`Scenario::run`] walks
//! it through three phases against a [`MockContext`]:
//!
//! 1. **Arrange** - load fixtures and register the stub
//! 2. **Act** - send exactly one request
//! 3. **Assert** - check the status, the named body fields, and that the
//!    server recorded exactly one matching request
//!
//! The first failing step ends the scenario and is reported as a
//! [`ScenarioFailure`] naming the phase.
//!
//! | Scenario | Method | Path | Request body | Status | Fields |
//! |----------|--------|------|--------------|--------|--------|
//! | get | GET | /api/users/1 | - | 200 | id, name, email |
//! | create | POST | /api/users | `user_post.json` | 201 | id, name, email |
//! | update | PUT | /api/users/1 | `user_put.json` | 200 | id, name, email |
//! | delete | DELETE | /api/users/1 | - | 200 | message, deletedId |

use std::fmt;

use http::Method;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{error, info};

use crate::assertions::{expect_fields, expect_json_content_type, expect_status};
use crate::client::{ApiRequest, ApiResponse};
use crate::error::{FixtureError, HarnessError, HarnessResult};
use crate::fixtures::{FixtureLoader, USER_DELETE, USER_GET, USER_POST, USER_PUT};
use crate::server::MockContext;
use crate::stub::{RequestPattern, ResponseSpec, StubRule};

/// Step of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Arrange,
    Act,
    Assert,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Arrange => write!(f, "arrange"),
            Phase::Act => write!(f, "act"),
            Phase::Assert => write!(f, "assert"),
        }
    }
}

/// A scenario that did not pass.
#[derive(Error, Debug)]
#[error("{scenario} failed during {phase}: {error}")]
pub struct ScenarioFailure {
    pub scenario: &'static str,
    pub phase: Phase,
    #[source]
    pub error: HarnessError,
}

impl ScenarioFailure {
    /// Returns true if the failure must stop the remaining scenarios.
    pub fn is_fatal(&self) -> bool {
        self.error.is_fatal()
    }
}

/// One stub-call-verify exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Short identifier used on the command line.
    pub name: &'static str,
    /// Human-readable title.
    pub display_name: &'static str,
    pub method: Method,
    pub path: &'static str,
    /// Fixture sent as the request body, if any.
    pub request_fixture: Option<&'static str>,
    /// Fixture the stub answers with.
    pub response_fixture: &'static str,
    pub stub_status: u16,
    /// Whether the stub only matches `Content-Type: application/json`.
    pub require_json_content_type: bool,
    pub expected_status: u16,
    /// Body fields checked by exact equality, in order.
    pub expected_fields: Vec<(String, Value)>,
}

impl Scenario {
    /// Names of the built-in scenarios, in run order.
    pub const NAMES: [&'static str; 4] = ["get", "create", "update", "delete"];

    /// GET /api/users/1
    pub fn get_user() -> Self {
        Self {
            name: "get",
            display_name: "GET - Retrieve User",
            method: Method::GET,
            path: "/api/users/1",
            request_fixture: None,
            response_fixture: USER_GET,
            stub_status: 200,
            require_json_content_type: false,
            expected_status: 200,
            expected_fields: fields([
                ("id", json!(1)),
                ("name", json!("John Doe")),
                ("email", json!("john@example.com")),
            ]),
        }
    }

    /// POST /api/users
    pub fn create_user() -> Self {
        Self {
            name: "create",
            display_name: "POST - Create User",
            method: Method::POST,
            path: "/api/users",
            request_fixture: Some(USER_POST),
            response_fixture: USER_POST,
            stub_status: 201,
            require_json_content_type: true,
            expected_status: 201,
            expected_fields: fields([
                ("id", json!(2)),
                ("name", json!("Jane Smith")),
                ("email", json!("jane@example.com")),
            ]),
        }
    }

    /// PUT /api/users/1
    pub fn update_user() -> Self {
        Self {
            name: "update",
            display_name: "PUT - Update User",
            method: Method::PUT,
            path: "/api/users/1",
            request_fixture: Some(USER_PUT),
            response_fixture: USER_PUT,
            stub_status: 200,
            require_json_content_type: true,
            expected_status: 200,
            expected_fields: fields([
                ("id", json!(1)),
                ("name", json!("John Updated")),
                ("email", json!("john.updated@example.com")),
            ]),
        }
    }

    /// DELETE /api/users/1
    pub fn delete_user() -> Self {
        Self {
            name: "delete",
            display_name: "DELETE - Remove User",
            method: Method::DELETE,
            path: "/api/users/1",
            request_fixture: None,
            response_fixture: USER_DELETE,
            stub_status: 200,
            require_json_content_type: false,
            expected_status: 200,
            expected_fields: fields([
                ("message", json!("User deleted successfully")),
                ("deletedId", json!(1)),
            ]),
        }
    }

    /// The four CRUD scenarios in run order.
    pub fn crud() -> Vec<Self> {
        vec![
            Self::get_user(),
            Self::create_user(),
            Self::update_user(),
            Self::delete_user(),
        ]
    }

    /// Looks up a built-in scenario by its short name.
    pub fn by_name(name: &str) -> Option<Self> {
        Self::crud().into_iter().find(|s| s.name == name)
    }

    /// The pattern verified after the call.
    pub fn pattern(&self) -> RequestPattern {
        RequestPattern::new(self.method.clone(), self.path)
    }

    /// Builds the stub, reading the response fixture.
    pub fn stub(&self, fixtures: &FixtureLoader) -> Result<StubRule, FixtureError> {
        let body = fixtures.load(self.response_fixture)?;

        let mut rule = StubRule::new(self.method.clone(), self.path);
        if self.require_json_content_type {
            rule = rule.with_json_content_type();
        }
        Ok(rule.respond_with(ResponseSpec::json(self.stub_status, body)))
    }

    /// Builds the request, reading the request fixture if there is one.
    pub fn request(&self, fixtures: &FixtureLoader) -> Result<ApiRequest, FixtureError> {
        let request = ApiRequest::new(self.method.clone(), self.path);
        match self.request_fixture {
            Some(name) => Ok(request.json_body(fixtures.load(name)?)),
            None => Ok(request.json_content_type()),
        }
    }

    /// Runs the scenario against `ctx`.
    pub async fn run(
        &self,
        ctx: &MockContext,
        fixtures: &FixtureLoader,
    ) -> Result<(), ScenarioFailure> {
        let request = self
            .arrange(ctx, fixtures)
            .await
            .map_err(|e| self.failure(Phase::Arrange, e))?;

        let response = ctx
            .client()
            .send(request)
            .await
            .map_err(|e| self.failure(Phase::Act, e))?;

        self.check(ctx, &response)
            .await
            .map_err(|e| self.failure(Phase::Assert, e))?;

        info!(scenario = self.display_name, "Scenario passed");
        Ok(())
    }

    async fn arrange(
        &self,
        ctx: &MockContext,
        fixtures: &FixtureLoader,
    ) -> HarnessResult<ApiRequest> {
        let rule = self.stub(fixtures)?;
        let request = self.request(fixtures)?;
        ctx.register(rule).await?;
        Ok(request)
    }

    async fn check(&self, ctx: &MockContext, response: &ApiResponse) -> HarnessResult<()> {
        expect_status(response, self.expected_status)?;
        expect_json_content_type(response)?;
        let body = response.json()?;
        expect_fields(&body, &self.expected_fields)?;
        ctx.verify_once(&self.pattern()).await
    }

    fn failure(&self, phase: Phase, error: HarnessError) -> ScenarioFailure {
        error!(scenario = self.display_name, %phase, error = %error, "Scenario failed");
        ScenarioFailure {
            scenario: self.name,
            phase,
            error,
        }
    }
}

fn fields<const N: usize>(pairs: [(&str, Value); N]) -> Vec<(String, Value)> {
    pairs
        .into_iter()
        .map(|(path, value)| (path.to_string(), value))
        .collect()
}
