//! Error types for the CRUD harness.
//!
//! Errors are split by the stage that raises them, which also decides how far
//! a failure reaches:
//!
//! | Error | Raised by | Scope |
//! |-------|-----------|-------|
//! | [`FixtureError`] | fixture loader | aborts the current scenario |
//! | [`ServerError`] | mock server lifecycle | aborts the whole run |
//! | [`AssertionError`] | status/field/verification checks | fails the current scenario |
//! | [`HarnessError::Request`] | HTTP client | fails the current scenario |

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::io;
use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

/// Result alias used across the harness.
pub type HarnessResult<T> = Result<T, HarnessError>;

/// The primary error type for harness operations.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Fixture loading errors
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// Mock server lifecycle errors
    #[error(transparent)]
    Server(#[from] ServerError),

    /// Expectation failures
    #[error(transparent)]
    Assertion(#[from] AssertionError),

    /// Transport-level client failures
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A request path that does not resolve against the base URL
    #[error("invalid request URL {path}: {source}")]
    Url {
        path: String,
        #[source]
        source: url::ParseError,
    },

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl HarnessError {
    /// Returns true if the error must abort the entire run rather than just
    /// the scenario that raised it.
    pub fn is_fatal(&self) -> bool {
        matches!(self, HarnessError::Server(_) | HarnessError::Config(_))
    }
}

/// Errors raised while reading fixture files.
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("fixture not found: {name} (looked in {})", .path.display())]
    NotFound { name: String, path: PathBuf },

    #[error("fixture unreadable: {name}")]
    Unreadable {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid fixture name: {name:?}")]
    InvalidName { name: String },

    #[error("fixture is not valid JSON: {name}")]
    Malformed {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FixtureError {
    /// The fixture name the error refers to.
    pub fn fixture_name(&self) -> &str {
        match self {
            FixtureError::NotFound { name, .. }
            | FixtureError::Unreadable { name, .. }
            | FixtureError::InvalidName { name }
            | FixtureError::Malformed { name, .. } => name,
        }
    }
}

/// Errors raised by the mock server lifecycle.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind mock server to {addr}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("mock server is not running")]
    NotRunning,
}

/// A diverging expectation.
#[derive(Error, Debug)]
pub enum AssertionError {
    #[error("expected status {expected}, got {actual}")]
    Status { expected: u16, actual: u16 },

    #[error("field {field} missing from response body")]
    MissingField { field: String },

    #[error("field {field}: expected {expected}, got {actual}")]
    FieldMismatch {
        field: String,
        expected: Value,
        actual: Value,
    },

    #[error("expected a JSON response, got content type {actual:?}")]
    ContentType { actual: Option<String> },

    #[error("response body is not valid JSON")]
    NotJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("expected {expected} {method} request(s) to {path}, found {actual}")]
    Verification {
        method: String,
        path: String,
        expected: usize,
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fixture_not_found_names_file() {
        let err = FixtureError::NotFound {
            name: "user_missing.json".to_string(),
            path: PathBuf::from("testdata/user_missing.json"),
        };
        assert!(err.to_string().contains("user_missing.json"));
        assert_eq!(err.fixture_name(), "user_missing.json");
    }

    #[test]
    fn test_field_mismatch_message() {
        let err = AssertionError::FieldMismatch {
            field: "name".to_string(),
            expected: json!("John Doe"),
            actual: json!("Jane Smith"),
        };
        assert_eq!(
            err.to_string(),
            r#"field name: expected "John Doe", got "Jane Smith""#
        );
    }

    #[test]
    fn test_verification_message() {
        let err = AssertionError::Verification {
            method: "GET".to_string(),
            path: "/api/users/1".to_string(),
            expected: 1,
            actual: 0,
        };
        assert_eq!(
            err.to_string(),
            "expected 1 GET request(s) to /api/users/1, found 0"
        );
    }

    #[test]
    fn test_fatality() {
        let bind = HarnessError::from(ServerError::NotRunning);
        assert!(bind.is_fatal());

        let status = HarnessError::from(AssertionError::Status {
            expected: 200,
            actual: 404,
        });
        assert!(!status.is_fatal());

        let fixture = HarnessError::from(FixtureError::InvalidName {
            name: String::new(),
        });
        assert!(!fixture.is_fatal());
    }
}
