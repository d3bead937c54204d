//! Common test utilities for the CRUD harness.
//!
//! - [`harness`] - a started mock server plus the bundled fixtures

pub mod harness;
