//! Mock Dynatrace API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the entity
//! endpoints of the Dynatrace Environment API v2, including `nextPageKey`
//! paging. Unlike wiremock which mocks at the HTTP level per-test, this
//! server maintains state across requests, enabling realistic workflow
//! testing.
//!
//! # Example
//!
//! ```ignore
//! use dtapi::mock_server::MockServer;
//! use dtapi::DynatraceClient;
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = DynatraceClient::new("test-token", server.url()).unwrap();
//!
//!     // Server comes with default fixtures
//!     let hosts = client.entities().list("type(HOST)").collect_all().await.unwrap();
//!     assert_eq!(hosts.len(), 3);
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::MockState;
