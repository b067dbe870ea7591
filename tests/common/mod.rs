//! Common test utilities shared across the integration test files.
//!
//! Usage in test files:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! Every façade is pointed at a local [`MockServer`]; nothing here talks to
//! IBM Cloud.

use ibm_watson::{BasicAuthenticator, HeaderOverrides, SdkInfo, ServiceBuilder};
use std::time::Duration;
use wiremock::MockServer;

pub const TEST_USERNAME: &str = "apikey";
pub const TEST_PASSWORD: &str = "secret";

/// `Authorization` value for [`TEST_USERNAME`]:[`TEST_PASSWORD`].
pub const TEST_BASIC_AUTH: &str = "Basic YXBpa2V5OnNlY3JldA==";

/// Fixed user agent so tests can match it exactly.
pub const TEST_USER_AGENT: &str = "ibm-watson-rust-sdk-test";

/// A builder with basic credentials, pointed at `server`.
pub fn builder_for(server: &MockServer) -> ServiceBuilder {
    ServiceBuilder::new(
        BasicAuthenticator::new(TEST_USERNAME, TEST_PASSWORD).expect("valid test credentials"),
    )
    .service_url(server.uri())
    .sdk_info(SdkInfo::with_user_agent(TEST_USER_AGENT))
    .timeout(Duration::from_secs(10))
}

/// Builds a per-call header override map.
#[allow(dead_code)]
pub fn overrides(pairs: &[(&str, &str)]) -> HeaderOverrides {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Formats `(event, data)` pairs as an SSE body.
#[allow(dead_code)]
pub fn sse_body(events: &[(&str, serde_json::Value)]) -> String {
    events
        .iter()
        .map(|(event, data)| format!("event: {event}\ndata: {data}\n\n"))
        .collect()
}
