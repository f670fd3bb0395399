/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for rozert-client tests

use rozert_client::{MerchantCredentials, RozertClient};
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::MockServer;

pub const MERCHANT_ID: &str = "merchant-test";
pub const SECRET_KEY: &str = "test-secret";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server
pub fn test_client(server: &MockServer, sandbox: bool) -> RozertClient {
    RozertClient::new(
        MerchantCredentials::new(server.uri(), MERCHANT_ID, SECRET_KEY).sandbox(sandbox),
    )
    .expect("client init")
}

pub fn test_wallet_id() -> Uuid {
    Uuid::parse_str("11111111-1111-1111-1111-111111111111").expect("wallet id")
}

/// Transaction body as returned by the API
pub fn transaction_json(id: &str, kind: &str) -> Value {
    json!({
        "id": id,
        "status": "pending",
        "wallet_id": "11111111-1111-1111-1111-111111111111",
        "type": kind,
        "amount": "100",
        "currency": "MXN",
        "instruction": null,
        "decline_code": null,
        "decline_reason": null,
        "user_data": null
    })
}
