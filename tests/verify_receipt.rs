use std::time::Duration;

use httpmock::prelude::*;
use iap_receipt_verifier::{
    config::VerifyReceiptConfig,
    domain::{
        entities::{
            environment::Environment, receipt_response::ReceiptResponse,
            vendor_status::VendorStatus,
        },
        repositories::receipt_repository::ReceiptRepository,
    },
    errors::IapError,
    util::{parse_receipt, DefaultReceiptUtil, ReceiptUtil},
};
use serde_json::json;

const RECEIPT0_RESPONSE: &str = include_str!("fixtures/receipt0_response.json");
const RECEIPT1_RESPONSE: &str = include_str!("fixtures/receipt1_response.json");
const RECEIPT2_REQUEST: &str = include_str!("fixtures/receipt2_request");
const RECEIPT2_RESPONSE: &str = include_str!("fixtures/receipt2_response.json");

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn util_for(server: &MockServer) -> DefaultReceiptUtil {
    DefaultReceiptUtil::new(VerifyReceiptConfig::with_endpoint_override(
        server.url("/verifyReceipt"),
    ))
    .unwrap()
}

#[tokio::test]
async fn test_mock_response_skips_network() {
    init_tracing();
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(500);
        })
        .await;

    let util = util_for(&server);
    let payload = format!("mock_response:{RECEIPT1_RESPONSE}");
    let receipt = util.verify(&payload, Some("password"), false).await.unwrap();

    assert_eq!(receipt, parse_receipt(RECEIPT1_RESPONSE.as_bytes()).unwrap());
    assert_eq!(receipt.transactions().len(), 7);
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn test_verify_against_server() {
    init_tracing();
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/verifyReceipt")
                .json_body(json!({
                    "receipt-data": RECEIPT2_REQUEST.trim(),
                    "password": "password",
                }));
            then.status(200)
                .header("content-type", "application/json")
                .body(RECEIPT2_RESPONSE);
        })
        .await;

    let util = util_for(&server);
    let receipt = util
        .verify(RECEIPT2_REQUEST, Some("password"), false)
        .await
        .unwrap();

    mock.assert_async().await;
    // 21006 is not an error.
    assert_eq!(receipt.status(), 21006);
    assert!(!receipt.is_success());
    assert!(receipt.is_sandbox());
    assert_eq!(receipt.transactions().len(), 1);
}

#[tokio::test]
async fn test_non_2xx_reply_is_returned_as_error() {
    init_tracing();
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/verifyReceipt");
            then.status(400).body("uh oh");
        })
        .await;

    let util = util_for(&server);
    let err = util
        .verify(RECEIPT2_REQUEST, Some("password"), false)
        .await
        .unwrap_err();

    assert!(matches!(err, IapError::HttpStatus { status: 400, .. }));
    assert!(err.to_string().contains("uh oh"));
}

#[tokio::test]
async fn test_sandbox_receipt_sent_to_production() {
    init_tracing();
    let server = MockServer::start_async().await;
    let production = server
        .mock_async(|when, then| {
            when.method(POST).path("/production");
            then.status(200).json_body(json!({ "status": 21007 }));
        })
        .await;
    let sandbox = server
        .mock_async(|when, then| {
            when.method(POST).path("/sandbox");
            then.status(200).body(RECEIPT0_RESPONSE);
        })
        .await;

    let util: DefaultReceiptUtil = ReceiptUtil::new(VerifyReceiptConfig {
        production_url: server.url("/production"),
        sandbox_url: server.url("/sandbox"),
        ..VerifyReceiptConfig::default()
    })
    .unwrap();

    let err = util
        .verify(RECEIPT2_REQUEST, Some("password"), true)
        .await
        .unwrap_err();
    assert_eq!(
        err.vendor_status(),
        Some(VendorStatus::SandboxReceiptSentToProduction)
    );
    assert_eq!(err.environment_mismatch(), Some(Environment::Sandbox));
    assert!(err.to_string().contains("21007"));
    assert_eq!(production.hits_async().await, 1);
    assert_eq!(sandbox.hits_async().await, 0);

    let receipt = util
        .verify_with_sandbox_fallback(RECEIPT2_REQUEST, Some("password"))
        .await
        .unwrap();
    assert!(receipt.is_sandbox());
    assert_eq!(receipt.transactions().len(), 1);
    assert_eq!(production.hits_async().await, 2);
    assert_eq!(sandbox.hits_async().await, 1);
}

#[tokio::test]
async fn test_fallback_only_on_sandbox_mismatch() {
    init_tracing();
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/verifyReceipt");
            then.status(200).json_body(json!({ "status": 21004 }));
        })
        .await;

    let util = util_for(&server);
    let err = util
        .verify_with_sandbox_fallback(RECEIPT2_REQUEST, Some("wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.vendor_status(), Some(VendorStatus::SharedSecretMismatch));
    assert!(err.to_string().contains("21004"));
    assert_eq!(mock.hits_async().await, 1);
}

#[tokio::test]
async fn test_every_known_status_is_an_error() {
    init_tracing();
    for code in [21000, 21002, 21003, 21004, 21005, 21007, 21008] {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({ "status": code }));
            })
            .await;

        let err = util_for(&server)
            .verify(RECEIPT2_REQUEST, None, true)
            .await
            .unwrap_err();
        assert_eq!(err.vendor_status().map(|s| s.code()), Some(code));
        assert_eq!(err.is_retryable(), code == 21005);
    }
}

#[tokio::test]
async fn test_request_timeout() {
    init_tracing();
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200)
                .delay(Duration::from_millis(500))
                .body(RECEIPT0_RESPONSE);
        })
        .await;

    let util: DefaultReceiptUtil = ReceiptUtil::new(VerifyReceiptConfig {
        request_timeout: Some(Duration::from_millis(50)),
        ..VerifyReceiptConfig::with_endpoint_override(server.url("/verifyReceipt"))
    })
    .unwrap();
    let err = util.verify(RECEIPT2_REQUEST, None, false).await.unwrap_err();

    assert!(err.is_timeout());
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_connection_failure_is_network_error() {
    init_tracing();
    let util: DefaultReceiptUtil = ReceiptUtil::new(VerifyReceiptConfig::with_endpoint_override(
        "http://127.0.0.1:1/verifyReceipt",
    ))
    .unwrap();
    let err = util.verify(RECEIPT2_REQUEST, None, true).await.unwrap_err();

    assert!(matches!(err, IapError::Network { .. }));
    assert!(err.is_retryable());
}

struct CannedRepository(&'static str);

#[async_trait::async_trait]
impl ReceiptRepository for CannedRepository {
    async fn verify(
        &self,
        _payload: &str,
        _shared_secret: Option<&str>,
        _is_production: bool,
    ) -> Result<ReceiptResponse, IapError> {
        parse_receipt(self.0.as_bytes())
    }
}

#[tokio::test]
async fn test_custom_repository() {
    let util = ReceiptUtil::with_repository(CannedRepository(RECEIPT0_RESPONSE));
    let receipt = util.verify("MIIT", None, true).await.unwrap();
    assert!(receipt.is_sandbox());

    let fallback = util
        .verify_with_sandbox_fallback("MIIT", None)
        .await
        .unwrap();
    assert_eq!(fallback, receipt);
}
