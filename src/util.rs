use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::info;

use crate::{
    config::VerifyReceiptConfig,
    data::{
        datasources::verify_receipt_datasource::VerifyReceiptDatasourceImpl,
        repositories::receipt_repository_impl::{parse_receipt_response, ReceiptRepositoryImpl},
    },
    domain::{
        entities::{receipt_response::ReceiptResponse, vendor_status::VendorStatus},
        repositories::receipt_repository::ReceiptRepository,
    },
    errors::IapError,
};

/// `ReceiptUtil` backed by the reqwest verifyReceipt client.
pub type DefaultReceiptUtil = ReceiptUtil<ReceiptRepositoryImpl<VerifyReceiptDatasourceImpl>>;

pub struct ReceiptUtil<R: ReceiptRepository> {
    receipt_repository: R,
}

impl<R: ReceiptRepository> ReceiptUtil<R> {
    pub fn with_repository(receipt_repository: R) -> Self {
        Self { receipt_repository }
    }

    /// Verifies a receipt with the store and returns the decoded response.
    ///
    /// payload:
    ///   Base64-encoded receipt data as produced by the device. A payload
    ///   starting with `mock_response:` is not sent anywhere; the rest of it is
    ///   decoded as if it were the store's reply.
    ///
    /// shared_secret:
    ///   Only required for receipts containing auto-renewable subscriptions.
    ///
    /// Exactly one request is made. Note that an `Ok` result does not imply
    /// [`ReceiptResponse::is_success`].
    pub async fn verify(
        &self,
        payload: &str,
        shared_secret: Option<&str>,
        is_production: bool,
    ) -> Result<ReceiptResponse, IapError> {
        self.receipt_repository
            .verify(payload, shared_secret, is_production)
            .await
    }

    /// Verifies against production first and, only if the store reports a
    /// sandbox receipt (21007), verifies again against sandbox.
    pub async fn verify_with_sandbox_fallback(
        &self,
        payload: &str,
        shared_secret: Option<&str>,
    ) -> Result<ReceiptResponse, IapError> {
        match self.verify(payload, shared_secret, true).await {
            Err(e) if e.vendor_status() == Some(VendorStatus::SandboxReceiptSentToProduction) => {
                info!("Receipt is from sandbox; retrying against sandbox endpoint.");
                self.verify(payload, shared_secret, false).await
            }
            result => result,
        }
    }
}

impl DefaultReceiptUtil {
    pub fn new(config: VerifyReceiptConfig) -> Result<Self, IapError> {
        Ok(Self {
            receipt_repository: ReceiptRepositoryImpl::new(config)?,
        })
    }

    /// Equivalent to `new(VerifyReceiptConfig::from_env()?)`.
    pub fn from_env() -> Result<Self, IapError> {
        Self::new(VerifyReceiptConfig::from_env()?)
    }
}

/// Decodes a raw verifyReceipt response body without making any request.
pub fn parse_receipt(raw: &[u8]) -> Result<ReceiptResponse, IapError> {
    parse_receipt_response(raw)
}

/// Base64-encodes the contents of a receipt file into the payload format
/// expected by [`ReceiptUtil::verify`].
pub fn encode_receipt(receipt: &[u8]) -> String {
    STANDARD.encode(receipt)
}
