use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument, warn};

use crate::{
    config::VerifyReceiptConfig,
    data::{
        datasources::{
            utils::{preview, MOCK_RESPONSE_PREFIX, REQUEST_PREVIEW_CHARS, RESPONSE_PREVIEW_CHARS},
            verify_receipt_datasource::{VerifyReceiptDatasource, VerifyReceiptDatasourceImpl},
        },
        models::verify_receipt::{
            request_body_model::RequestBodyModel,
            response_body_model::{InAppModel, ResponseBodyModel},
        },
    },
    domain::{
        entities::{
            receipt_response::ReceiptResponse,
            transaction::{invalid_timestamp, Transaction},
            vendor_status::VendorStatus,
        },
        repositories::receipt_repository::ReceiptRepository,
    },
    errors::IapError,
};

pub struct ReceiptRepositoryImpl<A: VerifyReceiptDatasource> {
    verify_receipt_datasource: A,
}

#[async_trait]
impl<A: VerifyReceiptDatasource> ReceiptRepository for ReceiptRepositoryImpl<A> {
    #[instrument(skip(self, payload, shared_secret))]
    async fn verify(
        &self,
        payload: &str,
        shared_secret: Option<&str>,
        is_production: bool,
    ) -> Result<ReceiptResponse, IapError> {
        // The store rejects receipt data with a trailing newline.
        let payload = payload.trim();

        if let Some(canned) = payload.strip_prefix(MOCK_RESPONSE_PREFIX) {
            debug!("Decoding canned response instead of calling out.");
            return parse_receipt_response(canned.as_bytes());
        }

        let body = RequestBodyModel {
            receipt_data: payload,
            password: shared_secret.unwrap_or_default(),
        };
        let raw = self
            .verify_receipt_datasource
            .verify_receipt(&body, is_production)
            .await?;
        let response = parse_receipt_response(raw.as_bytes())?;
        debug!(
            status = response.status(),
            environment = %response.environment(),
            "Decoded verification response."
        );

        if let Some(status) = VendorStatus::from_code(response.status()) {
            warn!(code = status.code(), "Receipt was rejected by the store.");
            return Err(IapError::VendorStatus {
                status,
                request_preview: preview(payload, REQUEST_PREVIEW_CHARS),
                response_preview: preview(&raw, RESPONSE_PREVIEW_CHARS),
            });
        }
        Ok(response)
    }
}

impl ReceiptRepositoryImpl<VerifyReceiptDatasourceImpl> {
    pub fn new(config: VerifyReceiptConfig) -> Result<Self, IapError> {
        Ok(Self {
            verify_receipt_datasource: VerifyReceiptDatasourceImpl::new(config)?,
        })
    }
}

impl<A: VerifyReceiptDatasource> ReceiptRepositoryImpl<A> {
    #[cfg(test)]
    fn with_datasource(verify_receipt_datasource: A) -> Self {
        Self {
            verify_receipt_datasource,
        }
    }
}

/// Decodes a verifyReceipt response body.
///
/// Fails only if `raw` is not JSON or a field has an incompatible type; the
/// status code is not checked here.
pub(crate) fn parse_receipt_response(raw: &[u8]) -> Result<ReceiptResponse, IapError> {
    let m: ResponseBodyModel = serde_json::from_slice(raw)?;
    Ok(ReceiptResponse::from_model(m))
}

impl ReceiptResponse {
    fn from_model(m: ResponseBodyModel) -> Self {
        Self {
            status: m.status,
            environment: m.environment,
            latest_receipt_info: m
                .latest_receipt_info
                .into_iter()
                .map(Transaction::from_model)
                .collect(),
            in_app: m
                .receipt
                .in_app
                .into_iter()
                .map(Transaction::from_model)
                .collect(),
        }
    }
}

impl Transaction {
    fn from_model(m: InAppModel) -> Self {
        Self {
            quantity: m.quantity.parse().unwrap_or(1),
            purchase_date: parse_timestamp_ms(&m.purchase_date_ms),
            expires_date: parse_timestamp_ms(&m.expires_date_ms),
            is_trial: m.is_trial == 1,
            product_id: m.product_id,
            transaction_id: m.transaction_id,
        }
    }
}

/// Converts a string of epoch milliseconds to whole seconds, truncating the
/// remainder. Anything unparseable maps to `invalid_timestamp()`.
fn parse_timestamp_ms(raw: &str) -> DateTime<Utc> {
    raw.parse::<i64>()
        .ok()
        .and_then(|ms| DateTime::from_timestamp(ms / 1000, 0))
        .unwrap_or_else(invalid_timestamp)
}
