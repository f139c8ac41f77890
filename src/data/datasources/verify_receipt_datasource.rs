use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    config::VerifyReceiptConfig, data::models::verify_receipt::request_body_model::RequestBodyModel,
    errors::IapError,
};

#[async_trait]
pub trait VerifyReceiptDatasource: Send + Sync {
    /// Verify Receipt:
    /// https://developer.apple.com/documentation/appstorereceipts/verifyreceipt
    ///
    /// Sends a single request to the production or sandbox endpoint and
    /// returns the raw body of a 2xx reply.
    async fn verify_receipt(
        &self,
        body: &RequestBodyModel<'_>,
        is_production: bool,
    ) -> Result<String, IapError>;
}

pub struct VerifyReceiptDatasourceImpl {
    client: reqwest::Client,
    config: VerifyReceiptConfig,
}

#[async_trait]
impl VerifyReceiptDatasource for VerifyReceiptDatasourceImpl {
    async fn verify_receipt(
        &self,
        body: &RequestBodyModel<'_>,
        is_production: bool,
    ) -> Result<String, IapError> {
        let url = self.config.endpoint(is_production);
        debug!(url, is_production, "Sending receipt for verification.");

        let network_error = |source: reqwest::Error| IapError::Network {
            url: url.to_string(),
            source,
        };
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let text = response.text().await.map_err(network_error)?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "Verification callout returned non-2xx status code.");
            return Err(IapError::HttpStatus {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

impl VerifyReceiptDatasourceImpl {
    pub fn new(config: VerifyReceiptConfig) -> Result<Self, IapError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|source| IapError::Network {
            url: config.endpoint(true).to_string(),
            source,
        })?;
        Ok(Self { client, config })
    }
}
