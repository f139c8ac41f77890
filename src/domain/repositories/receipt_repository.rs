use async_trait::async_trait;

use crate::{domain::entities::receipt_response::ReceiptResponse, errors::IapError};

#[async_trait]
pub trait ReceiptRepository: Send + Sync {
    async fn verify(
        &self,
        payload: &str,
        shared_secret: Option<&str>,
        is_production: bool,
    ) -> Result<ReceiptResponse, IapError>;
}
