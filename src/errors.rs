use thiserror::Error;

use crate::domain::entities::{environment::Environment, vendor_status::VendorStatus};

#[derive(Debug, Error)]
pub enum IapError {
    /// The response body is not valid JSON, or does not match the receipt
    /// response schema.
    #[error("Failed to parse receipt response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Verification callout to '{url}' failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Verification callout returned non-2xx status code {status}; response body was: '{body}'")]
    HttpStatus { status: u16, body: String },

    #[error("Receipt was rejected with status {status}; request payload: '{request_preview}', response payload: '{response_preview}'")]
    VendorStatus {
        status: VendorStatus,
        request_preview: String,
        response_preview: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl IapError {
    pub fn vendor_status(&self) -> Option<VendorStatus> {
        match self {
            IapError::VendorStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// If the receipt was sent to the wrong environment, the environment it
    /// should be sent to instead.
    pub fn environment_mismatch(&self) -> Option<Environment> {
        self.vendor_status()
            .and_then(|status| status.redirect_environment())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, IapError::Network { source, .. } if source.is_timeout())
    }

    /// Whether repeating the same call later may succeed. Nothing in this
    /// crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            IapError::Network { .. } => true,
            IapError::HttpStatus { status, .. } => *status >= 500,
            IapError::VendorStatus { status, .. } => status.is_transient(),
            IapError::Parse(_) | IapError::Config(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vendor_error(status: VendorStatus) -> IapError {
        IapError::VendorStatus {
            status,
            request_preview: "MIITtgYJKo".to_string(),
            response_preview: "{}".to_string(),
        }
    }

    #[test]
    fn test_vendor_status_display_contains_code_and_cause() {
        let msg = vendor_error(VendorStatus::SandboxReceiptSentToProduction).to_string();
        assert!(msg.contains("status 21007 (This receipt is from the test environment"));
        assert!(msg.contains("test environment"));
        assert!(msg.contains("MIITtgYJKo"));
    }

    #[test]
    fn test_http_status_display_contains_body() {
        let e = IapError::HttpStatus {
            status: 400,
            body: "uh oh\n".to_string(),
        };
        assert!(e.to_string().contains("uh oh"));
        assert!(!e.is_retryable());
    }

    #[test]
    fn test_retryable_classification() {
        assert!(vendor_error(VendorStatus::ServerUnavailable).is_retryable());
        assert!(!vendor_error(VendorStatus::NotAuthenticated).is_retryable());
        assert!(IapError::HttpStatus {
            status: 503,
            body: String::new()
        }
        .is_retryable());
        assert!(!IapError::Config("bad".to_string()).is_retryable());
    }

    #[test]
    fn test_environment_mismatch() {
        assert_eq!(
            vendor_error(VendorStatus::SandboxReceiptSentToProduction).environment_mismatch(),
            Some(Environment::Sandbox)
        );
        assert_eq!(
            vendor_error(VendorStatus::SharedSecretMismatch).environment_mismatch(),
            None
        );
        assert_eq!(IapError::Config(String::new()).environment_mismatch(), None);
    }
}
