use std::{env, time::Duration};

use serde::{Deserialize, Deserializer};

use crate::errors::IapError;

pub const PRODUCTION_VERIFY_RECEIPT_URL: &str = "https://buy.itunes.apple.com/verifyReceipt";
pub const SANDBOX_VERIFY_RECEIPT_URL: &str = "https://sandbox.itunes.apple.com/verifyReceipt";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const PRODUCTION_URL_VAR: &str = "IAP_VERIFY_RECEIPT_PRODUCTION_URL";
const SANDBOX_URL_VAR: &str = "IAP_VERIFY_RECEIPT_SANDBOX_URL";
const ENDPOINT_OVERRIDE_VAR: &str = "IAP_VERIFY_RECEIPT_ENDPOINT_OVERRIDE";
const REQUEST_TIMEOUT_VAR: &str = "IAP_REQUEST_TIMEOUT_SECS";

/// Settings for the verifyReceipt client.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VerifyReceiptConfig {
    pub production_url: String,
    pub sandbox_url: String,
    /// When set, every call goes to this URL regardless of the requested
    /// environment. Intended for pointing the client at a test double.
    pub endpoint_override: Option<String>,
    /// Upper bound on a single verification callout. `None` waits
    /// indefinitely. Deserialized from whole seconds, where 0 means `None`.
    #[serde(deserialize_with = "deserialize_timeout_secs")]
    pub request_timeout: Option<Duration>,
}

impl Default for VerifyReceiptConfig {
    fn default() -> Self {
        Self {
            production_url: PRODUCTION_VERIFY_RECEIPT_URL.to_string(),
            sandbox_url: SANDBOX_VERIFY_RECEIPT_URL.to_string(),
            endpoint_override: None,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}

impl VerifyReceiptConfig {
    /// Config that sends every call to `url`.
    pub fn with_endpoint_override(url: impl Into<String>) -> Self {
        Self {
            endpoint_override: Some(url.into()),
            ..Self::default()
        }
    }

    /// Reads overrides from the process environment, falling back to the
    /// defaults for unset variables. `IAP_REQUEST_TIMEOUT_SECS=0` disables
    /// the timeout.
    pub fn from_env() -> Result<Self, IapError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, IapError> {
        let mut config = Self::default();
        if let Some(url) = lookup(PRODUCTION_URL_VAR) {
            config.production_url = url;
        }
        if let Some(url) = lookup(SANDBOX_URL_VAR) {
            config.sandbox_url = url;
        }
        config.endpoint_override = lookup(ENDPOINT_OVERRIDE_VAR).filter(|url| !url.is_empty());
        if let Some(raw) = lookup(REQUEST_TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                IapError::Config(format!(
                    "{REQUEST_TIMEOUT_VAR} must be a whole number of seconds, got '{raw}'"
                ))
            })?;
            config.request_timeout = timeout_from_secs(secs);
        }
        Ok(config)
    }

    /// URL a call for the given environment is sent to.
    pub fn endpoint(&self, is_production: bool) -> &str {
        match (&self.endpoint_override, is_production) {
            (Some(url), _) => url,
            (None, true) => &self.production_url,
            (None, false) => &self.sandbox_url,
        }
    }
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn deserialize_timeout_secs<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Duration>, D::Error> {
    let secs: Option<u64> = Option::deserialize(deserializer)?;
    Ok(secs.and_then(timeout_from_secs))
}
