use std::{collections::HashMap, fmt};

use once_cell::sync::Lazy;

use super::environment::Environment;

/// Status codes returned by the verifyReceipt endpoint that mean the receipt
/// could not be verified.
///
/// https://developer.apple.com/documentation/appstorereceipts/status
///
/// 21006 (subscription expired) is not listed: such a receipt is still valid
/// and its transaction history is returned as usual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorStatus {
    MalformedRequest,
    MalformedReceiptData,
    NotAuthenticated,
    SharedSecretMismatch,
    ServerUnavailable,
    SandboxReceiptSentToProduction,
    ProductionReceiptSentToSandbox,
}

static BY_CODE: Lazy<HashMap<i64, VendorStatus>> = Lazy::new(|| {
    VendorStatus::ALL
        .iter()
        .map(|status| (status.code(), *status))
        .collect()
});

impl VendorStatus {
    const ALL: [VendorStatus; 7] = [
        VendorStatus::MalformedRequest,
        VendorStatus::MalformedReceiptData,
        VendorStatus::NotAuthenticated,
        VendorStatus::SharedSecretMismatch,
        VendorStatus::ServerUnavailable,
        VendorStatus::SandboxReceiptSentToProduction,
        VendorStatus::ProductionReceiptSentToSandbox,
    ];

    /// Looks up a decoded `status` value. Returns `None` for anything that is
    /// not a known error, including 0, 1 and 21006.
    pub fn from_code(code: i64) -> Option<Self> {
        BY_CODE.get(&code).copied()
    }

    pub fn code(&self) -> i64 {
        match self {
            VendorStatus::MalformedRequest => 21000,
            VendorStatus::MalformedReceiptData => 21002,
            VendorStatus::NotAuthenticated => 21003,
            VendorStatus::SharedSecretMismatch => 21004,
            VendorStatus::ServerUnavailable => 21005,
            VendorStatus::SandboxReceiptSentToProduction => 21007,
            VendorStatus::ProductionReceiptSentToSandbox => 21008,
        }
    }

    pub fn cause(&self) -> &'static str {
        match self {
            VendorStatus::MalformedRequest => {
                "The App Store could not read the JSON object you provided."
            }
            VendorStatus::MalformedReceiptData => {
                "The data in the receipt-data property was malformed or missing."
            }
            VendorStatus::NotAuthenticated => "The receipt could not be authenticated.",
            VendorStatus::SharedSecretMismatch => {
                "The shared secret you provided does not match the shared secret on file for your account."
            }
            VendorStatus::ServerUnavailable => "The receipt server is not currently available.",
            VendorStatus::SandboxReceiptSentToProduction => {
                "This receipt is from the test environment, but it was sent to the production environment for verification. Send it to the test environment instead."
            }
            VendorStatus::ProductionReceiptSentToSandbox => {
                "This receipt is from the production environment, but it was sent to the test environment for verification. Send it to the production environment instead."
            }
        }
    }

    /// The environment the receipt should be re-sent to, if the status is an
    /// environment mismatch.
    pub fn redirect_environment(&self) -> Option<Environment> {
        match self {
            VendorStatus::SandboxReceiptSentToProduction => Some(Environment::Sandbox),
            VendorStatus::ProductionReceiptSentToSandbox => Some(Environment::Production),
            _ => None,
        }
    }

    /// Only 21005 is transient on the store's side.
    pub fn is_transient(&self) -> bool {
        matches!(self, VendorStatus::ServerUnavailable)
    }
}

impl fmt::Display for VendorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.cause())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_round_trips_table() {
        for code in [21000, 21002, 21003, 21004, 21005, 21007, 21008] {
            let status = VendorStatus::from_code(code).unwrap();
            assert_eq!(status.code(), code);
        }
    }

    #[test]
    fn test_from_code_ignores_non_errors() {
        assert_eq!(VendorStatus::from_code(0), None);
        assert_eq!(VendorStatus::from_code(1), None);
        assert_eq!(VendorStatus::from_code(21001), None);
        assert_eq!(VendorStatus::from_code(21006), None);
        assert_eq!(VendorStatus::from_code(21010), None);
    }

    #[test]
    fn test_redirect_environment() {
        assert_eq!(
            VendorStatus::SandboxReceiptSentToProduction.redirect_environment(),
            Some(Environment::Sandbox)
        );
        assert_eq!(
            VendorStatus::ProductionReceiptSentToSandbox.redirect_environment(),
            Some(Environment::Production)
        );
        assert_eq!(VendorStatus::NotAuthenticated.redirect_environment(), None);
    }

    #[test]
    fn test_display_includes_code_and_cause() {
        assert_eq!(
            VendorStatus::ServerUnavailable.to_string(),
            "21005 (The receipt server is not currently available.)"
        );
    }
}
