use std::collections::HashMap;

use super::{environment::Environment, transaction::Transaction};

/// Decoded reply from the verifyReceipt endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptResponse {
    pub(crate) status: i64,
    pub(crate) environment: Environment,
    pub(crate) latest_receipt_info: Vec<Transaction>,
    pub(crate) in_app: Vec<Transaction>,
}

impl ReceiptResponse {
    /// The raw `status` value.
    pub fn status(&self) -> i64 {
        self.status
    }

    /// True only when `status` is exactly 1.
    ///
    /// The store itself reports a valid receipt with status 0, which this
    /// flag deliberately does not count as success. Callers relying on the
    /// store's convention should compare [`ReceiptResponse::status`] instead.
    pub fn is_success(&self) -> bool {
        self.status == 1
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn is_sandbox(&self) -> bool {
        self.environment == Environment::Sandbox
    }

    /// Subscription renewal history, as returned by the store.
    pub fn latest_receipt_info(&self) -> &[Transaction] {
        &self.latest_receipt_info
    }

    /// Transactions listed in the receipt itself, as returned by the store.
    pub fn in_app(&self) -> &[Transaction] {
        &self.in_app
    }

    /// Every unique transaction in the receipt, one per transaction id.
    ///
    /// The order of the result is unspecified.
    pub fn transactions(&self) -> Vec<Transaction> {
        merge_by_transaction_id(&self.latest_receipt_info, &self.in_app)
    }
}

/// Merges two transaction lists by transaction id. `latest_receipt_info` is
/// applied first and `in_app` second, so on a duplicate id the last record
/// seen in `in_app` wins.
///
/// The order of the result is unspecified.
pub fn merge_by_transaction_id(
    latest_receipt_info: &[Transaction],
    in_app: &[Transaction],
) -> Vec<Transaction> {
    let mut by_id: HashMap<&str, &Transaction> = HashMap::new();
    for t in latest_receipt_info.iter().chain(in_app) {
        by_id.insert(t.transaction_id(), t);
    }
    by_id.into_values().cloned().collect()
}
