use serde::Deserialize;
use serde_with::{serde_as, DefaultOnNull};

use crate::domain::entities::environment::Environment;

/// Data structure returned by the verifyReceipt endpoint.
///
/// https://developer.apple.com/documentation/appstorereceipts/responsebody
///
/// Only the fields this crate reads are modelled. Missing and null fields both
/// fall back to their zero value.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ResponseBodyModel {
    /// Either 0 if the receipt is valid, or a status code if there is an
    /// error.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub(crate) status: i64,
    /// The environment for which the receipt was generated.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub(crate) environment: Environment,
    /// An array that contains all in-app purchase transactions. Only returned
    /// for receipts that contain auto-renewable subscriptions.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub(crate) latest_receipt_info: Vec<InAppModel>,
    /// A JSON representation of the receipt that was sent for verification.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub(crate) receipt: ReceiptModel,
}

/// https://developer.apple.com/documentation/appstorereceipts/responsebody/receipt
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ReceiptModel {
    /// The in-app purchase receipt fields for all in-app purchase
    /// transactions.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub(crate) in_app: Vec<InAppModel>,
}

/// A single in-app purchase transaction, as it appears in both
/// `latest_receipt_info` and `receipt.in_app`.
///
/// https://developer.apple.com/documentation/appstorereceipts/responsebody/receipt/in_app
///
/// The store encodes integers and timestamps as strings; they are kept raw
/// here and normalized when converted to a domain `Transaction`.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct InAppModel {
    /// The number of consumable products purchased.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub(crate) quantity: String,
    /// The time of the original in-app purchase, in UNIX epoch time format, in
    /// milliseconds.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default, rename = "original_purchase_date_ms")]
    pub(crate) purchase_date_ms: String,
    /// The time a subscription expires or when it will renew, in UNIX epoch
    /// time format, in milliseconds.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub(crate) expires_date_ms: String,
    /// 1 if the transaction is in a free trial period.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub(crate) is_trial: i64,
    /// The unique identifier of the product purchased.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub(crate) product_id: String,
    /// A unique identifier for a transaction such as a purchase, restore, or
    /// renewal.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub(crate) transaction_id: String,
}
