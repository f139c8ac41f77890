use chrono::{DateTime, Utc};

/// One purchase event extracted from a verified receipt.
///
/// Values are normalized when the receipt is decoded: unparseable dates become
/// [`invalid_timestamp`], an unparseable quantity becomes 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub(crate) quantity: i64,
    pub(crate) purchase_date: DateTime<Utc>,
    pub(crate) expires_date: DateTime<Utc>,
    pub(crate) is_trial: bool,
    pub(crate) product_id: String,
    pub(crate) transaction_id: String,
}

/// Sentinel returned for dates that could not be decoded: one second before
/// the Unix epoch.
pub fn invalid_timestamp() -> DateTime<Utc> {
    DateTime::<Utc>::default() - chrono::Duration::seconds(1)
}

impl Transaction {
    /// Time of the original purchase.
    pub fn purchase_date(&self) -> DateTime<Utc> {
        self.purchase_date
    }

    /// Time the subscription expires or renews. Equal to
    /// [`invalid_timestamp`] for non-subscription products.
    pub fn expires_date(&self) -> DateTime<Utc> {
        self.expires_date
    }

    pub fn is_trial(&self) -> bool {
        self.is_trial
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Identifies the transaction; two records with the same id describe the
    /// same purchase.
    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }
}
