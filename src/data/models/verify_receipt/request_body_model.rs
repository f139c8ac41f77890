use serde::Serialize;

/// JSON body posted to the verifyReceipt endpoint.
///
/// https://developer.apple.com/documentation/appstorereceipts/requestbody
#[derive(Debug, Serialize)]
pub struct RequestBodyModel<'a> {
    /// The Base64-encoded receipt data.
    #[serde(rename = "receipt-data")]
    pub receipt_data: &'a str,
    /// The app's shared secret. Only used for receipts that contain
    /// auto-renewable subscriptions; sent as an empty string otherwise.
    pub password: &'a str,
}
