/// Prefix that marks a payload as a canned verifyReceipt response rather than
/// real receipt data.
pub(crate) const MOCK_RESPONSE_PREFIX: &str = "mock_response:";

/// Number of characters of the outgoing receipt data kept in error messages.
pub(crate) const REQUEST_PREVIEW_CHARS: usize = 10;

/// Number of characters of the store's response kept in error messages.
pub(crate) const RESPONSE_PREVIEW_CHARS: usize = 100;

/// First `max_chars` characters of `s`, cut on a character boundary.
pub(crate) fn preview(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
