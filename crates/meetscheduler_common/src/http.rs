use serde_json::Value;

// Include the client module
pub mod client;

/// Pulls the human-readable error text out of a backend error body.
///
/// The scheduling backend reports errors as `{"detail": "..."}`; other services
/// use `{"message": "..."}`. Non-string details (e.g. validation error lists)
/// are ignored so callers fall back to their generic message.
pub fn error_detail(body: &Value) -> Option<String> {
    ["detail", "message"]
        .iter()
        .filter_map(|key| body.get(*key))
        .find_map(|value| value.as_str())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
