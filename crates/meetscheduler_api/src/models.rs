// --- File: crates/meetscheduler_api/src/models.rs ---
//! Wire types of the scheduling and primary backends.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// One open slot as sent by the scheduling backend.
///
/// Timestamps are kept as the backend wrote them so they can be echoed back
/// unchanged when booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTimes {
    pub start: String,
    pub end: String,
}

/// Response of `GET /availability/username/{username}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostAvailability {
    pub host_id: i64,
    pub host_email: String,
    #[serde(default)]
    pub available_slots: Vec<SlotTimes>,
}

/// Body of `POST /book`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub host_id: i64,
    pub start_time: String,
    pub end_time: String,
    pub customer_name: String,
    pub customer_email: String,
    pub title: String,
}

/// Response of `POST /book`. Every field is optional so that a minimal
/// confirmation (e.g. only `meet_link`) is accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingResult {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub host_email: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub meet_link: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl BookingResult {
    /// Reads the body of a 2xx `POST /book`.
    ///
    /// The booking exists once the backend answered 2xx, so a body that does
    /// not match the expected shape (or no body at all) still yields a result,
    /// keeping whatever known fields can be read.
    pub fn from_body(body: Value) -> Self {
        match serde_json::from_value::<BookingResult>(body.clone()) {
            Ok(result) => result,
            Err(e) => {
                warn!("Unexpected booking confirmation body, keeping known fields: {}", e);
                let text = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);
                BookingResult {
                    id: body.get("id").and_then(Value::as_i64),
                    host_email: text("host_email"),
                    customer_email: text("customer_email"),
                    start_time: text("start_time"),
                    end_time: text("end_time"),
                    meet_link: text("meet_link"),
                    title: text("title"),
                }
            }
        }
    }

    /// The meeting link, if the backend supplied a non-empty one.
    pub fn meet_link(&self) -> Option<&str> {
        self.meet_link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: i64,
    pub title: String,
    pub customer_name: String,
    pub customer_email: String,
    pub start_ts: String,
    #[serde(default)]
    pub end_ts: Option<String>,
    #[serde(default)]
    pub meet_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingList {
    pub meetings: Vec<Meeting>,
}

/// A stored SMTP account; the user name is masked by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmtpAccount {
    pub id: i64,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user_masked: String,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmtpAccountList {
    pub accounts: Vec<SmtpAccount>,
}

/// Credentials for `POST /smtp/test`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpCredentials {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
}

/// Body of `POST /smtp/add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSmtpAccount {
    #[serde(flatten)]
    pub credentials: SmtpCredentials,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpTestResult {
    pub success: bool,
    pub message: String,
}

/// Plain `{"message": ...}` acknowledgement used by several endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub message: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_booking_result_from_expected_body() {
        let result = BookingResult::from_body(json!({
            "id": 12,
            "host_email": "alice@example.com",
            "meet_link": "https://meet/xyz"
        }));
        assert_eq!(result.id, Some(12));
        assert_eq!(result.meet_link(), Some("https://meet/xyz"));
    }

    #[test]
    fn test_booking_result_from_unexpected_body_keeps_link() {
        let result = BookingResult::from_body(json!({"id": "m-1", "meet_link": "https://meet/xyz"}));
        assert_eq!(result.id, None);
        assert_eq!(result.meet_link(), Some("https://meet/xyz"));
    }

    #[test]
    fn test_booking_result_from_empty_or_text_body() {
        assert_eq!(BookingResult::from_body(Value::Null), BookingResult::default());
        assert_eq!(
            BookingResult::from_body(json!("Created")),
            BookingResult::default()
        );
    }
}
