use meetscheduler_common::{error_detail, MeetSchedulerError};
use serde_json::Value;
use thiserror::Error;

/// Outcome of a failed call through an [`ApiClient`](crate::ApiClient).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("Request failed with status {status}")]
    Status { status: u16, body: Value },

    /// The primary backend rejected the credentials. The session has already
    /// been cleared and the sign-in navigation issued.
    #[error("Unauthorized: session cleared")]
    Unauthorized { body: Value },

    /// No response was received (connection failure, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx response whose body does not have the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// The request could not be built or failed client-side validation.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP status of the response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    /// The backend's human-readable `detail` (or `message`), when present.
    pub fn detail(&self) -> Option<String> {
        match self {
            ApiError::Status { body, .. } | ApiError::Unauthorized { body } => error_detail(body),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }
}

impl From<ApiError> for MeetSchedulerError {
    fn from(err: ApiError) -> Self {
        let detail = err.detail().unwrap_or_else(|| err.to_string());
        match err {
            ApiError::Status { status: 404, .. } => MeetSchedulerError::NotFoundError(detail),
            ApiError::Status { status: 409, .. } => MeetSchedulerError::ConflictError(detail),
            ApiError::Status { status, .. } => MeetSchedulerError::ExternalServiceError {
                service_name: format!("backend ({})", status),
                message: detail,
            },
            ApiError::Unauthorized { .. } => MeetSchedulerError::AuthError(detail),
            ApiError::Network(msg) => MeetSchedulerError::HttpError(msg),
            ApiError::Decode(msg) => MeetSchedulerError::ParseError(msg),
            ApiError::InvalidRequest(msg) => MeetSchedulerError::ValidationError(msg),
        }
    }
}
