use crate::workflow::{FormError, Step};
use meetscheduler_common::MeetSchedulerError;
use thiserror::Error;

/// Generic message for any availability failure other than an unknown host.
pub const LOAD_SLOTS_FAILED: &str = "Failed to load available slots";
/// Message for an unknown host.
pub const HOST_NOT_FOUND: &str = "User not found. Please check the booking link.";

/// Why availability could not be loaded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AvailabilityError {
    /// The scheduling backend does not know this username (404).
    #[error("Host not found: {0}")]
    HostNotFound(String),

    /// Any other non-2xx answer.
    #[error("Availability request failed: {message}")]
    Backend { status: u16, message: String },

    /// No response was received.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered 2xx with data we cannot use.
    #[error("Malformed availability response: {0}")]
    MalformedResponse(String),

    /// Rejected before any request was made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AvailabilityError {
    /// The message a visitor sees.
    pub fn user_message(&self) -> &'static str {
        match self {
            AvailabilityError::HostNotFound(_) => HOST_NOT_FOUND,
            _ => LOAD_SLOTS_FAILED,
        }
    }
}

impl From<AvailabilityError> for MeetSchedulerError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::HostNotFound(username) => {
                MeetSchedulerError::NotFoundError(format!("host '{}'", username))
            }
            AvailabilityError::Backend { message, .. } => MeetSchedulerError::ExternalServiceError {
                service_name: "scheduling".to_string(),
                message,
            },
            AvailabilityError::Network(msg) => MeetSchedulerError::HttpError(msg),
            AvailabilityError::MalformedResponse(msg) => MeetSchedulerError::ParseError(msg),
            AvailabilityError::InvalidInput(msg) => MeetSchedulerError::ValidationError(msg),
        }
    }
}

/// A workflow action that is not allowed in the current state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    #[error("Cannot {action} in the {step} step")]
    InvalidStep { action: &'static str, step: Step },

    #[error("A submission is already in flight")]
    InFlight,

    #[error("No submission is in flight")]
    NotInFlight,

    #[error("{0}")]
    Validation(FormError),
}

impl From<WorkflowError> for MeetSchedulerError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Validation(form) => MeetSchedulerError::ValidationError(form.message().to_string()),
            other => MeetSchedulerError::InternalError(other.to_string()),
        }
    }
}
