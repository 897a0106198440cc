// --- File: crates/meetscheduler_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by all MeetScheduler crates.
///
/// Each crate keeps its own error enum and implements `From<ItsError> for MeetSchedulerError`
/// so that front ends can deal with a single type.
#[derive(Error, Debug)]
pub enum MeetSchedulerError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The session is missing or was rejected by the backend
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Client-side validation failed
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Reading or writing durable client state failed
    #[error("Storage error: {0}")]
    StorageError(String),

    /// A backend answered with an error
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    #[error("Conflict: {0}")]
    ConflictError(String),

    #[error("Not found: {0}")]
    NotFoundError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Maps an error onto the HTTP status code that best describes it.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for MeetSchedulerError {
    fn status_code(&self) -> u16 {
        match self {
            MeetSchedulerError::HttpError(_) => 503,
            MeetSchedulerError::ParseError(_) => 400,
            MeetSchedulerError::ConfigError(_) => 500,
            MeetSchedulerError::AuthError(_) => 401,
            MeetSchedulerError::ValidationError(_) => 400,
            MeetSchedulerError::StorageError(_) => 500,
            MeetSchedulerError::ExternalServiceError { .. } => 502,
            MeetSchedulerError::ConflictError(_) => 409,
            MeetSchedulerError::NotFoundError(_) => 404,
            MeetSchedulerError::InternalError(_) => 500,
        }
    }
}

impl From<reqwest::Error> for MeetSchedulerError {
    fn from(err: reqwest::Error) -> Self {
        MeetSchedulerError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for MeetSchedulerError {
    fn from(err: serde_json::Error) -> Self {
        MeetSchedulerError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for MeetSchedulerError {
    fn from(err: std::io::Error) -> Self {
        MeetSchedulerError::InternalError(err.to_string())
    }
}

pub fn config_error<T: fmt::Display>(message: T) -> MeetSchedulerError {
    MeetSchedulerError::ConfigError(message.to_string())
}
