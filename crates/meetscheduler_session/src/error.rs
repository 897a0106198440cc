use meetscheduler_common::MeetSchedulerError;
use thiserror::Error;

/// Errors raised while writing durable session state.
///
/// Reads never surface these to callers: a session that cannot be read is
/// reported as "no session".
#[derive(Error, Debug)]
pub enum SessionError {
    /// Error reading or writing the storage medium
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data exists but cannot be understood
    #[error("Session storage is corrupt: {0}")]
    Corrupt(String),

    /// Error serializing the session for storage
    #[error("Failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<SessionError> for MeetSchedulerError {
    fn from(err: SessionError) -> Self {
        MeetSchedulerError::StorageError(err.to_string())
    }
}
