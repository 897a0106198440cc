// --- File: crates/meetscheduler_api/src/scheduling.rs ---
//! Typed operations of the scheduling backend.

use crate::client::{ApiClient, Endpoint};
use crate::error::ApiError;
use crate::models::{
    Acknowledgement, BookingRequest, BookingResult, HostAvailability, Meeting, MeetingList,
    NewSmtpAccount, SmtpAccount, SmtpAccountList, SmtpCredentials, SmtpTestResult,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use meetscheduler_common::parse_timestamp;
use thiserror::Error;
use tracing::{info, instrument};

/// SMTP ports the backend accepts.
pub const ALLOWED_SMTP_PORTS: [u16; 4] = [25, 465, 587, 2525];

/// The scheduling operations the booking page needs.
///
/// Implemented by [`SchedulingApi`]; tests substitute their own.
#[async_trait]
pub trait SchedulingService: Send + Sync {
    /// Open slots of the host with this username within the next `days` days.
    async fn availability_by_username(
        &self,
        username: &str,
        days: u32,
    ) -> Result<HostAvailability, ApiError>;

    /// Reserves a slot.
    async fn book(&self, request: BookingRequest) -> Result<BookingResult, ApiError>;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmtpValidationError {
    #[error("SMTP host cannot be empty")]
    EmptyHost,
    #[error("SMTP user cannot be empty")]
    EmptyUser,
    #[error("SMTP port must be one of: 25, 465, 587, 2525 (got {0})")]
    UnsupportedPort(u16),
}

impl From<SmtpValidationError> for ApiError {
    fn from(err: SmtpValidationError) -> Self {
        ApiError::InvalidRequest(err.to_string())
    }
}

impl SmtpCredentials {
    /// Checks the credentials the same way the backend does and returns them
    /// with host and user trimmed.
    pub fn validated(&self) -> Result<SmtpCredentials, SmtpValidationError> {
        let smtp_host = self.smtp_host.trim();
        if smtp_host.is_empty() {
            return Err(SmtpValidationError::EmptyHost);
        }
        if !ALLOWED_SMTP_PORTS.contains(&self.smtp_port) {
            return Err(SmtpValidationError::UnsupportedPort(self.smtp_port));
        }
        let smtp_user = self.smtp_user.trim();
        if smtp_user.is_empty() {
            return Err(SmtpValidationError::EmptyUser);
        }
        Ok(SmtpCredentials {
            smtp_host: smtp_host.to_string(),
            smtp_port: self.smtp_port,
            smtp_user: smtp_user.to_string(),
            smtp_password: self.smtp_password.clone(),
        })
    }
}

/// Which meetings a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeetingFilter {
    #[default]
    Upcoming,
    Past,
    All,
}

/// Filters meetings relative to `now`.
///
/// Upcoming means starting strictly after `now`. Meetings whose start cannot
/// be parsed only show up under `All`.
pub fn filter_meetings(meetings: &[Meeting], filter: MeetingFilter, now: DateTime<Utc>) -> Vec<Meeting> {
    meetings
        .iter()
        .filter(|meeting| match filter {
            MeetingFilter::All => true,
            MeetingFilter::Upcoming => parse_timestamp(&meeting.start_ts).is_ok_and(|start| start > now),
            MeetingFilter::Past => parse_timestamp(&meeting.start_ts).is_ok_and(|start| start <= now),
        })
        .cloned()
        .collect()
}

/// Typed wrapper around the scheduling client.
#[derive(Debug, Clone)]
pub struct SchedulingApi {
    client: ApiClient,
}

impl SchedulingApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The underlying client, for calls without a typed wrapper.
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[instrument(skip(self))]
    pub async fn meetings(&self, user_id: &str) -> Result<Vec<Meeting>, ApiError> {
        let list: MeetingList = self
            .client
            .get_json(Endpoint::new("/meetings").query("user_id", user_id))
            .await?;
        Ok(list.meetings)
    }

    pub async fn smtp_list(&self, user_id: &str) -> Result<Vec<SmtpAccount>, ApiError> {
        let list: SmtpAccountList = self
            .client
            .get_json(Endpoint::new("/smtp/list").query("user_id", user_id))
            .await?;
        Ok(list.accounts)
    }

    /// Validates and stores a new SMTP account. Invalid input never reaches
    /// the network.
    pub async fn smtp_add(
        &self,
        user_id: &str,
        account: &NewSmtpAccount,
    ) -> Result<SmtpAccount, ApiError> {
        let body = NewSmtpAccount {
            credentials: account.credentials.validated()?,
            is_active: account.is_active,
        };
        let created: SmtpAccount = self
            .client
            .post_json(Endpoint::new("/smtp/add").query("user_id", user_id), &body)
            .await?;
        info!("Added SMTP account {} for user {}", created.id, user_id);
        Ok(created)
    }

    pub async fn smtp_test(&self, credentials: &SmtpCredentials) -> Result<SmtpTestResult, ApiError> {
        let body = credentials.validated()?;
        self.client.post_json("/smtp/test", &body).await
    }

    pub async fn smtp_set_active(&self, id: i64, user_id: &str) -> Result<Acknowledgement, ApiError> {
        self.client
            .post_json(
                Endpoint::new("/smtp/set-active")
                    .segment(id)
                    .query("user_id", user_id),
                &serde_json::json!({}),
            )
            .await
    }

    pub async fn smtp_delete(&self, id: i64, user_id: &str) -> Result<Acknowledgement, ApiError> {
        self.client
            .delete_json(Endpoint::new("/smtp").segment(id).query("user_id", user_id))
            .await
    }
}

#[async_trait]
impl SchedulingService for SchedulingApi {
    async fn availability_by_username(
        &self,
        username: &str,
        days: u32,
    ) -> Result<HostAvailability, ApiError> {
        self.client
            .get_json(
                Endpoint::new("/availability/username")
                    .segment(username)
                    .query("days", days),
            )
            .await
    }

    async fn book(&self, request: BookingRequest) -> Result<BookingResult, ApiError> {
        let response = self.client.post("/book", &request).await?;
        let result = BookingResult::from_body(response.body);
        info!(
            "Booked {} - {} with host {}",
            request.start_time, request.end_time, request.host_id
        );
        Ok(result)
    }
}
