// --- File: crates/meetscheduler_api/src/auth.rs ---
//! Sign-in entry point, OAuth callback handling and logout.

use crate::error::ApiError;
use crate::gateway::ApiGateway;
use meetscheduler_session::{Session, SessionError, SessionPatch, SessionStore};
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum CallbackError {
    #[error("Authentication failed. Missing user information.")]
    MissingUserInfo,

    #[error("Malformed callback query: {0}")]
    Malformed(String),

    #[error("Failed to store session: {0}")]
    Storage(#[from] SessionError),
}

impl From<CallbackError> for meetscheduler_common::MeetSchedulerError {
    fn from(err: CallbackError) -> Self {
        match err {
            CallbackError::Storage(e) => e.into(),
            other => meetscheduler_common::MeetSchedulerError::AuthError(other.to_string()),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct CallbackParams {
    user_id: Option<String>,
    username: Option<String>,
    email: Option<String>,
    token: Option<String>,
}

/// URL that starts the identity provider sign-in for `username`.
pub fn sign_in_url(primary_base: &Url, username: &str) -> Result<Url, ApiError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ApiError::InvalidRequest("username is required".into()));
    }
    let mut url = primary_base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::InvalidRequest(format!("'{}' cannot be a base URL", primary_base)))?
        .pop_if_empty()
        .extend(["auth", "google"]);
    url.query_pairs_mut().append_pair("username", username);
    Ok(url)
}

/// Extracts the query part from a full redirect URL, a `?query` or a bare query.
fn query_part(input: &str) -> &str {
    let input = input.trim();
    let query = match input.split_once('?') {
        Some((_, query)) => query,
        None => input,
    };
    query.split('#').next().unwrap_or_default()
}

/// Persists the session carried by the OAuth redirect and returns it.
///
/// `user_id` and `username` are required; `email` defaults to empty and a
/// missing `token` leaves any stored token untouched.
pub fn complete_callback(query: &str, session: &SessionStore) -> Result<Session, CallbackError> {
    let params: CallbackParams = serde_urlencoded::from_str(query_part(query))
        .map_err(|e| CallbackError::Malformed(e.to_string()))?;

    let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
    let (Some(user_id), Some(username)) = (non_empty(params.user_id), non_empty(params.username))
    else {
        warn!("OAuth callback without user information");
        return Err(CallbackError::MissingUserInfo);
    };

    let mut patch = SessionPatch::identity(user_id, username, params.email.unwrap_or_default());
    patch.token = non_empty(params.token);
    session.set_session(patch)?;

    let stored = session.get_session().ok_or(CallbackError::MissingUserInfo)?;
    info!("Signed in as {} ({})", stored.username, stored.user_id);
    Ok(stored)
}

/// Merges the primary backend's profile into the session.
///
/// Failures are logged and reported as `false`; login stays complete either way.
/// The stored user id is kept, since it keys data on the scheduling backend.
pub async fn enrich_session(gateway: &ApiGateway) -> bool {
    match gateway.primary().me().await {
        Ok(profile) => {
            let mut patch = SessionPatch::from_profile(&profile);
            patch.user_id = None;
            match gateway.session().set_session(patch) {
                Ok(()) => {
                    info!("Session enriched with profile data");
                    true
                }
                Err(e) => {
                    warn!("Could not store profile data: {}", e);
                    false
                }
            }
        }
        Err(e) => {
            warn!("Profile lookup failed, continuing without it: {}", e);
            false
        }
    }
}

pub fn logout(session: &SessionStore) -> Result<(), SessionError> {
    session.clear_session()?;
    info!("Logged out");
    Ok(())
}
