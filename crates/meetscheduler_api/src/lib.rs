// --- File: crates/meetscheduler_api/src/lib.rs ---
//! HTTP access to the primary (identity) and scheduling backends.
//!
//! [`ApiGateway::new`] builds both clients around one injected
//! [`SessionStore`](meetscheduler_session::SessionStore). Each client runs an
//! ordered list of request and response transforms; the primary client
//! attaches the bearer token and turns a 401 into a logout plus a navigation
//! to the sign-in route before the caller sees the error.

pub mod auth;
pub mod client;
pub mod error;
pub mod events;
pub mod gateway;
pub mod models;
pub mod navigation;
pub mod primary;
pub mod scheduling;
pub mod transforms;

pub use auth::{complete_callback, enrich_session, logout, sign_in_url, CallbackError};
pub use client::{ApiClient, ApiRequest, ApiResponse, ClientKind, Endpoint};
pub use error::ApiError;
pub use events::{ApiEvent, EventSink, RecordingEventSink, TracingEventSink};
pub use gateway::ApiGateway;
pub use models::*;
pub use navigation::{Navigator, RecordingNavigator};
pub use primary::PrimaryApi;
pub use scheduling::{
    filter_meetings, MeetingFilter, SchedulingApi, SchedulingService, SmtpValidationError,
    ALLOWED_SMTP_PORTS,
};
pub use transforms::{
    BearerToken, RequestTransform, ResponseTransform, TraceRequest, TraceResponse,
    UnauthorizedLogout,
};
