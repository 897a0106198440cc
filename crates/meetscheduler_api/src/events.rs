//! Structured diagnostics emitted at the client boundary.
//!
//! Every request that goes out produces one `RequestSent` and then either a
//! `ResponseReceived` or an `ErrorObserved`, all carrying the same request id.
//! A request stopped by an earlier request transform (e.g. a stored token
//! that is not a valid header value) is never sent and only produces an
//! `ErrorObserved`.

use crate::client::ClientKind;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum ApiEvent {
    RequestSent {
        request_id: Uuid,
        client: ClientKind,
        method: String,
        url: String,
    },
    ResponseReceived {
        request_id: Uuid,
        client: ClientKind,
        method: String,
        url: String,
        status: u16,
    },
    ErrorObserved {
        request_id: Uuid,
        client: ClientKind,
        method: String,
        url: String,
        status: Option<u16>,
        body: Option<Value>,
        message: String,
    },
    /// The session was torn down because the backend rejected it.
    SessionCleared {
        request_id: Uuid,
        client: ClientKind,
    },
}

impl ApiEvent {
    pub fn request_id(&self) -> Uuid {
        match self {
            ApiEvent::RequestSent { request_id, .. }
            | ApiEvent::ResponseReceived { request_id, .. }
            | ApiEvent::ErrorObserved { request_id, .. }
            | ApiEvent::SessionCleared { request_id, .. } => *request_id,
        }
    }

    /// Short name of the variant, handy in assertions and log fields.
    pub fn name(&self) -> &'static str {
        match self {
            ApiEvent::RequestSent { .. } => "request_sent",
            ApiEvent::ResponseReceived { .. } => "response_received",
            ApiEvent::ErrorObserved { .. } => "error_observed",
            ApiEvent::SessionCleared { .. } => "session_cleared",
        }
    }
}

/// Receives [`ApiEvent`]s from the clients.
pub trait EventSink: Send + Sync + Debug {
    fn emit(&self, event: ApiEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: ApiEvent) {
        match event {
            ApiEvent::RequestSent {
                request_id,
                client,
                method,
                url,
            } => info!(%request_id, client = client.name(), %method, %url, "API request"),
            ApiEvent::ResponseReceived {
                request_id,
                client,
                method,
                url,
                status,
            } => info!(%request_id, client = client.name(), %method, %url, status, "API response"),
            ApiEvent::ErrorObserved {
                request_id,
                client,
                method,
                url,
                status,
                body,
                message,
            } => {
                let body = body.map(|b| b.to_string()).unwrap_or_default();
                warn!(
                    %request_id,
                    client = client.name(),
                    %method,
                    %url,
                    status = status.unwrap_or_default(),
                    %body,
                    "API error: {}",
                    message
                )
            }
            ApiEvent::SessionCleared { request_id, client } => {
                warn!(%request_id, client = client.name(), "Session cleared after unauthorized response")
            }
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<ApiEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ApiEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(ApiEvent::name).collect()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: ApiEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}
