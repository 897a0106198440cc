//! Request and response transforms attached to an [`ApiClient`](crate::ApiClient).
//!
//! Request transforms may modify the outgoing request. Response transforms
//! receive the outcome of the exchange (or of an earlier transform) and
//! return the outcome the next transform, and finally the caller, sees.

use crate::client::{ApiRequest, ApiResponse};
use crate::error::ApiError;
use crate::events::{ApiEvent, EventSink};
use crate::navigation::Navigator;
use meetscheduler_session::SessionStore;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{error, warn};

pub trait RequestTransform: Send + Sync + Debug {
    fn on_request(&self, request: &mut ApiRequest) -> Result<(), ApiError>;
}

pub trait ResponseTransform: Send + Sync + Debug {
    fn on_response(
        &self,
        request: &ApiRequest,
        outcome: Result<ApiResponse, ApiError>,
    ) -> Result<ApiResponse, ApiError>;
}

/// Adds `Authorization: Bearer <token>` when the session holds a token.
#[derive(Debug, Clone)]
pub struct BearerToken {
    session: SessionStore,
}

impl BearerToken {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }
}

impl RequestTransform for BearerToken {
    fn on_request(&self, request: &mut ApiRequest) -> Result<(), ApiError> {
        let Some(token) = self.session.token() else {
            return Ok(());
        };
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ApiError::InvalidRequest("stored token is not a valid header value".into()))?;
        request.headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// Emits `RequestSent`.
#[derive(Debug, Clone)]
pub struct TraceRequest {
    sink: Arc<dyn EventSink>,
}

impl TraceRequest {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }
}

impl RequestTransform for TraceRequest {
    fn on_request(&self, request: &mut ApiRequest) -> Result<(), ApiError> {
        self.sink.emit(ApiEvent::RequestSent {
            request_id: request.request_id,
            client: request.client,
            method: request.method.to_string(),
            url: request.url.to_string(),
        });
        Ok(())
    }
}

/// Emits `ResponseReceived` or `ErrorObserved` and passes the outcome on.
#[derive(Debug, Clone)]
pub struct TraceResponse {
    sink: Arc<dyn EventSink>,
}

impl TraceResponse {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }
}

impl ResponseTransform for TraceResponse {
    fn on_response(
        &self,
        request: &ApiRequest,
        outcome: Result<ApiResponse, ApiError>,
    ) -> Result<ApiResponse, ApiError> {
        let event = match &outcome {
            Ok(response) => ApiEvent::ResponseReceived {
                request_id: request.request_id,
                client: request.client,
                method: request.method.to_string(),
                url: request.url.to_string(),
                status: response.status,
            },
            Err(err) => ApiEvent::ErrorObserved {
                request_id: request.request_id,
                client: request.client,
                method: request.method.to_string(),
                url: request.url.to_string(),
                status: err.status(),
                body: match err {
                    ApiError::Status { body, .. } | ApiError::Unauthorized { body } => {
                        Some(body.clone())
                    }
                    _ => None,
                },
                message: err.to_string(),
            },
        };
        self.sink.emit(event);
        outcome
    }
}

/// On a 401, clears the session and navigates to the sign-in route before
/// the caller sees the error.
///
/// Only `ApiError::Status { status: 401 }` triggers it; the `Unauthorized`
/// error it returns does not, so one response causes one logout.
#[derive(Debug, Clone)]
pub struct UnauthorizedLogout {
    session: SessionStore,
    sink: Arc<dyn EventSink>,
    navigator: Arc<dyn Navigator>,
    sign_in_route: String,
}

impl UnauthorizedLogout {
    pub fn new(
        session: SessionStore,
        sink: Arc<dyn EventSink>,
        navigator: Arc<dyn Navigator>,
        sign_in_route: impl Into<String>,
    ) -> Self {
        Self {
            session,
            sink,
            navigator,
            sign_in_route: sign_in_route.into(),
        }
    }
}

impl ResponseTransform for UnauthorizedLogout {
    fn on_response(
        &self,
        request: &ApiRequest,
        outcome: Result<ApiResponse, ApiError>,
    ) -> Result<ApiResponse, ApiError> {
        match outcome {
            Err(ApiError::Status { status: 401, body }) => {
                warn!(
                    "{} {} rejected as unauthorized; signing out",
                    request.method, request.url
                );
                if let Err(e) = self.session.clear_session() {
                    error!("Failed to clear session after 401: {}", e);
                }
                self.sink.emit(ApiEvent::SessionCleared {
                    request_id: request.request_id,
                    client: request.client,
                });
                self.navigator.navigate(&self.sign_in_route);
                Err(ApiError::Unauthorized { body })
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientKind;
    use crate::events::RecordingEventSink;
    use crate::navigation::RecordingNavigator;
    use meetscheduler_session::SessionPatch;
    use reqwest::header::HeaderMap;
    use reqwest::{Method, Url};
    use serde_json::{json, Value};
    use uuid::Uuid;

    fn request() -> ApiRequest {
        ApiRequest {
            request_id: Uuid::new_v4(),
            client: ClientKind::Primary,
            method: Method::GET,
            url: Url::parse("http://localhost:8000/api/users/me").unwrap(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[test]
    fn test_bearer_token_attached_when_present() {
        let session = SessionStore::in_memory();
        session.set_session(SessionPatch::new().with_token("abc")).unwrap();
        let mut req = request();

        BearerToken::new(session).on_request(&mut req).unwrap();

        assert_eq!(req.headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
    }

    #[test]
    fn test_bearer_token_skipped_without_token() {
        let mut req = request();
        BearerToken::new(SessionStore::in_memory())
            .on_request(&mut req)
            .unwrap();
        assert!(req.headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_unauthorized_logout_clears_and_navigates_once() {
        let session = SessionStore::in_memory();
        session
            .set_session(SessionPatch::identity("1", "alice", "a@x.com").with_token("t"))
            .unwrap();
        let sink = Arc::new(RecordingEventSink::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let transform =
            UnauthorizedLogout::new(session.clone(), sink.clone(), navigator.clone(), "/connect");
        let req = request();

        let outcome = transform.on_response(
            &req,
            Err(ApiError::Status {
                status: 401,
                body: json!({"detail": "Invalid token"}),
            }),
        );
        // Feeding the converted error through again must not log out twice
        let outcome = transform.on_response(&req, outcome);

        assert!(matches!(outcome, Err(ApiError::Unauthorized { .. })));
        assert_eq!(session.get_session(), None);
        assert_eq!(session.token(), None);
        assert_eq!(navigator.routes(), vec!["/connect".to_string()]);
        assert_eq!(sink.names(), vec!["session_cleared"]);
    }

    #[test]
    fn test_unauthorized_logout_ignores_other_errors() {
        let session = SessionStore::in_memory();
        session.set_session(SessionPatch::new().with_token("t")).unwrap();
        let navigator = Arc::new(RecordingNavigator::new());
        let transform = UnauthorizedLogout::new(
            session.clone(),
            Arc::new(RecordingEventSink::new()),
            navigator.clone(),
            "/connect",
        );

        let outcome = transform.on_response(
            &request(),
            Err(ApiError::Status {
                status: 403,
                body: Value::Null,
            }),
        );

        assert_eq!(outcome.unwrap_err().status(), Some(403));
        assert_eq!(session.token().as_deref(), Some("t"));
        assert!(navigator.routes().is_empty());
    }

    #[test]
    fn test_trace_response_records_error_body() {
        let sink = Arc::new(RecordingEventSink::new());
        let transform = TraceResponse::new(sink.clone());
        let req = request();

        let _ = transform.on_response(
            &req,
            Err(ApiError::Status {
                status: 500,
                body: json!({"detail": "boom"}),
            }),
        );

        match &sink.events()[0] {
            ApiEvent::ErrorObserved {
                request_id,
                status,
                body,
                ..
            } => {
                assert_eq!(*request_id, req.request_id);
                assert_eq!(*status, Some(500));
                assert_eq!(body.as_ref(), Some(&json!({"detail": "boom"})));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}
