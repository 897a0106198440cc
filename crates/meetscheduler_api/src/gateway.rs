// --- File: crates/meetscheduler_api/src/gateway.rs ---
//! Builds both backend clients around one session context.

use crate::client::{ApiClient, ClientKind};
use crate::error::ApiError;
use crate::events::EventSink;
use crate::navigation::Navigator;
use crate::primary::PrimaryApi;
use crate::scheduling::SchedulingApi;
use crate::transforms::{BearerToken, TraceRequest, TraceResponse, UnauthorizedLogout};
use meetscheduler_config::AppConfig;
use meetscheduler_session::SessionStore;
use std::sync::Arc;
use tracing::info;

/// The primary and scheduling clients, wired to the same session.
#[derive(Debug, Clone)]
pub struct ApiGateway {
    primary: PrimaryApi,
    scheduling: SchedulingApi,
    session: SessionStore,
}

impl ApiGateway {
    /// Creates both clients.
    ///
    /// Primary pipeline: request `[BearerToken, TraceRequest]`, response
    /// `[TraceResponse, UnauthorizedLogout]`. Scheduling pipeline: request
    /// `[TraceRequest]`, response `[TraceResponse]`.
    pub fn new(
        config: &AppConfig,
        session: SessionStore,
        sink: Arc<dyn EventSink>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let primary = ApiClient::new(ClientKind::Primary, &config.primary_api)?
            .with_request_transform(Arc::new(BearerToken::new(session.clone())))
            .with_request_transform(Arc::new(TraceRequest::new(sink.clone())))
            .with_response_transform(Arc::new(TraceResponse::new(sink.clone())))
            .with_response_transform(Arc::new(UnauthorizedLogout::new(
                session.clone(),
                sink.clone(),
                navigator,
                config.auth.sign_in_route.clone(),
            )));

        let scheduling = ApiClient::new(ClientKind::Scheduling, &config.scheduling_api)?
            .with_request_transform(Arc::new(TraceRequest::new(sink.clone())))
            .with_response_transform(Arc::new(TraceResponse::new(sink)));

        info!(
            "API gateway ready: primary={} scheduling={}",
            primary.base_url(),
            scheduling.base_url()
        );

        Ok(Self {
            primary: PrimaryApi::new(primary),
            scheduling: SchedulingApi::new(scheduling),
            session,
        })
    }

    pub fn primary(&self) -> &PrimaryApi {
        &self.primary
    }

    pub fn scheduling(&self) -> &SchedulingApi {
        &self.scheduling
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }
}
