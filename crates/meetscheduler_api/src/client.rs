// --- File: crates/meetscheduler_api/src/client.rs ---
//! One configured backend client and its transform pipelines.

use crate::error::ApiError;
use crate::transforms::{RequestTransform, ResponseTransform};
use meetscheduler_common::client_for_endpoint;
use meetscheduler_config::ApiEndpointConfig;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Which backend a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientKind {
    /// Identity, session and profile operations.
    Primary,
    /// Availability, bookings, meetings and SMTP settings.
    Scheduling,
}

impl ClientKind {
    pub fn name(&self) -> &'static str {
        match self {
            ClientKind::Primary => "primary",
            ClientKind::Scheduling => "scheduling",
        }
    }
}

impl fmt::Display for ClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A path relative to a client's base URL plus query parameters.
///
/// Literal paths are split on `/`; dynamic values added with
/// [`Endpoint::segment`] are percent-encoded as a single segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Endpoint {
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl Endpoint {
    pub fn new(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            query: Vec::new(),
        }
    }

    pub fn segment(mut self, segment: impl ToString) -> Self {
        self.segments.push(segment.to_string());
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }
}

impl From<&str> for Endpoint {
    fn from(path: &str) -> Self {
        Endpoint::new(path)
    }
}

/// A request as seen by the request transforms.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Correlates the request with its response events.
    pub request_id: Uuid,
    pub client: ClientKind,
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

/// A successful (2xx) response. An empty body is `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// HTTP client for one backend.
///
/// Cloning is cheap; clones share the connection pool and transforms.
#[derive(Clone)]
pub struct ApiClient {
    kind: ClientKind,
    base_url: Url,
    http: Client,
    request_transforms: Vec<Arc<dyn RequestTransform>>,
    response_transforms: Vec<Arc<dyn ResponseTransform>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("kind", &self.kind)
            .field("base_url", &self.base_url.as_str())
            .field("request_transforms", &self.request_transforms.len())
            .field("response_transforms", &self.response_transforms.len())
            .finish()
    }
}

impl ApiClient {
    /// Builds a client with empty pipelines.
    pub fn new(kind: ClientKind, endpoint: &ApiEndpointConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&endpoint.base_url).map_err(|e| {
            ApiError::InvalidRequest(format!("invalid base URL '{}': {}", endpoint.base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidRequest(format!(
                "'{}' cannot be used as a base URL",
                endpoint.base_url
            )));
        }
        let http = client_for_endpoint(endpoint)
            .map_err(|e| ApiError::InvalidRequest(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            kind,
            base_url,
            http,
            request_transforms: Vec::new(),
            response_transforms: Vec::new(),
        })
    }

    /// Appends a request transform; transforms run in insertion order.
    pub fn with_request_transform(mut self, transform: Arc<dyn RequestTransform>) -> Self {
        self.request_transforms.push(transform);
        self
    }

    /// Appends a response transform; transforms run in insertion order.
    pub fn with_response_transform(mut self, transform: Arc<dyn ResponseTransform>) -> Self {
        self.response_transforms.push(transform);
        self
    }

    pub fn kind(&self) -> ClientKind {
        self.kind
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn url_for(&self, endpoint: &Endpoint) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(&endpoint.segments);
        }
        if !endpoint.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&endpoint.query);
        }
        url
    }

    pub async fn get(&self, endpoint: impl Into<Endpoint>) -> Result<ApiResponse, ApiError> {
        self.send(Method::GET, endpoint.into(), None).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: impl Into<Endpoint>,
        body: &B,
    ) -> Result<ApiResponse, ApiError> {
        let body = to_body(body)?;
        self.send(Method::POST, endpoint.into(), Some(body)).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        endpoint: impl Into<Endpoint>,
        body: &B,
    ) -> Result<ApiResponse, ApiError> {
        let body = to_body(body)?;
        self.send(Method::PUT, endpoint.into(), Some(body)).await
    }

    pub async fn delete(&self, endpoint: impl Into<Endpoint>) -> Result<ApiResponse, ApiError> {
        self.send(Method::DELETE, endpoint.into(), None).await
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: impl Into<Endpoint>,
    ) -> Result<T, ApiError> {
        self.get(endpoint).await?.json()
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: impl Into<Endpoint>,
        body: &B,
    ) -> Result<T, ApiError> {
        self.post(endpoint, body).await?.json()
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: impl Into<Endpoint>,
        body: &B,
    ) -> Result<T, ApiError> {
        self.put(endpoint, body).await?.json()
    }

    pub async fn delete_json<T: DeserializeOwned>(
        &self,
        endpoint: impl Into<Endpoint>,
    ) -> Result<T, ApiError> {
        self.delete(endpoint).await?.json()
    }

    /// Runs the request pipeline, the exchange, and the response pipeline.
    ///
    /// A request transform failure skips the exchange but still flows through
    /// the response transforms so it is observed like any other error.
    async fn send(
        &self,
        method: Method,
        endpoint: Endpoint,
        body: Option<Value>,
    ) -> Result<ApiResponse, ApiError> {
        let mut request = ApiRequest {
            request_id: Uuid::new_v4(),
            client: self.kind,
            method,
            url: self.url_for(&endpoint),
            headers: HeaderMap::new(),
            body,
        };

        let prepared = self
            .request_transforms
            .iter()
            .try_for_each(|transform| transform.on_request(&mut request));

        let outcome = match prepared {
            Ok(()) => self.exchange(&request).await,
            Err(e) => Err(e),
        };

        self.response_transforms
            .iter()
            .fold(outcome, |outcome, transform| transform.on_response(&request, outcome))
    }

    async fn exchange(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut builder = self
            .http
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(network_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(network_error)?;
        let body = parse_body(&bytes);
        debug!(
            "{} {} {} answered {}",
            self.kind,
            request.method,
            request.url,
            status.as_u16()
        );

        if status.is_success() {
            Ok(ApiResponse {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))
}

fn network_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Network(format!("request timed out: {}", err))
    } else {
        ApiError::Network(err.to_string())
    }
}

/// Bodies that are not JSON are kept as a string so error text is not lost.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}
