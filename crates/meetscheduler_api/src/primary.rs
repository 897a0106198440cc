use crate::client::ApiClient;
use crate::error::ApiError;
use serde::Serialize;
use serde_json::Value;

/// Typed wrapper around the primary (identity) client.
///
/// Profile and team payloads are owned by the identity service and passed
/// through as JSON.
#[derive(Debug, Clone)]
pub struct PrimaryApi {
    client: ApiClient,
}

impl PrimaryApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Checks that the current token is still accepted.
    pub async fn verify(&self) -> Result<Value, ApiError> {
        self.client.get_json("/api/auth/verify").await
    }

    pub async fn me(&self) -> Result<Value, ApiError> {
        self.client.get_json("/api/users/me").await
    }

    pub async fn update_me<P: Serialize + ?Sized>(&self, patch: &P) -> Result<Value, ApiError> {
        self.client.put_json("/api/users/me", patch).await
    }

    pub async fn my_team(&self) -> Result<Value, ApiError> {
        self.client.get_json("/api/teams/me").await
    }
}
