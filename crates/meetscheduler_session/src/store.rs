use crate::error::SessionError;
use crate::storage::{FileStorage, MemoryStorage, SessionStorage};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Storage key holding the user record as JSON.
pub const USER_KEY: &str = "user";
/// Storage key holding the bearer token as a bare string.
pub const TOKEN_KEY: &str = "token";

/// The signed-in identity as seen by the rest of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: String,
    pub username: String,
    pub email: String,
    pub token: Option<String>,
    /// Extra profile fields stored alongside the identity (e.g. from `/api/users/me`).
    pub profile: Map<String, Value>,
}

/// A partial update to the stored session.
///
/// `None` fields are left unchanged. Profile entries are merged key by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPatch {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub token: Option<String>,
    pub profile: Map<String, Value>,
}

impl SessionPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(
        user_id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            user_id: Some(user_id.into()),
            username: Some(username.into()),
            email: Some(email.into()),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Builds a patch from a backend profile object.
    ///
    /// `id`, `username` and `email` become identity fields, everything else
    /// lands in the profile. Non-object values yield an empty patch.
    pub fn from_profile(profile: &Value) -> Self {
        let mut patch = Self::default();
        let Some(object) = profile.as_object() else {
            return patch;
        };
        for (key, value) in object {
            match key.as_str() {
                "id" => patch.user_id = id_to_string(value),
                "username" => patch.username = value.as_str().map(str::to_string),
                "email" => patch.email = value.as_str().map(str::to_string),
                _ => {
                    patch.profile.insert(key.clone(), value.clone());
                }
            }
        }
        patch
    }

    fn touches_user(&self) -> bool {
        self.user_id.is_some()
            || self.username.is_some()
            || self.email.is_some()
            || !self.profile.is_empty()
    }
}

fn id_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(id_to_string))
}

/// The `user` record as persisted.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredUser {
    #[serde(default, deserialize_with = "deserialize_id", skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(flatten)]
    profile: Map<String, Value>,
}

/// Handle to the durable session.
///
/// Clones share the same storage and nothing is cached, so a write through
/// one handle is visible to every other handle on its next read.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileStorage::new(path)))
    }

    fn read_key(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Could not read session key '{}': {}", key, e);
                None
            }
        }
    }

    fn stored_user(&self) -> Option<StoredUser> {
        let raw = self.read_key(USER_KEY)?;
        match serde_json::from_str::<StoredUser>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Ignoring malformed session user record: {}", e);
                None
            }
        }
    }

    /// Returns the current session, or `None` when nobody is signed in or
    /// the stored record is missing, malformed, or has no user id.
    pub fn get_session(&self) -> Option<Session> {
        let user = self.stored_user()?;
        let Some(user_id) = user.id else {
            warn!("Ignoring session user record without an id");
            return None;
        };
        Some(Session {
            user_id,
            username: user.username.unwrap_or_default(),
            email: user.email.unwrap_or_default(),
            token: self.token(),
            profile: user.profile,
        })
    }

    /// Reads the bearer token without touching the user record.
    pub fn token(&self) -> Option<String> {
        self.read_key(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_session().is_some()
    }

    /// Merges `patch` into the stored session and persists it before returning.
    pub fn set_session(&self, patch: SessionPatch) -> Result<(), SessionError> {
        if patch.touches_user() {
            let mut user = self.stored_user().unwrap_or_default();
            if let Some(id) = patch.user_id {
                user.id = Some(id);
            }
            if let Some(username) = patch.username {
                user.username = Some(username);
            }
            if let Some(email) = patch.email {
                user.email = Some(email);
            }
            for (key, value) in patch.profile {
                user.profile.insert(key, value);
            }
            let json = serde_json::to_string(&user)?;
            self.storage.set(USER_KEY, &json)?;
            debug!("Session user record updated");
        }
        if let Some(token) = patch.token {
            self.storage.set(TOKEN_KEY, &token)?;
            debug!("Session token updated");
        }
        Ok(())
    }

    /// Removes the user record and token. Clearing an empty session is a no-op.
    pub fn clear_session(&self) -> Result<(), SessionError> {
        let user_result = self.storage.remove(USER_KEY);
        let token_result = self.storage.remove(TOKEN_KEY);
        user_result?;
        token_result?;
        info!("Session cleared");
        Ok(())
    }
}
