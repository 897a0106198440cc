// --- File: crates/meetscheduler_session/src/lib.rs ---
//! Client-side session persistence.
//!
//! The session is two storage entries: `user` (a JSON identity record) and
//! `token` (the bearer string). Any number of [`SessionStore`] handles may
//! share one storage backend.

pub mod error;
pub mod storage;
pub mod store;

pub use error::SessionError;
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use store::{Session, SessionPatch, SessionStore, TOKEN_KEY, USER_KEY};
