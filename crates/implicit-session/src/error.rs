//! Error taxonomy for session lifecycle operations

use implicit_auth::{CacheError, ProfileError};
use prompter::PromptError;

/// Errors from session manager operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Another login is already in flight on this manager instance.
    /// A caller bug: the manager never retries or queues internally.
    #[error("login already in progress")]
    ConcurrentLogin,

    /// The interactive authorization flow failed or was cancelled.
    #[error("authorization failed: {0}")]
    Authorization(#[from] PromptError),

    /// The post-authorization identity lookup failed. The credential is
    /// not cached in this state.
    #[error("profile lookup failed: {0}")]
    ProfileLookup(#[from] ProfileError),

    /// The persistence layer failed. During logout this surfaces only
    /// after the in-memory current session has already been cleared.
    #[error("credential cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Result alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;
