//! Credential model and collaborator contracts for implicit-flow sessions
//!
//! This crate is the leaf of the session workspace: it owns the cached
//! credential data model and the contracts the session manager consumes.
//! It has no dependency on the state machine itself and can be tested
//! and used independently.
//!
//! Credential flow:
//! 1. A prompter implementation completes the redirect and yields a token
//! 2. `profile::ProfileLookup` resolves the authenticated subject id
//! 3. The session manager builds a `Credential` and persists it through
//!    the `cache::CredentialCache` contract
//! 4. `permissions::is_subset()` drives the silent-reuse decision on the
//!    next login
//! 5. An explicit logout clears the cache slot

pub mod cache;
pub mod config;
pub mod credential;
pub mod error;
pub mod permissions;
pub mod profile;

pub use cache::{CredentialCache, FileCredentialStore};
pub use config::AppConfig;
pub use credential::{Credential, now_millis};
pub use error::{CacheError, ConfigError, ProfileError};
pub use profile::{GraphProfile, ProfileLookup};
