//! Session lifecycle for implicit-flow authentication
//!
//! Orchestrates login and logout against three collaborators: the
//! interactive `AuthorizationPrompter` (the redirect UI), the
//! `CredentialCache` (persisted credential slot), and the
//! `ProfileLookup` (subject id resolution). The manager decides when a
//! cached credential may be reused silently and when a fresh
//! interactive authorization is required.
//!
//! Session flow:
//! 1. App constructs a `SessionManager` with its collaborators
//! 2. `login()` reuses the cached credential or runs the prompter
//! 3. Requested permissions are unioned into the credential and persisted
//! 4. Observers follow credential changes via `subscribe()`
//! 5. `logout()` clears the cache slot and the current session

pub mod error;
pub mod manager;
pub mod telemetry;

pub use error::{Error, Result};
pub use manager::SessionManager;
pub use telemetry::spawn_usage_ping;
