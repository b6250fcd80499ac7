//! Authorization prompter contract for the interactive login flow
//!
//! Defines the `AuthorizationPrompter` trait that decouples the session
//! state machine from the user-facing redirect UI. The UI layer (browser
//! window, embedded web view) implements the trait; the session manager
//! only sees the outcome: an access token with an expiry, or a failure.
//!
//! The crate also carries the non-UI redirect plumbing every prompter
//! implementation needs:
//! 1. `redirect::build_login_url()` constructs the provider authorization URL
//! 2. `redirect::generate_state()` produces the CSRF state parameter
//! 3. The UI drives the redirect and hands back the callback URL
//! 4. `redirect::parse_callback_fragment()` extracts the token material

pub mod redirect;

pub use redirect::{CallbackFields, build_login_url, generate_state, parse_callback_fragment};

use std::future::Future;
use std::pin::Pin;

/// Outcome of a successful interactive authorization.
///
/// `expires` is a unix timestamp in milliseconds (absolute, not a delta).
/// Prompter implementations convert the provider's `expires_in` seconds
/// delta at the moment the callback is received.
#[derive(Debug, Clone)]
pub struct AuthResult {
    /// Opaque access token issued by the provider
    pub access_token: String,
    /// Expiration as unix timestamp in milliseconds
    pub expires: u64,
}

/// Errors from the interactive authorization flow.
///
/// The session manager does not branch on the variant; every prompter
/// failure aborts the login the same way. The variants exist so callers
/// above the session manager can report what actually happened.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("authorization cancelled by the user")]
    Cancelled,

    #[error("authorization denied: {0}")]
    Denied(String),

    #[error("authorization transport failed: {0}")]
    Http(String),

    #[error("malformed authorization callback: {0}")]
    Callback(String),
}

/// Result alias for prompter operations.
pub type Result<T> = std::result::Result<T, PromptError>;

/// Abstraction over the interactive redirect-based authorization exchange.
///
/// `permissions` is the list of permission names the caller wants granted;
/// an empty slice requests only the provider's default grants.
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility
/// (`Arc<dyn AuthorizationPrompter>`).
pub trait AuthorizationPrompter: Send + Sync {
    /// Drive one interactive authorization and return the token material.
    fn prompt<'a>(
        &'a self,
        permissions: &'a [String],
    ) -> Pin<Box<dyn Future<Output = Result<AuthResult>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Prompter that answers from canned fields, proving the trait is
    /// dyn-compatible behind an `Arc`.
    struct CannedPrompter {
        expires: u64,
    }

    impl AuthorizationPrompter for CannedPrompter {
        fn prompt<'a>(
            &'a self,
            permissions: &'a [String],
        ) -> Pin<Box<dyn Future<Output = Result<AuthResult>> + Send + 'a>> {
            let expires = self.expires;
            Box::pin(async move {
                if permissions.iter().any(|p| p == "forbidden") {
                    return Err(PromptError::Denied("forbidden scope".into()));
                }
                Ok(AuthResult {
                    access_token: "at_canned".into(),
                    expires,
                })
            })
        }
    }

    #[tokio::test]
    async fn prompter_is_usable_as_trait_object() {
        let prompter: Arc<dyn AuthorizationPrompter> = Arc::new(CannedPrompter { expires: 42 });
        let result = prompter.prompt(&["email".into()]).await.unwrap();
        assert_eq!(result.access_token, "at_canned");
        assert_eq!(result.expires, 42);
    }

    #[tokio::test]
    async fn prompter_failures_surface() {
        let prompter: Arc<dyn AuthorizationPrompter> = Arc::new(CannedPrompter { expires: 0 });
        let err = prompter.prompt(&["forbidden".into()]).await.unwrap_err();
        assert!(matches!(err, PromptError::Denied(_)));
    }
}
