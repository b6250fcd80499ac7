//! The cached credential: proof of authentication plus granted permissions
//!
//! A credential is created once per authenticated subject and then mutated
//! in place: token/expiry are replaced on renewal, the permission set only
//! ever grows. The subject id is set at creation and never changes for the
//! lifetime of one cached credential identity.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A single user's cached session credential.
///
/// `expires` is a unix timestamp in milliseconds (absolute, not a delta).
/// Computed at acquisition time from the provider's `expires_in` seconds
/// delta plus the current time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Current access token (Bearer token for provider API calls)
    pub access_token: String,
    /// Expiration as unix timestamp in milliseconds
    pub expires: u64,
    /// Stable identifier of the authenticated principal
    pub subject_id: String,
    /// Permission names known to be granted. Union-only: successive logins
    /// add to this set, nothing in the core ever removes from it.
    #[serde(default)]
    pub granted_permissions: BTreeSet<String>,
}

impl Credential {
    /// Build a freshly authorized credential with an empty grant set.
    pub fn new(access_token: String, expires: u64, subject_id: String) -> Self {
        Self {
            access_token,
            expires,
            subject_id,
            granted_permissions: BTreeSet::new(),
        }
    }

    /// Whether the token must not be used for new operations.
    pub fn is_expired(&self, now_millis: u64) -> bool {
        self.expires <= now_millis
    }

    /// Replace token material after a renewal. Subject id and granted
    /// permissions are untouched.
    pub fn renew(&mut self, access_token: String, expires: u64) {
        self.access_token = access_token;
        self.expires = expires;
    }

    /// Union the given permissions into the granted set.
    pub fn grant<I>(&mut self, permissions: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.granted_permissions.extend(permissions);
    }
}

/// Current wall-clock time as unix milliseconds.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
