//! Session lifecycle state machine
//!
//! One `SessionManager` instance owns one "current" credential. Login
//! decides between silent reuse of the cached credential and a fresh
//! interactive authorization; logout tears the session down. Nothing
//! here is static or ambient: two manager instances share no state
//! unless they are handed the same collaborators.
//!
//! Renewal decision on login with a cached credential:
//! prompt again iff `force`, or a requested permission is missing from
//! the granted set, or the token has expired. Otherwise the cached
//! credential is reused without user interaction.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use implicit_auth::{Credential, CredentialCache, ProfileLookup, now_millis, permissions};
use prompter::AuthorizationPrompter;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Orchestrates login/logout against the prompter, profile lookup, and
/// credential cache collaborators.
pub struct SessionManager {
    cache: Arc<dyn CredentialCache>,
    prompter: Arc<dyn AuthorizationPrompter>,
    profile: Arc<dyn ProfileLookup>,
    login_in_progress: AtomicBool,
    current: RwLock<Option<Credential>>,
    changes: watch::Sender<Option<Credential>>,
}

/// Scoped release of the in-flight-login flag.
///
/// Dropping the guard clears the flag, so every exit path — success,
/// error, or cancellation of the login future — releases it.
struct LoginGuard<'a>(&'a AtomicBool);

impl<'a> LoginGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for LoginGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SessionManager {
    pub fn new(
        cache: Arc<dyn CredentialCache>,
        prompter: Arc<dyn AuthorizationPrompter>,
        profile: Arc<dyn ProfileLookup>,
    ) -> Self {
        let (changes, _) = watch::channel(None);
        Self {
            cache,
            prompter,
            profile,
            login_in_progress: AtomicBool::new(false),
            current: RwLock::new(None),
            changes,
        }
    }

    /// Log the user in, reusing the cached credential when possible.
    ///
    /// `permissions` is the list of permission names the caller needs;
    /// an empty slice requests no specific permissions. `force` bypasses
    /// cache reuse and always runs the interactive flow.
    ///
    /// At most one interactive prompt per call, and exactly one cache
    /// write per call — a reused credential is re-saved so the
    /// permission union is persisted.
    pub async fn login(&self, permissions: &[String], force: bool) -> Result<Credential> {
        let _guard =
            LoginGuard::acquire(&self.login_in_progress).ok_or(Error::ConcurrentLogin)?;

        let mut credential = match self.cache.get().await? {
            None => {
                debug!("no cached credential, starting interactive authorization");
                let auth = self.prompter.prompt(permissions).await?;
                let subject_id = self.profile.fetch_subject_id(&auth.access_token).await?;
                info!(subject_id = %subject_id, "authenticated new subject");
                Credential::new(auth.access_token, auth.expires, subject_id)
            }
            Some(mut credential) => {
                let new_permissions = !permissions.is_empty()
                    && !permissions::is_subset(permissions, &credential.granted_permissions);
                let expired = credential.is_expired(now_millis());

                if force || new_permissions || expired {
                    info!(force, new_permissions, expired, "re-authorizing cached session");
                    let auth = self.prompter.prompt(permissions).await?;
                    credential.renew(auth.access_token, auth.expires);
                } else {
                    debug!(subject_id = %credential.subject_id, "reusing cached credential");
                }
                credential
            }
        };

        if !permissions.is_empty() {
            credential.grant(permissions.iter().cloned());
        }

        self.cache.save(&credential).await?;
        *self.current.write().await = Some(credential.clone());
        self.changes.send_replace(Some(credential.clone()));
        Ok(credential)
    }

    /// Log the user out.
    ///
    /// Attempts to clear the cache entry, then clears the current
    /// session unconditionally. A cache failure surfaces only after the
    /// current session is gone — a caller never observes a stale
    /// session after logout.
    pub async fn logout(&self) -> Result<()> {
        let cleared = self.cache.clear().await;

        *self.current.write().await = None;
        self.changes.send_replace(None);
        info!("logged out");

        cleared?;
        Ok(())
    }

    /// Snapshot of the current session, if any.
    pub async fn current(&self) -> Option<Credential> {
        self.current.read().await.clone()
    }

    /// Observe credential changes (login, renewal, logout).
    ///
    /// The receiver sees `Some` after each successful login and `None`
    /// after logout.
    pub fn subscribe(&self) -> watch::Receiver<Option<Credential>> {
        self.changes.subscribe()
    }
}
