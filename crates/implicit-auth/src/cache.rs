//! Credential cache contract and file-backed store
//!
//! The session manager treats the cache as a single-slot store scoped to
//! the current user context: one credential, or nothing. Multi-user
//! keying, encryption, and the storage medium are the implementation's
//! concern, not the contract's.
//!
//! `FileCredentialStore` is the default implementation: a JSON file whose
//! writes use atomic temp-file + rename to prevent corruption on crash.
//! A tokio Mutex serializes concurrent writes. The file is the single
//! source of truth across process restarts.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::credential::Credential;
use crate::error::CacheError;

/// Single-slot credential storage consumed by the session manager.
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility
/// (`Arc<dyn CredentialCache>`).
pub trait CredentialCache: Send + Sync {
    /// Read the cached credential, if any.
    fn get(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Credential>, CacheError>> + Send + '_>>;

    /// Store the credential, replacing any previous one.
    fn save<'a>(
        &'a self,
        credential: &'a Credential,
    ) -> Pin<Box<dyn Future<Output = Result<(), CacheError>> + Send + 'a>>;

    /// Remove the cached credential. Clearing an empty slot succeeds.
    fn clear(&self) -> Pin<Box<dyn Future<Output = Result<(), CacheError>> + Send + '_>>;
}

/// File-backed single-slot credential store.
///
/// The Mutex serializes all access. Reads acquire the lock briefly to
/// clone the in-memory slot, so they don't race in-flight writes.
pub struct FileCredentialStore {
    path: PathBuf,
    slot: Mutex<Option<Credential>>,
}

impl FileCredentialStore {
    /// Load the store from the given file path.
    ///
    /// If the file doesn't exist, creates it with an empty slot (cold
    /// start: the next login will run the interactive flow).
    pub async fn load(path: PathBuf) -> Result<Self, CacheError> {
        let slot = if path.exists() {
            let contents = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| CacheError::Io(format!("reading credential file: {e}")))?;
            let slot: Option<Credential> = serde_json::from_str(&contents)
                .map_err(|e| CacheError::Parse(format!("parsing credential file: {e}")))?;
            info!(path = %path.display(), cached = slot.is_some(), "loaded credential cache");
            slot
        } else {
            info!(path = %path.display(), "credential file not found, starting empty");
            // Create the empty file so future loads don't need the cold-start path
            write_atomic(&path, &None).await?;
            None
        };

        Ok(Self {
            path,
            slot: Mutex::new(slot),
        })
    }
}

impl CredentialCache for FileCredentialStore {
    fn get(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Option<Credential>, CacheError>> + Send + '_>> {
        Box::pin(async move {
            let slot = self.slot.lock().await;
            Ok(slot.clone())
        })
    }

    fn save<'a>(
        &'a self,
        credential: &'a Credential,
    ) -> Pin<Box<dyn Future<Output = Result<(), CacheError>> + Send + 'a>> {
        Box::pin(async move {
            // Never persist a credential without a resolved subject
            if credential.subject_id.is_empty() {
                return Err(CacheError::Invalid("credential has no subject id".into()));
            }
            let mut slot = self.slot.lock().await;
            *slot = Some(credential.clone());
            debug!(subject_id = %credential.subject_id, "saved credential");
            write_atomic(&self.path, &slot).await
        })
    }

    fn clear(&self) -> Pin<Box<dyn Future<Output = Result<(), CacheError>> + Send + '_>> {
        Box::pin(async move {
            let mut slot = self.slot.lock().await;
            if slot.take().is_some() {
                debug!("cleared credential");
            }
            write_atomic(&self.path, &slot).await
        })
    }
}

/// Write the slot to a file atomically.
///
/// Writes to a temporary file in the same directory, then renames it over
/// the target. This prevents corruption if the process crashes mid-write.
/// Sets file permissions to 0600 (owner read/write only) since the file
/// contains an access token.
async fn write_atomic(path: &Path, slot: &Option<Credential>) -> Result<(), CacheError> {
    let json = serde_json::to_string_pretty(slot)
        .map_err(|e| CacheError::Parse(format!("serializing credential: {e}")))?;

    let dir = path
        .parent()
        .ok_or_else(|| CacheError::Io("credential path has no parent directory".into()))?;

    let tmp_path = dir.join(format!(".credential.tmp.{}", std::process::id()));

    tokio::fs::write(&tmp_path, json.as_bytes())
        .await
        .map_err(|e| CacheError::Io(format!("writing temp credential file: {e}")))?;

    // Set 0600 permissions (unix only)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        tokio::fs::set_permissions(&tmp_path, perms)
            .await
            .map_err(|e| CacheError::Io(format!("setting credential file permissions: {e}")))?;
    }

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| CacheError::Io(format!("renaming temp credential file: {e}")))?;

    debug!(path = %path.display(), "persisted credential cache");
    Ok(())
}
