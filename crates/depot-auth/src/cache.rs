//! Session role cache.
//!
//! One entry per authentication session, holding the last resolved identity
//! and when it was resolved. The cache is a performance layer only: entries
//! older than the revalidation window are ignored, and privileged mutations
//! additionally require a recent resolution (see [`crate::Authorized::is_fresh`]).

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use depot_core::entities::Identity;

use crate::error::AuthError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedIdentity {
    pub identity: Identity,
    pub resolved_at: DateTime<Utc>,
}

/// Backing storage shared by every session's cache.
#[derive(Debug, Clone)]
pub enum RoleCacheStore {
    /// One JSON file per session under this directory.
    Directory(PathBuf),
    Memory(Arc<Mutex<HashMap<String, CachedIdentity>>>),
}

impl RoleCacheStore {
    #[must_use]
    pub fn memory() -> Self {
        Self::Memory(Arc::default())
    }

    /// Cache view scoped to one session.
    #[must_use]
    pub fn for_session(&self, session_id: &str) -> SessionRoleCache {
        SessionRoleCache {
            store: self.clone(),
            session_id: session_id.to_string(),
        }
    }
}

/// `get` / `set` / `invalidate` over one session's entry.
#[derive(Debug, Clone)]
pub struct SessionRoleCache {
    store: RoleCacheStore,
    session_id: String,
}

impl SessionRoleCache {
    fn file(&self, dir: &std::path::Path) -> Result<PathBuf, AuthError> {
        if self.session_id.is_empty()
            || !self
                .session_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(AuthError::Cache(format!(
                "invalid session id {:?}",
                self.session_id
            )));
        }
        Ok(dir.join(format!("{}.json", self.session_id)))
    }

    fn lock(
        map: &Mutex<HashMap<String, CachedIdentity>>,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, CachedIdentity>>, AuthError> {
        map.lock()
            .map_err(|_| AuthError::Cache("cache lock poisoned".into()))
    }

    /// The cached entry, if any. An unreadable entry is discarded and reported
    /// as a miss.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Cache` if the backing file cannot be read.
    pub fn get(&self) -> Result<Option<CachedIdentity>, AuthError> {
        match &self.store {
            RoleCacheStore::Memory(map) => Ok(Self::lock(map)?.get(&self.session_id).cloned()),
            RoleCacheStore::Directory(dir) => {
                let path = self.file(dir)?;
                let raw = match fs::read_to_string(&path) {
                    Ok(raw) => raw,
                    Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                    Err(e) => {
                        return Err(AuthError::Cache(format!("read {}: {e}", path.display())));
                    }
                };
                match serde_json::from_str(&raw) {
                    Ok(entry) => Ok(Some(entry)),
                    Err(error) => {
                        tracing::debug!(%error, path = %path.display(), "discarding unreadable cache entry");
                        self.invalidate()?;
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Store `identity` as resolved at `resolved_at`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Cache` if the entry cannot be written.
    pub fn set(&self, identity: &Identity, resolved_at: DateTime<Utc>) -> Result<(), AuthError> {
        let entry = CachedIdentity {
            identity: identity.clone(),
            resolved_at,
        };
        match &self.store {
            RoleCacheStore::Memory(map) => {
                Self::lock(map)?.insert(self.session_id.clone(), entry);
                Ok(())
            }
            RoleCacheStore::Directory(dir) => {
                let path = self.file(dir)?;
                fs::create_dir_all(dir)
                    .map_err(|e| AuthError::Cache(format!("mkdir {}: {e}", dir.display())))?;
                let json =
                    serde_json::to_string(&entry).map_err(|e| AuthError::Cache(e.to_string()))?;
                fs::write(&path, json)
                    .map_err(|e| AuthError::Cache(format!("write {}: {e}", path.display())))?;
                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).map_err(
                        |e| AuthError::Cache(format!("chmod {}: {e}", path.display())),
                    )?;
                }
                Ok(())
            }
        }
    }

    /// Drop the entry. A no-op when nothing is cached.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Cache` if an existing entry cannot be removed.
    pub fn invalidate(&self) -> Result<(), AuthError> {
        match &self.store {
            RoleCacheStore::Memory(map) => {
                Self::lock(map)?.remove(&self.session_id);
                Ok(())
            }
            RoleCacheStore::Directory(dir) => {
                let path = self.file(dir)?;
                match fs::remove_file(&path) {
                    Ok(()) => Ok(()),
                    Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                    Err(e) => Err(AuthError::Cache(format!("remove {}: {e}", path.display()))),
                }
            }
        }
    }
}
