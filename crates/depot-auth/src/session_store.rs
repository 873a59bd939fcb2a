//! Authentication session providers.
//!
//! [`StoredSession`] keeps the signed-in principal in the OS keychain, falling
//! back to `~/.depot/session.json` (mode 0600) when no keychain is available.
//! [`MemorySessionProvider`] holds it in process memory.

use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::AuthError;
use crate::principal::Principal;

const DEFAULT_KEYRING_SERVICE: &str = "depot-cli";
const KEYRING_USER: &str = "session";
const SESSION_FILE_NAME: &str = "session.json";

/// Source of the currently authenticated principal.
pub trait SessionProvider: Send + Sync {
    /// The signed-in principal, or `None` when there is no session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionStore` if the session cannot be read.
    fn current_principal(&self) -> Result<Option<Principal>, AuthError>;

    /// Start a new session for `email`, replacing any existing one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionStore` if the session cannot be persisted.
    fn sign_in(&self, email: &str) -> Result<Principal, AuthError>;

    /// End the current session. A no-op when nobody is signed in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionStore` if stored credentials cannot be removed.
    fn sign_out(&self) -> Result<(), AuthError>;
}

impl<P: SessionProvider + ?Sized> SessionProvider for Arc<P> {
    fn current_principal(&self) -> Result<Option<Principal>, AuthError> {
        (**self).current_principal()
    }

    fn sign_in(&self, email: &str) -> Result<Principal, AuthError> {
        (**self).sign_in(email)
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        (**self).sign_out()
    }
}

fn new_principal(email: &str) -> Result<Principal, AuthError> {
    Principal::new(email).map_err(|e| AuthError::SessionStore(format!("rng: {e}")))
}

// ---------------------------------------------------------------------------
// StoredSession
// ---------------------------------------------------------------------------

/// Session persisted across CLI invocations.
#[derive(Debug, Clone)]
pub struct StoredSession {
    /// Keyring service name; `None` disables the keychain tier.
    keyring_service: Option<String>,
    file: PathBuf,
}

impl StoredSession {
    /// Keychain first, then `~/.depot/session.json`.
    ///
    /// The keyring service defaults to `"depot-cli"`. Override via
    /// `DEPOT_KEYRING_SERVICE` for testing to avoid touching real credentials.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionStore` if the home directory is unknown.
    pub fn new() -> Result<Self, AuthError> {
        let service = std::env::var("DEPOT_KEYRING_SERVICE")
            .unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string());
        let file = dirs::home_dir()
            .map(|h| h.join(".depot").join(SESSION_FILE_NAME))
            .ok_or_else(|| {
                AuthError::SessionStore("home directory not found; cannot store session".into())
            })?;
        Ok(Self {
            keyring_service: Some(service),
            file,
        })
    }

    /// File-only storage at an explicit path.
    #[must_use]
    pub const fn file_only(file: PathBuf) -> Self {
        Self {
            keyring_service: None,
            file,
        }
    }

    fn entry(&self) -> Option<keyring::Entry> {
        let service = self.keyring_service.as_deref()?;
        match keyring::Entry::new(service, KEYRING_USER) {
            Ok(entry) => Some(entry),
            Err(error) => {
                tracing::debug!(%error, "keyring unavailable");
                None
            }
        }
    }

    fn store_file(&self, json: &str) -> Result<(), AuthError> {
        if let Some(parent) = self.file.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AuthError::SessionStore(format!("mkdir {}: {e}", parent.display())))?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                    tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
                }
            }
        }
        fs::write(&self.file, json)
            .map_err(|e| AuthError::SessionStore(format!("write {}: {e}", self.file.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.file, fs::Permissions::from_mode(0o600)).map_err(|e| {
                AuthError::SessionStore(format!("chmod {}: {e}", self.file.display()))
            })?;
        }
        Ok(())
    }

    fn load_file(&self) -> Option<String> {
        fs::read_to_string(&self.file)
            .ok()
            .filter(|s| !s.trim().is_empty())
    }
}

impl SessionProvider for StoredSession {
    fn current_principal(&self) -> Result<Option<Principal>, AuthError> {
        let stored = self
            .entry()
            .and_then(|entry| entry.get_password().ok())
            .filter(|s| !s.is_empty())
            .or_else(|| self.load_file());

        match stored {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| AuthError::SessionStore(format!("corrupt session: {e}"))),
            None => Ok(None),
        }
    }

    fn sign_in(&self, email: &str) -> Result<Principal, AuthError> {
        let principal = new_principal(email)?;
        let json = serde_json::to_string(&principal)
            .map_err(|e| AuthError::SessionStore(e.to_string()))?;

        // Clear both tiers first so a stale file cannot shadow a fresh keychain entry.
        self.sign_out()?;
        match self.entry().map(|entry| entry.set_password(&json)) {
            Some(Ok(())) => {}
            Some(Err(error)) => {
                tracing::warn!(%error, "keyring store failed; falling back to file");
                self.store_file(&json)?;
            }
            None => self.store_file(&json)?,
        }
        Ok(principal)
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        // May not exist.
        if let Some(entry) = self.entry() {
            let _ = entry.delete_credential();
        }
        if self.file.exists() {
            fs::remove_file(&self.file).map_err(|e| {
                AuthError::SessionStore(format!("failed to delete {}: {e}", self.file.display()))
            })?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemorySessionProvider
// ---------------------------------------------------------------------------

/// In-process session, used by tests and embedders with their own login flow.
#[derive(Debug, Default)]
pub struct MemorySessionProvider {
    current: Mutex<Option<Principal>>,
}

impl MemorySessionProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that already holds a session for `email`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionStore` if no session ID can be generated.
    pub fn signed_in(email: &str) -> Result<Self, AuthError> {
        Ok(Self {
            current: Mutex::new(Some(new_principal(email)?)),
        })
    }

    /// Replace the current principal verbatim.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SessionStore` if the lock is poisoned.
    pub fn restore(&self, principal: Principal) -> Result<(), AuthError> {
        *self.lock()? = Some(principal);
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<Principal>>, AuthError> {
        self.current
            .lock()
            .map_err(|_| AuthError::SessionStore("session lock poisoned".into()))
    }
}

impl SessionProvider for MemorySessionProvider {
    fn current_principal(&self) -> Result<Option<Principal>, AuthError> {
        Ok(self.lock()?.clone())
    }

    fn sign_in(&self, email: &str) -> Result<Principal, AuthError> {
        let principal = new_principal(email)?;
        *self.lock()? = Some(principal.clone());
        Ok(principal)
    }

    fn sign_out(&self) -> Result<(), AuthError> {
        *self.lock()? = None;
        Ok(())
    }
}
