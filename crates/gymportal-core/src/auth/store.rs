//! Persistence for the session token and the cached profile.
//!
//! Every store keeps exactly two values. `save` writes both under one lock,
//! so no reader sees a token paired with another login's profile. `clear`
//! is idempotent and reports whether a token was actually removed.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use keyring::Entry;
use tracing::{debug, warn};

use crate::models::UserProfile;

/// Token file name in the cache directory.
pub const TOKEN_FILE: &str = "auth_token";

/// Profile snapshot file name in the cache directory.
pub const PROFILE_FILE: &str = "user_data.json";

const KEYRING_SERVICE: &str = "gymportal";
const KEYRING_USER: &str = "auth_token";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredSession {
    pub token: Option<String>,
    /// May be missing even when a token is present.
    pub profile: Option<UserProfile>,
}

pub trait SessionStore: Send + Sync {
    /// Overwrite both the token and the profile.
    fn save(&self, token: &str, profile: &UserProfile) -> Result<()>;

    fn load(&self) -> StoredSession;

    fn load_token(&self) -> Option<String>;

    /// Replace the profile only; the token is left as is.
    fn save_profile(&self, profile: &UserProfile) -> Result<()>;

    /// Remove both values. Returns true if a token was removed.
    fn clear(&self) -> bool;
}

fn guard(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

fn write_profile(path: &Path, profile: &UserProfile) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create session directory")?;
    }
    let contents = serde_json::to_string(profile).context("Failed to serialize profile")?;
    std::fs::write(path, contents).context("Failed to write profile file")?;
    Ok(())
}

fn read_profile(path: &Path) -> Option<UserProfile> {
    if !path.exists() {
        return None;
    }
    let parsed = std::fs::read_to_string(path)
        .context("Failed to read profile file")
        .and_then(|contents| serde_json::from_str(&contents).context("Failed to parse profile file"));
    match parsed {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!(error = %e, "Ignoring unreadable cached profile");
            None
        }
    }
}

/// Returns true if the file existed and is now gone.
fn remove_file(path: &Path) -> bool {
    match std::fs::remove_file(path) {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            warn!(error = %e, path = %path.display(), "Failed to remove session file");
            false
        }
    }
}

/// Token and profile as two files in the cache directory.
pub struct FileSessionStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            lock: Mutex::new(()),
        }
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn profile_path(&self) -> PathBuf {
        self.dir.join(PROFILE_FILE)
    }

    fn read_token(&self) -> Option<String> {
        let token = std::fs::read_to_string(self.token_path()).ok()?;
        let token = token.trim();
        (!token.is_empty()).then(|| token.to_string())
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, token: &str, profile: &UserProfile) -> Result<()> {
        let _guard = guard(&self.lock);
        std::fs::create_dir_all(&self.dir).context("Failed to create session directory")?;
        std::fs::write(self.token_path(), token).context("Failed to write token file")?;
        write_profile(&self.profile_path(), profile)?;
        debug!("Session saved");
        Ok(())
    }

    fn load(&self) -> StoredSession {
        let _guard = guard(&self.lock);
        StoredSession {
            token: self.read_token(),
            profile: read_profile(&self.profile_path()),
        }
    }

    fn load_token(&self) -> Option<String> {
        let _guard = guard(&self.lock);
        self.read_token()
    }

    fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        let _guard = guard(&self.lock);
        write_profile(&self.profile_path(), profile)
    }

    fn clear(&self) -> bool {
        let _guard = guard(&self.lock);
        let had_token = remove_file(&self.token_path());
        remove_file(&self.profile_path());
        had_token
    }
}

/// Token in the OS keychain, profile in the cache directory.
pub struct KeyringSessionStore {
    entry: Entry,
    profile_path: PathBuf,
    lock: Mutex<()>,
}

impl KeyringSessionStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        let entry = Entry::new(KEYRING_SERVICE, KEYRING_USER).context("Failed to create keyring entry")?;
        Ok(Self {
            entry,
            profile_path: dir.join(PROFILE_FILE),
            lock: Mutex::new(()),
        })
    }

    fn read_token(&self) -> Option<String> {
        match self.entry.get_password() {
            Ok(token) if !token.is_empty() => Some(token),
            Ok(_) | Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read token from keychain");
                None
            }
        }
    }
}

impl SessionStore for KeyringSessionStore {
    fn save(&self, token: &str, profile: &UserProfile) -> Result<()> {
        let _guard = guard(&self.lock);
        self.entry
            .set_password(token)
            .context("Failed to store token in keychain")?;
        write_profile(&self.profile_path, profile)
    }

    /// A profile whose token is no longer in the keychain is discarded.
    fn load(&self) -> StoredSession {
        let _guard = guard(&self.lock);
        let Some(token) = self.read_token() else {
            if remove_file(&self.profile_path) {
                debug!("Removed cached profile left without a keychain token");
            }
            return StoredSession::default();
        };
        StoredSession {
            token: Some(token),
            profile: read_profile(&self.profile_path),
        }
    }

    fn load_token(&self) -> Option<String> {
        let _guard = guard(&self.lock);
        self.read_token()
    }

    fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        let _guard = guard(&self.lock);
        write_profile(&self.profile_path, profile)
    }

    fn clear(&self) -> bool {
        let _guard = guard(&self.lock);
        let had_token = match self.entry.delete_credential() {
            Ok(()) => true,
            Err(keyring::Error::NoEntry) => false,
            Err(e) => {
                warn!(error = %e, "Failed to delete token from keychain");
                false
            }
        };
        remove_file(&self.profile_path);
        had_token
    }
}

/// Process-local store.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<StoredSession>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token, as if left over from an earlier run.
    pub fn with_token(token: &str) -> Self {
        Self {
            inner: Mutex::new(StoredSession {
                token: Some(token.to_string()),
                profile: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoredSession> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, token: &str, profile: &UserProfile) -> Result<()> {
        let mut inner = self.lock();
        inner.token = Some(token.to_string());
        inner.profile = Some(profile.clone());
        Ok(())
    }

    fn load(&self) -> StoredSession {
        self.lock().clone()
    }

    fn load_token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        self.lock().profile = Some(profile.clone());
        Ok(())
    }

    fn clear(&self) -> bool {
        let mut inner = self.lock();
        inner.profile = None;
        inner.token.take().is_some()
    }
}
