//! Authentication: where the session lives and who owns it.
//!
//! - `SessionStore`: persists the bearer token and a cached profile
//!   (file, OS keychain, or memory)
//! - `SessionService`: the auth context pages consult; runs the startup
//!   check, login and sign-out
//!
//! No expiry is tracked locally. A session ends on sign-out or on the
//! first 401 from the backend.

pub mod session;
pub mod store;

pub use session::{AuthSnapshot, SessionService, LOGIN_FAILED_MESSAGE, LOGIN_SUCCESS_MESSAGE};
pub use store::{FileSessionStore, KeyringSessionStore, MemorySessionStore, SessionStore, StoredSession};

use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;

/// The store selected by `secure_token_storage`.
pub fn store_for(config: &Config) -> Result<Arc<dyn SessionStore>> {
    let dir = config.cache_dir()?;
    if config.secure_token_storage {
        Ok(Arc::new(KeyringSessionStore::new(dir)?))
    } else {
        Ok(Arc::new(FileSessionStore::new(dir)))
    }
}
