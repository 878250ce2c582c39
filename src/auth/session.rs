//! Session state persistence.
//!
//! A session is the backend's auth state cached locally: access token,
//! refresh token, user role, and the JSON-encoded permission list. Each
//! value lives under its own key so a token refresh can overwrite the
//! access token without touching the rest.
//!
//! Storage is behind the [`SessionStore`] trait and handed to
//! [`AuthService`](super::AuthService) explicitly. Implementations must
//! degrade gracefully when the backing storage is unavailable: reads
//! return `None` and writes become no-ops, never errors.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{debug, warn};

/// Fixed key names for the persisted session values.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const USER_ROLE: &str = "user_role";
    pub const USER_PERMISSIONS: &str = "user_permissions";

    /// Every key a logout must clear.
    pub const ALL: [&str; 4] = [ACCESS_TOKEN, REFRESH_TOKEN, USER_ROLE, USER_PERMISSIONS];
}

/// Key-value store for session state.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// File-backed store: one file per key under the state directory.
///
/// The directory is created lazily on first write, so a fresh install can
/// read session state (getting `None`) before anything exists on disk.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                debug!(key, error = %e, "session read failed");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            warn!(error = %e, "could not create session directory, value not persisted");
            return;
        }
        if let Err(e) = std::fs::write(self.key_path(key), value) {
            warn!(key, error = %e, "session write failed, value not persisted");
        }
    }

    fn remove(&self, key: &str) {
        match std::fs::remove_file(self.key_path(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(key, error = %e, "session remove failed"),
        }
    }
}

/// In-memory store for tests and environments without a home directory.
#[derive(Default)]
pub struct MemorySessionStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.values.lock() {
            Ok(values) => values.get(key).cloned(),
            Err(_) => None,
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.remove(key);
        }
    }
}
