//! Session persistence as an explicit capability.
//!
//! The stored session is a single token string plus the role derived from it,
//! written at most once per successful auth exchange and read once per
//! protected-view load. Stores are injected rather than accessed as ambient
//! globals so flows can be tested against an in-memory fake.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Storage key for the compact session token.
pub const AUTH_TOKEN_KEY: &str = "authToken";
/// Storage key for the role derived from the token.
pub const USER_ROLE_KEY: &str = "userRole";

pub trait SessionStore {
    /// Stored value for `key`, `None` when absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Persist `value` under `key`.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the whole session.
    ///
    /// # Errors
    /// Returns an error if the backing storage cannot be cleared.
    fn clear(&self) -> Result<()>;
}

/// In-memory store for tests and short-lived flows.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries().clear();
        Ok(())
    }
}

/// Plain-text JSON file store, the native stand-in for browser local storage.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    // Unreadable or corrupt files behave like an empty session.
    fn read_entries(&self) -> Map<String, Value> {
        std::fs::read(&self.path)
            .ok()
            .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok())
            .and_then(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .unwrap_or_default()
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_entries()
            .get(key)
            .and_then(Value::as_str)
            .map(ToString::to_string)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_entries();
        entries.insert(key.to_string(), Value::String(value.to_string()));

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create session directory {}", parent.display())
                })?;
            }
        }

        let serialized = serde_json::to_vec_pretty(&Value::Object(entries))?;
        std::fs::write(&self.path, serialized)
            .with_context(|| format!("failed to write session file {}", self.path.display()))
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| {
                format!("failed to remove session file {}", self.path.display())
            }),
        }
    }
}
