//! Durable client storage for the session pair (bearer token + user blob).
//!
//! Reads and writes are synchronous and unbatched. The token and the user
//! are two independent entries; nothing makes a write of both atomic.

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

use parking_lot::Mutex;
use seija_shared::Session;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key/value storage that outlives one run of the application.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage, gone when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// One file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!("failed to read session entry {}: {err}", path.display());
                None
            },
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|source| StorageError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.entry_path(key);
        fs::write(&path, value).map_err(|source| StorageError::Io {
            path,
            source,
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                path,
                source,
            }),
        }
    }
}

/// What the storage held at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistedSession {
    Present {
        token: String,
        session: Session,
    },
    Absent,
    /// A user blob exists but does not decode.
    Malformed(String),
}

pub fn load_session(storage: &dyn SessionStorage) -> PersistedSession {
    let token = storage.get(TOKEN_KEY).filter(|token| !token.is_empty());
    let user = storage.get(USER_KEY);
    match (token, user) {
        (Some(token), Some(user)) => match serde_json::from_str::<Session>(&user) {
            Ok(session) => PersistedSession::Present {
                token,
                session,
            },
            Err(err) => PersistedSession::Malformed(err.to_string()),
        },
        (None, Some(user)) if serde_json::from_str::<Session>(&user).is_err() => {
            PersistedSession::Malformed("user entry without token does not decode".to_string())
        },
        _ => PersistedSession::Absent,
    }
}

/// Token first, then the user blob.
pub fn persist_session(
    storage: &dyn SessionStorage,
    token: &str,
    session: &Session,
) -> Result<(), StorageError> {
    storage.set(TOKEN_KEY, token)?;
    persist_user(storage, session)
}

pub fn persist_user(storage: &dyn SessionStorage, session: &Session) -> Result<(), StorageError> {
    let blob = serde_json::to_string(session)?;
    storage.set(USER_KEY, &blob)
}

/// Remove both entries. The second removal is attempted even if the first
/// one fails; the first error is returned.
pub fn clear_session(storage: &dyn SessionStorage) -> Result<(), StorageError> {
    let token = storage.remove(TOKEN_KEY);
    let user = storage.remove(USER_KEY);
    token.and(user)
}
