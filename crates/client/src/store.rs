use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use parlor_api::{AuthToken, UserId};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, Snafu};

use crate::session::Credentials;

pub const SESSION_FILE_NAME: &str = "session.json";

/// Durable key-value storage for the two session entries.
pub trait SessionStore: Send + Sync {
    /// Returns credentials only when both entries are present and well-formed.
    fn load(&self) -> Option<Credentials>;
    fn save(&self, credentials: &Credentials) -> Result<(), SessionStoreError>;
    fn clear(&self) -> Result<(), SessionStoreError>;
}

/// On-disk shape: both values are strings.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredEntries {
    #[serde(rename = "authToken", default)]
    auth_token: Option<String>,
    #[serde(rename = "userId", default)]
    user_id: Option<String>,
}

impl StoredEntries {
    fn from_credentials(credentials: &Credentials) -> Self {
        Self {
            auth_token: Some(credentials.token.as_str().to_string()),
            user_id: Some(credentials.user_id.to_string()),
        }
    }

    fn into_credentials(self) -> Option<Credentials> {
        let token = self.auth_token.filter(|token| !token.trim().is_empty())?;
        let user_id = self.user_id?.trim().parse::<i64>().ok()?;
        Some(Credentials::new(AuthToken::new(token), UserId::new(user_id)))
    }
}

/// JSON file store, replaced atomically on every save.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<Credentials> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no stored session at {:?}", self.path);
                return None;
            }
            Err(error) => {
                tracing::warn!("failed to read stored session at {:?}: {}", self.path, error);
                return None;
            }
        };

        match serde_json::from_str::<StoredEntries>(&content) {
            Ok(entries) => entries.into_credentials(),
            Err(error) => {
                tracing::warn!(
                    "failed to parse stored session at {:?}: {}. starting signed out",
                    self.path,
                    error
                );
                None
            }
        }
    }

    fn save(&self, credentials: &Credentials) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context(CreateDirSnafu {
                stage: "create-session-directory",
                path: parent.to_path_buf(),
            })?;
        }

        let content = serde_json::to_string_pretty(&StoredEntries::from_credentials(credentials))
            .context(SerializeSnafu {
                stage: "serialize-session-json",
            })?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, content).context(WriteFileSnafu {
            stage: "write-temporary-session-file",
            path: temp_path.clone(),
        })?;

        std::fs::rename(&temp_path, &self.path).context(RenameTempFileSnafu {
            stage: "rename-temporary-session-file",
            from: temp_path,
            to: self.path.clone(),
        })?;

        tracing::debug!("saved session to {:?}", self.path);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionStoreError::RemoveFile {
                stage: "remove-session-file",
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Process-local store; nothing survives a restart.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<Option<Credentials>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            entries: Mutex::new(Some(credentials)),
        }
    }

    // A panic elsewhere while holding the lock leaves a whole `Option`.
    fn entries(&self) -> MutexGuard<'_, Option<Credentials>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<Credentials> {
        self.entries().clone()
    }

    fn save(&self, credentials: &Credentials) -> Result<(), SessionStoreError> {
        *self.entries() = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        *self.entries() = None;
        Ok(())
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SessionStoreError {
    #[snafu(display("failed to create session directory at {path:?} on `{stage}`: {source}"))]
    CreateDir {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("failed to serialize session on `{stage}`: {source}"))]
    Serialize {
        stage: &'static str,
        source: serde_json::Error,
    },
    #[snafu(display("failed to write session file at {path:?} on `{stage}`: {source}"))]
    WriteFile {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display(
        "failed to replace session file from {from:?} to {to:?} on `{stage}`: {source}"
    ))]
    RenameTempFile {
        stage: &'static str,
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("failed to remove session file at {path:?} on `{stage}`: {source}"))]
    RemoveFile {
        stage: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new(AuthToken::new("tok-1"), UserId::new(42))
    }

    #[test]
    fn file_store_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join(SESSION_FILE_NAME));

        assert_eq!(store.load(), None);
        store.save(&credentials()).unwrap();
        assert_eq!(store.load(), Some(credentials()));

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["authToken"], "tok-1");
        assert_eq!(raw["userId"], "42");

        store.clear().unwrap();
        assert_eq!(store.load(), None);
        store.clear().unwrap();
    }

    #[test]
    fn half_written_session_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SESSION_FILE_NAME);

        std::fs::write(&path, r#"{"authToken": "tok-1"}"#).unwrap();
        assert_eq!(FileSessionStore::new(&path).load(), None);

        std::fs::write(&path, r#"{"authToken": "tok-1", "userId": "not-a-number"}"#).unwrap();
        assert_eq!(FileSessionStore::new(&path).load(), None);

        std::fs::write(&path, "{ garbage").unwrap();
        assert_eq!(FileSessionStore::new(&path).load(), None);
    }

    #[test]
    fn memory_store_holds_one_session() {
        let store = MemorySessionStore::new();
        assert_eq!(store.load(), None);
        store.save(&credentials()).unwrap();
        assert_eq!(store.load(), Some(credentials()));
        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn memory_store_keeps_writing_after_a_panicked_holder() {
        let store = std::sync::Arc::new(MemorySessionStore::new());
        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.entries.lock().unwrap();
            panic!("holder panicked");
        })
        .join();
        assert!(store.entries.is_poisoned());

        store.save(&credentials()).unwrap();
        assert_eq!(store.load(), Some(credentials()));
        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }
}
