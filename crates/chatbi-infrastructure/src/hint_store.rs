//! File-backed remembered-session hint store.
//!
//! Persists the id of the last active session so the conversation
//! controller can offer it as the first recovery strategy after a
//! restart. The hint is advisory: losing or corrupting this file only
//! costs the recovery shortcut, never data.

use crate::atomic_file::AtomicTomlFile;
use crate::paths::ChatBiPaths;
use chatbi_core::capability::SessionHintStore;
use chatbi_core::{ChatBiError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Client-local state persisted across restarts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientState {
    /// Id of the session to offer on startup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remembered_session_id: Option<String>,
}

/// [`SessionHintStore`] backed by a TOML file.
///
/// State is cached in memory; reads never touch the disk after startup,
/// writes go through the atomic file helper on a blocking task.
#[derive(Clone)]
pub struct FileHintStore {
    state: Arc<Mutex<ClientState>>,
    file: Arc<Mutex<AtomicTomlFile<ClientState>>>,
}

impl FileHintStore {
    /// Opens the hint store at the given path, loading existing state.
    ///
    /// A missing or unreadable file yields default (empty) state: the
    /// hint is advisory, so a corrupt file must not fail startup.
    pub fn new(path: PathBuf) -> Self {
        let file = AtomicTomlFile::new(path);
        let state = match file.load() {
            Ok(state) => state.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(target: "hint_store", "ignoring unreadable client state file: {e}");
                ClientState::default()
            }
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            file: Arc::new(Mutex::new(file)),
        }
    }

    /// Opens the hint store at the default client state path.
    pub fn new_default() -> Result<Self> {
        Ok(Self::new(ChatBiPaths::state_file()?))
    }

    async fn save_state(&self, state: ClientState) -> Result<()> {
        {
            let mut cached = self.state.lock().await;
            *cached = state.clone();
        }

        let file = self.file.clone();
        tokio::task::spawn_blocking(move || {
            let file = file.blocking_lock();
            file.save(&state)
        })
        .await
        .map_err(|e| ChatBiError::internal(format!("Failed to join task: {}", e)))??;

        Ok(())
    }
}

#[async_trait::async_trait]
impl SessionHintStore for FileHintStore {
    async fn get_remembered_session(&self) -> Option<String> {
        self.state.lock().await.remembered_session_id.clone()
    }

    async fn set_remembered_session(&self, session_id: &str) -> Result<()> {
        let mut state = self.state.lock().await.clone();
        state.remembered_session_id = Some(session_id.to_string());
        self.save_state(state).await
    }

    async fn clear_remembered_session(&self) -> Result<()> {
        let mut state = self.state.lock().await.clone();
        state.remembered_session_id = None;
        self.save_state(state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_default_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileHintStore::new(temp_dir.path().join("state.toml"));
        assert!(store.get_remembered_session().await.is_none());
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileHintStore::new(temp_dir.path().join("state.toml"));
        store.set_remembered_session("s-42").await.unwrap();
        assert_eq!(
            store.get_remembered_session().await,
            Some("s-42".to_string())
        );
    }

    #[tokio::test]
    async fn test_survives_restart() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.toml");

        let store = FileHintStore::new(path.clone());
        store.set_remembered_session("s-7").await.unwrap();
        drop(store);

        let reopened = FileHintStore::new(path);
        assert_eq!(
            reopened.get_remembered_session().await,
            Some("s-7".to_string())
        );
    }

    #[tokio::test]
    async fn test_clear() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileHintStore::new(temp_dir.path().join("state.toml"));
        store.set_remembered_session("s-1").await.unwrap();
        store.clear_remembered_session().await.unwrap();
        assert!(store.get_remembered_session().await.is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("state.toml");
        std::fs::write(&path, "not [valid toml").unwrap();

        let store = FileHintStore::new(path.clone());
        assert!(store.get_remembered_session().await.is_none());

        // The store stays usable: the next save replaces the bad file.
        store.set_remembered_session("s-9").await.unwrap();
        let reopened = FileHintStore::new(path);
        assert_eq!(
            reopened.get_remembered_session().await,
            Some("s-9".to_string())
        );
    }
}
