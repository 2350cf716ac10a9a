//! File-based Session Storage Adapter
//!
//! Stores each session's conversation state as a YAML file on disk,
//! one directory per session id.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::SessionId;
use crate::domain::intake::ConversationState;
use crate::ports::{SessionStateStorage, SessionStorageError};

/// File-based storage for conversation state
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    base_path: PathBuf,
}

impl FileSessionStorage {
    /// Create a new file storage with a base directory
    ///
    /// # Example
    /// ```ignore
    /// let storage = FileSessionStorage::new("./data/sessions");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the directory path for a specific session
    fn session_dir(&self, session_id: SessionId) -> PathBuf {
        self.base_path.join(session_id.to_string())
    }

    /// Get the state file path for a session
    fn state_file_path(&self, session_id: SessionId) -> PathBuf {
        self.session_dir(session_id).join("state.yaml")
    }

    async fn ensure_dir(&self, path: &Path) -> Result<(), SessionStorageError> {
        fs::create_dir_all(path)
            .await
            .map_err(|e| SessionStorageError::IoError(e.to_string()))
    }

    async fn file_exists(path: &Path) -> Result<bool, SessionStorageError> {
        fs::try_exists(path)
            .await
            .map_err(|e| SessionStorageError::IoError(e.to_string()))
    }
}

#[async_trait]
impl SessionStateStorage for FileSessionStorage {
    async fn save_state(
        &self,
        session_id: SessionId,
        state: &ConversationState,
    ) -> Result<(), SessionStorageError> {
        let dir = self.session_dir(session_id);
        self.ensure_dir(&dir).await?;

        let yaml = serde_yaml::to_string(state)
            .map_err(|e| SessionStorageError::SerializationFailed(e.to_string()))?;

        fs::write(self.state_file_path(session_id), yaml)
            .await
            .map_err(|e| SessionStorageError::IoError(e.to_string()))?;

        Ok(())
    }

    async fn load_state(
        &self,
        session_id: SessionId,
    ) -> Result<ConversationState, SessionStorageError> {
        let file_path = self.state_file_path(session_id);

        if !Self::file_exists(&file_path).await? {
            return Err(SessionStorageError::NotFound(session_id));
        }

        let yaml = fs::read_to_string(&file_path)
            .await
            .map_err(|e| SessionStorageError::IoError(e.to_string()))?;

        serde_yaml::from_str(&yaml)
            .map_err(|e| SessionStorageError::DeserializationFailed(e.to_string()))
    }

    async fn exists(&self, session_id: SessionId) -> Result<bool, SessionStorageError> {
        Self::file_exists(&self.state_file_path(session_id)).await
    }

    async fn delete(&self, session_id: SessionId) -> Result<(), SessionStorageError> {
        let dir = self.session_dir(session_id);

        if Self::file_exists(&dir).await? {
            fs::remove_dir_all(&dir)
                .await
                .map_err(|e| SessionStorageError::IoError(e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::intake::{IntakeMachine, Step};
    use tempfile::TempDir;

    fn test_state(session_id: SessionId) -> ConversationState {
        ConversationState::new(session_id)
    }

    #[tokio::test]
    async fn test_file_storage_save_and_load_state() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileSessionStorage::new(temp_dir.path());

        let session_id = SessionId::new();
        let state = test_state(session_id);

        storage.save_state(session_id, &state).await.unwrap();
        let loaded = storage.load_state(session_id).await.unwrap();

        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_file_storage_load_nonexistent_state() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileSessionStorage::new(temp_dir.path());

        let result = storage.load_state(SessionId::new()).await;

        assert!(matches!(result, Err(SessionStorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_file_storage_exists_and_delete() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileSessionStorage::new(temp_dir.path());

        let session_id = SessionId::new();
        assert!(!storage.exists(session_id).await.unwrap());

        storage.save_state(session_id, &test_state(session_id)).await.unwrap();
        assert!(storage.exists(session_id).await.unwrap());

        storage.delete(session_id).await.unwrap();
        assert!(!storage.exists(session_id).await.unwrap());

        // Deleting again is fine
        storage.delete(session_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_storage_update_state() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileSessionStorage::new(temp_dir.path());

        let session_id = SessionId::new();
        let mut state = test_state(session_id);
        storage.save_state(session_id, &state).await.unwrap();

        IntakeMachine::handle_input(&mut state, "Ada Lovelace").unwrap();
        IntakeMachine::handle_input(&mut state, "36").unwrap();
        storage.save_state(session_id, &state).await.unwrap();

        let loaded = storage.load_state(session_id).await.unwrap();
        assert_eq!(loaded.step(), Step::Question(2));
        assert_eq!(loaded.answers().name(), Some("Ada Lovelace"));
    }

    #[tokio::test]
    async fn test_file_storage_session_dir_structure() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileSessionStorage::new(temp_dir.path());

        let session_id = SessionId::new();
        storage.save_state(session_id, &test_state(session_id)).await.unwrap();

        assert!(storage.session_dir(session_id).exists());
        assert!(storage.state_file_path(session_id).exists());
    }

    #[tokio::test]
    async fn test_file_storage_rejects_corrupt_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileSessionStorage::new(temp_dir.path());

        let session_id = SessionId::new();
        std::fs::create_dir_all(storage.session_dir(session_id)).unwrap();
        std::fs::write(storage.state_file_path(session_id), "step: [unclosed").unwrap();

        let result = storage.load_state(session_id).await;
        assert!(matches!(
            result,
            Err(SessionStorageError::DeserializationFailed(_))
        ));
    }
}
