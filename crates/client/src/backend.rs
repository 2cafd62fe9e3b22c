//! File-backed local backend.
//!
//! Pairs the in-memory authentication service and document store, and
//! persists both to a single JSON file between runs.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::auth::{MemoryAuth, StoredAccount};
use crate::error::AppError;
use crate::store::{MemoryStore, StoreSnapshot};

/// On-disk layout of the state file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct State {
    #[serde(default)]
    accounts: Vec<StoredAccount>,
    #[serde(default)]
    collections: StoreSnapshot,
}

/// The two collaborators, backed by one state file.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    pub auth: Arc<MemoryAuth>,
    pub store: Arc<MemoryStore>,
}

impl LocalBackend {
    /// Empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            auth: Arc::new(MemoryAuth::new()),
            store: Arc::new(MemoryStore::new()),
        }
    }

    /// Load the state file. A missing file yields an empty backend.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the file cannot be read or
    /// parsed.
    #[instrument(fields(path = %path.display()))]
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No state file yet");
                return Ok(Self::new());
            }
            Err(err) => return Err(AppError::Persistence(err.to_string())),
        };
        let state: State = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::Persistence(format!("invalid state file: {e}")))?;

        info!(accounts = state.accounts.len(), "State loaded");
        Ok(Self {
            auth: Arc::new(MemoryAuth::from_accounts(state.accounts)),
            store: Arc::new(MemoryStore::from_snapshot(state.collections)),
        })
    }

    /// Write the state file.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the state cannot be exported or
    /// written.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn save(&self, path: &Path) -> Result<(), AppError> {
        let state = State {
            accounts: self.auth.accounts()?,
            collections: self.store.snapshot()?,
        };
        let json = serde_json::to_vec_pretty(&state)
            .map_err(|e| AppError::Persistence(e.to_string()))?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| AppError::Persistence(e.to_string()))?;
        debug!("State saved");
        Ok(())
    }
}

impl Default for LocalBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use teckadm_core::{Collection, Email};

    use super::*;
    use crate::auth::AuthBackend;
    use crate::store::{DocumentStore, DocumentWrite};

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = std::env::temp_dir().join(format!("teckadm-{}", uuid::Uuid::new_v4()));
        let backend = LocalBackend::load(&dir.join("none.json")).await.unwrap();
        assert!(backend.auth.accounts().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("teckadm-{}.json", uuid::Uuid::new_v4()));
        let backend = LocalBackend::new();
        let email = Email::parse("ana@taller.mx").unwrap();
        let password = SecretString::from("secreto1".to_owned());
        backend.auth.create_account(&email, &password).await.unwrap();
        backend
            .store
            .insert(Collection::Clients, DocumentWrite::new().set("nombre", "Acme"))
            .await
            .unwrap();
        backend.save(&path).await.unwrap();

        let restored = LocalBackend::load(&path).await.unwrap();
        assert_eq!(restored.auth.current(), None);
        assert!(restored.auth.sign_in(&email, &password).await.is_ok());
        assert_eq!(restored.store.snapshot().unwrap()["clientes"].len(), 1);

        let _ = tokio::fs::remove_file(&path).await;
    }
}
