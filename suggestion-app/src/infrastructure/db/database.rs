use crate::domain::{Suggestion, User, Vote};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use suggestion_errors::AppError;
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed document {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("document {} is closed", .path.display())]
    Closed { path: PathBuf },
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Storage(err.to_string())
    }
}

/// The whole persisted state. Missing collections read as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardDocument {
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
    #[serde(default)]
    pub votes: Vec<Vote>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// What a mutation wants done with the document it touched.
pub(crate) enum Change<T> {
    Persist(T),
    Skip(T),
}

/// Handle on the JSON document file.
///
/// Every operation loads the full document from disk and, for mutations,
/// writes the full document back. All cycles go through one async mutex so
/// two writers in this process cannot interleave their read and write.
/// Clones share the lock and the closed flag.
#[derive(Clone)]
pub struct JsonDatabase {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
    closed: Arc<AtomicBool>,
}

impl JsonDatabase {
    /// Opens the document at `path`, creating it (and its directory) with
    /// empty collections when missing.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;

        let db = Self {
            path: Arc::new(path),
            lock: Arc::new(Mutex::new(())),
            closed: Arc::new(AtomicBool::new(false)),
        };

        if exists {
            // Fail early on a corrupt file rather than on the first request.
            db.load().await?;
        } else {
            db.save(&BoardDocument::default()).await?;
            tracing::info!(path = %db.path.display(), "Created empty board document");
        }

        tracing::info!(path = %db.path.display(), "Board document opened");
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Waits for any in-flight cycle to finish, then closes the document for
    /// every clone of this handle. Later reads and writes fail with
    /// [`StoreError::Closed`].
    pub async fn close(self) {
        let _guard = self.lock.lock().await;
        self.closed.store(true, Ordering::SeqCst);
        tracing::info!(path = %self.path.display(), "Board document closed");
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(StoreError::Closed {
                path: self.path.to_path_buf(),
            });
        }
        Ok(())
    }

    pub(crate) async fn read<T>(&self, f: impl FnOnce(&BoardDocument) -> T) -> Result<T, StoreError> {
        let _guard = self.lock.lock().await;
        self.ensure_open()?;
        let doc = self.load().await?;
        Ok(f(&doc))
    }

    pub(crate) async fn write<T>(
        &self,
        f: impl FnOnce(&mut BoardDocument) -> Change<T>,
    ) -> Result<T, StoreError> {
        let _guard = self.lock.lock().await;
        self.ensure_open()?;
        let mut doc = self.load().await?;
        match f(&mut doc) {
            Change::Persist(value) => {
                self.save(&doc).await?;
                Ok(value)
            }
            Change::Skip(value) => Ok(value),
        }
    }

    async fn load(&self) -> Result<BoardDocument, StoreError> {
        let bytes = tokio::fs::read(self.path.as_path())
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.to_path_buf(),
                source,
            })?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
            path: self.path.to_path_buf(),
            source,
        })
    }

    async fn save(&self, doc: &BoardDocument) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(doc).map_err(|source| StoreError::Json {
            path: self.path.to_path_buf(),
            source,
        })?;

        // Write to a sibling file and rename so readers never see a torn document.
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &data)
            .await
            .map_err(|source| StoreError::Io {
                path: temp_path.clone(),
                source,
            })?;
        tokio::fs::rename(&temp_path, self.path.as_path())
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.to_path_buf(),
                source,
            })?;

        tracing::debug!(
            path = %self.path.display(),
            suggestions = doc.suggestions.len(),
            votes = doc.votes.len(),
            users = doc.users.len(),
            "Board document written"
        );
        Ok(())
    }
}
