// src/client/storage.rs
use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use tempfile::NamedTempFile;
use thiserror::Error;

use super::conversation::Conversation;

/// Key the conversation is stored under.
pub const STORAGE_KEY: &str = "gemini_chat";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored conversation is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Where the chat client keeps its conversation between runs.
pub trait ConversationStore: Send + Sync {
    /// Returns an empty conversation when nothing has been stored yet.
    fn load(&self) -> Result<Conversation, StorageError>;
    fn save(&self, conversation: &Conversation) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// Holds the serialized entry in memory. Clones share the same entry.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entry: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(raw: impl Into<String>) -> Self {
        Self {
            entry: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    /// The raw stored entry, if any.
    pub fn raw(&self) -> Option<String> {
        self.entry.lock().ok().and_then(|guard| guard.clone())
    }
}

impl ConversationStore for MemoryStore {
    fn load(&self) -> Result<Conversation, StorageError> {
        let guard = self.entry.lock().map_err(|_| StorageError::Poisoned)?;
        match guard.as_deref() {
            Some(raw) => Ok(serde_json::from_str(raw)?),
            None => Ok(Conversation::new()),
        }
    }

    fn save(&self, conversation: &Conversation) -> Result<(), StorageError> {
        let raw = serde_json::to_string(conversation)?;
        let mut guard = self.entry.lock().map_err(|_| StorageError::Poisoned)?;
        *guard = Some(raw);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self.entry.lock().map_err(|_| StorageError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

/// One JSON file per user, named after [`STORAGE_KEY`].
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConversationStore for FileStore {
    fn load(&self) -> Result<Conversation, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Conversation::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, conversation: &Conversation) -> Result<(), StorageError> {
        let raw = serde_json::to_string(conversation)?;

        let parent = self.path.parent().filter(|dir| !dir.as_os_str().is_empty());
        if let Some(dir) = parent {
            fs::create_dir_all(dir)?;
        }

        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };
        temp_file.write_all(raw.as_bytes())?;
        temp_file.as_file_mut().sync_all()?;
        temp_file.persist(&self.path).map_err(|err| err.error)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
