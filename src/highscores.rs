//! Best-score persistence
//!
//! A single integer under the `high-score` key. LocalStorage on web, a dotfile
//! in the home directory on native, memory in tests.

use std::path::PathBuf;

/// Storage key for the best score
pub const STORAGE_KEY: &str = "high-score";

/// Why the store couldn't be read or written
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored high score is not a number: {0:?}")]
    Corrupt(String),
}

/// Narrow key-value access to the persisted best score
pub trait HighScoreStore {
    /// Raw stored value, `None` when nothing was saved yet
    fn read_raw(&self) -> Result<Option<String>, StoreError>;
    fn write_raw(&mut self, value: &str) -> Result<(), StoreError>;

    /// Stored best score; a missing value reads as 0
    fn read(&self) -> Result<u64, StoreError> {
        match self.read_raw()? {
            None => Ok(0),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| StoreError::Corrupt(raw.clone())),
        }
    }

    fn write(&mut self, score: u64) -> Result<(), StoreError> {
        self.write_raw(&score.to_string())
    }
}

/// Best score to show on the menu; unreadable stores show 0
pub fn best_score(store: &dyn HighScoreStore) -> u64 {
    match store.read() {
        Ok(best) => best,
        Err(e) => {
            log::warn!("Can't read high score, showing 0: {}", e);
            0
        }
    }
}

/// Persist `max(stored, score)` and return it.
/// A corrupt stored value is treated as 0 and overwritten.
pub fn record_high_score(store: &mut dyn HighScoreStore, score: u64) -> Result<u64, StoreError> {
    let previous = match store.read() {
        Ok(previous) => previous,
        Err(StoreError::Corrupt(raw)) => {
            log::warn!("Replacing corrupt high score {:?}", raw);
            0
        }
        Err(e) => return Err(e),
    };

    let best = previous.max(score);
    store.write(best)?;
    if best > previous {
        log::info!("New high score: {} (was {})", best, previous);
    }
    Ok(best)
}

/// In-memory store (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<String>,
    /// Number of writes performed
    pub writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u64) -> Self {
        Self {
            value: Some(score.to_string()),
            writes: 0,
        }
    }

    pub fn with_raw(raw: &str) -> Self {
        Self {
            value: Some(raw.to_string()),
            writes: 0,
        }
    }
}

impl HighScoreStore for MemoryStore {
    fn read_raw(&self) -> Result<Option<String>, StoreError> {
        Ok(self.value.clone())
    }

    fn write_raw(&mut self, value: &str) -> Result<(), StoreError> {
        self.value = Some(value.to_string());
        self.writes += 1;
        Ok(())
    }
}

/// Plain-text file holding the score (native)
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.orb_blast_score`, falling back to the working directory
    pub fn in_home() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self::new(PathBuf::from(home).join(".orb_blast_score"))
    }
}

impl HighScoreStore for FileStore {
    fn read_raw(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_raw(&mut self, value: &str) -> Result<(), StoreError> {
        std::fs::write(&self.path, value)?;
        Ok(())
    }
}

/// Browser LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub fn open() -> Result<Self, StoreError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl HighScoreStore for LocalStorageStore {
    fn read_raw(&self) -> Result<Option<String>, StoreError> {
        self.storage
            .get_item(STORAGE_KEY)
            .map_err(|_| StoreError::Unavailable)
    }

    fn write_raw(&mut self, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(STORAGE_KEY, value)
            .map_err(|_| StoreError::Unavailable)
    }
}
