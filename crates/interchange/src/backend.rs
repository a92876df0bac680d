//! Storage backends for layout records.

use crate::record::{LayoutRecord, RecordListing, SaveRequest};
use smol::stream::StreamExt;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum PersistenceError {
    NotFound(String),
    /// The backend could not be reached or refused the request.
    Unavailable(String),
    Io(String),
    /// A stored record could not be decoded.
    Corrupt(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "No layout record with id {}", id),
            Self::Unavailable(msg) => write!(f, "Storage unavailable: {}", msg),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
            Self::Corrupt(msg) => write!(f, "Corrupt record: {}", msg),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Where layout records live.
#[allow(async_fn_in_trait)]
pub trait LayoutBackend {
    /// Write a record. With `id`, replaces that record; otherwise creates a
    /// new one. Returns the record id.
    async fn upsert(&self, id: Option<&str>, request: SaveRequest) -> Result<String, PersistenceError>;

    async fn fetch(&self, id: &str) -> Result<LayoutRecord, PersistenceError>;

    async fn list(&self) -> Result<Vec<RecordListing>, PersistenceError>;

    async fn delete(&self, id: &str) -> Result<(), PersistenceError>;
}

fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Records held in memory. Can be switched offline to simulate a backend
/// outage.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: Mutex<BTreeMap<String, LayoutRecord>>,
    offline: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_online(&self) -> Result<(), PersistenceError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(PersistenceError::Unavailable("backend offline".into()))
        } else {
            Ok(())
        }
    }

    fn records(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, LayoutRecord>>, PersistenceError> {
        self.records
            .lock()
            .map_err(|_| PersistenceError::Unavailable("record store poisoned".into()))
    }
}

impl LayoutBackend for MemoryBackend {
    async fn upsert(&self, id: Option<&str>, request: SaveRequest) -> Result<String, PersistenceError> {
        self.check_online()?;
        let mut records = self.records()?;
        let id = match id {
            Some(id) if records.contains_key(id) => id.to_string(),
            Some(id) => return Err(PersistenceError::NotFound(id.to_string())),
            None => new_record_id(),
        };
        records.insert(id.clone(), LayoutRecord::new(id.clone(), request));
        Ok(id)
    }

    async fn fetch(&self, id: &str) -> Result<LayoutRecord, PersistenceError> {
        self.check_online()?;
        self.records()?
            .get(id)
            .cloned()
            .ok_or_else(|| PersistenceError::NotFound(id.to_string()))
    }

    async fn list(&self) -> Result<Vec<RecordListing>, PersistenceError> {
        self.check_online()?;
        Ok(self.records()?.values().map(LayoutRecord::listing).collect())
    }

    async fn delete(&self, id: &str) -> Result<(), PersistenceError> {
        self.check_online()?;
        self.records()?
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| PersistenceError::NotFound(id.to_string()))
    }
}

/// One pretty-printed JSON file per record in a directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PersistenceError::NotFound(id.to_string()));
        }
        Ok(self.root.join(format!("{}.json", id)))
    }

    async fn read_record(path: &Path) -> Result<LayoutRecord, PersistenceError> {
        let contents = smol::fs::read_to_string(path).await?;
        serde_json::from_str(&contents)
            .map_err(|e| PersistenceError::Corrupt(format!("{}: {}", path.display(), e)))
    }
}

impl LayoutBackend for FileBackend {
    async fn upsert(&self, id: Option<&str>, request: SaveRequest) -> Result<String, PersistenceError> {
        smol::fs::create_dir_all(&self.root).await?;
        let id = match id {
            Some(id) => {
                let path = self.path_for(id)?;
                if smol::fs::metadata(&path).await.is_err() {
                    return Err(PersistenceError::NotFound(id.to_string()));
                }
                id.to_string()
            }
            None => new_record_id(),
        };

        let record = LayoutRecord::new(id.clone(), request);
        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
        let path = self.path_for(&id)?;
        // Write beside the target and rename so readers never see a torn file.
        let tmp = path.with_extension("json.tmp");
        smol::fs::write(&tmp, json).await?;
        smol::fs::rename(&tmp, &path).await?;
        log::debug!("wrote layout record {}", path.display());
        Ok(id)
    }

    async fn fetch(&self, id: &str) -> Result<LayoutRecord, PersistenceError> {
        let path = self.path_for(id)?;
        match Self::read_record(&path).await {
            Err(PersistenceError::Io(_)) if smol::fs::metadata(&path).await.is_err() => {
                Err(PersistenceError::NotFound(id.to_string()))
            }
            other => other,
        }
    }

    async fn list(&self) -> Result<Vec<RecordListing>, PersistenceError> {
        let mut entries = match smol::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut listings = Vec::new();
        while let Some(entry) = entries.try_next().await? {
            let path = entry.path();
            if path.extension().map(|e| e != "json").unwrap_or(true) {
                continue;
            }
            match Self::read_record(&path).await {
                Ok(record) => listings.push(record.listing()),
                Err(e) => log::warn!("skipping unreadable record: {}", e),
            }
        }
        listings.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(listings)
    }

    async fn delete(&self, id: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(id)?;
        smol::fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PersistenceError::NotFound(id.to_string())
            } else {
                e.into()
            }
        })
    }
}
