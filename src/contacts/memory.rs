//! In-memory contact store with optional JSON snapshot persistence.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::filter::FilterCriteria;
use super::store::ContactStore;
use super::types::{Contact, ContactPayload, StoreError};

/// On-disk snapshot layout.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    next_id: u64,
    contacts: Vec<Contact>,
}

/// A thread-safe contact store backed by a concurrent map.
#[derive(Clone)]
pub struct InMemoryContactStore {
    inner: Arc<DashMap<u64, Contact>>,
    next_id: Arc<AtomicU64>,
    snapshot_path: Option<PathBuf>,
}

impl InMemoryContactStore {
    /// Create a new empty store.
    pub fn new(snapshot_path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
            snapshot_path,
        }
    }

    /// Load from a snapshot file if it exists. Later saves go to the same file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let store = Self::new(Some(path.to_path_buf()));
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let snapshot: Snapshot = serde_json::from_reader(reader)?;

            let mut max_id: u64 = 0;
            for contact in snapshot.contacts {
                max_id = max_id.max(contact.id);
                store.inner.insert(contact.id, contact);
            }
            store
                .next_id
                .store(snapshot.next_id.max(max_id.saturating_add(1)), Ordering::SeqCst);
            tracing::info!(
                path = %path.display(),
                contacts = store.inner.len(),
                "Loaded contacts from snapshot"
            );
        }
        Ok(store)
    }

    /// Write the current contents to the snapshot file, if one is configured.
    ///
    /// The snapshot is written to a sibling temp file, synced, then renamed
    /// over the target, so a failed save leaves the previous snapshot intact.
    pub fn save_to_file(&self) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        let snapshot = Snapshot {
            next_id: self.next_id.load(Ordering::SeqCst),
            contacts: self.sorted(|_| true),
        };
        let tmp = temp_path(path);
        let written = File::create(&tmp)
            .map_err(StoreError::from)
            .and_then(|file| write_snapshot(file, &snapshot))
            .and_then(|file| Ok(file.sync_all()?))
            .and_then(|()| Ok(fs::rename(&tmp, path)?));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }

        tracing::info!(
            path = %path.display(),
            contacts = snapshot.contacts.len(),
            "Saved contacts snapshot"
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    fn sorted(&self, keep: impl Fn(&Contact) -> bool) -> Vec<Contact> {
        let mut contacts: Vec<Contact> = self
            .inner
            .iter()
            .filter(|r| keep(r.value()))
            .map(|r| r.value().clone())
            .collect();
        contacts.sort_by_key(|c| c.id);
        contacts
    }

    fn parse_id(id: &str) -> Result<u64, StoreError> {
        id.parse().map_err(|_| StoreError::NotFound(id.to_string()))
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("contacts"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Serialize and flush, handing back the file so the caller can sync it.
fn write_snapshot(file: File, snapshot: &Snapshot) -> Result<File, StoreError> {
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, snapshot)?;
    writer.flush()?;
    writer.into_inner().map_err(|e| StoreError::Io(e.into_error()))
}

impl Default for InMemoryContactStore {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn list(&self, criteria: &FilterCriteria) -> Result<Vec<Contact>, StoreError> {
        Ok(self.sorted(|c| criteria.matches(c)))
    }

    async fn create(&self, payload: ContactPayload) -> Result<Contact, StoreError> {
        let id = self
            .next_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |id| id.checked_add(1))
            .map_err(|_| StoreError::Unavailable("contact id space exhausted".into()))?;
        let contact = Contact::from_payload(id, payload);
        self.inner.insert(id, contact.clone());
        tracing::debug!(id, "Contact created");
        Ok(contact)
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        let removed = self.inner.len();
        self.inner.clear();
        tracing::debug!(removed, "All contacts deleted");
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Contact, StoreError> {
        let key = Self::parse_id(id)?;
        self.inner
            .get(&key)
            .map(|r| r.value().clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update(&self, id: &str, payload: ContactPayload) -> Result<Contact, StoreError> {
        let key = Self::parse_id(id)?;
        let mut entry = self
            .inner
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        entry.apply(payload);
        Ok(entry.clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let key = Self::parse_id(id)?;
        self.inner
            .remove(&key)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
