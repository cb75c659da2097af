use std::sync::Arc;
use tokio::sync::RwLock;

use crate::entity::CrudDemo;
use crate::error::DataError;
use crate::gateway::{Change, Gateway, Session};

/// In-memory gateway keeping records in insertion order.
///
/// The collection is `None` while unprovisioned, which lets tests tell
/// "table missing" apart from "table empty".
#[derive(Clone, Debug, Default)]
pub struct MemoryGateway {
    table: Arc<RwLock<Option<Vec<CrudDemo>>>>,
}

impl MemoryGateway {
    /// A provisioned, empty collection.
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<CrudDemo>) -> Self {
        Self {
            table: Arc::new(RwLock::new(Some(records))),
        }
    }

    /// A gateway whose collection does not exist.
    pub fn unprovisioned() -> Self {
        Self::default()
    }

    /// Copy of the current contents, `None` when unprovisioned.
    pub async fn snapshot(&self) -> Option<Vec<CrudDemo>> {
        self.table.read().await.clone()
    }
}

impl Gateway for MemoryGateway {
    type Session = MemorySession;

    fn session(&self) -> MemorySession {
        MemorySession {
            table: self.table.clone(),
            staged: Vec::new(),
        }
    }
}

pub struct MemorySession {
    table: Arc<RwLock<Option<Vec<CrudDemo>>>>,
    staged: Vec<Change>,
}

impl Session for MemorySession {
    async fn is_provisioned(&self) -> Result<bool, DataError> {
        Ok(self.table.read().await.is_some())
    }

    async fn find_all(&self) -> Result<Vec<CrudDemo>, DataError> {
        self.table
            .read()
            .await
            .clone()
            .ok_or(DataError::NotProvisioned)
    }

    async fn find(&self, id: i32) -> Result<Option<CrudDemo>, DataError> {
        let table = self.table.read().await;
        let records = table.as_ref().ok_or(DataError::NotProvisioned)?;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn any(&self, id: i32) -> Result<bool, DataError> {
        let table = self.table.read().await;
        let records = table.as_ref().ok_or(DataError::NotProvisioned)?;
        Ok(records.iter().any(|r| r.id == id))
    }

    fn add(&mut self, record: CrudDemo) {
        self.staged.push(Change::Insert(record));
    }

    fn mark_modified(&mut self, record: &CrudDemo) {
        self.staged.push(Change::Update(record.clone()));
    }

    fn remove(&mut self, record: &CrudDemo) {
        self.staged.push(Change::Delete(record.id));
    }

    fn pending(&self) -> usize {
        self.staged.len()
    }

    async fn commit(&mut self) -> Result<usize, DataError> {
        let staged = std::mem::take(&mut self.staged);
        let mut table = self.table.write().await;
        let current = table.as_ref().ok_or(DataError::NotProvisioned)?;

        // Work on a copy so a failing change leaves the collection untouched.
        let mut next = current.clone();
        for change in &staged {
            match change {
                Change::Insert(record) => {
                    if next.iter().any(|r| r.id == record.id) {
                        return Err(DataError::Duplicate { id: record.id });
                    }
                    next.push(record.clone());
                }
                Change::Update(record) => {
                    let slot = next
                        .iter_mut()
                        .find(|r| r.id == record.id)
                        .ok_or(DataError::ConcurrencyConflict { id: record.id })?;
                    *slot = record.clone();
                }
                Change::Delete(id) => {
                    let pos = next
                        .iter()
                        .position(|r| r.id == *id)
                        .ok_or(DataError::ConcurrencyConflict { id: *id })?;
                    next.remove(pos);
                }
            }
        }

        *table = Some(next);
        tracing::trace!(changes = staged.len(), "memory gateway committed");
        Ok(staged.len())
    }
}
