use super::UniversityStore;
use crate::error::CatalogError;
use crate::filter::DocumentFilter;
use async_trait::async_trait;
use campus_kernel::domain::University;
use parking_lot::RwLock;
use std::sync::Arc;

/// In-process store kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Vec<University>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `records`; later duplicates of an id are dropped.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = University>) -> Self {
        let store = Self::new();
        store.extend(records);
        store
    }

    fn extend(&self, records: impl IntoIterator<Item = University>) -> usize {
        let mut guard = self.records.write();
        let before = guard.len();
        for record in records {
            if !guard.iter().any(|existing| existing.id == record.id) {
                guard.push(record);
            }
        }
        guard.len() - before
    }
}

#[async_trait]
impl UniversityStore for MemoryStore {
    async fn find(&self, filter: &DocumentFilter) -> Result<Vec<University>, CatalogError> {
        let guard = self.records.read();
        if filter.is_empty() {
            return Ok(guard.clone());
        }
        Ok(guard.iter().filter(|u| filter.matches(u)).cloned().collect())
    }

    async fn count(&self) -> Result<u64, CatalogError> {
        u64::try_from(self.records.read().len()).map_err(|e| CatalogError::from(e.to_string()))
    }

    async fn insert_many(&self, records: Vec<University>) -> Result<usize, CatalogError> {
        Ok(self.extend(records))
    }
}
