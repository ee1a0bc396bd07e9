mod memory;
#[cfg(feature = "server")]
mod surreal;

pub use memory::MemoryStore;
#[cfg(feature = "server")]
pub use surreal::SurrealStore;

use crate::error::CatalogError;
use crate::filter::DocumentFilter;
use async_trait::async_trait;
use campus_kernel::domain::University;
use std::fmt::Debug;

/// Read access to the university collection, plus bulk import for seeding.
///
/// Implementations must return records in a stable order for an unchanged collection.
#[async_trait]
pub trait UniversityStore: Debug + Send + Sync {
    /// Every record matching `filter`.
    async fn find(&self, filter: &DocumentFilter) -> Result<Vec<University>, CatalogError>;

    async fn count(&self) -> Result<u64, CatalogError>;

    /// Inserts records whose id is not present yet and returns how many were added.
    async fn insert_many(&self, records: Vec<University>) -> Result<usize, CatalogError>;
}
