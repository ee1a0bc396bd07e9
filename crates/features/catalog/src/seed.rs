//! Startup import of a JSON seed file into an empty collection.

use crate::error::{CatalogError, CatalogErrorExt};
use crate::store::UniversityStore;
use campus_kernel::domain::University;
use std::path::Path;
use tracing::{debug, info};

/// Parses a JSON array of universities with camelCase fields and `_id` keys.
///
/// # Errors
///
/// [`CatalogError::Json`] for malformed input.
pub fn parse(bytes: &[u8]) -> Result<Vec<University>, CatalogError> {
    serde_json::from_slice(bytes).context("Parsing seed records")
}

/// # Errors
///
/// [`CatalogError::Io`] when the file cannot be read, [`CatalogError::Json`] when it is malformed.
pub fn read_file(path: impl AsRef<Path>) -> Result<Vec<University>, CatalogError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).context(format!("Reading {}", path.display()))?;
    parse(&bytes).context(format!("Parsing {}", path.display()))
}

/// Imports `path` when the store holds no records yet. Returns the number of records added.
///
/// # Errors
///
/// Read, parse or store failures.
pub async fn seed_if_empty(
    store: &dyn UniversityStore,
    path: impl AsRef<Path>,
) -> Result<usize, CatalogError> {
    let path = path.as_ref();
    let existing = store.count().await?;
    if existing > 0 {
        debug!(existing, "Collection already populated, skipping seed");
        return Ok(0);
    }

    let records = read_file(path)?;
    let inserted = store.insert_many(records).await?;
    info!(inserted, path = %path.display(), "Seed records imported");
    Ok(inserted)
}
