//! # Catalog
//!
//! University search, filtering, sorting, pagination and pairwise comparison.
//!
//! A request flows through three pure stages around one store read:
//!
//! 1. [`query::compile`] turns URL parameters into a [`filter::DocumentFilter`] for the store
//!    plus post-fetch predicates that depend on derived attributes.
//! 2. [`store::UniversityStore::find`] returns the matching records.
//! 3. [`pipeline::run`] applies tier filters, value ranking, the explicit sort and the page window.
//!
//! [`compare::compare`] builds the side-by-side view for exactly two records.

pub mod compare;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod query;
pub mod seed;
pub mod store;
pub mod surql;

#[cfg(feature = "client")]
pub mod client;
#[cfg(feature = "server")]
mod handlers;

pub use compare::Comparison;
pub use error::{CatalogError, CatalogErrorExt};
pub use pipeline::UniversityPage;
pub use query::{PageLimits, UniversityQueryParams};
pub use store::{MemoryStore, UniversityStore};

#[cfg(feature = "server")]
pub use error::ErrorBody;
#[cfg(feature = "server")]
pub use handlers::CompareParams;
#[cfg(feature = "server")]
pub use store::SurrealStore;

use campus_kernel::domain::constants::UNIVERSITIES;
use campus_kernel::domain::registry::InitializedSlice;
use campus_kernel::security::record::RecordGuard;
use filter::DocumentFilter;
use std::sync::Arc;
use tracing::debug;

#[cfg(feature = "server")]
use campus_database::{Database, Migration};
#[cfg(feature = "server")]
use campus_kernel::domain::config::ApiConfig;
#[cfg(feature = "server")]
use campus_kernel::server::ApiState;
#[cfg(feature = "server")]
use utoipa_axum::{router::OpenApiRouter, routes};

/// Schema scripts owned by the catalog slice, applied by `campus-database` at startup.
#[cfg(feature = "server")]
pub const MIGRATIONS: &[Migration] = &[Migration::new(
    "catalog",
    "0001_universities",
    include_str!("../migrations/0001_universities.surql"),
)];

/// Catalog feature state.
#[campus_derive::campus_slice]
pub struct Catalog {
    pub store: Arc<dyn UniversityStore>,
    pub limits: PageLimits,
    /// Table name accepted as a record-id prefix.
    pub table: String,
}

impl Catalog {
    #[must_use]
    pub fn with_store(store: Arc<dyn UniversityStore>, limits: PageLimits) -> Self {
        Self::new(CatalogInner { store, limits, table: UNIVERSITIES.to_owned() })
    }

    /// Compiles `params`, reads the matching records and shapes one page.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Validation`] for an unknown sort key, or the store's error.
    pub async fn search(
        &self,
        params: &UniversityQueryParams,
        current_year: i32,
    ) -> Result<UniversityPage, CatalogError> {
        let query = query::compile(params, self.limits)?;
        let records = self.store.find(&query.filter).await?;
        let page = pipeline::run(records, &query, current_year);
        debug!(total = page.pagination.total, returned = page.data.len(), "University page ready");
        Ok(page)
    }

    /// Compares the two universities named by a comma-separated id list.
    ///
    /// Ids are bare keys or `table:key`; the result keeps the requested order.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Validation`] unless exactly two distinct ids are given,
    /// [`CatalogError::NotFound`] when either record is missing.
    pub async fn compare(&self, ids: &str, current_year: i32) -> Result<Comparison, CatalogError> {
        let ids = compare_ids(ids, &self.table)?;
        let mut records = self.store.find(&DocumentFilter::by_ids(ids.clone())).await?;
        records.sort_by_key(|record| ids.iter().position(|id| *id == record.id));

        compare::compare(&records, current_year).ok_or_else(|| {
            CatalogError::not_found(format!("Expected 2 universities, found {}", records.len()))
        })
    }
}

fn compare_ids(raw: &str, table: &str) -> Result<Vec<String>, CatalogError> {
    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| RecordGuard::key(id, table))
        .collect::<Result<Vec<_>, _>>()?;

    if ids.len() != 2 {
        return Err(CatalogError::validation(format!("Expected exactly 2 ids, got {}", ids.len())));
    }
    if ids[0] == ids[1] {
        return Err(CatalogError::validation("Cannot compare a university with itself"));
    }
    Ok(ids)
}

/// Registers a catalog over an existing store.
#[must_use]
pub fn init_with_store(store: Arc<dyn UniversityStore>, limits: PageLimits) -> InitializedSlice {
    tracing::info!("Catalog slice initialized");
    InitializedSlice::new(Catalog::with_store(store, limits))
}

/// Initialize the catalog feature over the configured SurrealDB table.
///
/// Imports `catalog.seed_file` when the table is empty.
///
/// # Errors
///
/// Invalid collection name, or a failed seed import.
#[cfg(feature = "server")]
pub async fn init(config: &ApiConfig, database: &Database) -> Result<InitializedSlice, CatalogError> {
    let store = SurrealStore::new(database.clone(), config.catalog.collection.clone())?;
    if let Some(path) = &config.catalog.seed_file {
        seed::seed_if_empty(&store, path).await?;
    }

    let catalog = Catalog::new(CatalogInner {
        table: store.table().to_owned(),
        store: Arc::new(store),
        limits: PageLimits::from(&config.catalog),
    });

    tracing::info!(collection = %catalog.table, "Catalog slice initialized");
    Ok(InitializedSlice::new(catalog))
}

#[cfg(feature = "server")]
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::list_universities))
        .routes(routes!(handlers::compare_universities))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_ids_accepts_two_distinct_keys() {
        assert_eq!(compare_ids("a, universities:b", "universities").unwrap(), ["a", "b"]);
    }

    #[test]
    fn compare_ids_rejects_everything_else() {
        for raw in ["", "a", "a,b,c", "a,a", "a,universities:a", "a,users:b"] {
            let err = compare_ids(raw, "universities").unwrap_err();
            assert_eq!(err.kind(), "validation", "{raw}");
        }
    }
}
