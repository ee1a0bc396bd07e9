use super::UniversityStore;
use crate::error::{CatalogError, CatalogErrorExt};
use crate::filter::DocumentFilter;
use crate::surql::{Bound, is_identifier, where_clause};
use async_trait::async_trait;
use campus_database::Database;
use campus_kernel::domain::University;
use surrealdb::types::SurrealValue;
use tracing::{debug, instrument};

/// Records per `INSERT` statement during bulk import.
const INSERT_CHUNK: usize = 100;

#[derive(Debug, SurrealValue)]
struct UniversityRow {
    key: String,
    university_name: String,
    country: String,
    location: String,
    tuition_fee: f64,
    ranking: i64,
    established_year: i64,
}

impl TryFrom<UniversityRow> for University {
    type Error = CatalogError;

    fn try_from(row: UniversityRow) -> Result<Self, Self::Error> {
        let established_year = i32::try_from(row.established_year).map_err(|_| {
            CatalogError::from(format!("establishedYear out of range for '{}'", row.key))
        })?;

        Ok(Self {
            id: row.key,
            university_name: row.university_name,
            country: row.country,
            location: row.location,
            tuition_fee: row.tuition_fee,
            ranking: row.ranking,
            established_year,
        })
    }
}

/// Store backed by a SurrealDB table with camelCase document fields.
#[derive(Debug, Clone)]
pub struct SurrealStore {
    db: Database,
    table: String,
}

impl SurrealStore {
    /// # Errors
    ///
    /// [`CatalogError::Validation`] when `table` is not a plain identifier.
    pub fn new(db: Database, table: impl Into<String>) -> Result<Self, CatalogError> {
        let table = table.into();
        if !is_identifier(&table) {
            return Err(CatalogError::validation(format!("Invalid collection name '{table}'")));
        }
        Ok(Self { db, table })
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    fn select(&self, filter: &DocumentFilter) -> (String, Vec<(&'static str, Bound)>) {
        let clause = where_clause(filter);
        let sql = format!(
            "SELECT <string> record::id(id) AS key, universityName AS university_name, country, \
             location, <float> tuitionFee AS tuition_fee, <int> ranking AS ranking, \
             <int> establishedYear AS established_year FROM {}{}",
            self.table,
            clause.render(),
        );
        (sql, clause.params)
    }

    fn insert_statement(&self, chunk: &[University]) -> String {
        let rows = (0..chunk.len())
            .map(|i| {
                format!(
                    "{{ id: $id{i}, universityName: $name{i}, country: $country{i}, \
                     location: $location{i}, tuitionFee: $tuition{i}, ranking: $ranking{i}, \
                     establishedYear: $year{i} }}"
                )
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("INSERT IGNORE INTO {} [{rows}]", self.table)
    }
}

#[async_trait]
impl UniversityStore for SurrealStore {
    #[instrument(skip_all, fields(table = %self.table, predicates = filter.predicate_count()))]
    async fn find(&self, filter: &DocumentFilter) -> Result<Vec<University>, CatalogError> {
        let (sql, params) = self.select(filter);

        let mut query = self.db.query(sql);
        for (name, value) in params {
            query = match value {
                Bound::Text(text) => query.bind((name, text)),
                Bound::List(list) => query.bind((name, list)),
                Bound::Float(number) => query.bind((name, number)),
                Bound::Int(number) => query.bind((name, number)),
            };
        }

        let rows = query
            .await
            .context("Querying universities")?
            .check()
            .map_err(surrealdb::Error::from)?
            .take::<Vec<UniversityRow>>(0)
            .context("Decoding universities")?;

        debug!(rows = rows.len(), "Universities loaded");
        rows.into_iter().map(University::try_from).collect()
    }

    async fn count(&self) -> Result<u64, CatalogError> {
        let counts = self
            .db
            .query(format!("SELECT VALUE count() FROM {} GROUP ALL", self.table))
            .await
            .context("Counting universities")?
            .take::<Vec<i64>>(0)
            .context("Decoding count")?;

        let total = counts.first().copied().unwrap_or_default();
        u64::try_from(total).map_err(|e| CatalogError::from(e.to_string()))
    }

    #[instrument(skip_all, fields(table = %self.table, records = records.len()))]
    async fn insert_many(&self, records: Vec<University>) -> Result<usize, CatalogError> {
        let before = self.count().await?;

        for chunk in records.chunks(INSERT_CHUNK) {
            let mut query = self.db.query(self.insert_statement(chunk));
            for (i, record) in chunk.iter().enumerate() {
                query = query
                    .bind((format!("id{i}"), record.id.clone()))
                    .bind((format!("name{i}"), record.university_name.clone()))
                    .bind((format!("country{i}"), record.country.clone()))
                    .bind((format!("location{i}"), record.location.clone()))
                    .bind((format!("tuition{i}"), record.tuition_fee))
                    .bind((format!("ranking{i}"), record.ranking))
                    .bind((format!("year{i}"), i64::from(record.established_year)));
            }
            query.await.context("Inserting universities")?.check().map_err(surrealdb::Error::from)?;
        }

        let after = self.count().await?;
        usize::try_from(after.saturating_sub(before)).map_err(|e| CatalogError::from(e.to_string()))
    }
}

