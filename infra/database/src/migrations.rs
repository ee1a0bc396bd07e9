use crate::error::{DatabaseError, DatabaseErrorExt};
use fxhash::FxHashMap;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::types::SurrealValue;

const MIGRATION_TABLE_DDL: &str = "DEFINE TABLE IF NOT EXISTS migration SCHEMALESS;";

/// A versioned SurrealQL script owned by a feature slice.
///
/// Scripts are applied once, in registration order, and recorded with a checksum.
/// Editing an applied script is reported as [`DatabaseError::Migration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    pub slice: &'static str,
    pub version: &'static str,
    pub script: &'static str,
}

impl Migration {
    #[must_use]
    pub const fn new(slice: &'static str, version: &'static str, script: &'static str) -> Self {
        Self { slice, version, script }
    }

    /// Hex digest of the script with surrounding whitespace ignored.
    #[must_use]
    pub fn checksum(&self) -> String {
        format!("{:016x}", fxhash::hash64(self.script.trim()))
    }

    fn key(&self) -> String {
        format!("{}:{}", self.slice, self.version)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRecord {
    pub slice: String,
    pub version: String,
    pub checksum: String,
}

/// Outcome of a migration run.
#[derive(Debug, Default)]
pub struct MigrationReport {
    pub applied: Vec<MigrationRecord>,
    pub skipped: Vec<MigrationRecord>,
}

#[derive(Debug, SurrealValue)]
struct AppliedRow {
    slice: String,
    version: String,
    checksum: String,
}

#[derive(Debug)]
pub(crate) struct MigrationRunner<'a> {
    db: &'a Surreal<Any>,
}

impl<'a> MigrationRunner<'a> {
    pub(crate) const fn new(db: &'a Surreal<Any>) -> Self {
        Self { db }
    }

    pub(crate) async fn run(
        &self,
        migrations: &[Migration],
    ) -> Result<MigrationReport, DatabaseError> {
        let applied = self.applied().await?;
        let mut report = MigrationReport::default();

        for migration in migrations {
            let record = MigrationRecord {
                slice: migration.slice.to_owned(),
                version: migration.version.to_owned(),
                checksum: migration.checksum(),
            };

            if let Some(existing) = applied.get(&migration.key()) {
                ensure_checksum_match(migration, &record.checksum, existing)?;
                report.skipped.push(record);
                continue;
            }

            self.apply(migration, &record.checksum).await?;
            report.applied.push(record);
        }

        Ok(report)
    }

    async fn applied(&self) -> Result<FxHashMap<String, String>, DatabaseError> {
        self.db
            .query(MIGRATION_TABLE_DDL)
            .await
            .context("Defining migration table")?
            .check()
            .map_err(surrealdb::Error::from)?;

        let rows = self
            .db
            .query("SELECT slice, version, checksum FROM migration")
            .await
            .context("Loading applied migrations")?
            .take::<Vec<AppliedRow>>(0)
            .context("Parsing applied migrations")?;

        Ok(rows.into_iter().map(|row| (format!("{}:{}", row.slice, row.version), row.checksum)).collect())
    }

    async fn apply(&self, migration: &Migration, checksum: &str) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE migration CONTENT {{ slice: $slice, version: $version, checksum: $checksum, applied_at: time::now() }};
            COMMIT TRANSACTION;",
            migration.script.trim(),
        );

        self.db
            .query(query)
            .bind(("slice", migration.slice))
            .bind(("version", migration.version))
            .bind(("checksum", checksum.to_owned()))
            .await
            .context(format!("Executing {}", migration.key()))?
            .check()
            .map_err(|e| DatabaseError::Migration {
                message: surrealdb::Error::from(e).to_string().into(),
                context: Some(migration.key().into()),
            })?;

        Ok(())
    }
}

fn ensure_checksum_match(
    migration: &Migration,
    expected: &str,
    existing: &str,
) -> Result<(), DatabaseError> {
    if existing == expected {
        return Ok(());
    }
    Err(DatabaseError::Migration {
        message: format!(
            "Checksum mismatch for {} (recorded {existing}, current {expected})",
            migration.key()
        )
        .into(),
        context: Some("Applied scripts must not change".into()),
    })
}
