//! Database schema migrations.
//!
//! A `_migrations` table records which numbered SQL batches have run. Each
//! batch is idempotent (`IF NOT EXISTS`) so re-running is harmless.

use super::Error;
use tokio_rusqlite::{Connection, params};

/// Migration list: (version, SQL), applied in ascending version order.
const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("../../migrations/001_snippets.sql"))];

/// Run any pending migrations.
///
/// # Errors
///
/// Returns an error if a migration SQL fails to execute.
pub async fn run(conn: &Connection) -> Result<(), Error> {
    conn.call(|conn| -> Result<(), Error> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            )",
            [],
        )?;

        let current: i64 =
            conn.query_row("SELECT COALESCE(MAX(version), 0) FROM _migrations", [], |row| row.get(0))?;

        for &(version, sql) in MIGRATIONS {
            if version <= current {
                continue;
            }
            conn.execute_batch(sql)
                .map_err(|e| Error::MigrationFailed(format!("version {version}: {e}")))?;
            conn.execute(
                "INSERT INTO _migrations (version, applied_at) VALUES (?1, ?2)",
                params![version, chrono::Utc::now().to_rfc3339()],
            )?;
            tracing::info!(version, "applied schema migration");
        }

        Ok(())
    })
    .await
    .map_err(Error::from)
}
