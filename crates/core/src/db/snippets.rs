//! Snippet CRUD operations.
//!
//! Every method is a single statement or a single transaction, so a call
//! either commits in full or leaves the table untouched. The `*_by` variants
//! also roll back when their [`Deadline`] passes before commit.

use super::connection::SnippetDb;
use super::deadline::Deadline;
use crate::Error;
use crate::snippet::{Language, Snippet, from_db_timestamp, to_db_timestamp};
use chrono::{DateTime, Utc};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

const SELECT_COLUMNS: &str = "SELECT id, text, burn_after_read, is_read, language, expires_at, created_at FROM snippets";

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    from_db_timestamp(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e)))
}

fn row_to_snippet(row: &rusqlite::Row<'_>) -> rusqlite::Result<Snippet> {
    let language: String = row.get(4)?;
    let expires_at: Option<String> = row.get(5)?;
    let created_at: String = row.get(6)?;

    Ok(Snippet {
        id: row.get(0)?,
        text: row.get(1)?,
        burn_after_read: row.get::<_, i32>(2)? == 1,
        is_read: row.get::<_, i32>(3)? == 1,
        language: Language::from_tag(&language),
        expires_at: expires_at.as_deref().map(|raw| parse_timestamp(5, raw)).transpose()?,
        created_at: parse_timestamp(6, &created_at)?,
    })
}

fn find_in(conn: &rusqlite::Connection, id: &str) -> Result<Option<Snippet>, Error> {
    let mut stmt = conn.prepare_cached(&format!("{SELECT_COLUMNS} WHERE id = ?1"))?;
    match stmt.query_row(params![id], row_to_snippet) {
        Ok(s) => Ok(Some(s)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation)
}

impl SnippetDb {
    /// Insert a new snippet.
    ///
    /// # Errors
    ///
    /// Returns `Error::IdentifierCollision` if a row with the same `id` exists.
    pub async fn insert_snippet(&self, snippet: &Snippet) -> Result<(), Error> {
        self.insert_snippet_by(snippet, &Deadline::unbounded()).await
    }

    /// [`SnippetDb::insert_snippet`], rolled back if `deadline` passes before commit.
    pub async fn insert_snippet_by(&self, snippet: &Snippet, deadline: &Deadline) -> Result<(), Error> {
        let snippet = snippet.clone();
        let deadline = deadline.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                deadline.check("insert_snippet")?;
                let tx = conn.transaction()?;
                let result = tx.execute(
                    "INSERT INTO snippets (id, text, burn_after_read, is_read, language, expires_at, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        &snippet.id,
                        &snippet.text,
                        snippet.burn_after_read as i32,
                        snippet.is_read as i32,
                        snippet.language.tag(),
                        snippet.expires_at.map(to_db_timestamp),
                        to_db_timestamp(snippet.created_at),
                    ],
                );

                match result {
                    Ok(_) => {}
                    Err(e) if is_unique_violation(&e) => return Err(Error::IdentifierCollision(snippet.id)),
                    Err(e) => return Err(e.into()),
                }

                deadline.check("insert_snippet")?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Get a snippet by id.
    ///
    /// Returns None if no row matches. Expiry is not checked here.
    pub async fn find_snippet(&self, id: &str) -> Result<Option<Snippet>, Error> {
        let id = id.to_string();
        self.conn
            .call(move |conn| find_in(conn, &id))
            .await
            .map_err(Error::from)
    }

    /// Overwrite the mutable columns of an existing row.
    ///
    /// Only `burn_after_read`, `is_read` and `language` are written; the row
    /// as stored afterwards is returned, or None if `id` does not exist.
    pub async fn update_snippet(&self, snippet: &Snippet) -> Result<Option<Snippet>, Error> {
        self.update_snippet_by(snippet, &Deadline::unbounded()).await
    }

    pub async fn update_snippet_by(&self, snippet: &Snippet, deadline: &Deadline) -> Result<Option<Snippet>, Error> {
        let snippet = snippet.clone();
        let deadline = deadline.clone();
        self.conn
            .call(move |conn| -> Result<Option<Snippet>, Error> {
                deadline.check("update_snippet")?;
                let tx = conn.transaction()?;
                let changed = tx.execute(
                    "UPDATE snippets SET burn_after_read = ?2, is_read = ?3, language = ?4 WHERE id = ?1",
                    params![&snippet.id, snippet.burn_after_read as i32, snippet.is_read as i32, snippet.language.tag()],
                )?;
                let stored = if changed == 0 { None } else { find_in(&tx, &snippet.id)? };
                deadline.check("update_snippet")?;
                tx.commit()?;
                Ok(stored)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a snippet by id.
    ///
    /// Returns whether a row was removed; a missing id is not an error.
    pub async fn delete_snippet(&self, id: &str) -> Result<bool, Error> {
        self.delete_snippet_by(id, &Deadline::unbounded()).await
    }

    pub async fn delete_snippet_by(&self, id: &str, deadline: &Deadline) -> Result<bool, Error> {
        let id = id.to_string();
        let deadline = deadline.clone();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                deadline.check("delete_snippet")?;
                let tx = conn.transaction()?;
                let count = tx.execute("DELETE FROM snippets WHERE id = ?1", params![id])?;
                deadline.check("delete_snippet")?;
                tx.commit()?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Ids of every snippet whose expiry is at or before `now`.
    pub async fn find_expired_ids(&self, now: DateTime<Utc>) -> Result<Vec<String>, Error> {
        let now = to_db_timestamp(now);
        self.conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt =
                    conn.prepare("SELECT id FROM snippets WHERE expires_at IS NOT NULL AND expires_at <= ?1")?;
                let ids = stmt
                    .query_map(params![now], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(ids)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a batch of snippets in one transaction.
    ///
    /// Returns the number of rows removed. An empty batch touches nothing.
    pub async fn delete_snippets(&self, ids: &[String]) -> Result<u64, Error> {
        self.delete_snippets_by(ids, &Deadline::unbounded()).await
    }

    pub async fn delete_snippets_by(&self, ids: &[String], deadline: &Deadline) -> Result<u64, Error> {
        if ids.is_empty() {
            return Ok(0);
        }

        let ids = ids.to_vec();
        let deadline = deadline.clone();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                deadline.check("delete_snippets")?;
                let tx = conn.transaction()?;
                let mut deleted = 0u64;
                {
                    let mut stmt = tx.prepare("DELETE FROM snippets WHERE id = ?1")?;
                    for id in &ids {
                        deleted += stmt.execute(params![id])? as u64;
                    }
                }
                deadline.check("delete_snippets")?;
                tx.commit()?;
                Ok(deleted)
            })
            .await
            .map_err(Error::from)
    }

    pub async fn count_snippets(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM snippets", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
