//! SQLite-backed item store
//!
//! Keeps one row per review item plus an append-only review log.
//! Rows keep their rowid across upserts, so listing by rowid returns items in
//! the order they were first inserted (catalogue order).

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;

use super::ItemStore;
use crate::error::Result;
use crate::models::{ItemType, ReviewItem, ReviewLog, Timestamp};

const ITEM_COLUMNS: &str = "id, item_type, ease_factor, interval_days, repetitions,
     next_review_date, last_review_date, total_reviews, correct_reviews, average_response_time";

const LOG_COLUMNS: &str = "item_id, item_type, correct, response_time_ms, quality, reviewed_at";

impl ToSql for ItemType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ItemType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|err| FromSqlError::Other(Box::new(err)))
    }
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database file and makes sure the tables exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// SQLite treats a negative LIMIT as unbounded.
fn sql_limit(limit: Option<usize>) -> i64 {
    limit.map_or(-1, |limit| i64::try_from(limit).unwrap_or(i64::MAX))
}

/// Creates tables for review items and the review log, with the indexes used
/// by per-type and due-date queries.
fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS srs_items (
            id TEXT PRIMARY KEY,
            item_type TEXT NOT NULL,
            ease_factor REAL NOT NULL DEFAULT 2.5,
            interval_days INTEGER NOT NULL DEFAULT 0,
            repetitions INTEGER NOT NULL DEFAULT 0,
            next_review_date INTEGER NOT NULL,
            last_review_date INTEGER NOT NULL DEFAULT 0,
            total_reviews INTEGER NOT NULL DEFAULT 0,
            correct_reviews INTEGER NOT NULL DEFAULT 0,
            average_response_time REAL NOT NULL DEFAULT 0
        )",
        (),
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_srs_items_type ON srs_items(item_type)",
        (),
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_srs_items_next_review ON srs_items(next_review_date)",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS review_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            item_id TEXT NOT NULL,
            item_type TEXT NOT NULL,
            correct INTEGER NOT NULL,
            response_time_ms INTEGER NOT NULL,
            quality INTEGER NOT NULL,
            reviewed_at INTEGER NOT NULL
        )",
        (),
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_review_log_item ON review_log(item_id)",
        (),
    )?;

    Ok(())
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<ReviewItem> {
    Ok(ReviewItem {
        id: row.get(0)?,
        item_type: row.get(1)?,
        ease_factor: row.get(2)?,
        interval: row.get(3)?,
        repetitions: row.get(4)?,
        next_review_date: row.get(5)?,
        last_review_date: row.get(6)?,
        total_reviews: row.get(7)?,
        correct_reviews: row.get(8)?,
        average_response_time: row.get(9)?,
    })
}

fn log_from_row(row: &Row<'_>) -> rusqlite::Result<ReviewLog> {
    Ok(ReviewLog {
        item_id: row.get(0)?,
        item_type: row.get(1)?,
        correct: row.get(2)?,
        response_time_ms: row.get::<_, i64>(3)?.max(0) as u64,
        quality: row.get(4)?,
        reviewed_at: row.get(5)?,
    })
}

fn upsert_item(conn: &Connection, item: &ReviewItem) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO srs_items (id, item_type, ease_factor, interval_days, repetitions,
                next_review_date, last_review_date, total_reviews, correct_reviews,
                average_response_time)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
         ON CONFLICT(id) DO UPDATE SET
            item_type = excluded.item_type,
            ease_factor = excluded.ease_factor,
            interval_days = excluded.interval_days,
            repetitions = excluded.repetitions,
            next_review_date = excluded.next_review_date,
            last_review_date = excluded.last_review_date,
            total_reviews = excluded.total_reviews,
            correct_reviews = excluded.correct_reviews,
            average_response_time = excluded.average_response_time",
        params![
            item.id,
            item.item_type,
            item.ease_factor,
            item.interval,
            item.repetitions,
            item.next_review_date,
            item.last_review_date,
            item.total_reviews,
            item.correct_reviews,
            item.average_response_time
        ],
    )?;
    Ok(())
}

fn insert_log(conn: &Connection, log: &ReviewLog) -> rusqlite::Result<()> {
    let response_time_ms = i64::try_from(log.response_time_ms).unwrap_or(i64::MAX);
    conn.execute(
        "INSERT INTO review_log (item_id, item_type, correct, response_time_ms, quality,
                reviewed_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            log.item_id,
            log.item_type,
            log.correct,
            response_time_ms,
            log.quality,
            log.reviewed_at
        ],
    )?;
    Ok(())
}

impl ItemStore for SqliteStore {
    fn get(&self, id: &str) -> Result<Option<ReviewItem>> {
        let item = self
            .conn
            .query_row(
                &format!("SELECT {ITEM_COLUMNS} FROM srs_items WHERE id = ?1"),
                params![id],
                item_from_row,
            )
            .optional()?;
        Ok(item)
    }

    fn put(&mut self, item: &ReviewItem) -> Result<()> {
        upsert_item(&self.conn, item)?;
        Ok(())
    }

    fn list_by_type(&self, item_type: ItemType) -> Result<Vec<ReviewItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM srs_items WHERE item_type = ?1 ORDER BY rowid"
        ))?;
        let items = stmt
            .query_map(params![item_type], item_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    fn list_all(&self) -> Result<Vec<ReviewItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {ITEM_COLUMNS} FROM srs_items ORDER BY rowid"))?;
        let items = stmt
            .query_map([], item_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    /// Filters in SQL using the next-review index.
    fn list_due(&self, item_type: Option<ItemType>, as_of: Timestamp) -> Result<Vec<ReviewItem>> {
        let items = match item_type {
            Some(item_type) => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {ITEM_COLUMNS} FROM srs_items
                     WHERE item_type = ?1 AND next_review_date <= ?2 ORDER BY rowid"
                ))?;
                let due = stmt
                    .query_map(params![item_type, as_of], item_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                due
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {ITEM_COLUMNS} FROM srs_items
                     WHERE next_review_date <= ?1 ORDER BY rowid"
                ))?;
                let due = stmt
                    .query_map(params![as_of], item_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                due
            }
        };
        Ok(items)
    }

    fn record_review(&mut self, log: &ReviewLog) -> Result<()> {
        insert_log(&self.conn, log)?;
        Ok(())
    }

    fn put_reviewed(&mut self, item: &ReviewItem, log: &ReviewLog) -> Result<()> {
        let tx = self.conn.transaction()?;
        upsert_item(&tx, item)?;
        insert_log(&tx, log)?;
        tx.commit()?;
        Ok(())
    }

    fn put_all(&mut self, items: &[ReviewItem], history: &[ReviewLog]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for item in items {
            upsert_item(&tx, item)?;
        }
        for log in history {
            insert_log(&tx, log)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn review_history(&self, limit: Option<usize>) -> Result<Vec<ReviewLog>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {LOG_COLUMNS} FROM review_log ORDER BY reviewed_at DESC, id DESC LIMIT ?1"
        ))?;
        let logs = stmt
            .query_map(params![sql_limit(limit)], log_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(logs)
    }

    fn review_history_for_item(
        &self,
        item_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<ReviewLog>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {LOG_COLUMNS} FROM (
                SELECT id, {LOG_COLUMNS} FROM review_log WHERE item_id = ?1
                ORDER BY reviewed_at DESC, id DESC LIMIT ?2
             ) ORDER BY reviewed_at, id"
        ))?;
        let logs = stmt
            .query_map(params![item_id, sql_limit(limit)], log_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(logs)
    }

    fn clear(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM srs_items", ())?;
        tx.execute("DELETE FROM review_log", ())?;
        tx.commit()?;
        Ok(())
    }

    fn is_empty(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM srs_items", [], |row| row.get(0))?;
        Ok(count == 0)
    }
}
