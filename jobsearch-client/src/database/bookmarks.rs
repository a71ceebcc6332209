use anyhow::Result;
use rusqlite::params;
use std::collections::HashSet;

use crate::database::Database;

#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    pub job_id: i64,
    pub created_at: i64,
}

/// Bookmark a listing. Bookmarking it again keeps the original timestamp.
pub fn add_bookmark(db: &Database, job_id: i64) -> Result<()> {
    let conn = db.lock()?;
    let now = chrono::Utc::now().timestamp_millis();

    conn.execute(
        "INSERT OR IGNORE INTO bookmarked_listings (job_id, created_at) VALUES (?, ?)",
        params![job_id, now],
    )?;

    Ok(())
}

/// Returns whether a bookmark was removed.
pub fn remove_bookmark(db: &Database, job_id: i64) -> Result<bool> {
    let conn = db.lock()?;

    let removed = conn.execute(
        "DELETE FROM bookmarked_listings WHERE job_id = ?",
        params![job_id],
    )?;

    Ok(removed > 0)
}

pub fn is_bookmarked(db: &Database, job_id: i64) -> Result<bool> {
    let conn = db.lock()?;

    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookmarked_listings WHERE job_id = ?",
        params![job_id],
        |row| row.get(0),
    )?;

    Ok(count > 0)
}

/// All bookmarks, most recent first.
pub fn list_bookmarks(db: &Database) -> Result<Vec<Bookmark>> {
    let conn = db.lock()?;

    let mut stmt = conn.prepare(
        "SELECT job_id, created_at
         FROM bookmarked_listings
         ORDER BY created_at DESC, job_id DESC",
    )?;

    let bookmarks = stmt
        .query_map([], |row| {
            Ok(Bookmark {
                job_id: row.get(0)?,
                created_at: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(bookmarks)
}

pub fn bookmarked_ids(db: &Database) -> Result<HashSet<i64>> {
    let conn = db.lock()?;

    let mut stmt = conn.prepare("SELECT job_id FROM bookmarked_listings")?;
    let ids = stmt
        .query_map([], |row| row.get::<_, i64>(0))?
        .collect::<Result<HashSet<_>, _>>()?;

    Ok(ids)
}
