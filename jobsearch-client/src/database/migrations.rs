use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS bookmarked_listings (
            job_id INTEGER PRIMARY KEY,
            created_at BIGINT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_bookmarked_listings_created_at
            ON bookmarked_listings (created_at)",
        [],
    )?;

    Ok(())
}
