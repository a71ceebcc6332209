pub mod bookmarks;
pub mod migrations;

use anyhow::anyhow;
use rusqlite::Connection;
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::search::BookmarkLookup;

pub type DbConnection = Arc<Mutex<Connection>>;

/// Local store of bookmarked listings.
#[derive(Clone)]
pub struct Database {
    pub connection: DbConnection,
}

impl Database {
    /// Open (creating if needed) the database at `db_path` and run migrations
    pub fn new(db_path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> anyhow::Result<Self> {
        migrations::run_migrations(&conn)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    pub(crate) fn lock(&self) -> anyhow::Result<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| anyhow!("Database connection mutex poisoned"))
    }
}

impl BookmarkLookup for Database {
    fn bookmarked_ids(&self) -> anyhow::Result<HashSet<i64>> {
        bookmarks::bookmarked_ids(self)
    }
}
