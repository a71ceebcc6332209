use std::path::PathBuf;

use crate::config::ClientConfig;

/// Returns the path to the bookmark database
///
/// A `[database] path` in the config wins; otherwise the platform data dir
/// is used:
///
/// - **macOS**: `~/Library/Application Support/jobsearch/bookmarks.sqlite`
/// - **Linux**: `~/.local/share/jobsearch/bookmarks.sqlite`
/// - **Windows**: `%LOCALAPPDATA%\jobsearch\bookmarks.sqlite`
pub fn get_db_path(config: &ClientConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = config.database.as_ref().and_then(|db| db.path.as_ref()) {
        return Ok(PathBuf::from(path));
    }

    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("jobsearch").join("bookmarks.sqlite"))
}

/// Open the bookmark database, creating it on first use
pub fn initialize_database(config: &ClientConfig) -> anyhow::Result<crate::database::Database> {
    let db_path = get_db_path(config)?;
    tracing::debug!("Opening bookmark database at {:?}", db_path);
    crate::database::Database::new(&db_path)
}
