/// SQLite storage: journal entries, the project and tag catalogs, preferences and reports.
mod catalog;
mod entries;
mod migrations;
mod preferences;
mod report;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub use catalog::{
    create_project, create_tag, delete_project, delete_tag, list_projects, list_tags, query_item_by_name,
    toggle_project_status, toggle_tag_status, update_project, update_tag,
};
pub use entries::{delete_entry, journal_dates, load_entries_for_date, save_entry, update_entry};
pub use preferences::{TICKET_QUERY, get_preference, set_preference};
pub use report::generate_activity_report;

/// Opens (or creates) the SQLite database and runs migrations.
pub fn init(db_path: &str) -> Result<Connection> {
    let conn = Connection::open(db_path).with_context(|| format!("opening database {db_path}"))?;
    migrations::run_migrations(&conn)?;
    tracing::info!(path = db_path, "database ready");
    Ok(conn)
}

/// Returns the default database path inside the user's data directory.
/// Falls back to `./devjournal.db` when no data dir is found.
pub fn default_db_path() -> String {
    if let Some(data_dir) = dirs::data_local_dir() {
        let journal_dir = data_dir.join("devjournal");
        std::fs::create_dir_all(&journal_dir).ok();
        journal_dir.join("devjournal.db").to_string_lossy().into_owned()
    } else {
        "devjournal.db".to_string()
    }
}

#[cfg(test)]
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}
