/// Key/value user preferences.
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

/// Last ticket search, re-run when the terminal UI starts.
pub const TICKET_QUERY: &str = "ticket_query";

pub fn get_preference(key: &str, conn: &Connection) -> Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM preferences WHERE key = ?1", [key], |row| row.get(0))
        .optional()?;
    Ok(value)
}

pub fn set_preference(key: &str, value: &str, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO preferences (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        [key, value],
    )?;
    tracing::debug!(key, "preference stored");
    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::{TICKET_QUERY, get_preference, set_preference};
    use crate::db::migrations::run_migrations;

    #[test]
    fn stores_and_overwrites() {
        let conn = Connection::open_in_memory().expect("open db");
        run_migrations(&conn).expect("migrations");

        assert_eq!(get_preference(TICKET_QUERY, &conn).expect("get"), None);
        set_preference(TICKET_QUERY, "ops", &conn).expect("set");
        set_preference(TICKET_QUERY, "demo", &conn).expect("set");
        assert_eq!(get_preference(TICKET_QUERY, &conn).expect("get").as_deref(), Some("demo"));
    }
}
