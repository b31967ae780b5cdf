/// Database migrations and schema management.
use anyhow::Result;
use rusqlite::Connection;

/// Schema version after the default catalogue has been seeded.
const SEEDED_VERSION: i32 = 1;

/// Creates the schema if it doesn't exist yet and seeds the default catalogue once.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS entries (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            date        TEXT    NOT NULL,
            position    INTEGER NOT NULL,
            time_range  TEXT    NOT NULL DEFAULT '',
            project     TEXT    NOT NULL DEFAULT '',
            entry_type  TEXT    NOT NULL DEFAULT 'development',
            description TEXT    NOT NULL DEFAULT '',
            duration    TEXT    NOT NULL DEFAULT '',
            results     TEXT    NOT NULL DEFAULT '',
            blockers    TEXT    NOT NULL DEFAULT '',
            reflections TEXT    NOT NULL DEFAULT '',
            tags        TEXT    NOT NULL DEFAULT '[]',
            links       TEXT    NOT NULL DEFAULT '[]',
            tickets     TEXT    NOT NULL DEFAULT '[]'
        );

        CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(date, position);

        CREATE TABLE IF NOT EXISTS projects (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT    NOT NULL UNIQUE,
            description TEXT,
            color       TEXT    NOT NULL DEFAULT '#007bff',
            active      INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS tags (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT    NOT NULL UNIQUE,
            description TEXT,
            color       TEXT    NOT NULL DEFAULT '#6c757d',
            active      INTEGER NOT NULL DEFAULT 1
        );

        CREATE TABLE IF NOT EXISTS preferences (
            key         TEXT    PRIMARY KEY,
            value       TEXT    NOT NULL
        );
        ",
    )?;
    seed_defaults(conn)?;
    Ok(())
}

fn seed_defaults(conn: &Connection) -> Result<()> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version >= SEEDED_VERSION {
        return Ok(());
    }

    conn.execute_batch(
        "
        BEGIN;
        INSERT OR IGNORE INTO projects (name, description, color) VALUES
            ('Mandate', 'Mandate management', '#28a745'),
            ('Instance', 'Meeting management', '#007bff'),
            ('Claims', 'Claims handling', '#ffc107'),
            ('Negociation', 'Negotiation module', '#17a2b8'),
            ('Socle', 'Technical foundation', '#6c757d'),
            ('Formation', 'Training and tech watch', '#e83e8c'),
            ('Maintenance', 'Maintenance and fixes', '#fd7e14');

        INSERT OR IGNORE INTO tags (name, description, color) VALUES
            ('bug', 'Bug fixing', '#dc3545'),
            ('feature', 'New feature', '#28a745'),
            ('refactor', 'Code refactoring', '#6f42c1'),
            ('test', 'Tests and QA', '#20c997'),
            ('documentation', 'Documentation', '#0dcaf0'),
            ('release', 'Release preparation', '#fd7e14'),
            ('meeting', 'Meetings and discussions', '#6c757d'),
            ('review', 'Code review', '#e83e8c'),
            ('performance', 'Performance work', '#ffc107'),
            ('security', 'Security', '#dc3545'),
            ('deployment', 'Deployment', '#198754'),
            ('research', 'Research and proofs of concept', '#0d6efd'),
            ('maintenance', 'Technical maintenance', '#fd7e14'),
            ('support', 'User support', '#6610f2'),
            ('planning', 'Planning and estimation', '#6f42c1');
        PRAGMA user_version = 1;
        COMMIT;
        ",
    )?;
    tracing::info!("default projects and tags seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::run_migrations;

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .expect("count rows")
    }

    #[test]
    fn seeds_catalogue_once() {
        let conn = Connection::open_in_memory().expect("open db");
        run_migrations(&conn).expect("first run");
        assert_eq!(count(&conn, "projects"), 7);
        assert_eq!(count(&conn, "tags"), 15);

        conn.execute("DELETE FROM tags WHERE name = 'bug'", [])
            .expect("delete tag");
        run_migrations(&conn).expect("second run");
        assert_eq!(count(&conn, "tags"), 14);
    }
}
