/// Journal entry queries: one ordered list of entries per day.
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, Row, params};

use crate::entry::{Entry, EntryField};

const DATE_FORMAT: &str = "%Y-%m-%d";

const ENTRY_COLUMNS: &str = "date, time_range, project, entry_type, description, duration, \
     results, blockers, reflections, tags, links, tickets";

fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<(String, [String; 11])> {
    Ok((
        row.get(0)?,
        [
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
            row.get(6)?,
            row.get(7)?,
            row.get(8)?,
            row.get(9)?,
            row.get(10)?,
            row.get(11)?,
        ],
    ))
}

fn build_entry(date: &str, columns: [String; 11]) -> Result<Entry> {
    let [
        time_range,
        project,
        entry_type,
        description,
        duration,
        results,
        blockers,
        reflections,
        tags,
        links,
        tickets,
    ] = columns;
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .with_context(|| format!("stored entry has an invalid date '{date}'"))?;

    let mut entry = Entry::new(date, &entry_type);
    entry.set_field(EntryField::TimeRange, time_range);
    entry.project = project;
    entry.description = description;
    entry.duration = duration;
    entry.results = results;
    entry.blockers = blockers;
    entry.reflections = reflections;
    entry.replace_tags(
        serde_json::from_str::<Vec<String>>(&tags).context("decoding stored tags")?,
    );
    entry.replace_links(serde_json::from_str(&links).context("decoding stored links")?);
    entry.replace_tickets(serde_json::from_str(&tickets).context("decoding stored tickets")?);
    Ok(entry)
}

fn query_entries(sql: &str, params: impl rusqlite::Params, conn: &Connection) -> Result<Vec<Entry>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, entry_from_row)?;
    let mut entries = Vec::new();
    for row in rows {
        let (date, columns) = row?;
        entries.push(build_entry(&date, columns)?);
    }
    Ok(entries)
}

/// Distinct days that have at least one entry, newest first.
pub fn journal_dates(conn: &Connection) -> Result<Vec<NaiveDate>> {
    let mut stmt = conn.prepare("SELECT DISTINCT date FROM entries ORDER BY date DESC")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    let mut dates = Vec::new();
    for row in rows {
        let raw = row?;
        match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
            Ok(date) => dates.push(date),
            Err(_) => tracing::warn!(date = %raw, "skipping journal day with an invalid date"),
        }
    }
    Ok(dates)
}

pub fn load_entries_for_date(date: NaiveDate, conn: &Connection) -> Result<Vec<Entry>> {
    query_entries(
        &format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE date = ?1 ORDER BY position"),
        [date_key(date)],
        conn,
    )
}

/// Entries of every day in `start..=end`, in day then position order.
pub fn load_entries_between(start: NaiveDate, end: NaiveDate, conn: &Connection) -> Result<Vec<Entry>> {
    query_entries(
        &format!(
            "SELECT {ENTRY_COLUMNS} FROM entries WHERE date BETWEEN ?1 AND ?2 ORDER BY date, position"
        ),
        [date_key(start), date_key(end)],
        conn,
    )
}

fn encoded_lists(entry: &Entry) -> Result<(String, String, String)> {
    Ok((
        serde_json::to_string(entry.tags())?,
        serde_json::to_string(entry.links())?,
        serde_json::to_string(entry.tickets())?,
    ))
}

fn insert_entry(date: NaiveDate, position: i64, entry: &Entry, conn: &Connection) -> Result<()> {
    let (tags, links, tickets) = encoded_lists(entry)?;
    conn.execute(
        &format!(
            "INSERT INTO entries ({ENTRY_COLUMNS}, position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
        ),
        params![
            date_key(date),
            entry.time_range(),
            entry.project,
            entry.entry_type,
            entry.description,
            entry.duration,
            entry.results,
            entry.blockers,
            entry.reflections,
            tags,
            links,
            tickets,
            position,
        ],
    )?;
    Ok(())
}

fn rewrite_entry(id: i64, entry: &Entry, conn: &Connection) -> Result<()> {
    let (tags, links, tickets) = encoded_lists(entry)?;
    conn.execute(
        "UPDATE entries SET time_range = ?1, project = ?2, entry_type = ?3, description = ?4,
             duration = ?5, results = ?6, blockers = ?7, reflections = ?8,
             tags = ?9, links = ?10, tickets = ?11
         WHERE id = ?12",
        params![
            entry.time_range(),
            entry.project,
            entry.entry_type,
            entry.description,
            entry.duration,
            entry.results,
            entry.blockers,
            entry.reflections,
            tags,
            links,
            tickets,
            id,
        ],
    )?;
    Ok(())
}

/// Row id of the entry at `index` on `date`.
fn entry_id(date: NaiveDate, index: usize, conn: &Connection) -> Result<Option<i64>> {
    let mut stmt =
        conn.prepare("SELECT id FROM entries WHERE date = ?1 ORDER BY position LIMIT 1 OFFSET ?2")?;
    let mut rows = stmt.query(params![date_key(date), index as i64])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row.get(0)?))
    } else {
        Ok(None)
    }
}

/// Appends `entry` to the list of `date`.
///
/// The entry is stored under `date` even if it was created for another day.
pub fn save_entry(date: NaiveDate, entry: &Entry, conn: &Connection) -> Result<()> {
    let position: i64 = conn.query_row(
        "SELECT COALESCE(MAX(position) + 1, 0) FROM entries WHERE date = ?1",
        [date_key(date)],
        |row| row.get(0),
    )?;
    insert_entry(date, position, entry, conn)?;
    tracing::info!(%date, position, "entry saved");
    Ok(())
}

/// Replaces the entry at `index` on `date`. Returns `false` when there is no such entry.
pub fn update_entry(date: NaiveDate, index: usize, entry: &Entry, conn: &Connection) -> Result<bool> {
    let Some(id) = entry_id(date, index, conn)? else {
        tracing::warn!(%date, index, "update of a missing entry");
        return Ok(false);
    };
    rewrite_entry(id, entry, conn)?;
    tracing::info!(%date, index, "entry updated");
    Ok(true)
}

/// Deletes the entry at `index` on `date` and re-packs the remaining positions.
/// Returns `false` when there is no such entry.
pub fn delete_entry(date: NaiveDate, index: usize, conn: &Connection) -> Result<bool> {
    let Some(id) = entry_id(date, index, conn)? else {
        tracing::warn!(%date, index, "delete of a missing entry");
        return Ok(false);
    };
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM entries WHERE id = ?1", [id])?;
    tx.execute(
        "UPDATE entries SET position = position - 1 WHERE date = ?1 AND position > ?2",
        params![date_key(date), index as i64],
    )?;
    tx.commit()?;
    tracing::info!(%date, index, "entry deleted");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rusqlite::Connection;

    use super::{delete_entry, journal_dates, load_entries_between, load_entries_for_date, save_entry, update_entry};
    use crate::db::migrations::run_migrations;
    use crate::entry::{DEFAULT_ENTRY_TYPE, Entry, EntryField};
    use crate::types::{LinkField, TicketRef};

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().expect("open db");
        run_migrations(&conn).expect("migrations");
        conn
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).expect("valid date")
    }

    fn entry(date: NaiveDate, description: &str) -> Entry {
        let mut entry = Entry::new(date, DEFAULT_ENTRY_TYPE);
        entry.set_field(EntryField::Description, description);
        entry
    }

    fn descriptions(entries: &[Entry]) -> Vec<String> {
        entries.iter().map(|e| e.description.clone()).collect()
    }

    #[test]
    fn round_trips_every_entry_part() {
        let conn = conn();
        let mut original = entry(day(3), "wrote parser");
        original.set_field(EntryField::TimeRange, "09001030");
        original.set_field(EntryField::Project, "Claims");
        original.set_field(EntryField::Duration, "1h30");
        original.set_tags("#bug api");
        original.add_link();
        original.set_link(0, LinkField::Text, "PR");
        original.set_link(0, LinkField::Url, "https://example.test/pr/1");
        original.replace_tickets(vec![TicketRef {
            key: "DEMO-2".to_string(),
            summary: Some("Fix login redirect loop".to_string()),
        }]);

        save_entry(day(3), &original, &conn).expect("save");
        let loaded = load_entries_for_date(day(3), &conn).expect("load");

        assert_eq!(loaded, vec![original]);
        assert_eq!(loaded[0].time_range(), "09:00-10:30");
    }

    #[test]
    fn appends_and_lists_days_newest_first() {
        let conn = conn();
        save_entry(day(1), &entry(day(1), "a"), &conn).expect("save");
        save_entry(day(2), &entry(day(2), "b"), &conn).expect("save");
        save_entry(day(1), &entry(day(1), "c"), &conn).expect("save");

        assert_eq!(journal_dates(&conn).expect("dates"), vec![day(2), day(1)]);
        assert_eq!(
            descriptions(&load_entries_for_date(day(1), &conn).expect("load")),
            vec!["a", "c"]
        );
        assert_eq!(load_entries_between(day(1), day(2), &conn).expect("range").len(), 3);
    }

    #[test]
    fn save_files_the_entry_under_the_given_day() {
        let conn = conn();
        let drafted = entry(day(4), "drafted on the 4th");

        save_entry(day(6), &drafted, &conn).expect("save");

        assert!(load_entries_for_date(day(4), &conn).expect("load").is_empty());
        let stored = load_entries_for_date(day(6), &conn).expect("load");
        assert_eq!(stored[0].date(), day(6));
        assert_eq!(drafted.date(), day(4));
    }

    #[test]
    fn update_replaces_in_place() {
        let conn = conn();
        save_entry(day(1), &entry(day(1), "a"), &conn).expect("save");
        save_entry(day(1), &entry(day(1), "b"), &conn).expect("save");

        assert!(update_entry(day(1), 1, &entry(day(1), "B"), &conn).expect("update"));
        assert!(!update_entry(day(1), 5, &entry(day(1), "x"), &conn).expect("update"));
        assert_eq!(
            descriptions(&load_entries_for_date(day(1), &conn).expect("load")),
            vec!["a", "B"]
        );
    }

    #[test]
    fn delete_keeps_indices_contiguous() {
        let conn = conn();
        for name in ["a", "b", "c"] {
            save_entry(day(1), &entry(day(1), name), &conn).expect("save");
        }

        assert!(delete_entry(day(1), 0, &conn).expect("delete"));
        assert!(!delete_entry(day(1), 2, &conn).expect("delete"));
        save_entry(day(1), &entry(day(1), "d"), &conn).expect("save");
        assert!(delete_entry(day(1), 1, &conn).expect("delete"));

        assert_eq!(
            descriptions(&load_entries_for_date(day(1), &conn).expect("load")),
            vec!["b", "d"]
        );
    }
}
