/// Activity report over a date range.
use std::collections::HashMap;

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

use super::{catalog, entries};
use crate::report;
use crate::types::ReportAggregate;

fn colors(items: Vec<crate::types::CatalogItem>) -> HashMap<String, String> {
    items.into_iter().map(|item| (item.name, item.color)).collect()
}

/// Aggregates every entry in `start..=end`. Inactive projects and tags still lend their color.
pub fn generate_activity_report(start: NaiveDate, end: NaiveDate, conn: &Connection) -> Result<ReportAggregate> {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    let entries = entries::load_entries_between(start, end, conn)?;
    let project_colors = colors(catalog::list_projects(true, conn)?);
    let tag_colors = colors(catalog::list_tags(true, conn)?);
    let aggregate = report::aggregate(start, end, &entries, &project_colors, &tag_colors);
    tracing::info!(%start, %end, entries = aggregate.total_entries, "activity report generated");
    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rusqlite::Connection;

    use super::generate_activity_report;
    use crate::db::{entries::save_entry, migrations::run_migrations};
    use crate::entry::{Entry, EntryField};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).expect("valid date")
    }

    #[test]
    fn uses_catalog_colors() {
        let conn = Connection::open_in_memory().expect("open db");
        run_migrations(&conn).expect("migrations");
        let mut entry = Entry::new(day(5), "meeting");
        entry.set_field(EntryField::Project, "Claims");
        entry.set_field(EntryField::Duration, "2h");
        entry.set_tags("bug unlisted");
        save_entry(day(5), &entry, &conn).expect("save");

        let report = generate_activity_report(day(10), day(1), &conn).expect("report");

        assert_eq!(report.period_start, day(1));
        assert_eq!(report.total_hours, 2.0);
        assert_eq!(report.projects_summary[0].color, "#ffc107");
        let bug = report.tags_summary.iter().find(|t| t.name == "bug").expect("bug tag");
        assert_eq!(bug.color, "#dc3545");
        let unlisted = report.tags_summary.iter().find(|t| t.name == "unlisted").expect("custom tag");
        assert_eq!(unlisted.color, "#6c757d");
        assert_eq!(report.activity_types["meeting"], 1);
    }
}
