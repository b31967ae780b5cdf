//! Activity reports: aggregation of entries over a period and the display numbers derived from it.
use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Days, NaiveDate};

use crate::entry::Entry;
use crate::types::{MonthlyDetail, ProjectSummary, ReportAggregate, TagSummary};

pub const DEFAULT_PROJECT_COLOR: &str = "#007bff";
pub const DEFAULT_TAG_COLOR: &str = "#6c757d";

const EMPHASIS_BASE: f64 = 10.0;
const EMPHASIS_PER_UNIT: f64 = 2.0;
const EMPHASIS_MAX: f64 = 16.0;

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Hours in a free-form duration: `"3h"`, `"2.5h"`, `"2h30"` or a bare number of hours.
/// Anything else counts as zero.
pub fn parse_duration(duration: &str) -> f64 {
    let duration = duration.trim().to_lowercase();
    let hours = if let Some(hours) = duration.strip_suffix('h') {
        hours.trim().parse::<f64>().unwrap_or(0.0)
    } else if let Some((hours, minutes)) = duration.split_once('h') {
        let hours = hours.trim().parse::<f64>().unwrap_or(0.0);
        let minutes = minutes.trim().parse::<f64>().unwrap_or(0.0);
        hours + minutes / 60.0
    } else {
        duration.parse::<f64>().unwrap_or(0.0)
    };
    if hours.is_finite() && hours > 0.0 { hours } else { 0.0 }
}

/// Builds the aggregate for `start..=end` from dated entries.
///
/// Colors come from the project and tag catalogs; unknown names get the default colors.
pub fn aggregate(
    start: NaiveDate,
    end: NaiveDate,
    entries: &[Entry],
    project_colors: &HashMap<String, String>,
    tag_colors: &HashMap<String, String>,
) -> ReportAggregate {
    let mut total_entries = 0;
    let mut total_hours = 0.0;
    let mut projects: BTreeMap<String, (usize, f64)> = BTreeMap::new();
    let mut tags: BTreeMap<String, usize> = BTreeMap::new();
    let mut activity_types: BTreeMap<String, usize> = BTreeMap::new();
    let mut daily_breakdown: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut monthly: BTreeMap<String, (usize, f64)> = BTreeMap::new();

    for entry in entries.iter().filter(|e| e.date() >= start && e.date() <= end) {
        let hours = parse_duration(&entry.duration);
        total_entries += 1;
        total_hours += hours;

        let project = projects.entry(entry.project.clone()).or_default();
        project.0 += 1;
        project.1 += hours;

        for tag in entry.tags() {
            *tags.entry(tag.clone()).or_default() += 1;
        }
        *activity_types.entry(entry.entry_type.clone()).or_default() += 1;
        *daily_breakdown.entry(entry.date()).or_default() += hours;

        let month = monthly
            .entry(entry.date().format("%Y-%m").to_string())
            .or_default();
        month.0 += 1;
        month.1 += hours;
    }

    let mut projects_summary: Vec<ProjectSummary> = projects
        .into_iter()
        .map(|(name, (entries, hours))| ProjectSummary {
            color: project_colors
                .get(&name)
                .cloned()
                .unwrap_or_else(|| DEFAULT_PROJECT_COLOR.to_string()),
            name,
            entries,
            hours,
        })
        .collect();
    projects_summary.sort_by(|a, b| b.hours.total_cmp(&a.hours).then_with(|| a.name.cmp(&b.name)));

    let mut tags_summary: Vec<TagSummary> = tags
        .into_iter()
        .map(|(name, count)| TagSummary {
            color: tag_colors
                .get(&name)
                .cloned()
                .unwrap_or_else(|| DEFAULT_TAG_COLOR.to_string()),
            name,
            count,
        })
        .collect();
    tags_summary.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

    let monthly_details = monthly
        .into_iter()
        .map(|(month, (entries, hours))| MonthlyDetail { month, entries, hours })
        .collect();

    ReportAggregate {
        period_start: start,
        period_end: end,
        total_entries,
        total_hours,
        daily_breakdown,
        projects_summary,
        tags_summary,
        activity_types,
        monthly_details,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectBar {
    pub name: String,
    pub entries: usize,
    pub hours: f64,
    pub color: String,
    /// Share of the total hours, in `[0, 1]`.
    pub fraction: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TagWeight {
    pub name: String,
    pub count: usize,
    pub color: String,
    pub emphasis: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthRow {
    pub month: String,
    pub entries: usize,
    pub hours: f64,
    pub fraction: f64,
}

/// Display-ready numbers for one [`ReportAggregate`]. Recomputed from the aggregate on every
/// render; holds nothing of its own.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportView {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_entries: usize,
    pub total_hours: f64,
    pub average_hours_per_day: f64,
    pub project_bars: Vec<ProjectBar>,
    pub tag_cloud: Vec<TagWeight>,
    pub activity_types: Vec<(String, usize)>,
    pub monthly: Vec<MonthRow>,
}

impl ReportView {
    pub fn from_aggregate(report: &ReportAggregate) -> Self {
        let total_hours = finite_or_zero(report.total_hours);
        let mut activity_types: Vec<(String, usize)> = report
            .activity_types
            .iter()
            .map(|(name, count)| (name.clone(), *count))
            .collect();
        activity_types.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            period_start: report.period_start,
            period_end: report.period_end,
            total_entries: report.total_entries,
            total_hours,
            average_hours_per_day: average_per_day(total_hours, report.daily_breakdown.len()),
            project_bars: report
                .projects_summary
                .iter()
                .map(|project| ProjectBar {
                    name: project.name.clone(),
                    entries: project.entries,
                    hours: project.hours,
                    color: project.color.clone(),
                    fraction: fraction(project.hours, total_hours),
                })
                .collect(),
            tag_cloud: report
                .tags_summary
                .iter()
                .map(|tag| TagWeight {
                    name: tag.name.clone(),
                    count: tag.count,
                    color: tag.color.clone(),
                    emphasis: emphasis(tag.count),
                })
                .collect(),
            activity_types,
            monthly: report
                .monthly_details
                .iter()
                .map(|month| MonthRow {
                    month: month.month.clone(),
                    entries: month.entries,
                    hours: month.hours,
                    fraction: fraction(month.hours, total_hours),
                })
                .collect(),
        }
    }
}

/// `total / days`, or 0 without any day.
pub fn average_per_day(total_hours: f64, days: usize) -> f64 {
    if days == 0 {
        return 0.0;
    }
    finite_or_zero(total_hours / days as f64)
}

/// `part / total` clamped to `[0, 1]`; 0 when there is no total.
pub fn fraction(part: f64, total: f64) -> f64 {
    if !total.is_finite() || total <= 0.0 {
        return 0.0;
    }
    finite_or_zero(part / total).clamp(0.0, 1.0)
}

/// Saturating linear scale: `min(max, base + count * per_unit)`.
pub fn emphasis(count: usize) -> f64 {
    (EMPHASIS_BASE + count as f64 * EMPHASIS_PER_UNIT).min(EMPHASIS_MAX)
}

/// Fixed-width text bar for a fraction in `[0, 1]`.
pub fn bar(fraction: f64, width: usize) -> String {
    let filled = (finite_or_zero(fraction).clamp(0.0, 1.0) * width as f64).round() as usize;
    let mut bar = "█".repeat(filled);
    bar.push_str(&"░".repeat(width - filled));
    bar
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use chrono::NaiveDate;

    use super::{ReportView, aggregate, bar, emphasis, fraction, month_start, parse_duration, week_start};
    use crate::entry::{DEFAULT_ENTRY_TYPE, Entry, EntryField};
    use crate::types::{ProjectSummary, ReportAggregate};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).expect("valid date")
    }

    fn entry(date: NaiveDate, project: &str, duration: &str, tags: &str) -> Entry {
        let mut entry = Entry::new(date, DEFAULT_ENTRY_TYPE);
        entry.set_field(EntryField::Project, project);
        entry.set_field(EntryField::Duration, duration);
        entry.set_tags(tags);
        entry
    }

    fn empty_report() -> ReportAggregate {
        ReportAggregate {
            period_start: day(1),
            period_end: day(31),
            total_entries: 0,
            total_hours: 0.0,
            daily_breakdown: BTreeMap::new(),
            projects_summary: Vec::new(),
            tags_summary: Vec::new(),
            activity_types: BTreeMap::new(),
            monthly_details: Vec::new(),
        }
    }

    #[test]
    fn parses_durations() {
        assert_eq!(parse_duration("3h"), 3.0);
        assert_eq!(parse_duration(" 2.5H "), 2.5);
        assert_eq!(parse_duration("2h30"), 2.5);
        assert_eq!(parse_duration("1.5"), 1.5);
        assert_eq!(parse_duration("soon"), 0.0);
        assert_eq!(parse_duration("-2h"), 0.0);
        assert_eq!(parse_duration("NaNh"), 0.0);
    }

    #[test]
    fn aggregates_entries_in_range() {
        let entries = vec![
            entry(day(1), "Claims", "2h", "bug api"),
            entry(day(1), "Mandate", "1h30", "bug"),
            entry(day(2), "Claims", "3h", ""),
            entry(day(20), "Claims", "8h", "outside"),
        ];
        let colors = HashMap::from([("Claims".to_string(), "#ffc107".to_string())]);
        let report = aggregate(day(1), day(10), &entries, &colors, &HashMap::new());

        assert_eq!(report.total_entries, 3);
        assert_eq!(report.total_hours, 6.5);
        assert_eq!(report.daily_breakdown.len(), 2);
        assert_eq!(report.daily_breakdown[&day(1)], 3.5);
        assert_eq!(report.projects_summary[0].name, "Claims");
        assert_eq!(report.projects_summary[0].color, "#ffc107");
        assert_eq!(report.projects_summary[1].color, "#007bff");
        assert_eq!(report.tags_summary[0].name, "bug");
        assert_eq!(report.tags_summary[0].count, 2);
        assert_eq!(report.activity_types["development"], 3);
        assert_eq!(report.monthly_details.len(), 1);
        assert_eq!(report.monthly_details[0].month, "2026-10");
    }

    #[test]
    fn derives_averages_and_fractions() {
        let entries = vec![
            entry(day(1), "A", "3h", "x"),
            entry(day(2), "B", "1h", "x x"),
        ];
        let report = aggregate(day(1), day(2), &entries, &HashMap::new(), &HashMap::new());
        let view = ReportView::from_aggregate(&report);

        assert_eq!(view.average_hours_per_day, 2.0);
        assert_eq!(view.project_bars[0].fraction, 0.75);
        assert_eq!(view.project_bars[1].fraction, 0.25);
        assert_eq!(view.tag_cloud[0].emphasis, 14.0);
        assert_eq!(view.monthly[0].fraction, 1.0);
    }

    #[test]
    fn zero_hours_never_yield_nan() {
        let mut report = empty_report();
        report.projects_summary.push(ProjectSummary {
            name: "Idle".to_string(),
            entries: 2,
            hours: 0.0,
            color: "#000000".to_string(),
        });
        let view = ReportView::from_aggregate(&report);

        assert_eq!(view.average_hours_per_day, 0.0);
        assert_eq!(view.project_bars[0].fraction, 0.0);
        assert!(view.project_bars.iter().all(|b| b.fraction.is_finite()));
    }

    #[test]
    fn fraction_guards_degenerate_totals() {
        assert_eq!(fraction(1.0, 0.0), 0.0);
        assert_eq!(fraction(1.0, f64::NAN), 0.0);
        assert_eq!(fraction(1.0, f64::INFINITY), 0.0);
        assert_eq!(fraction(5.0, 2.0), 1.0);
    }

    #[test]
    fn emphasis_saturates() {
        assert_eq!(emphasis(0), 10.0);
        assert_eq!(emphasis(2), 14.0);
        assert_eq!(emphasis(3), 16.0);
        assert_eq!(emphasis(500), 16.0);
    }

    #[test]
    fn activity_types_sorted_by_count() {
        let mut report = empty_report();
        report.activity_types.insert("debug".to_string(), 1);
        report.activity_types.insert("meeting".to_string(), 4);
        report.activity_types.insert("development".to_string(), 4);
        let view = ReportView::from_aggregate(&report);

        assert_eq!(view.activity_types[0].0, "development");
        assert_eq!(view.activity_types[1].0, "meeting");
        assert_eq!(view.activity_types[2].0, "debug");
    }

    #[test]
    fn period_starts() {
        // 2026-10-15 is a Thursday.
        assert_eq!(week_start(day(15)), day(12));
        assert_eq!(week_start(day(12)), day(12));
        assert_eq!(month_start(day(15)), day(1));
    }

    #[test]
    fn renders_bars() {
        assert_eq!(bar(0.5, 4), "██░░");
        assert_eq!(bar(f64::NAN, 3), "░░░");
        assert_eq!(bar(2.0, 2), "██");
    }
}
