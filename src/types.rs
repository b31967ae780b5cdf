use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type CatalogId = u32;

/// Free-form hyperlink attached to an entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub url: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkField {
    Text,
    Url,
}

/// An issue-tracker ticket attached to an entry. The summary is whatever was known
/// about the ticket when it was attached.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRef {
    pub key: String,
    pub summary: Option<String>,
}

/// Raw ticket as delivered by a ticket source (the candidate pool).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolTicket {
    pub key: String,
    pub summary: String,
    pub status: String,
}

/// One row of the reconciled ticket list shown next to an entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TicketCandidate {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub is_selected: bool,
    pub is_available: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogKind {
    Project,
    Tag,
}

impl CatalogKind {
    pub fn table(self) -> &'static str {
        match self {
            CatalogKind::Project => "projects",
            CatalogKind::Tag => "tags",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CatalogKind::Project => "project",
            CatalogKind::Tag => "tag",
        }
    }
}

/// A project or a tag from the administration tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: CatalogId,
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectSummary {
    pub name: String,
    pub entries: usize,
    pub hours: f64,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TagSummary {
    pub name: String,
    pub count: usize,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyDetail {
    /// `YYYY-MM`
    pub month: String,
    pub entries: usize,
    pub hours: f64,
}

/// Activity aggregate over a date range, as computed by the storage backend.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportAggregate {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_entries: usize,
    pub total_hours: f64,
    pub daily_breakdown: BTreeMap<NaiveDate, f64>,
    pub projects_summary: Vec<ProjectSummary>,
    pub tags_summary: Vec<TagSummary>,
    pub activity_types: BTreeMap<String, usize>,
    pub monthly_details: Vec<MonthlyDetail>,
}
