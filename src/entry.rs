/// Working state of one journal entry and the field-level edits applied to it.
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::JournalError;
use crate::time_mask::mask_time_range;
use crate::tickets;
use crate::types::{Link, LinkField, PoolTicket, TicketCandidate, TicketRef};

pub const DEFAULT_ENTRY_TYPE: &str = "development";

pub const ENTRY_TYPES: &[&str] = &[
    "development",
    "code review",
    "meeting",
    "debug",
    "documentation",
    "training",
    "tech watch",
];

/// Scalar fields addressable through [`Entry::set_field`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryField {
    TimeRange,
    Project,
    EntryType,
    Description,
    Duration,
    Results,
    Blockers,
    Reflections,
}

impl EntryField {
    pub const ALL: [EntryField; 8] = [
        EntryField::TimeRange,
        EntryField::Project,
        EntryField::EntryType,
        EntryField::Description,
        EntryField::Duration,
        EntryField::Results,
        EntryField::Blockers,
        EntryField::Reflections,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EntryField::TimeRange => "Time range",
            EntryField::Project => "Project",
            EntryField::EntryType => "Activity",
            EntryField::Description => "Description",
            EntryField::Duration => "Duration",
            EntryField::Results => "Results",
            EntryField::Blockers => "Blockers",
            EntryField::Reflections => "Reflections",
        }
    }
}

impl FromStr for EntryField {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "time_range" => Ok(EntryField::TimeRange),
            "project" => Ok(EntryField::Project),
            "entry_type" | "type" => Ok(EntryField::EntryType),
            "description" => Ok(EntryField::Description),
            "duration" => Ok(EntryField::Duration),
            "results" => Ok(EntryField::Results),
            "blockers" => Ok(EntryField::Blockers),
            "reflections" => Ok(EntryField::Reflections),
            _ => Err(JournalError::UnknownField(s.to_string())),
        }
    }
}

impl FromStr for LinkField {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(LinkField::Text),
            "url" => Ok(LinkField::Url),
            _ => Err(JournalError::UnknownLinkField(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    date: NaiveDate,
    time_range: String,
    pub project: String,
    pub entry_type: String,
    pub description: String,
    pub duration: String,
    pub results: String,
    pub blockers: String,
    pub reflections: String,
    tags: Vec<String>,
    links: Vec<Link>,
    tickets: Vec<TicketRef>,
}

impl Entry {
    pub fn new(date: NaiveDate, entry_type: &str) -> Self {
        Self {
            date,
            time_range: String::new(),
            project: String::new(),
            entry_type: entry_type.to_string(),
            description: String::new(),
            duration: String::new(),
            results: String::new(),
            blockers: String::new(),
            reflections: String::new(),
            tags: Vec::new(),
            links: Vec::new(),
            tickets: Vec::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Masked time range; empty when unset.
    pub fn time_range(&self) -> &str {
        &self.time_range
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn tickets(&self) -> &[TicketRef] {
        &self.tickets
    }

    pub fn field(&self, field: EntryField) -> &str {
        match field {
            EntryField::TimeRange => &self.time_range,
            EntryField::Project => &self.project,
            EntryField::EntryType => &self.entry_type,
            EntryField::Description => &self.description,
            EntryField::Duration => &self.duration,
            EntryField::Results => &self.results,
            EntryField::Blockers => &self.blockers,
            EntryField::Reflections => &self.reflections,
        }
    }

    /// Replaces one scalar field. The time range only ever stores the masked value.
    pub fn set_field(&mut self, field: EntryField, value: impl Into<String>) {
        let value = value.into();
        match field {
            EntryField::TimeRange => self.time_range = mask_time_range(&value),
            EntryField::Project => self.project = value,
            EntryField::EntryType => self.entry_type = value,
            EntryField::Description => self.description = value,
            EntryField::Duration => self.duration = value,
            EntryField::Results => self.results = value,
            EntryField::Blockers => self.blockers = value,
            EntryField::Reflections => self.reflections = value,
        }
    }

    /// Replaces the tag set with the whitespace separated tokens of `raw`.
    pub fn set_tags(&mut self, raw: &str) {
        self.tags = dedup_tags(tag_tokens(raw));
    }

    /// Rebuilds the tag set from the chosen catalog tags followed by the tokens of `raw`.
    pub fn set_custom_tags(&mut self, raw: &str, chosen: &[String]) {
        self.tags = dedup_tags(chosen.iter().cloned().chain(tag_tokens(raw)));
    }

    /// Tags of the entry that are not part of `catalog`, space separated.
    pub fn custom_tags(&self, catalog: &[String]) -> String {
        self.tags
            .iter()
            .filter(|tag| !catalog.contains(tag))
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn toggle_tag(&mut self, name: &str, present: bool) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        let exists = self.tags.iter().any(|tag| tag == name);
        if present && !exists {
            self.tags.push(name.to_string());
        } else if !present && exists {
            self.tags.retain(|tag| tag != name);
        }
    }

    pub fn add_link(&mut self) {
        self.links.push(Link::default());
    }

    /// Updates one field of the link at `index`. Returns `false` when out of range.
    pub fn set_link(&mut self, index: usize, field: LinkField, value: impl Into<String>) -> bool {
        let Some(link) = self.links.get_mut(index) else {
            return false;
        };
        match field {
            LinkField::Text => link.text = value.into(),
            LinkField::Url => link.url = value.into(),
        }
        true
    }

    pub fn remove_link(&mut self, index: usize) -> bool {
        if index < self.links.len() {
            self.links.remove(index);
            true
        } else {
            false
        }
    }

    /// Links with both a text and a url.
    pub fn complete_links(&self) -> impl Iterator<Item = &Link> {
        self.links
            .iter()
            .filter(|link| !link.text.trim().is_empty() && !link.url.trim().is_empty())
    }

    /// Attaches or detaches a ticket against the given candidate pool.
    pub fn toggle_ticket(&mut self, key: &str, pool: &[PoolTicket]) -> &[TicketRef] {
        self.toggle_ticket_view(key, pool);
        &self.tickets
    }

    /// Like [`Entry::toggle_ticket`], returning the reconciled view after the toggle.
    pub fn toggle_ticket_view(&mut self, key: &str, pool: &[PoolTicket]) -> Vec<TicketCandidate> {
        let toggled = tickets::toggle(key, &self.tickets, pool);
        self.tickets = toggled.refs;
        toggled.view
    }

    pub fn replace_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = dedup_tags(
            tags.into_iter()
                .map(Into::into)
                .map(|tag: String| tag.trim().to_string())
                .filter(|tag| !tag.is_empty()),
        );
    }

    pub fn replace_links(&mut self, links: Vec<Link>) {
        self.links = links;
    }

    /// Replaces the ticket references; a repeated key keeps its first occurrence.
    pub fn replace_tickets(&mut self, refs: Vec<TicketRef>) {
        let mut unique: Vec<TicketRef> = Vec::with_capacity(refs.len());
        for reference in refs {
            if !unique.iter().any(|r| r.key == reference.key) {
                unique.push(reference);
            }
        }
        self.tickets = unique;
    }
}

/// `<base>/browse/<key>`
pub fn ticket_url(key: &str, base: &str) -> String {
    format!("{}/browse/{key}", base.trim_end_matches('/'))
}

fn tag_tokens(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split_whitespace()
        .map(|token| token.strip_prefix('#').unwrap_or(token))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn dedup_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for tag in tags {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{DEFAULT_ENTRY_TYPE, Entry, EntryField, ticket_url};
    use crate::error::JournalError;
    use crate::types::{Link, LinkField, PoolTicket, TicketRef};

    fn entry() -> Entry {
        Entry::new(
            NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date"),
            DEFAULT_ENTRY_TYPE,
        )
    }

    #[test]
    fn new_entry_is_empty() {
        let entry = entry();
        assert_eq!(entry.entry_type, "development");
        assert_eq!(entry.time_range(), "");
        assert!(entry.tags().is_empty());
        assert!(entry.links().is_empty());
        assert!(entry.tickets().is_empty());
    }

    #[test]
    fn time_range_is_stored_masked() {
        let mut entry = entry();
        entry.set_field(EntryField::TimeRange, "14h30 - 16h3");
        assert_eq!(entry.time_range(), "14:30-16:3");
        entry.set_field(EntryField::TimeRange, "not a time");
        assert_eq!(entry.time_range(), "");
    }

    #[test]
    fn set_field_replaces_scalars() {
        let mut entry = entry();
        entry.set_field(EntryField::Project, "Claims");
        entry.set_field(EntryField::Duration, "3h");
        assert_eq!(entry.project, "Claims");
        assert_eq!(entry.field(EntryField::Duration), "3h");
    }

    #[test]
    fn field_names_parse() {
        assert_eq!("time-range".parse::<EntryField>().ok(), Some(EntryField::TimeRange));
        assert_eq!("entry_type".parse::<EntryField>().ok(), Some(EntryField::EntryType));
        assert!(matches!(
            "colour".parse::<EntryField>(),
            Err(JournalError::UnknownField(name)) if name == "colour"
        ));
        assert_eq!("URL".parse::<LinkField>().ok(), Some(LinkField::Url));
    }

    #[test]
    fn set_tags_dedups_and_drops_empty_tokens() {
        let mut entry = entry();
        entry.set_tags("  #backend api  backend # \t#api ");
        assert_eq!(entry.tags(), ["backend", "api"]);
    }

    #[test]
    fn toggle_tag_preserves_order() {
        let mut entry = entry();
        entry.set_tags("a b c");
        entry.toggle_tag("b", false);
        entry.toggle_tag("d", true);
        entry.toggle_tag("a", true);
        assert_eq!(entry.tags(), ["a", "c", "d"]);
    }

    #[test]
    fn custom_tags_follow_the_chosen_catalog_tags() {
        let catalog = vec!["bug".to_string(), "feature".to_string()];
        let mut entry = entry();
        entry.set_tags("feature spike bug");
        entry.set_custom_tags("perf spike", &["feature".to_string(), "bug".to_string()]);
        assert_eq!(entry.tags(), ["feature", "bug", "perf", "spike"]);
        assert_eq!(entry.custom_tags(&catalog), "perf spike");
    }

    #[test]
    fn links_are_edited_by_position() {
        let mut entry = entry();
        entry.add_link();
        entry.add_link();
        assert!(entry.set_link(1, LinkField::Url, "https://example.com"));
        assert!(entry.set_link(1, LinkField::Text, "docs"));
        assert!(!entry.set_link(2, LinkField::Text, "ignored"));
        assert_eq!(entry.links()[0], Link::default());
        assert_eq!(entry.complete_links().count(), 1);
        assert!(entry.remove_link(0));
        assert_eq!(entry.links()[0].text, "docs");
    }

    #[test]
    fn toggle_ticket_uses_pool_summary() {
        let pool = vec![PoolTicket {
            key: "X-2".to_string(),
            summary: "Fix bug".to_string(),
            status: "To Do".to_string(),
        }];
        let mut entry = entry();
        let refs = entry.toggle_ticket("X-2", &pool).to_vec();
        assert_eq!(
            refs,
            vec![TicketRef {
                key: "X-2".to_string(),
                summary: Some("Fix bug".to_string()),
            }]
        );
        assert!(entry.toggle_ticket("X-2", &pool).is_empty());
    }

    #[test]
    fn replace_tickets_collapses_duplicate_keys() {
        let mut entry = entry();
        entry.replace_tickets(vec![
            TicketRef { key: "A-1".to_string(), summary: Some("first".to_string()) },
            TicketRef { key: "A-1".to_string(), summary: None },
            TicketRef { key: "B-2".to_string(), summary: None },
        ]);
        assert_eq!(entry.tickets().len(), 2);
        assert_eq!(entry.tickets()[0].summary.as_deref(), Some("first"));
    }

    #[test]
    fn formats_ticket_urls() {
        assert_eq!(
            ticket_url("X-1", "https://tracker.example.net/"),
            "https://tracker.example.net/browse/X-1"
        );
    }
}
