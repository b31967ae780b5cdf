use anyhow::Result;

use crate::types::PoolTicket;

/// Anything that can answer a saved ticket search.
pub trait TicketSource: Send + Sync {
    /// Returns the tickets matched by `query`, plus whichever of `selected_keys` the source
    /// still knows about so stored references can be resolved server side.
    fn fetch_candidates(&self, query: &str, selected_keys: &[String]) -> Result<Vec<PoolTicket>>;
}

/// Offline ticket source with a fixed catalogue, used when no tracker is reachable.
pub struct DemoTicketSource {
    catalogue: Vec<PoolTicket>,
}

impl DemoTicketSource {
    pub fn new() -> Self {
        let catalogue = [
            ("DEMO-1", "Set up project skeleton", "Done"),
            ("DEMO-2", "Fix login redirect loop", "In Progress"),
            ("DEMO-3", "Write onboarding documentation", "To Do"),
            ("DEMO-4", "Review caching strategy", "In Review"),
            ("OPS-7", "Rotate staging certificates", "To Do"),
            ("OPS-9", "Investigate slow nightly backup", "In Progress"),
        ]
        .into_iter()
        .map(|(key, summary, status)| PoolTicket {
            key: key.to_string(),
            summary: summary.to_string(),
            status: status.to_string(),
        })
        .collect();
        Self { catalogue }
    }

    fn matches(ticket: &PoolTicket, needle: &str) -> bool {
        needle.is_empty()
            || ticket.key.to_lowercase().contains(needle)
            || ticket.summary.to_lowercase().contains(needle)
            || ticket.status.to_lowercase().contains(needle)
    }
}

impl Default for DemoTicketSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketSource for DemoTicketSource {
    fn fetch_candidates(&self, query: &str, selected_keys: &[String]) -> Result<Vec<PoolTicket>> {
        let needle = query.trim().to_lowercase();
        let tickets = self
            .catalogue
            .iter()
            .filter(|ticket| Self::matches(ticket, &needle) || selected_keys.contains(&ticket.key))
            .cloned()
            .collect();
        Ok(tickets)
    }
}

#[cfg(test)]
mod tests {
    use super::{DemoTicketSource, TicketSource};

    #[test]
    fn empty_query_matches_everything() {
        let source = DemoTicketSource::new();
        let all = source.fetch_candidates("", &[]).expect("fetch");
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn filters_case_insensitively() {
        let source = DemoTicketSource::new();
        let keys: Vec<_> = source
            .fetch_candidates("ops", &[])
            .expect("fetch")
            .into_iter()
            .map(|t| t.key)
            .collect();
        assert_eq!(keys, vec!["OPS-7", "OPS-9"]);
    }

    #[test]
    fn known_selected_keys_are_always_returned() {
        let source = DemoTicketSource::new();
        let keys: Vec<_> = source
            .fetch_candidates("certificates", &["DEMO-2".to_string(), "GONE-1".to_string()])
            .expect("fetch")
            .into_iter()
            .map(|t| t.key)
            .collect();
        assert_eq!(keys, vec!["DEMO-2", "OPS-7"]);
    }
}
