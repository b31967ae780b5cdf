//! Keeps an entry's ticket references and the ticket source's candidate pool consistent.
//!
//! The entry's references are the source of truth. The pool is display data: a reference the
//! current pool no longer matches is shown as an orphan, never dropped.
mod pool;
mod source;

use std::collections::HashSet;

use crate::types::{PoolTicket, TicketCandidate, TicketRef};

pub use pool::{CandidatePool, FetchResult, PoolUpdate, spawn_fetch};
pub use source::{DemoTicketSource, TicketSource};

/// Result of toggling one ticket on an entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toggled {
    pub refs: Vec<TicketRef>,
    pub view: Vec<TicketCandidate>,
}

/// Merges the selected references with the candidate pool.
///
/// Pool order comes first, then selected keys the pool does not contain, in selection order.
/// Every key appears at most once.
pub fn reconcile(selected: &[TicketRef], pool: &[PoolTicket]) -> Vec<TicketCandidate> {
    let selected_keys: HashSet<&str> = selected.iter().map(|r| r.key.as_str()).collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut view = Vec::with_capacity(pool.len() + selected.len());

    for ticket in pool {
        if !seen.insert(ticket.key.as_str()) {
            continue;
        }
        view.push(TicketCandidate {
            key: ticket.key.clone(),
            summary: ticket.summary.clone(),
            status: ticket.status.clone(),
            is_selected: selected_keys.contains(ticket.key.as_str()),
            is_available: true,
        });
    }

    for reference in selected {
        if !seen.insert(reference.key.as_str()) {
            continue;
        }
        view.push(TicketCandidate {
            key: reference.key.clone(),
            summary: reference.summary.clone().unwrap_or_default(),
            status: String::new(),
            is_selected: true,
            is_available: false,
        });
    }

    view
}

/// Attaches `key` if it is not selected, detaches it otherwise.
///
/// The summary of a newly attached ticket is taken from the reconciled view, so an orphan
/// can be re-attached with the summary it was stored with. A key found neither in the
/// selection nor in the view leaves the selection untouched.
pub fn toggle(key: &str, selected: &[TicketRef], pool: &[PoolTicket]) -> Toggled {
    let mut refs = selected.to_vec();
    if let Some(index) = refs.iter().position(|r| r.key == key) {
        refs.remove(index);
        tracing::debug!(key, "ticket detached");
    } else {
        let current = reconcile(selected, pool);
        match current.iter().find(|candidate| candidate.key == key) {
            Some(candidate) => {
                refs.push(TicketRef {
                    key: candidate.key.clone(),
                    summary: Some(candidate.summary.clone()).filter(|s| !s.is_empty()),
                });
                tracing::debug!(key, "ticket attached");
            }
            None => {
                tracing::warn!(key, "toggle for a ticket that is neither selected nor offered");
            }
        }
    }

    let view = reconcile(&refs, pool);
    Toggled { refs, view }
}

#[cfg(test)]
mod tests {
    use super::{reconcile, toggle};
    use crate::types::{PoolTicket, TicketRef};

    fn pool_ticket(key: &str, summary: &str) -> PoolTicket {
        PoolTicket {
            key: key.to_string(),
            summary: summary.to_string(),
            status: "To Do".to_string(),
        }
    }

    fn reference(key: &str, summary: Option<&str>) -> TicketRef {
        TicketRef {
            key: key.to_string(),
            summary: summary.map(str::to_string),
        }
    }

    #[test]
    fn marks_selected_pool_tickets() {
        let pool = vec![pool_ticket("X-1", "One"), pool_ticket("X-2", "Two")];
        let view = reconcile(&[reference("X-2", Some("Two"))], &pool);

        assert_eq!(view.len(), 2);
        assert!(!view[0].is_selected);
        assert!(view[1].is_selected);
        assert!(view.iter().all(|c| c.is_available));
    }

    #[test]
    fn attaching_takes_summary_from_pool() {
        let pool = vec![pool_ticket("X-2", "Fix bug")];
        let toggled = toggle("X-2", &[], &pool);

        assert_eq!(toggled.refs, vec![reference("X-2", Some("Fix bug"))]);
        assert!(toggled.view[0].is_selected);
    }

    #[test]
    fn attaching_without_summary_stores_none() {
        let pool = vec![pool_ticket("X-3", "")];
        let toggled = toggle("X-3", &[], &pool);

        assert_eq!(toggled.refs, vec![reference("X-3", None)]);
    }

    #[test]
    fn detaching_keeps_order_of_the_rest() {
        let pool = vec![pool_ticket("X-1", "One")];
        let refs = vec![
            reference("X-1", Some("One")),
            reference("X-2", Some("Two")),
            reference("X-3", None),
        ];
        let toggled = toggle("X-2", &refs, &pool);

        assert_eq!(
            toggled.refs,
            vec![reference("X-1", Some("One")), reference("X-3", None)]
        );
    }

    #[test]
    fn attach_then_detach_restores_original_selection() {
        let pool = vec![pool_ticket("X-1", "One"), pool_ticket("X-9", "Nine")];
        let refs = vec![reference("X-1", Some("One")), reference("Y-4", Some("Old"))];

        let once = toggle("X-9", &refs, &pool);
        let twice = toggle("X-9", &once.refs, &pool);

        assert_eq!(twice.refs, refs);
    }

    #[test]
    fn unknown_key_is_a_no_op() {
        let pool = vec![pool_ticket("X-1", "One")];
        let refs = vec![reference("X-1", Some("One"))];
        let toggled = toggle("NOPE-1", &refs, &pool);

        assert_eq!(toggled.refs, refs);
        assert_eq!(toggled.view, reconcile(&refs, &pool));
    }

    #[test]
    fn duplicate_pool_keys_are_listed_once() {
        let pool = vec![pool_ticket("X-1", "One"), pool_ticket("X-1", "One again")];
        let view = reconcile(&[], &pool);

        assert_eq!(view.len(), 1);
        assert_eq!(view[0].summary, "One");
    }

    /// References the current pool does not match must survive every operation.
    mod orphans {
        use super::{pool_ticket, reference};
        use crate::tickets::{reconcile, toggle};

        #[test]
        fn empty_pool_shows_selections_only() {
            let view = reconcile(&[reference("X-1", None)], &[]);

            assert_eq!(view.len(), 1);
            assert_eq!(view[0].key, "X-1");
            assert!(view[0].is_selected);
            assert!(!view[0].is_available);
            assert_eq!(view[0].summary, "");
            assert_eq!(view[0].status, "");
        }

        #[test]
        fn orphans_follow_pool_in_selection_order() {
            let pool = vec![pool_ticket("A-1", "a"), pool_ticket("A-2", "b")];
            let refs = vec![
                reference("Z-9", Some("zed")),
                reference("A-2", Some("b")),
                reference("M-5", Some("em")),
            ];
            let keys: Vec<String> = reconcile(&refs, &pool).into_iter().map(|c| c.key).collect();

            assert_eq!(keys, vec!["A-1", "A-2", "Z-9", "M-5"]);
        }

        #[test]
        fn orphan_keeps_its_stored_summary() {
            let view = reconcile(&[reference("OLD-3", Some("Legacy import"))], &[]);

            assert_eq!(view[0].summary, "Legacy import");
        }

        #[test]
        fn replacing_the_pool_never_drops_a_reference() {
            let refs = vec![reference("A-1", Some("a")), reference("B-1", Some("b"))];
            let first_pool = vec![pool_ticket("A-1", "a"), pool_ticket("B-1", "b")];
            let second_pool = vec![pool_ticket("C-1", "c")];

            for pool in [&first_pool, &second_pool, &Vec::new()] {
                let view = reconcile(&refs, pool);
                for r in &refs {
                    let matches: Vec<_> = view.iter().filter(|c| c.key == r.key).collect();
                    assert_eq!(matches.len(), 1);
                    assert!(matches[0].is_selected);
                    assert_eq!(matches[0].is_available, pool.iter().any(|p| p.key == r.key));
                }
            }
        }

        #[test]
        fn toggling_another_ticket_keeps_orphans() {
            let refs = vec![reference("OLD-1", Some("gone"))];
            let pool = vec![pool_ticket("NEW-1", "fresh")];
            let toggled = toggle("NEW-1", &refs, &pool);

            assert_eq!(
                toggled.refs,
                vec![reference("OLD-1", Some("gone")), reference("NEW-1", Some("fresh"))]
            );
            assert!(
                toggled
                    .view
                    .iter()
                    .any(|c| c.key == "OLD-1" && c.is_selected && !c.is_available)
            );
        }

        #[test]
        fn detached_orphan_disappears_from_view() {
            let refs = vec![reference("OLD-1", Some("gone"))];
            let toggled = toggle("OLD-1", &refs, &[]);

            assert!(toggled.refs.is_empty());
            assert!(toggled.view.is_empty());
        }

        #[test]
        fn reconcile_properties_hold_over_mixed_inputs() {
            let keys = ["K-1", "K-2", "K-3", "K-4", "K-5"];
            for mask in 0u32..(1 << keys.len()) {
                for pool_mask in 0u32..(1 << keys.len()) {
                    let refs: Vec<_> = keys
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| mask & (1 << i) != 0)
                        .map(|(_, k)| reference(k, None))
                        .collect();
                    let pool: Vec<_> = keys
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| pool_mask & (1 << i) != 0)
                        .map(|(_, k)| pool_ticket(k, k))
                        .collect();
                    let view = reconcile(&refs, &pool);

                    let mut seen = std::collections::HashSet::new();
                    assert!(view.iter().all(|c| seen.insert(c.key.clone())));
                    assert!(refs.iter().all(|r| view.iter().any(|c| c.key == r.key && c.is_selected)));
                    for candidate in &view {
                        let in_pool = pool.iter().any(|p| p.key == candidate.key);
                        assert_eq!(candidate.is_available, in_pool);
                    }
                }
            }
        }
    }
}
