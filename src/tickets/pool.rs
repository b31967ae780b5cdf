use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use anyhow::Result;

use super::TicketSource;
use crate::types::PoolTicket;

pub type RequestId = u64;

/// Message sent back by a background fetch.
pub type FetchResult = (RequestId, Result<Vec<PoolTicket>>);

/// Outcome of handing a resolved fetch to the pool.
#[derive(Debug, PartialEq, Eq)]
pub enum PoolUpdate {
    /// The response was the latest request; the pool now holds this many tickets.
    Applied(usize),
    /// The latest request failed; the previous pool is kept.
    Failed(String),
    /// A newer request was started after this one; the response was ignored.
    Stale,
}

/// The most recently resolved candidate pool plus the bookkeeping needed to ignore
/// responses that were overtaken by a newer request.
#[derive(Debug, Default)]
pub struct CandidatePool {
    tickets: Vec<PoolTicket>,
    query: String,
    latest: RequestId,
    in_flight: bool,
}

impl CandidatePool {
    pub fn tickets(&self) -> &[PoolTicket] {
        &self.tickets
    }

    /// Query of the latest request, resolved or not.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn begin_fetch(&mut self, query: &str) -> RequestId {
        self.latest += 1;
        self.in_flight = true;
        self.query = query.to_string();
        tracing::debug!(request = self.latest, query, "candidate fetch started");
        self.latest
    }

    pub fn resolve(&mut self, id: RequestId, result: Result<Vec<PoolTicket>>) -> PoolUpdate {
        if id != self.latest {
            tracing::debug!(request = id, latest = self.latest, "stale candidate response discarded");
            return PoolUpdate::Stale;
        }
        self.in_flight = false;
        match result {
            Ok(tickets) => {
                tracing::info!(request = id, count = tickets.len(), "candidate pool replaced");
                self.tickets = tickets;
                PoolUpdate::Applied(self.tickets.len())
            }
            Err(err) => {
                tracing::warn!(request = id, "candidate fetch failed: {err:#}");
                PoolUpdate::Failed(format!("{err:#}"))
            }
        }
    }
}

/// Runs one fetch on a worker thread and reports back through `tx`.
pub fn spawn_fetch(
    source: Arc<dyn TicketSource>,
    id: RequestId,
    query: String,
    selected_keys: Vec<String>,
    tx: Sender<FetchResult>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let result = source.fetch_candidates(&query, &selected_keys);
        // The receiver is gone once the shell has quit.
        let _ = tx.send((id, result));
    })
}
