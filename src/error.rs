use chrono::NaiveDate;
use thiserror::Error;

use crate::types::{CatalogId, CatalogKind};

#[derive(Debug, Error)]
pub enum JournalError {
    #[error("unknown entry field '{0}'")]
    UnknownField(String),
    #[error("unknown link field '{0}', expected 'text' or 'url'")]
    UnknownLinkField(String),
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("no entry #{index} on {date}")]
    EntryNotFound { date: NaiveDate, index: usize },
    #[error("{} #{id} not found", .kind.label())]
    CatalogItemNotFound { kind: CatalogKind, id: CatalogId },
}

pub fn parse_date(value: &str) -> Result<NaiveDate, JournalError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| JournalError::InvalidDate(value.to_string()))
}
