//! Tagged request and response types for the synchronization pipeline.
//!
//! Every remote operation is described by a [`Request`] variant and
//! answered by the mirroring [`Response`] variant. Both are closed sum
//! types: the effect executor and the reducer stage switch on them
//! exhaustively, so adding an operation is a compile-time event rather
//! than a runtime category string.
//!
//! Requests are immutable and single-use. They carry no identity beyond
//! their payload; responses self-identify through their tag, their echoed
//! key fields, and the `seq` stamped by the request multiplexer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::item::Item;

/// Field a list query sorts by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    /// Sort by record text.
    Text,
    /// Sort by completion flag (open before completed when ascending).
    Completed,
}

/// Direction of a list sort.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Sort instruction accepted by the list operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    #[must_use]
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Ascending sort on the given field.
    #[must_use]
    pub fn ascending(field: SortField) -> Self {
        Self::new(field, SortOrder::Asc)
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(SortField::Text),
            "completed" => Ok(SortField::Completed),
            other => Err(format!("unknown sort field: {other}")),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Description of one intended remote operation.
///
/// `seq` is assigned by the request multiplexer when the request enters
/// the pipeline and increases monotonically across all operations. The
/// fold uses it to recognize list responses that raced with newer
/// mutations (see [`crate::fold`]).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    /// Fetch the full record list, optionally filtered and sorted.
    List {
        term: Option<String>,
        sort: Option<SortSpec>,
        seq: u64,
    },
    /// Create a new record with the given text.
    Create { text: String, seq: u64 },
    /// Set the completion flag of an existing record.
    ///
    /// `completed` is always the negation of the target's last known
    /// flag, read from the deferred state proxy, never a value supplied
    /// directly by the triggering event.
    Toggle {
        id: String,
        completed: bool,
        seq: u64,
    },
    /// Remove an existing record.
    Delete { id: String, seq: u64 },
}

impl Request {
    /// Stable operation label for logging and diagnostics.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Request::List { .. } => "list",
            Request::Create { .. } => "create",
            Request::Toggle { .. } => "toggle",
            Request::Delete { .. } => "delete",
        }
    }

    /// The multiplexer-assigned sequence number.
    #[must_use]
    pub fn seq(&self) -> u64 {
        match self {
            Request::List { seq, .. }
            | Request::Create { seq, .. }
            | Request::Toggle { seq, .. }
            | Request::Delete { seq, .. } => *seq,
        }
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::List { term, sort, seq } => {
                write!(f, "list#{seq} term={term:?} sort={sort:?}")
            }
            Request::Create { text, seq } => write!(f, "create#{seq} {text:?}"),
            Request::Toggle { id, completed, seq } => {
                write!(f, "toggle#{seq} {id} -> {completed}")
            }
            Request::Delete { id, seq } => write!(f, "delete#{seq} {id}"),
        }
    }
}

/// Tagged result of executing a [`Request`].
///
/// Mirrors the request tags one-to-one and echoes the request's `seq` so
/// the fold can order raced list responses against mutations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    /// Full record list as served by the backend.
    Listed { items: Vec<Item>, seq: u64 },
    /// The freshly created record, id assigned by the backend.
    Created { item: Item, seq: u64 },
    /// The record after its completion flag changed.
    Toggled { item: Item, seq: u64 },
    /// Deletion confirmation; `existed` is false when the id was already
    /// gone, which is not an error.
    Deleted {
        id: String,
        existed: bool,
        seq: u64,
    },
}

impl Response {
    /// Stable operation label for logging and diagnostics.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Response::Listed { .. } => "list",
            Response::Created { .. } => "create",
            Response::Toggled { .. } => "toggle",
            Response::Deleted { .. } => "delete",
        }
    }

    /// The sequence number echoed from the originating request.
    #[must_use]
    pub fn seq(&self) -> u64 {
        match self {
            Response::Listed { seq, .. }
            | Response::Created { seq, .. }
            | Response::Toggled { seq, .. }
            | Response::Deleted { seq, .. } => *seq,
        }
    }
}
