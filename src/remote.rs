//! The remote API boundary.
//!
//! The pipeline treats the backend purely as an asynchronous function
//! returning tagged results; transport, schema, and persistence live
//! behind this trait. [`crate::store::MemoryStore`] is the in-process
//! implementation used by the bundled server half and by tests.

use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;

use crate::item::Item;
use crate::request::SortSpec;

/// Errors surfaced by the record backend.
#[derive(Debug, Error, Diagnostic)]
pub enum RemoteError {
    /// No record with the requested id exists.
    #[error("no record with id {id}")]
    #[diagnostic(
        code(syncfold::remote::not_found),
        help("The record may have been deleted by an earlier operation.")
    )]
    NotFound { id: String },

    /// The backing store rejected or failed the call.
    #[error("backend error: {0}")]
    #[diagnostic(code(syncfold::remote::backend))]
    Backend(String),
}

impl RemoteError {
    pub fn backend(detail: impl Into<String>) -> Self {
        Self::Backend(detail.into())
    }
}

/// Query/mutation interface exposed by the record backend.
///
/// Each method maps to exactly one remote call. The executor never
/// retries; a failed operation requires a new user-triggered request.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Fetch records, optionally filtered by a case-insensitive substring
    /// of their text and sorted per `sort`.
    async fn list(
        &self,
        term: Option<&str>,
        sort: Option<SortSpec>,
    ) -> Result<Vec<Item>, RemoteError>;

    /// Create a record with the given text; the backend assigns the id
    /// and starts the record open.
    async fn create(&self, text: &str) -> Result<Item, RemoteError>;

    /// Set the completion flag of the record with the given id.
    async fn toggle(&self, id: &str, completed: bool) -> Result<Item, RemoteError>;

    /// Remove the record with the given id. Returns `false` when no such
    /// record existed; absence is not an error.
    async fn delete(&self, id: &str) -> Result<bool, RemoteError>;
}
