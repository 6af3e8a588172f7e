//! Engine construction options.

use crate::request::{SortOrder, SortSpec};

/// Options resolved at engine construction time.
///
/// `from_env` reads (after loading `.env` if present):
/// - `SYNCFOLD_TERM`: initial search term
/// - `SYNCFOLD_SORT_FIELD`: `text` or `completed`
/// - `SYNCFOLD_SORT_ORDER`: `asc` or `desc` (defaults to `asc`)
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Submit the initial list fetch as soon as the pipeline is wired.
    pub initial_load: bool,
    /// Search term for the initial fetch.
    pub initial_term: Option<String>,
    /// Sort for the initial fetch.
    pub initial_sort: Option<SortSpec>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_load: true,
            initial_term: None,
            initial_sort: None,
        }
    }
}

impl EngineConfig {
    /// Resolves the configuration from the environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let initial_term = std::env::var("SYNCFOLD_TERM")
            .ok()
            .filter(|term| !term.is_empty());
        let field = std::env::var("SYNCFOLD_SORT_FIELD")
            .ok()
            .and_then(|raw| raw.parse().ok());
        let order = std::env::var("SYNCFOLD_SORT_ORDER")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(SortOrder::Asc);
        Self {
            initial_load: true,
            initial_term,
            initial_sort: field.map(|field| SortSpec { field, order }),
        }
    }

    #[must_use]
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.initial_term = Some(term.into());
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.initial_sort = Some(sort);
        self
    }

    /// Skip the automatic initial fetch; callers submit the first list
    /// request themselves.
    #[must_use]
    pub fn without_initial_load(mut self) -> Self {
        self.initial_load = false;
        self
    }
}
