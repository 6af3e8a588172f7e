//! In-memory record store: the collaborator side of the pipeline.
//!
//! `MemoryStore` is an explicitly owned store object with a single
//! exclusive writer (the mutex), handed around by `Arc` rather than
//! captured as ambient state. It implements [`RemoteApi`] directly, so
//! an engine can run fully in-process.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::item::Item;
use crate::remote::{RemoteApi, RemoteError};
use crate::request::{SortField, SortOrder, SortSpec};

/// Owned, insertion-ordered record store.
///
/// # Examples
///
/// ```no_run
/// use syncfold::store::MemoryStore;
///
/// # async fn example() -> Result<(), syncfold::remote::RemoteError> {
/// use syncfold::remote::RemoteApi;
///
/// let store = MemoryStore::new();
/// let created = store.create("learn dataflow").await?;
/// let listed = store.list(Some("dataflow"), None).await?;
/// assert_eq!(listed, vec![created]);
/// # Ok(())
/// # }
/// ```
pub struct MemoryStore {
    records: Mutex<Vec<Item>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Arc<Self> {
        Self::seeded(Vec::new())
    }

    /// Creates a store pre-populated with the given records, preserving
    /// their order and ids.
    pub fn seeded(items: Vec<Item>) -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(items),
        })
    }

    /// Current record count.
    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    /// Copy of the full record list in insertion order, bypassing search
    /// and sort.
    pub async fn dump(&self) -> Vec<Item> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl RemoteApi for MemoryStore {
    async fn list(
        &self,
        term: Option<&str>,
        sort: Option<SortSpec>,
    ) -> Result<Vec<Item>, RemoteError> {
        let records = self.records.lock().await;
        let mut selected: Vec<Item> = match term {
            Some(term) if !term.is_empty() => {
                let needle = term.to_lowercase();
                records
                    .iter()
                    .filter(|item| item.text.to_lowercase().contains(&needle))
                    .cloned()
                    .collect()
            }
            _ => records.clone(),
        };
        drop(records);

        if let Some(spec) = sort {
            let key = move |a: &Item, b: &Item| match spec.field {
                SortField::Text => a.text.cmp(&b.text),
                SortField::Completed => a.completed.cmp(&b.completed),
            };
            match spec.order {
                SortOrder::Asc => selected.sort_by(key),
                SortOrder::Desc => selected.sort_by(move |a, b| key(b, a)),
            }
        }
        Ok(selected)
    }

    async fn create(&self, text: &str) -> Result<Item, RemoteError> {
        let item = Item {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            completed: false,
        };
        self.records.lock().await.push(item.clone());
        Ok(item)
    }

    async fn toggle(&self, id: &str, completed: bool) -> Result<Item, RemoteError> {
        let mut records = self.records.lock().await;
        match records.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.completed = completed;
                Ok(item.clone())
            }
            None => Err(RemoteError::NotFound { id: id.to_string() }),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool, RemoteError> {
        let mut records = self.records.lock().await;
        match records.iter().position(|item| item.id == id) {
            Some(index) => {
                records.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
