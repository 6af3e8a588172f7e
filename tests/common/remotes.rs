use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use syncfold::item::Item;
use syncfold::remote::{RemoteApi, RemoteError};
use syncfold::request::SortSpec;
use syncfold::store::MemoryStore;

/// Backend wrapper whose list responses are read immediately but held in
/// transit for a fixed delay: a fast server with a slow wire. Mutations
/// pass straight through.
pub struct DelayedRemote {
    store: Arc<MemoryStore>,
    list_delay: Duration,
}

impl DelayedRemote {
    pub fn new(store: Arc<MemoryStore>, list_delay: Duration) -> Arc<Self> {
        Arc::new(Self { store, list_delay })
    }
}

#[async_trait]
impl RemoteApi for DelayedRemote {
    async fn list(
        &self,
        term: Option<&str>,
        sort: Option<SortSpec>,
    ) -> Result<Vec<Item>, RemoteError> {
        // Capture the payload before the delay: the response carries the
        // state the server had when the request was handled.
        let payload = self.store.list(term, sort).await?;
        tokio::time::sleep(self.list_delay).await;
        Ok(payload)
    }

    async fn create(&self, text: &str) -> Result<Item, RemoteError> {
        self.store.create(text).await
    }

    async fn toggle(&self, id: &str, completed: bool) -> Result<Item, RemoteError> {
        self.store.toggle(id, completed).await
    }

    async fn delete(&self, id: &str) -> Result<bool, RemoteError> {
        self.store.delete(id).await
    }
}

/// Backend wrapper that fails selected operations while delegating the
/// rest to the wrapped store.
pub struct FlakyRemote {
    store: Arc<MemoryStore>,
    fail_list: bool,
    fail_toggle: bool,
}

impl FlakyRemote {
    pub fn failing_list(store: Arc<MemoryStore>) -> Arc<Self> {
        Arc::new(Self {
            store,
            fail_list: true,
            fail_toggle: false,
        })
    }

    pub fn failing_toggle(store: Arc<MemoryStore>) -> Arc<Self> {
        Arc::new(Self {
            store,
            fail_list: false,
            fail_toggle: true,
        })
    }
}

#[async_trait]
impl RemoteApi for FlakyRemote {
    async fn list(
        &self,
        term: Option<&str>,
        sort: Option<SortSpec>,
    ) -> Result<Vec<Item>, RemoteError> {
        if self.fail_list {
            return Err(RemoteError::backend("list endpoint down"));
        }
        self.store.list(term, sort).await
    }

    async fn create(&self, text: &str) -> Result<Item, RemoteError> {
        self.store.create(text).await
    }

    async fn toggle(&self, id: &str, completed: bool) -> Result<Item, RemoteError> {
        if self.fail_toggle {
            return Err(RemoteError::backend("toggle endpoint down"));
        }
        self.store.toggle(id, completed).await
    }

    async fn delete(&self, id: &str) -> Result<bool, RemoteError> {
        self.store.delete(id).await
    }
}
