//! Pipeline assembly and lifecycle.
//!
//! `SyncEngine` wires the stages together in dependency order: the
//! deferred state proxy is created first (an empty, subscribable
//! placeholder), then the multiplexer, executor, and fold. Only then
//! is the proxy's writer bound to the fold output. Request builders that
//! need read-before-write semantics (toggle) read the proxy, which by
//! construction already existed when they were wired.
//!
//! # Examples
//!
//! ```no_run
//! use syncfold::engine::SyncEngine;
//! use syncfold::item::Item;
//! use syncfold::store::MemoryStore;
//! use syncfold::view::View;
//!
//! # async fn example() -> Result<(), syncfold::engine::EngineError> {
//! let store = MemoryStore::seeded(vec![Item::open("a", "write the report")]);
//! let engine = SyncEngine::new(store)?;
//!
//! // The initial load is already on its way; wait for the first rows.
//! let mut views = engine.views();
//! while views.changed().await.is_ok() {
//!     if let View::List(rows) = &*views.borrow_and_update() {
//!         assert_eq!(rows.len(), 1);
//!         break;
//!     }
//! }
//!
//! // Toggle reads the latest synchronized state through the proxy and
//! // sends the negated flag.
//! engine.toggle("a")?;
//! engine.shutdown().await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

use crate::config::EngineConfig;
use crate::diagnostics::EngineEvent;
use crate::executor::EffectExecutor;
use crate::fold::StateFold;
use crate::mux::{MuxError, RequestHandle, RequestMux};
use crate::proxy::{ProxyError, ProxyReader, StateProxy};
use crate::remote::RemoteApi;
use crate::request::SortSpec;
use crate::view::View;

/// Errors from engine construction and request submission.
#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    /// The engine has shut down; no further requests are accepted.
    #[error("request stream closed")]
    #[diagnostic(code(syncfold::engine::closed))]
    Closed,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Proxy(#[from] ProxyError),

    /// A toggle was requested for an id that is absent from the latest
    /// synchronized snapshot.
    #[error("no synchronized record with id {id}")]
    #[diagnostic(
        code(syncfold::engine::unknown_record),
        help("The record was never loaded or has been removed; refresh with a list request.")
    )]
    UnknownRecord { id: String },
}

impl From<MuxError> for EngineError {
    fn from(_: MuxError) -> Self {
        EngineError::Closed
    }
}

/// The assembled synchronization pipeline.
///
/// Must be constructed inside a tokio runtime: the executor and fold
/// stages are spawned as tasks.
pub struct SyncEngine {
    mux: RequestMux,
    handle: RequestHandle,
    proxy: StateProxy,
    views: watch::Receiver<View>,
    diagnostics: flume::Receiver<EngineEvent>,
    shutdown: Option<oneshot::Sender<()>>,
    executor_task: JoinHandle<()>,
    fold_task: JoinHandle<()>,
}

impl SyncEngine {
    /// Builds the pipeline with default configuration: the initial load
    /// is submitted immediately, unfiltered and unsorted.
    pub fn new(api: Arc<dyn RemoteApi>) -> Result<Self, EngineError> {
        Self::with_config(api, EngineConfig::default())
    }

    pub fn with_config(
        api: Arc<dyn RemoteApi>,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        // Placeholder first: subscribable before any producer exists.
        let proxy = StateProxy::new();

        let mux = RequestMux::new();
        let handle = mux.handle();

        let (view_tx, view_rx) = watch::channel(View::Loading);
        let (diag_tx, diag_rx) = flume::unbounded();
        let (fold_tx, fold_rx) = flume::unbounded();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let executor = EffectExecutor::new(api, mux.receiver(), fold_tx, diag_tx.clone());

        // Retroactive binding: the proxy's unique writer goes to the fold
        // now that the rest of the pipeline exists.
        let writer = proxy.bind_writer()?;
        let fold = StateFold::new(fold_rx, writer, view_tx, diag_tx);

        let executor_task = tokio::spawn(executor.run(shutdown_rx));
        let fold_task = tokio::spawn(fold.run());

        if config.initial_load {
            handle.list(config.initial_term.clone(), config.initial_sort)?;
        }

        Ok(Self {
            mux,
            handle,
            proxy,
            views: view_rx,
            diagnostics: diag_rx,
            shutdown: Some(shutdown_tx),
            executor_task,
            fold_task,
        })
    }

    /// A fresh request producer for an independent event source.
    pub fn requests(&self) -> RequestHandle {
        self.mux.handle()
    }

    /// A reader over the synchronized snapshot history.
    pub fn state(&self) -> ProxyReader {
        self.proxy.reader()
    }

    /// The view channel; holds the latest render tree.
    pub fn views(&self) -> watch::Receiver<View> {
        self.views.clone()
    }

    /// The diagnostics channel (operation failures, stream end).
    pub fn diagnostics(&self) -> flume::Receiver<EngineEvent> {
        self.diagnostics.clone()
    }

    /// Submits an unfiltered list fetch.
    pub fn load(&self) -> Result<u64, EngineError> {
        Ok(self.handle.list(None, None)?)
    }

    /// Submits a filtered and/or sorted list fetch.
    pub fn search(
        &self,
        term: Option<String>,
        sort: Option<SortSpec>,
    ) -> Result<u64, EngineError> {
        Ok(self.handle.list(term, sort)?)
    }

    pub fn create(&self, text: impl Into<String>) -> Result<u64, EngineError> {
        Ok(self.handle.create(text)?)
    }

    pub fn delete(&self, id: impl Into<String>) -> Result<u64, EngineError> {
        Ok(self.handle.delete(id)?)
    }

    /// Builds and submits a toggle request for the record with the given
    /// id. The new flag is the negation of the record's value in the
    /// latest proxy snapshot: the read-before-write that the deferred
    /// proxy exists for. The read reflects every transition folded
    /// strictly before this call; it may race with one that is logically
    /// concurrent, which is the documented staleness window.
    pub fn toggle(&self, id: &str) -> Result<u64, EngineError> {
        let snapshot = self.proxy.reader().latest();
        let record = snapshot
            .find(id)
            .ok_or_else(|| EngineError::UnknownRecord { id: id.to_string() })?;
        Ok(self.handle.toggle(id, !record.completed)?)
    }

    /// Stops accepting requests, lets in-flight calls finish and fold,
    /// and waits for both pipeline tasks to terminate. The diagnostics
    /// channel receives a stream-end event last.
    pub async fn shutdown(self) {
        let Self {
            mux,
            handle,
            proxy,
            views,
            diagnostics,
            shutdown,
            executor_task,
            fold_task,
        } = self;
        drop(handle);
        drop(mux);
        if let Some(stop) = shutdown {
            let _ = stop.send(());
        }
        let _ = executor_task.await;
        let _ = fold_task.await;
        drop((proxy, views, diagnostics));
    }
}
