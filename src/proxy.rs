//! Deferred state proxy: read-before-write against the fold's own output.
//!
//! Building a toggle request requires the *latest* synchronized snapshot,
//! but that snapshot is produced by a pipeline stage fed by the very
//! multiplexer the toggle request is about to join: a cycle, if wired
//! naively. The proxy breaks the cycle:
//!
//! 1. It is created empty, before the rest of the pipeline exists.
//! 2. Readers take the buffered latest value on demand; a reader joining
//!    after the first publication still sees it (last-value-cache, not a
//!    one-shot event).
//! 3. Once the pipeline is wired, [`StateProxy::bind_writer`] hands out
//!    the unique [`ProxyWriter`]; the fold is the sole producer, and the
//!    binding happens exactly once.
//!
//! Reads never block the writer and never mutate the cached value. A
//! reader observes every snapshot published strictly before its read but
//! may race with a logically concurrent publication; that staleness
//! window is part of the contract.

use std::sync::Mutex;

use miette::Diagnostic;
use thiserror::Error;
use tokio::sync::watch;

use crate::state::StateSnapshot;

/// Errors from proxy binding and subscription.
#[derive(Debug, Error, Diagnostic)]
pub enum ProxyError {
    /// `bind_writer` was called a second time.
    #[error("proxy writer already bound")]
    #[diagnostic(
        code(syncfold::proxy::already_bound),
        help("The fold owns the unique writer; bind it once while wiring the pipeline.")
    )]
    AlreadyBound,

    /// The channel is closed: the writer or every reader is gone.
    #[error("state proxy closed")]
    #[diagnostic(code(syncfold::proxy::closed))]
    Closed,
}

/// Last-value-cached snapshot channel with deferred writer binding.
pub struct StateProxy {
    seed: watch::Receiver<StateSnapshot>,
    writer_slot: Mutex<Option<watch::Sender<StateSnapshot>>>,
}

impl StateProxy {
    /// Creates the proxy with the unloaded placeholder snapshot buffered.
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(StateSnapshot::default());
        Self {
            seed: rx,
            writer_slot: Mutex::new(Some(tx)),
        }
    }

    /// Subscribes a new reader. Any number of readers may exist; each
    /// immediately observes the currently buffered snapshot.
    pub fn reader(&self) -> ProxyReader {
        ProxyReader {
            rx: self.seed.clone(),
        }
    }

    /// Takes the unique writer. The second call fails: the fold output is
    /// the only producer the proxy ever has.
    pub fn bind_writer(&self) -> Result<ProxyWriter, ProxyError> {
        self.writer_slot
            .lock()
            .expect("writer slot poisoned")
            .take()
            .map(|tx| ProxyWriter { tx })
            .ok_or(ProxyError::AlreadyBound)
    }
}

impl Default for StateProxy {
    fn default() -> Self {
        Self::new()
    }
}

/// The proxy's single producer, owned by the fold.
pub struct ProxyWriter {
    tx: watch::Sender<StateSnapshot>,
}

impl ProxyWriter {
    /// Publishes a snapshot, replacing the buffered value.
    pub fn publish(&self, snapshot: StateSnapshot) -> Result<(), ProxyError> {
        self.tx.send(snapshot).map_err(|_| ProxyError::Closed)
    }
}

/// A subscribed reader.
#[derive(Clone)]
pub struct ProxyReader {
    rx: watch::Receiver<StateSnapshot>,
}

impl ProxyReader {
    /// Takes the buffered latest snapshot without waiting.
    #[must_use]
    pub fn latest(&self) -> StateSnapshot {
        self.rx.borrow().clone()
    }

    /// Waits for the next publication and returns it.
    pub async fn changed(&mut self) -> Result<StateSnapshot, ProxyError> {
        self.rx.changed().await.map_err(|_| ProxyError::Closed)?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Item;

    #[test]
    fn test_writer_binds_exactly_once() {
        let proxy = StateProxy::new();
        let writer = proxy.bind_writer();
        assert!(writer.is_ok());
        assert!(matches!(
            proxy.bind_writer(),
            Err(ProxyError::AlreadyBound)
        ));
    }

    #[test]
    fn test_reader_starts_with_placeholder() {
        let proxy = StateProxy::new();
        let reader = proxy.reader();
        assert!(!reader.latest().is_loaded());
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_cached_value() {
        let proxy = StateProxy::new();
        let writer = proxy.bind_writer().unwrap();
        writer
            .publish(StateSnapshot::loaded(vec![Item::open("a", "x")], 1))
            .unwrap();

        // Subscribed after the publication, reads it anyway.
        let late = proxy.reader();
        let snapshot = late.latest();
        assert_eq!(snapshot.version(), 1);
        assert_eq!(snapshot.len(), 1);
    }

    #[tokio::test]
    async fn test_changed_delivers_next_publication() {
        let proxy = StateProxy::new();
        let writer = proxy.bind_writer().unwrap();
        let mut reader = proxy.reader();

        let wait = tokio::spawn(async move { reader.changed().await });
        writer
            .publish(StateSnapshot::loaded(vec![], 1))
            .unwrap();
        let snapshot = wait.await.unwrap().unwrap();
        assert!(snapshot.is_loaded());
        assert_eq!(snapshot.version(), 1);
    }

    #[tokio::test]
    async fn test_reads_do_not_consume_the_cache() {
        let proxy = StateProxy::new();
        let writer = proxy.bind_writer().unwrap();
        writer.publish(StateSnapshot::loaded(vec![], 7)).unwrap();

        let reader = proxy.reader();
        assert_eq!(reader.latest().version(), 7);
        assert_eq!(reader.latest().version(), 7);
        assert_eq!(proxy.reader().latest().version(), 7);
    }
}
