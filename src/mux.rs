//! Request multiplexer.
//!
//! Merges any number of independently triggered request producers (a
//! one-shot initial load, recurring click streams, search submissions)
//! into a single ordered stream. Emission order across producers is
//! preserved: the channel delivers in send order, with no reordering and
//! no priority. Each accepted request is stamped with the next value of a
//! shared monotonically increasing sequence counter.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use miette::Diagnostic;
use thiserror::Error;

use crate::request::{Request, SortSpec};

/// The request stream has no consumer anymore.
#[derive(Debug, Error, Diagnostic)]
pub enum MuxError {
    #[error("request stream closed")]
    #[diagnostic(
        code(syncfold::mux::closed),
        help("The engine owning the pipeline has shut down.")
    )]
    Closed,
}

/// Owner of the merged request stream.
pub struct RequestMux {
    channel: (flume::Sender<Request>, flume::Receiver<Request>),
    next_seq: Arc<AtomicU64>,
}

impl RequestMux {
    pub fn new() -> Self {
        Self {
            channel: flume::unbounded(),
            next_seq: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Hands out a producer. Handles are cheap to clone and may be held
    /// by any number of independent event sources.
    pub fn handle(&self) -> RequestHandle {
        RequestHandle {
            sender: self.channel.0.clone(),
            next_seq: Arc::clone(&self.next_seq),
        }
    }

    /// The single consumer side, drained by the effect executor.
    pub(crate) fn receiver(&self) -> flume::Receiver<Request> {
        self.channel.1.clone()
    }
}

impl Default for RequestMux {
    fn default() -> Self {
        Self::new()
    }
}

/// A producer of requests for one event source.
///
/// Each method stamps the request with the next sequence number and
/// submits it; the returned value is that sequence number, usable to
/// correlate diagnostics.
#[derive(Clone)]
pub struct RequestHandle {
    sender: flume::Sender<Request>,
    next_seq: Arc<AtomicU64>,
}

impl RequestHandle {
    fn stamp(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed)
    }

    fn submit(&self, request: Request) -> Result<u64, MuxError> {
        let seq = request.seq();
        self.sender.send(request).map_err(|_| MuxError::Closed)?;
        Ok(seq)
    }

    /// Requests a full fetch, optionally filtered and sorted.
    pub fn list(
        &self,
        term: Option<String>,
        sort: Option<SortSpec>,
    ) -> Result<u64, MuxError> {
        let seq = self.stamp();
        self.submit(Request::List { term, sort, seq })
    }

    pub fn create(&self, text: impl Into<String>) -> Result<u64, MuxError> {
        let seq = self.stamp();
        self.submit(Request::Create {
            text: text.into(),
            seq,
        })
    }

    pub fn toggle(&self, id: impl Into<String>, completed: bool) -> Result<u64, MuxError> {
        let seq = self.stamp();
        self.submit(Request::Toggle {
            id: id.into(),
            completed,
            seq,
        })
    }

    pub fn delete(&self, id: impl Into<String>) -> Result<u64, MuxError> {
        let seq = self.stamp();
        self.submit(Request::Delete {
            id: id.into(),
            seq,
        })
    }
}
