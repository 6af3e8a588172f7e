//! Effect executor: requests in, tagged responses out.
//!
//! Each request becomes exactly one remote call. Calls run concurrently
//! (the executor never queues behind a slow operation), so responses are
//! forwarded in completion order, which may differ from request order.
//! There are no retries, no cancellation, and no timeouts: a dispatched
//! call always eventually produces a response or an error.
//!
//! Failure isolation: an unhandled error on the shared stream would tear
//! down every downstream consumer, so failures never propagate as stream
//! errors. A failed list fetch degrades the view; a failed mutation is
//! reported as a diagnostic and the pipeline keeps running.

use std::sync::Arc;

use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::sync::oneshot;
use tracing::{instrument, warn};

use crate::diagnostics::EngineEvent;
use crate::fold::FoldInput;
use crate::remote::{RemoteApi, RemoteError};
use crate::request::{Request, Response};

/// Executor stage of the pipeline. Constructed and spawned by the engine.
pub struct EffectExecutor {
    api: Arc<dyn RemoteApi>,
    requests: flume::Receiver<Request>,
    outputs: flume::Sender<FoldInput>,
    diagnostics: flume::Sender<EngineEvent>,
}

impl EffectExecutor {
    pub(crate) fn new(
        api: Arc<dyn RemoteApi>,
        requests: flume::Receiver<Request>,
        outputs: flume::Sender<FoldInput>,
        diagnostics: flume::Sender<EngineEvent>,
    ) -> Self {
        Self {
            api,
            requests,
            outputs,
            diagnostics,
        }
    }

    /// Drains the request stream until it closes or shutdown fires, then
    /// finishes the calls still in flight.
    pub(crate) async fn run(self, mut shutdown: oneshot::Receiver<()>) {
        let mut in_flight = FuturesUnordered::new();
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                received = self.requests.recv_async() => match received {
                    Ok(request) => {
                        let api = Arc::clone(&self.api);
                        in_flight.push(async move {
                            let result = dispatch(api.as_ref(), &request).await;
                            (request, result)
                        });
                    }
                    Err(_) => break,
                },
                Some(outcome) = in_flight.next(), if !in_flight.is_empty() => {
                    self.deliver(outcome);
                }
            }
        }
        while let Some(outcome) = in_flight.next().await {
            self.deliver(outcome);
        }
    }

    fn deliver(&self, (request, result): (Request, Result<Response, RemoteError>)) {
        match result {
            Ok(response) => {
                let _ = self.outputs.send(FoldInput::Response(response));
            }
            Err(error) => {
                warn!(
                    category = request.category(),
                    seq = request.seq(),
                    %error,
                    "remote call failed"
                );
                if matches!(request, Request::List { .. }) {
                    let _ = self.outputs.send(FoldInput::LoadFailed {
                        detail: error.to_string(),
                    });
                    let _ = self
                        .diagnostics
                        .send(EngineEvent::load_failed(error.to_string()));
                } else {
                    let _ = self
                        .diagnostics
                        .send(EngineEvent::op_failed(request.category(), error.to_string()));
                }
            }
        }
    }
}

/// Issues exactly one remote call for the request and tags the result.
#[instrument(skip(api), fields(category = request.category(), seq = request.seq()))]
async fn dispatch(api: &dyn RemoteApi, request: &Request) -> Result<Response, RemoteError> {
    match request {
        Request::List { term, sort, seq } => {
            let items = api.list(term.as_deref(), *sort).await?;
            Ok(Response::Listed { items, seq: *seq })
        }
        Request::Create { text, seq } => {
            let item = api.create(text).await?;
            Ok(Response::Created { item, seq: *seq })
        }
        Request::Toggle {
            id,
            completed,
            seq,
        } => {
            let item = api.toggle(id, *completed).await?;
            Ok(Response::Toggled { item, seq: *seq })
        }
        Request::Delete { id, seq } => {
            let existed = api.delete(id).await?;
            Ok(Response::Deleted {
                id: id.clone(),
                existed,
                seq: *seq,
            })
        }
    }
}
