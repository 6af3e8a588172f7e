use std::time::Duration;

use tokio::sync::watch;

use syncfold::diagnostics::EngineEvent;
use syncfold::proxy::ProxyReader;
use syncfold::state::StateSnapshot;
use syncfold::view::View;

const WAIT: Duration = Duration::from_secs(5);

/// Waits until the view channel holds a view matching the predicate.
pub async fn wait_for_view<F>(views: &mut watch::Receiver<View>, mut pred: F) -> View
where
    F: FnMut(&View) -> bool,
{
    tokio::time::timeout(WAIT, async {
        loop {
            let current = views.borrow_and_update().clone();
            if pred(&current) {
                return current;
            }
            views
                .changed()
                .await
                .expect("view channel closed before the expected view arrived");
        }
    })
    .await
    .expect("timed out waiting for view")
}

/// Waits until the proxy holds a snapshot matching the predicate.
pub async fn wait_for_state<F>(reader: &mut ProxyReader, mut pred: F) -> StateSnapshot
where
    F: FnMut(&StateSnapshot) -> bool,
{
    tokio::time::timeout(WAIT, async {
        loop {
            let current = reader.latest();
            if pred(&current) {
                return current;
            }
            reader
                .changed()
                .await
                .expect("state proxy closed before the expected snapshot arrived");
        }
    })
    .await
    .expect("timed out waiting for state")
}

/// Waits for the next diagnostic matching the predicate, discarding
/// earlier ones.
pub async fn wait_for_diagnostic<F>(
    events: &flume::Receiver<EngineEvent>,
    mut pred: F,
) -> EngineEvent
where
    F: FnMut(&EngineEvent) -> bool,
{
    tokio::time::timeout(WAIT, async {
        loop {
            let event = events
                .recv_async()
                .await
                .expect("diagnostics channel closed before the expected event arrived");
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for diagnostic")
}
