//! The state fold: the single total order in the system.
//!
//! The fold consumes tagged responses in the exact order the response
//! stream emits them, maps each through [`Transition::from_response`],
//! and applies the transitions sequentially starting from the unloaded
//! state. Every applied transition bumps the fold version and publishes a
//! fresh snapshot through the deferred state proxy and a projected
//! [`View`] on the view channel.
//!
//! # Raced list responses
//!
//! Responses arrive in completion order, not request order, so a slow
//! list fetch can complete after a create that was issued later, and a
//! verbatim replace would then erase the created record. The fold repairs
//! this using the sequence numbers stamped by the multiplexer:
//!
//! - a list response older than an already-folded list is dropped as
//!   stale;
//! - creates folded with a sequence number newer than an incoming list
//!   are re-appended when the fetched payload lacks them.
//!
//! Patches and removals keep the repair log coherent: a re-appended
//! record always carries its most recently folded flag, and a removed
//! record is never revived.

use rustc_hash::FxHashSet;
use tokio::sync::watch;
use tracing::debug;

use crate::diagnostics::EngineEvent;
use crate::item::Item;
use crate::proxy::ProxyWriter;
use crate::reducers::Transition;
use crate::request::Response;
use crate::state::StateSnapshot;
use crate::view::{View, project};

/// One unit of fold input, in response-stream emission order.
pub(crate) enum FoldInput {
    /// A successfully executed operation.
    Response(Response),
    /// A failed list fetch; the state is untouched but the view degrades.
    LoadFailed { detail: String },
}

/// Sequential state accumulator.
#[derive(Default)]
struct FoldCore {
    items: Option<Vec<Item>>,
    version: u64,
    newest_list_seq: Option<u64>,
    /// Creates folded since the newest list, kept for raced-list repair.
    recent_creates: Vec<(u64, Item)>,
}

impl FoldCore {
    /// Applies one transition; returns the new snapshot, or `None` when
    /// the transition was a stale list response and was dropped.
    fn fold(&mut self, transition: Transition) -> Option<StateSnapshot> {
        match &transition {
            Transition::ReplaceAll { items, seq } => {
                if self.newest_list_seq.is_some_and(|newest| *seq < newest) {
                    debug!(seq, "dropping stale list response");
                    return None;
                }
                let mut next = items.clone();
                let revived: Vec<Item> = {
                    let fetched: FxHashSet<&str> =
                        next.iter().map(|item| item.id.as_str()).collect();
                    self.recent_creates
                        .iter()
                        .filter(|(created_seq, item)| {
                            *created_seq > *seq && !fetched.contains(item.id.as_str())
                        })
                        .map(|(_, item)| item.clone())
                        .collect()
                };
                if !revived.is_empty() {
                    debug!(seq, revived = revived.len(), "re-appending raced creates");
                }
                next.extend(revived);
                self.recent_creates.retain(|(created_seq, _)| *created_seq > *seq);
                self.newest_list_seq = Some(*seq);
                self.items = Some(next);
            }
            Transition::Append { item, seq } => {
                self.items = Some(transition.apply(self.items.as_deref()));
                self.recent_creates.push((*seq, item.clone()));
            }
            Transition::Patch { item } => {
                self.items = Some(transition.apply(self.items.as_deref()));
                for (_, pending) in &mut self.recent_creates {
                    if pending.id == item.id {
                        *pending = item.clone();
                    }
                }
            }
            Transition::Remove { id } => {
                self.items = Some(transition.apply(self.items.as_deref()));
                self.recent_creates.retain(|(_, pending)| pending.id != *id);
            }
        }
        self.version += 1;
        Some(StateSnapshot::loaded(
            self.items.clone().unwrap_or_default(),
            self.version,
        ))
    }
}

/// Fold stage of the pipeline: owns the proxy writer and the view
/// channel. Constructed and spawned by the engine.
pub struct StateFold {
    inputs: flume::Receiver<FoldInput>,
    writer: ProxyWriter,
    views: watch::Sender<View>,
    diagnostics: flume::Sender<EngineEvent>,
    core: FoldCore,
}

impl StateFold {
    pub(crate) fn new(
        inputs: flume::Receiver<FoldInput>,
        writer: ProxyWriter,
        views: watch::Sender<View>,
        diagnostics: flume::Sender<EngineEvent>,
    ) -> Self {
        Self {
            inputs,
            writer,
            views,
            diagnostics,
            core: FoldCore::default(),
        }
    }

    /// Drains the input stream until it closes, then announces the end of
    /// the snapshot history.
    pub(crate) async fn run(mut self) {
        while let Ok(input) = self.inputs.recv_async().await {
            match input {
                FoldInput::Response(response) => {
                    let category = response.category();
                    let transition = Transition::from_response(response);
                    if let Some(snapshot) = self.core.fold(transition) {
                        debug!(category, version = snapshot.version(), "folded response");
                        let view = project(&snapshot);
                        if self.writer.publish(snapshot).is_err() {
                            debug!("state proxy has no subscribers left");
                        }
                        let _ = self.views.send(view);
                    }
                }
                FoldInput::LoadFailed { detail } => {
                    let _ = self.views.send(View::Failed(detail));
                }
            }
        }
        let _ = self
            .diagnostics
            .send(EngineEvent::stream_ended(self.core.version));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listed(items: Vec<Item>, seq: u64) -> Transition {
        Transition::ReplaceAll { items, seq }
    }

    #[test]
    fn test_initial_list_defines_state() {
        let mut core = FoldCore::default();
        let snapshot = core
            .fold(listed(
                vec![Item::open("1", "A"), Item::done("2", "B")],
                1,
            ))
            .expect("applied");
        assert_eq!(snapshot.version(), 1);
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.find("2").unwrap().completed);
    }

    #[test]
    fn test_toggle_patches_in_place() {
        let mut core = FoldCore::default();
        core.fold(listed(vec![Item::open("a", "A")], 1)).unwrap();
        let snapshot = core
            .fold(Transition::Patch {
                item: Item::done("a", "A"),
            })
            .expect("applied");
        assert_eq!(snapshot.version(), 2);
        assert_eq!(snapshot.items().unwrap(), &[Item::done("a", "A")]);
    }

    #[test]
    fn test_delete_shrinks_the_sequence() {
        let mut core = FoldCore::default();
        core.fold(listed(
            vec![Item::open("a", "A"), Item::done("b", "B")],
            1,
        ))
        .unwrap();
        let snapshot = core
            .fold(Transition::Remove { id: "b".into() })
            .expect("applied");
        assert_eq!(snapshot.items().unwrap(), &[Item::open("a", "A")]);
    }

    #[test]
    fn test_stale_list_is_dropped() {
        let mut core = FoldCore::default();
        core.fold(listed(vec![Item::open("a", "A")], 5)).unwrap();
        assert!(core.fold(listed(vec![], 2)).is_none());
        // State and version are untouched by the dropped response.
        let snapshot = core
            .fold(Transition::Patch {
                item: Item::done("a", "A"),
            })
            .unwrap();
        assert_eq!(snapshot.version(), 2);
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn test_raced_list_does_not_erase_newer_create() {
        let mut core = FoldCore::default();
        // The create (seq 2) completes before the initial load (seq 1).
        core.fold(Transition::Append {
            item: Item::open("x", "X"),
            seq: 2,
        })
        .unwrap();
        // The slow list payload was read before the create existed.
        let snapshot = core.fold(listed(vec![Item::open("a", "A")], 1)).unwrap();
        let ids: Vec<&str> = snapshot
            .items()
            .unwrap()
            .iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "x"]);
    }

    #[test]
    fn test_raced_create_is_not_duplicated_when_fetched() {
        let mut core = FoldCore::default();
        core.fold(Transition::Append {
            item: Item::open("x", "X"),
            seq: 2,
        })
        .unwrap();
        // The list payload already contains the created record.
        let snapshot = core
            .fold(listed(vec![Item::open("a", "A"), Item::open("x", "X")], 1))
            .unwrap();
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_revived_create_carries_later_patch() {
        let mut core = FoldCore::default();
        core.fold(Transition::Append {
            item: Item::open("x", "X"),
            seq: 2,
        })
        .unwrap();
        core.fold(Transition::Patch {
            item: Item::done("x", "X"),
        })
        .unwrap();
        let snapshot = core.fold(listed(vec![], 1)).unwrap();
        assert_eq!(snapshot.items().unwrap(), &[Item::done("x", "X")]);
    }

    #[test]
    fn test_removed_create_is_never_revived() {
        let mut core = FoldCore::default();
        core.fold(Transition::Append {
            item: Item::open("x", "X"),
            seq: 2,
        })
        .unwrap();
        core.fold(Transition::Remove { id: "x".into() }).unwrap();
        let snapshot = core.fold(listed(vec![], 1)).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_newer_list_prunes_the_repair_log() {
        let mut core = FoldCore::default();
        core.fold(Transition::Append {
            item: Item::open("x", "X"),
            seq: 2,
        })
        .unwrap();
        // A list newer than the create: the server already saw it, so the
        // payload is authoritative and the log entry is retired.
        core.fold(listed(vec![Item::open("x", "X")], 3)).unwrap();
        let snapshot = core.fold(listed(vec![], 4)).unwrap();
        assert!(snapshot.is_empty());
    }
}
