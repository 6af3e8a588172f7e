//! Pure state transitions derived from tagged responses.
//!
//! Every [`Response`] maps to exactly one [`Transition`] through an
//! exhaustive switch; the fold then applies transitions sequentially to
//! build successive snapshots. Transitions are total and never fail:
//! patching or removing an id that is absent from the previous sequence
//! is a silent no-op for that record.

use crate::item::Item;
use crate::request::Response;

/// A pure state-transition function in data form.
///
/// `apply` consumes the previous record sequence (or `None` before the
/// first fold) and produces the next one. Transitions never mutate the
/// previous sequence.
///
/// # Examples
///
/// ```
/// use syncfold::item::Item;
/// use syncfold::reducers::Transition;
///
/// let prev = vec![Item::open("a", "x"), Item::done("b", "y")];
///
/// let patch = Transition::Patch { item: Item::done("a", "x") };
/// let next = patch.apply(Some(&prev));
/// assert!(next[0].completed);
/// assert_eq!(next[1], prev[1]);
///
/// // Applying the same patch again converges: no duplication, no change.
/// assert_eq!(patch.apply(Some(&next)), next);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Discard the previous sequence and adopt the fetched one verbatim.
    ReplaceAll { items: Vec<Item>, seq: u64 },
    /// Append a newly created record at the end.
    Append { item: Item, seq: u64 },
    /// Replace the record whose id matches, preserving its position.
    Patch { item: Item },
    /// Remove the record whose id matches.
    Remove { id: String },
}

impl Transition {
    /// Maps a tagged response to its transition. Exhaustive: adding a
    /// response variant forces a decision here.
    #[must_use]
    pub fn from_response(response: Response) -> Self {
        match response {
            Response::Listed { items, seq } => Transition::ReplaceAll { items, seq },
            Response::Created { item, seq } => Transition::Append { item, seq },
            Response::Toggled { item, .. } => Transition::Patch { item },
            Response::Deleted { id, .. } => Transition::Remove { id },
        }
    }

    /// Applies this transition to the previous sequence.
    ///
    /// A `None` previous sequence yields the fetched list for
    /// `ReplaceAll` and an empty sequence otherwise; the fold's
    /// raced-create repair restores an appended record that landed before
    /// the first list (see [`crate::fold`]).
    #[must_use]
    pub fn apply(&self, prev: Option<&[Item]>) -> Vec<Item> {
        match self {
            Transition::ReplaceAll { items, .. } => items.clone(),
            Transition::Append { item, .. } => prev
                .map(|items| {
                    let mut next = items.to_vec();
                    next.push(item.clone());
                    next
                })
                .unwrap_or_default(),
            Transition::Patch { item } => prev
                .map(|items| {
                    items
                        .iter()
                        .map(|existing| {
                            if existing.id == item.id {
                                item.clone()
                            } else {
                                existing.clone()
                            }
                        })
                        .collect()
                })
                .unwrap_or_default(),
            Transition::Remove { id } => prev
                .map(|items| {
                    items
                        .iter()
                        .filter(|existing| existing.id != *id)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}
