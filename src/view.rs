//! View projection: snapshot in, render tree out.
//!
//! [`project`] is a pure, total, stateless function; the engine invokes
//! it on every snapshot and hands the resulting [`View`] to an external
//! renderer. The pipeline never touches a display surface itself.

use serde::{Deserialize, Serialize};

use crate::item::Item;
use crate::state::StateSnapshot;

/// One rendered record row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: String,
    pub text: String,
    pub completed: bool,
    /// Render hint: completed rows are struck through.
    pub struck: bool,
}

impl Row {
    fn of(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            text: item.text.clone(),
            completed: item.completed,
            struck: item.completed,
        }
    }
}

/// Render tree handed to an external renderer.
///
/// `Failed` is produced by the engine when a list fetch fails; `project`
/// itself only ever yields the other three variants.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    /// The list has not loaded yet.
    #[default]
    Loading,
    /// Loaded and empty.
    Empty,
    /// One row per record, in snapshot order.
    List(Vec<Row>),
    /// A list fetch failed; carries the failure detail.
    Failed(String),
}

impl View {
    /// The rows, when this view renders a populated list.
    #[must_use]
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            View::List(rows) => Some(rows),
            _ => None,
        }
    }
}

/// Projects a snapshot into its render tree.
///
/// # Examples
///
/// ```
/// use syncfold::item::Item;
/// use syncfold::state::StateSnapshot;
/// use syncfold::view::{View, project};
///
/// assert_eq!(project(&StateSnapshot::default()), View::Loading);
/// assert_eq!(project(&StateSnapshot::loaded(vec![], 1)), View::Empty);
///
/// let loaded = StateSnapshot::loaded(vec![Item::done("a", "x")], 2);
/// let rows = project(&loaded).rows().unwrap().to_vec();
/// assert!(rows[0].struck);
/// ```
#[must_use]
pub fn project(snapshot: &StateSnapshot) -> View {
    match snapshot.items() {
        None => View::Loading,
        Some([]) => View::Empty,
        Some(items) => View::List(items.iter().map(Row::of).collect()),
    }
}
