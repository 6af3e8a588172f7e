use serde::{Deserialize, Serialize};

/// A single list record with identity, text, and a completion flag.
///
/// Items are the unit of synchronization: the backend assigns a stable
/// `id` at creation time and every later operation addresses the record
/// by that id. The pipeline never mutates an `Item` in place; state
/// transitions always produce fresh collections.
///
/// # Examples
///
/// ```
/// use syncfold::item::Item;
///
/// let item = Item::open("a1", "write the report");
/// assert!(!item.completed);
///
/// let done = item.toggled();
/// assert!(done.completed);
/// assert_eq!(done.id, item.id);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Server-assigned identity, stable for the record's lifetime and
    /// never reused.
    pub id: String,
    /// The record's text content.
    pub text: String,
    /// Whether the record is marked completed.
    pub completed: bool,
}

impl Item {
    /// Creates an item with an explicit completion flag.
    #[must_use]
    pub fn new(id: &str, text: &str, completed: bool) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            completed,
        }
    }

    /// Creates an open (not completed) item.
    #[must_use]
    pub fn open(id: &str, text: &str) -> Self {
        Self::new(id, text, false)
    }

    /// Creates a completed item.
    #[must_use]
    pub fn done(id: &str, text: &str) -> Self {
        Self::new(id, text, true)
    }

    /// Returns a copy of this item with the completion flag negated.
    #[must_use]
    pub fn toggled(&self) -> Self {
        Self {
            id: self.id.clone(),
            text: self.text.clone(),
            completed: !self.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_construction() {
        let item = Item::new("7", "buy milk", false);
        assert_eq!(item.id, "7");
        assert_eq!(item.text, "buy milk");
        assert!(!item.completed);

        assert_eq!(Item::open("7", "buy milk"), item);
        assert!(Item::done("7", "buy milk").completed);
    }

    #[test]
    fn test_toggled_negates_without_touching_identity() {
        let item = Item::open("a", "x");
        let flipped = item.toggled();
        assert!(flipped.completed);
        assert_eq!(flipped.id, item.id);
        assert_eq!(flipped.text, item.text);
        // Double toggle converges back.
        assert_eq!(flipped.toggled(), item);
    }

    #[test]
    fn test_serialization_round_trip() {
        let original = Item::done("id-1", "ship it");
        let json = serde_json::to_string(&original).expect("serialization failed");
        let parsed: Item = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(original, parsed);
    }
}
