use syncfold::item::Item;

/// The canonical two-record baseline: one open, one completed.
pub fn two_records() -> Vec<Item> {
    vec![Item::open("1", "A"), Item::done("2", "B")]
}

pub fn groceries() -> Vec<Item> {
    vec![
        Item::open("g1", "buy milk"),
        Item::done("g2", "walk the dog"),
        Item::open("g3", "buy coffee"),
    ]
}
