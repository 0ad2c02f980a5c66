//! Key/value list editor model
//!
//! Headers, query params and environment variables are all ordered lists of
//! toggleable entries. Every operation here returns a new list; items are
//! addressed by position, never by key, and duplicate keys are kept.

use crate::models::KeyValueItem;

/// Anything that can be switched on and off inside a list
pub trait Toggleable {
    fn is_enabled(&self) -> bool;
}

/// Field of a [`KeyValueItem`] targeted by an update
#[derive(Clone, Debug, PartialEq)]
pub enum KeyValueField {
    Key(String),
    Value(String),
    Enabled(bool),
}

/// A single list mutation issued by a sub-editor
#[derive(Clone, Debug, PartialEq)]
pub enum KeyValueOp {
    Add,
    Update(usize, KeyValueField),
    Toggle(usize),
    Delete(usize),
}

/// Number of enabled entries. This is the badge count and the active-variable count.
pub fn enabled_count<T: Toggleable>(items: &[T]) -> usize {
    items.iter().filter(|item| item.is_enabled()).count()
}

/// Badge text for a list, `None` when nothing is enabled
pub fn badge<T: Toggleable>(items: &[T]) -> Option<usize> {
    match enabled_count(items) {
        0 => None,
        n => Some(n),
    }
}

/// Append an empty, enabled item
pub fn add(items: &[KeyValueItem]) -> Vec<KeyValueItem> {
    let mut next = items.to_vec();
    next.push(KeyValueItem::default());
    next
}

/// Replace one field of the item at `index`. Out-of-range indices leave the list as is.
pub fn update(items: &[KeyValueItem], index: usize, field: KeyValueField) -> Vec<KeyValueItem> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if i != index {
                return item.clone();
            }
            match &field {
                KeyValueField::Key(key) => KeyValueItem {
                    key: key.clone(),
                    ..item.clone()
                },
                KeyValueField::Value(value) => KeyValueItem {
                    value: value.clone(),
                    ..item.clone()
                },
                KeyValueField::Enabled(enabled) => KeyValueItem {
                    enabled: *enabled,
                    ..item.clone()
                },
            }
        })
        .collect()
}

/// Flip `enabled` on the item at `index`; key and value survive the round trip
pub fn toggle(items: &[KeyValueItem], index: usize) -> Vec<KeyValueItem> {
    match items.get(index) {
        Some(item) => update(items, index, KeyValueField::Enabled(!item.enabled)),
        None => items.to_vec(),
    }
}

/// Remove exactly the item at `index`, shifting later items down
pub fn delete(items: &[KeyValueItem], index: usize) -> Vec<KeyValueItem> {
    items
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, item)| item.clone())
        .collect()
}

/// Apply an op and return the resulting list
pub fn apply(items: &[KeyValueItem], op: KeyValueOp) -> Vec<KeyValueItem> {
    match op {
        KeyValueOp::Add => add(items),
        KeyValueOp::Update(index, field) => update(items, index, field),
        KeyValueOp::Toggle(index) => toggle(items, index),
        KeyValueOp::Delete(index) => delete(items, index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<KeyValueItem> {
        vec![
            KeyValueItem::new("Accept", "application/json"),
            KeyValueItem::new("X-Trace", "1"),
            KeyValueItem::new("Accept", "text/plain"),
        ]
    }

    #[test]
    fn test_add_appends_blank_enabled_item() {
        let items = add(&sample());
        assert_eq!(items.len(), 4);
        assert_eq!(items[3], KeyValueItem { key: String::new(), value: String::new(), enabled: true });
    }

    #[test]
    fn test_update_targets_position_not_key() {
        let original = sample();
        let items = update(&original, 2, KeyValueField::Value("*/*".into()));
        assert_eq!(items[0].value, "application/json");
        assert_eq!(items[2].value, "*/*");
        // Input list is untouched
        assert_eq!(original[2].value, "text/plain");
    }

    #[test]
    fn test_update_out_of_range_is_noop() {
        let items = update(&sample(), 9, KeyValueField::Key("x".into()));
        assert_eq!(items, sample());
    }

    #[test]
    fn test_delete_shifts_following_items() {
        let items = delete(&sample(), 0);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].key, "X-Trace");
        assert_eq!(items[1].value, "text/plain");
    }

    #[test]
    fn test_disabled_items_keep_their_contents() {
        let items = toggle(&sample(), 1);
        assert!(!items[1].enabled);
        assert_eq!(enabled_count(&items), 2);

        let items = toggle(&items, 1);
        assert!(items[1].enabled);
        assert_eq!(items[1].key, "X-Trace");
        assert_eq!(items[1].value, "1");
    }

    #[test]
    fn test_badge_suppressed_when_all_disabled() {
        let items = apply(&apply(&sample(), KeyValueOp::Delete(2)), KeyValueOp::Toggle(0));
        let items = apply(&items, KeyValueOp::Update(1, KeyValueField::Enabled(false)));
        assert_eq!(enabled_count(&items), 0);
        assert_eq!(badge(&items), None);
        assert_eq!(badge(&sample()), Some(3));
    }
}
