use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::ItemId;

/// Attribution used when an HTTP caller does not name itself.
pub const DEFAULT_ADDED_BY: &str = "SmartHub";

/// One entry on the list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub text: String,
    pub added_by: String,
    pub added_at: NaiveDateTime,
    #[serde(default)]
    pub checked: bool,
}

/// The persisted aggregate. Rewritten in full on every mutation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingList {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub last_updated: Option<NaiveDateTime>,
    /// Next id to hand out. Records written before the counter existed omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_id: Option<u64>,
}

impl ShoppingList {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reserve the next item id.
    ///
    /// Ids never repeat while items survive: the counter only moves forward, and
    /// it is never below `max(id) + 1` even for records without a counter.
    pub fn allocate_id(&mut self) -> ItemId {
        let floor = self.items.iter().map(|i| i.id.0).max().unwrap_or(0) + 1;
        let id = self.next_id.unwrap_or(floor).max(floor);
        self.next_id = Some(id + 1);
        ItemId(id)
    }

    /// Index of the first item whose text matches `needle` case-insensitively.
    pub fn position_of_text(&self, needle: &str) -> Option<usize> {
        let needle = normalize(needle);
        self.items.iter().position(|i| normalize(&i.text) == needle)
    }

    pub fn find_by_id_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    pub fn unchecked(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| !i.checked)
    }

    pub fn checked(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| i.checked)
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(id: u64, text: &str, checked: bool) -> Item {
        Item {
            id: ItemId(id),
            text: text.to_string(),
            added_by: "test".to_string(),
            added_at: NaiveDate::from_ymd_opt(2026, 1, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            checked,
        }
    }

    #[test]
    fn allocate_id_starts_at_one() {
        let mut list = ShoppingList::default();
        assert_eq!(list.allocate_id(), ItemId(1));
        assert_eq!(list.allocate_id(), ItemId(2));
    }

    #[test]
    fn allocate_id_never_reuses_surviving_ids_for_legacy_records() {
        // Ids 1 and 3 survive after 2 was removed; count + 1 would give 3 again.
        let mut list = ShoppingList {
            items: vec![item(1, "a", false), item(3, "c", false)],
            last_updated: None,
            next_id: None,
        };
        assert_eq!(list.allocate_id(), ItemId(4));
    }

    #[test]
    fn allocate_id_keeps_counter_after_removals() {
        let mut list = ShoppingList {
            items: vec![item(1, "a", false)],
            last_updated: None,
            next_id: Some(6),
        };
        assert_eq!(list.allocate_id(), ItemId(6));
    }

    #[test]
    fn text_lookup_is_case_insensitive_and_first_match() {
        let list = ShoppingList {
            items: vec![
                item(1, "Bread", false),
                item(2, "milk", false),
                item(3, "MILK", true),
            ],
            last_updated: None,
            next_id: None,
        };
        assert_eq!(list.position_of_text("  Milk "), Some(1));
        assert_eq!(list.position_of_text("eggs"), None);
    }

    #[test]
    fn legacy_record_without_counter_deserializes() {
        let raw = r#"{
  "items": [
    {"id": 1, "text": "Melk", "added_by": "Ola", "added_at": "2026-01-05T08:30:12.123456", "checked": false}
  ],
  "last_updated": "2026-01-05T08:30:12.200000"
}"#;
        let list: ShoppingList = serde_json::from_str(raw).unwrap();
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].added_by, "Ola");
        assert!(list.last_updated.is_some());
        assert_eq!(list.next_id, None);
    }

    #[test]
    fn empty_list_serializes_null_timestamp() {
        let v = serde_json::to_value(ShoppingList::default()).unwrap();
        assert_eq!(v, serde_json::json!({"items": [], "last_updated": null}));
    }
}
