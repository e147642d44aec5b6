//! The persisted wardrobe document.
//!
//! One `WardrobeSnapshot` holds everything the bot knows: items, packing
//! lists, profile, history, feedback. The file backend writes it as a single
//! JSON document; the SQLite backend spreads it over one table per entity.
//! Either way the whole snapshot is saved after every mutation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::history::{FeedbackEntry, HistoryEntry};
use crate::item::Item;
use crate::packing::PackingList;
use crate::profile::Profile;

/// Full wardrobe state, as persisted.
///
/// Items are keyed by id in a BTreeMap so iteration and serialization order
/// are deterministic. The category registry is configuration-declared and is
/// deliberately NOT part of the snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WardrobeSnapshot {
    #[serde(default)]
    pub items: BTreeMap<String, Item>,

    #[serde(default)]
    pub lists: Vec<PackingList>,

    #[serde(default)]
    pub profile: Profile,

    #[serde(default)]
    pub history: Vec<HistoryEntry>,

    #[serde(default)]
    pub feedback: Vec<FeedbackEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemId;
    use chrono::Utc;

    #[test]
    fn empty_snapshot_roundtrips() {
        let snapshot = WardrobeSnapshot::default();
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: WardrobeSnapshot = serde_json::from_str(&json).unwrap();
        assert!(parsed.items.is_empty());
        assert!(parsed.lists.is_empty());
    }

    #[test]
    fn snapshot_with_item_roundtrips() {
        let now = Utc::now();
        let mut snapshot = WardrobeSnapshot::default();
        let id = ItemId::generate("tops", 1, now);
        let item = Item::new(id.clone(), "tops", "playera negra", BTreeMap::new(), now);
        snapshot.items.insert(id.0.clone(), item);

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: WardrobeSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[&id.0].name, "playera negra");
    }

    #[test]
    fn missing_sections_default() {
        // Older documents may lack newer sections; they must still load.
        let parsed: WardrobeSnapshot = serde_json::from_str(r#"{"items":{}}"#).unwrap();
        assert!(parsed.lists.is_empty());
        assert!(!parsed.profile.daily_enabled);
    }
}
