//! Item and status domain types.
//!
//! An `Item` is a single wardrobe entry: one pair of boots, one shirt, one
//! smartwatch band. Items belong to a configuration-declared category and
//! move freely between the four lifecycle statuses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unique, opaque identifier for an item.
///
/// Format: `{category}_{count}_{yyyymmddhhmmss}`, e.g. `calzado_3_20260829071500`.
/// The trailing digits make ids unique across restarts; the short suffix is
/// what users type into status commands.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl ItemId {
    /// Build an id from its parts. `count` is the store's item count + 1.
    pub fn generate(category: &str, count: usize, now: DateTime<Utc>) -> Self {
        Self(format!("{category}_{count}_{}", now.format("%Y%m%d%H%M%S")))
    }

    /// The last four characters — the short id shown in summaries.
    pub fn short(&self) -> &str {
        let n = self.0.len();
        &self.0[n.saturating_sub(4)..]
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of an item.
///
/// Transitions are unconstrained: any status is reachable from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Available to wear
    Clean,
    /// In the laundry pile
    Dirty,
    /// Whereabouts unknown
    Lost,
    /// Needs repair or disposal
    Damaged,
}

impl ItemStatus {
    /// Parse from a command name (`dirty`, `clean`, `lost`, `damaged`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "clean" => Some(Self::Clean),
            "dirty" => Some(Self::Dirty),
            "lost" => Some(Self::Lost),
            "damaged" => Some(Self::Damaged),
            _ => None,
        }
    }

    /// Marker rendered next to the item name in summaries.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Clean => "✅",
            Self::Dirty => "🧺",
            Self::Lost => "❓",
            Self::Damaged => "⚠️",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Clean => "clean",
            Self::Dirty => "dirty",
            Self::Lost => "lost",
            Self::Damaged => "damaged",
        };
        write!(f, "{s}")
    }
}

/// A single wardrobe entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique item ID
    pub id: ItemId,

    /// Display name ("Dr Martens 1460 negras")
    pub name: String,

    /// Category, from the configured registry
    pub category: String,

    /// Lifecycle status
    pub status: ItemStatus,

    /// Free-text note attached to the last status change (unvalidated)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_reason: Option<String>,

    /// Free-form descriptive attributes (brand, color, model, fit, notes).
    /// BTreeMap so serialization order is deterministic.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,

    /// When the item was added
    pub added: DateTime<Utc>,

    /// How many recorded wears
    #[serde(default)]
    pub times_worn: u32,

    /// When the item was last worn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_worn: Option<DateTime<Utc>>,

    /// Where the item currently is ("maleta azul", "casa de Juan")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Item {
    /// Create a fresh item: status `clean`, zero wears.
    pub fn new(
        id: ItemId,
        category: impl Into<String>,
        name: impl Into<String>,
        details: BTreeMap<String, String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            status: ItemStatus::Clean,
            status_reason: None,
            details,
            added: now,
            times_worn: 0,
            last_worn: None,
            location: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_generation_format() {
        let now = "2026-08-29T07:15:00Z".parse::<DateTime<Utc>>().unwrap();
        let id = ItemId::generate("calzado", 3, now);
        assert_eq!(id.0, "calzado_3_20260829071500");
        assert_eq!(id.short(), "1500");
    }

    #[test]
    fn short_id_of_tiny_string() {
        let id = ItemId("ab".into());
        assert_eq!(id.short(), "ab");
    }

    #[test]
    fn status_parse_roundtrip() {
        for s in ["clean", "dirty", "lost", "damaged"] {
            let status = ItemStatus::parse(s).unwrap();
            assert_eq!(status.to_string(), s);
        }
        assert!(ItemStatus::parse("folded").is_none());
    }

    #[test]
    fn new_item_starts_clean_and_unworn() {
        let now = Utc::now();
        let item = Item::new(
            ItemId::generate("tops", 1, now),
            "tops",
            "playera negra",
            BTreeMap::new(),
            now,
        );
        assert_eq!(item.status, ItemStatus::Clean);
        assert_eq!(item.times_worn, 0);
        assert!(item.last_worn.is_none());
    }

    #[test]
    fn item_serialization_skips_empty_fields() {
        let now = Utc::now();
        let item = Item::new(
            ItemId::generate("tops", 1, now),
            "tops",
            "playera",
            BTreeMap::new(),
            now,
        );
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("status_reason"));
        assert!(!json.contains("details"));
        assert!(!json.contains("location"));
    }
}
