//! Context snapshot — the bundle the AI suggester sees.
//!
//! Assembles profile, available items, dirty-item names, recent history,
//! recent feedback, and the packing lists into one immutable, serializable
//! value. Nothing is filtered by relevance: the whole available set always
//! goes in, so context size is bounded by wardrobe size alone.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use fitcheck_core::history::{FEEDBACK_CONTEXT_LIMIT, HISTORY_CONTEXT_LIMIT};
use fitcheck_core::item::ItemStatus;
use fitcheck_core::packing::PackingList;
use fitcheck_core::profile::Profile;
use fitcheck_core::{FeedbackEntry, HistoryEntry, Result};

use crate::Wardrobe;

/// One available item as the AI sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextItem {
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
}

/// The serializable context bundle for one AI request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub profile: Profile,

    /// Available (clean) items keyed by id.
    pub available_items: BTreeMap<String, ContextItem>,

    /// Names of dirty items — the laundry nag hint.
    pub dirty_items: Vec<String>,

    /// The most recent history entries, oldest first.
    pub recent_outfits: Vec<HistoryEntry>,

    /// The most recent feedback entries, oldest first.
    pub feedback_history: Vec<FeedbackEntry>,

    /// The full packing-list collection.
    pub packing_lists: Vec<PackingList>,
}

impl ContextSnapshot {
    /// Serialize for the AI request body.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Wardrobe {
    /// Build the context snapshot from current state.
    pub async fn context_snapshot(&self) -> ContextSnapshot {
        let state = self.state.read().await;

        let available_items = state
            .items
            .values()
            .filter(|i| i.status == ItemStatus::Clean)
            .map(|i| {
                (
                    i.id.0.clone(),
                    ContextItem {
                        name: i.name.clone(),
                        category: i.category.clone(),
                        details: i.details.clone(),
                    },
                )
            })
            .collect();

        let dirty_items = state
            .items
            .values()
            .filter(|i| i.status == ItemStatus::Dirty)
            .map(|i| i.name.clone())
            .collect();

        let skip = state.history.len().saturating_sub(HISTORY_CONTEXT_LIMIT);
        let recent_outfits = state.history[skip..].to_vec();

        let skip = state.feedback.len().saturating_sub(FEEDBACK_CONTEXT_LIMIT);
        let feedback_history = state.feedback[skip..].to_vec();

        ContextSnapshot {
            profile: state.profile.clone(),
            available_items,
            dirty_items,
            recent_outfits,
            feedback_history,
            packing_lists: state.lists.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::test_wardrobe;
    use fitcheck_core::item::ItemStatus;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn snapshot_includes_available_excludes_dirty() {
        let (wardrobe, _) = test_wardrobe().await;
        let mut details = BTreeMap::new();
        details.insert("color".to_string(), "negro".to_string());
        let clean = wardrobe.add_item("calzado", "botas", details).await.unwrap();
        let dirty = wardrobe.add_item("tops", "playera", BTreeMap::new()).await.unwrap();
        wardrobe.set_status(&dirty, ItemStatus::Dirty, None).await.unwrap();

        let snapshot = wardrobe.context_snapshot().await;
        assert_eq!(snapshot.available_items.len(), 1);
        assert!(snapshot.available_items.contains_key(&clean.0));
        assert_eq!(snapshot.dirty_items, vec!["playera"]);
    }

    #[tokio::test]
    async fn lost_items_appear_nowhere() {
        let (wardrobe, _) = test_wardrobe().await;
        let id = wardrobe.add_item("capas", "chamarra", BTreeMap::new()).await.unwrap();
        wardrobe.set_status(&id, ItemStatus::Lost, None).await.unwrap();

        let snapshot = wardrobe.context_snapshot().await;
        assert!(snapshot.available_items.is_empty());
        assert!(snapshot.dirty_items.is_empty());
    }

    #[tokio::test]
    async fn history_and_feedback_are_capped() {
        let (wardrobe, _) = test_wardrobe().await;
        for i in 0..10 {
            wardrobe
                .record_outfit(&format!("día {i}"), "outfit")
                .await
                .unwrap();
        }
        for i in 0..12 {
            wardrobe.add_feedback(&format!("nota {i}")).await.unwrap();
        }

        let snapshot = wardrobe.context_snapshot().await;
        assert_eq!(snapshot.recent_outfits.len(), 7);
        assert_eq!(snapshot.recent_outfits[0].occasion, "día 3");
        assert_eq!(snapshot.feedback_history.len(), 10);
        assert_eq!(snapshot.feedback_history[0].text, "nota 2");
    }

    #[tokio::test]
    async fn snapshot_roundtrips_exactly() {
        let (wardrobe, _) = test_wardrobe().await;
        let mut details = BTreeMap::new();
        details.insert("marca".to_string(), "Dr Martens".to_string());
        details.insert("color".to_string(), "negro".to_string());
        wardrobe
            .add_item("calzado", "Dr Martens 1460 negras", details)
            .await
            .unwrap();
        wardrobe.create_list("viaje", None).await.unwrap();
        wardrobe.set_profile_field("peso", "70").await.unwrap();

        let snapshot = wardrobe.context_snapshot().await;
        let json = snapshot.to_json().unwrap();
        let parsed: ContextSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.available_items, snapshot.available_items);
        assert_eq!(parsed.packing_lists.len(), 1);
        assert_eq!(parsed.profile.weight_kg, Some(70.0));
    }
}
