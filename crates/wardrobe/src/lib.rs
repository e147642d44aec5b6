//! Wardrobe stores for fitcheck.
//!
//! One `Wardrobe` owns the in-memory snapshot and the repository handle.
//! Every mutating operation persists the full snapshot before returning,
//! so a crash can lose at most the mutation in flight. Handlers receive
//! the wardrobe as an injected dependency — there is no global state.

pub mod context;
pub mod ingest;
pub mod lists;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use fitcheck_core::error::{Error, Result, WardrobeError};
use fitcheck_core::item::{Item, ItemId, ItemStatus};
use fitcheck_core::profile::{FieldValue, Profile, ProfileField};
use fitcheck_core::repository::WardrobeRepository;
use fitcheck_core::snapshot::WardrobeSnapshot;
use fitcheck_core::{FeedbackEntry, HistoryEntry};
use tokio::sync::RwLock;
use tracing::{debug, info};

pub use context::ContextSnapshot;
pub use ingest::parse_line;

/// The wardrobe: item store, packing lists, profile, history, feedback.
pub struct Wardrobe {
    /// Configuration-declared category registry. Items may only use these.
    pub(crate) categories: Vec<String>,
    pub(crate) state: RwLock<WardrobeSnapshot>,
    pub(crate) repo: Arc<dyn WardrobeRepository>,
}

impl Wardrobe {
    /// Load the snapshot from the repository and build the wardrobe.
    pub async fn open(
        categories: Vec<String>,
        repo: Arc<dyn WardrobeRepository>,
    ) -> Result<Self> {
        let snapshot = repo.load().await?;
        debug!(
            backend = repo.name(),
            items = snapshot.items.len(),
            lists = snapshot.lists.len(),
            "Wardrobe loaded"
        );
        Ok(Self {
            categories,
            state: RwLock::new(snapshot),
            repo,
        })
    }

    /// The registered categories, in declaration order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub(crate) fn is_registered(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    pub(crate) async fn persist(&self, state: &WardrobeSnapshot) -> Result<()> {
        self.repo.save(state).await?;
        Ok(())
    }

    // ── Item store ─────────────────────────────────────────────────────────

    /// Add an item. Fails with `UnknownCategory` when the category is not
    /// registered — unknown categories are never silently created.
    pub async fn add_item(
        &self,
        category: &str,
        name: &str,
        details: BTreeMap<String, String>,
    ) -> Result<ItemId> {
        if !self.is_registered(category) {
            return Err(Error::Wardrobe(WardrobeError::UnknownCategory(
                category.to_string(),
            )));
        }

        let mut state = self.state.write().await;
        let now = Utc::now();
        let id = ItemId::generate(category, state.items.len() + 1, now);
        let item = Item::new(id.clone(), category, name, details, now);
        info!(id = %id, category, "Item added");
        state.items.insert(id.0.clone(), item);
        self.persist(&state).await?;
        Ok(id)
    }

    /// Change an item's status. Returns false when the id is unknown.
    /// The reason is stored as an auxiliary note, unvalidated.
    pub async fn set_status(
        &self,
        id: &ItemId,
        status: ItemStatus,
        reason: Option<String>,
    ) -> Result<bool> {
        let mut state = self.state.write().await;
        let Some(item) = state.items.get_mut(&id.0) else {
            return Ok(false);
        };
        item.status = status;
        if reason.as_deref().is_some_and(|r| !r.is_empty()) {
            item.status_reason = reason;
        }
        self.persist(&state).await?;
        Ok(true)
    }

    /// Resolve a user-typed fragment to exactly one item.
    ///
    /// An exact id match wins outright. Otherwise every item whose id or
    /// name contains the fragment (case-insensitive) is a candidate: one
    /// candidate is a hit, several is `AmbiguousItem` so the wrong item is
    /// never picked silently, none is `ItemNotFound`.
    pub async fn find_item(&self, fragment: &str) -> Result<Item> {
        let state = self.state.read().await;
        if let Some(item) = state.items.get(fragment) {
            return Ok(item.clone());
        }

        let needle = fragment.to_lowercase();
        let candidates: Vec<&Item> = state
            .items
            .values()
            .filter(|i| {
                i.id.0.to_lowercase().contains(&needle)
                    || i.name.to_lowercase().contains(&needle)
            })
            .collect();

        match candidates.as_slice() {
            [] => Err(Error::Wardrobe(WardrobeError::ItemNotFound(
                fragment.to_string(),
            ))),
            [item] => Ok((*item).clone()),
            many => Err(Error::Wardrobe(WardrobeError::AmbiguousItem {
                fragment: fragment.to_string(),
                candidates: many
                    .iter()
                    .map(|i| format!("{} (#{})", i.name, i.id.short()))
                    .collect(),
            })),
        }
    }

    /// Items with status `clean`, optionally filtered by category.
    pub async fn list_available(&self, category: Option<&str>) -> Vec<Item> {
        let state = self.state.read().await;
        state
            .items
            .values()
            .filter(|i| i.status == ItemStatus::Clean)
            .filter(|i| category.map_or(true, |c| i.category == c))
            .cloned()
            .collect()
    }

    /// Names of all dirty items — the laundry nag list.
    pub async fn dirty_names(&self) -> Vec<String> {
        let state = self.state.read().await;
        state
            .items
            .values()
            .filter(|i| i.status == ItemStatus::Dirty)
            .map(|i| i.name.clone())
            .collect()
    }

    /// Increment wear stats for every given id. Unknown ids are skipped.
    pub async fn record_wear(&self, ids: &[ItemId]) -> Result<()> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let mut touched = false;
        for id in ids {
            if let Some(item) = state.items.get_mut(&id.0) {
                item.times_worn += 1;
                item.last_worn = Some(now);
                touched = true;
            }
        }
        if touched {
            self.persist(&state).await?;
        }
        Ok(())
    }

    /// Set where an item currently is.
    pub async fn set_location(&self, id: &ItemId, location: Option<String>) -> Result<bool> {
        let mut state = self.state.write().await;
        let Some(item) = state.items.get_mut(&id.0) else {
            return Ok(false);
        };
        item.location = location;
        self.persist(&state).await?;
        Ok(true)
    }

    /// Whole-closet summary grouped by category, with status markers and
    /// short ids.
    pub async fn inventory_summary(&self) -> String {
        let state = self.state.read().await;
        if state.items.is_empty() {
            return "Tu guardarropa está vacío. Usa /add para agregar prendas.".into();
        }

        let mut lines = Vec::new();
        for category in &self.categories {
            let items: Vec<&Item> = state
                .items
                .values()
                .filter(|i| &i.category == category)
                .collect();
            if items.is_empty() {
                continue;
            }
            lines.push(format!("\n📦 {}", category.to_uppercase()));
            for item in items {
                lines.push(format!(
                    "  {} {} (#{})",
                    item.status.marker(),
                    item.name,
                    item.id.short()
                ));
            }
        }
        lines.join("\n")
    }

    // ── Profile store ──────────────────────────────────────────────────────

    /// A copy of the current profile.
    pub async fn profile(&self) -> Profile {
        self.state.read().await.profile.clone()
    }

    /// Set a profile field addressed by alias ("peso", "weight", ...).
    pub async fn set_profile_field(&self, alias: &str, raw: &str) -> Result<FieldValue> {
        let field = ProfileField::resolve(alias).ok_or_else(|| {
            Error::Wardrobe(WardrobeError::UnknownField(alias.to_string()))
        })?;

        let mut state = self.state.write().await;
        let value = state.profile.set(field, raw).map_err(Error::Wardrobe)?;
        self.persist(&state).await?;
        Ok(value)
    }

    /// Toggle the daily outfit job.
    pub async fn set_daily_enabled(&self, enabled: bool) -> Result<()> {
        let mut state = self.state.write().await;
        state.profile.daily_enabled = enabled;
        self.persist(&state).await?;
        Ok(())
    }

    // ── History & feedback ─────────────────────────────────────────────────

    /// Record a delivered suggestion. Read-only after creation.
    pub async fn record_outfit(&self, occasion: &str, suggestion: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state.history.push(HistoryEntry {
            date: Utc::now(),
            occasion: occasion.to_string(),
            suggestion: suggestion.to_string(),
        });
        self.persist(&state).await?;
        Ok(())
    }

    /// Record free-text feedback.
    pub async fn add_feedback(&self, text: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state.feedback.push(FeedbackEntry {
            date: Utc::now(),
            text: text.to_string(),
        });
        self.persist(&state).await?;
        Ok(())
    }
}
