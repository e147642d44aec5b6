//! Packing list operations.
//!
//! Names are unique case-insensitively. Item removal is 1-based at the
//! interface boundary, matching what users type, and bounds-checked so a
//! bad index never mutates the list.

use fitcheck_core::error::{Error, Result, WardrobeError};
use fitcheck_core::packing::{normalize, PackingList};

use crate::Wardrobe;

impl Wardrobe {
    /// Create a packing list. Returns false (no mutation) when a list with
    /// the same case-normalized name already exists.
    pub async fn create_list(&self, name: &str, description: Option<String>) -> Result<bool> {
        let mut state = self.state.write().await;
        let key = normalize(name);
        if state.lists.iter().any(|l| l.key() == key) {
            return Ok(false);
        }
        state.lists.push(PackingList::new(name.trim(), description));
        self.persist(&state).await?;
        Ok(true)
    }

    /// Delete a packing list. Returns false when absent.
    pub async fn delete_list(&self, name: &str) -> Result<bool> {
        let mut state = self.state.write().await;
        let key = normalize(name);
        let before = state.lists.len();
        state.lists.retain(|l| l.key() != key);
        if state.lists.len() == before {
            return Ok(false);
        }
        self.persist(&state).await?;
        Ok(true)
    }

    /// Append a free-text line to a list. Duplicates are allowed.
    pub async fn add_list_item(&self, name: &str, text: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let key = normalize(name);
        let Some(list) = state.lists.iter_mut().find(|l| l.key() == key) else {
            return Err(Error::Wardrobe(WardrobeError::ListNotFound(name.to_string())));
        };
        list.items.push(text.to_string());
        self.persist(&state).await?;
        Ok(())
    }

    /// Remove the item at a 1-based index, returning its text.
    ///
    /// An out-of-range index fails without touching the list.
    pub async fn remove_list_item(&self, name: &str, index: usize) -> Result<String> {
        let mut state = self.state.write().await;
        let key = normalize(name);
        let Some(list) = state.lists.iter_mut().find(|l| l.key() == key) else {
            return Err(Error::Wardrobe(WardrobeError::ListNotFound(name.to_string())));
        };

        if index == 0 || index > list.items.len() {
            return Err(Error::Wardrobe(WardrobeError::IndexOutOfRange {
                list: list.name.clone(),
                index,
                len: list.items.len(),
            }));
        }

        let removed = list.items.remove(index - 1);
        self.persist(&state).await?;
        Ok(removed)
    }

    /// One list by name.
    pub async fn get_list(&self, name: &str) -> Option<PackingList> {
        let key = normalize(name);
        let state = self.state.read().await;
        state.lists.iter().find(|l| l.key() == key).cloned()
    }

    /// All lists, in creation order.
    pub async fn lists(&self) -> Vec<PackingList> {
        self.state.read().await.lists.clone()
    }
}
