//! Packing list domain type.
//!
//! A packing list is a named, ordered collection of free-text lines,
//! unrelated to the item store. Duplicates are allowed; order is display
//! order and is index-addressable for deletion.

use serde::{Deserialize, Serialize};

/// A named packing list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackingList {
    /// Display name. Uniqueness is enforced case-insensitively by the store.
    pub name: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Free-text line items, in insertion order
    #[serde(default)]
    pub items: Vec<String>,
}

impl PackingList {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
            items: Vec::new(),
        }
    }

    /// Case-normalized key used for uniqueness checks.
    pub fn key(&self) -> String {
        normalize(&self.name)
    }
}

/// Case-normalize a list name for lookup.
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_case_insensitive() {
        let list = PackingList::new("Viaje CDMX", None);
        assert_eq!(list.key(), "viaje cdmx");
        assert_eq!(normalize("  VIAJE cdmx "), "viaje cdmx");
    }

    #[test]
    fn duplicates_allowed_in_items() {
        let mut list = PackingList::new("camping", None);
        list.items.push("calcetines".into());
        list.items.push("calcetines".into());
        assert_eq!(list.items.len(), 2);
    }
}
