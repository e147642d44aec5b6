//! Line-based item ingestion.
//!
//! Turns free text into item creations, one line per item:
//!
//! ```text
//! calzado: Dr Martens 1460 negras | color: negro | marca: Dr Martens
//! ```
//!
//! The head segment splits on the first colon into category and name;
//! pipe-separated trailing segments become detail key/value pairs.
//! Malformed lines are skipped silently rather than failing the batch.
//!
//! Known limitation: a detail value containing a pipe character is
//! mis-split, since `|` is always treated as the segment separator.

use std::collections::BTreeMap;

use crate::Wardrobe;
use fitcheck_core::error::Result;

/// A successfully parsed line, not yet an item.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedLine {
    pub category: String,
    pub name: String,
    pub details: BTreeMap<String, String>,
}

/// Parse one line against the category registry.
///
/// Returns `None` for lines that should be skipped: empty, colon-less,
/// empty name, or unregistered category. Detail segments without a colon
/// are dropped; detail keys are lowercased and trimmed.
pub fn parse_line(line: &str, categories: &[String]) -> Option<ParsedLine> {
    let line = line.trim();
    if line.is_empty() || !line.contains(':') {
        return None;
    }

    let mut segments = line.split('|');
    // First segment is "category: name"; the split always yields at least one.
    let head = segments.next()?;
    let (category, name) = head.split_once(':')?;
    let category = category.trim().to_lowercase();
    let name = name.trim();

    if name.is_empty() || !categories.iter().any(|c| *c == category) {
        return None;
    }

    let mut details = BTreeMap::new();
    for segment in segments {
        if let Some((key, value)) = segment.split_once(':') {
            details.insert(key.trim().to_lowercase(), value.trim().to_string());
        }
    }

    Some(ParsedLine {
        category,
        name: name.to_string(),
        details,
    })
}

impl Wardrobe {
    /// Ingest a block of text, one item per line.
    ///
    /// Returns one confirmation line per created item, used both for
    /// per-item feedback and the final count. Malformed lines produce
    /// neither items nor errors.
    pub async fn ingest(&self, text: &str) -> Result<Vec<String>> {
        let mut confirmations = Vec::new();
        for line in text.lines() {
            let Some(parsed) = parse_line(line, &self.categories) else {
                continue;
            };
            let id = self
                .add_item(&parsed.category, &parsed.name, parsed.details)
                .await?;
            confirmations.push(format!(
                "{} → {} (#{})",
                parsed.name,
                parsed.category,
                id.short()
            ));
        }
        Ok(confirmations)
    }
}
