use crate::types::Position;
use std::collections::HashMap;

/// Trimmed, lowercased form used for name comparison.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Lookups over every position of an event, active and inactive.
///
/// When the store holds duplicates (same normalized name, or same number)
/// the last one encountered wins. Duplicates are remembered so callers can
/// surface them.
#[derive(Debug, Clone, Default)]
pub struct PositionIndex {
    pub by_name: HashMap<String, Position>,
    pub by_number: HashMap<u32, Position>,
    pub max_number: u32,
    pub duplicate_names: Vec<String>,
    pub duplicate_numbers: Vec<u32>,
}

impl PositionIndex {
    pub fn build(positions: &[Position]) -> Self {
        let mut index = PositionIndex::default();
        for p in positions {
            let key = normalize_name(&p.name);
            if index.by_name.insert(key.clone(), p.clone()).is_some()
                && !index.duplicate_names.contains(&key)
            {
                index.duplicate_names.push(key);
            }
            if index.by_number.insert(p.position_number, p.clone()).is_some()
                && !index.duplicate_numbers.contains(&p.position_number)
            {
                index.duplicate_numbers.push(p.position_number);
            }
            index.max_number = index.max_number.max(p.position_number);
        }

        for name in &index.duplicate_names {
            tracing::warn!(name = %name, "duplicate position name in store, using the last one");
        }
        for number in &index.duplicate_numbers {
            tracing::warn!(number, "duplicate position number in store, using the last one");
        }
        index
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Position> {
        self.by_name.get(&normalize_name(name))
    }

    pub fn find_by_number(&self, number: u32) -> Option<&Position> {
        self.by_number.get(&number)
    }

    /// True when any existing position, active or not, holds `number`.
    pub fn holds_number(&self, number: u32) -> bool {
        self.by_number.contains_key(&number)
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
