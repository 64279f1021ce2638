use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    /// Identifies a station placed on the kitchen map.
    pub struct StationId;
}

/// Identifies a chef. Assigned in spawn order, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChefId(pub u32);

/// Sequential order number, unique within one order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderIndex(pub u32);

/// Identifies a registered event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Identity of a single item instance, e.g. `rice-0003`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mints item ids as `<prefix>-<nnnn>` from a single counter.
#[derive(Debug, Default)]
pub struct ItemIds {
    next: u64,
}

impl ItemIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&mut self, prefix: &str) -> ItemId {
        self.next += 1;
        ItemId(format!("{prefix}-{:04}", self.next))
    }
}

impl fmt::Display for OrderIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_ids_are_unique_and_prefixed() {
        let mut ids = ItemIds::new();
        let a = ids.mint("rice");
        let b = ids.mint("rice");
        assert_ne!(a, b);
        assert_eq!(a.0, "rice-0001");
        assert_eq!(b.to_string(), "rice-0002");
    }

    #[test]
    fn chef_ids_are_hashable() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ChefId(0), "Nimon");
        map.insert(ChefId(1), "Chef B");
        assert_eq!(map[&ChefId(0)], "Nimon");
    }

    #[test]
    fn order_index_displays_with_hash() {
        assert_eq!(OrderIndex(7).to_string(), "#7");
    }
}
