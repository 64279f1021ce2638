//! Serde data file structs for content definitions.
//!
//! These define the on-disk shape of menus and are resolved into core types
//! by the loaders.

use serde::Deserialize;

/// An ingredient requirement, either as a `("rice", "cooked")` pair or with
/// named fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RequirementData {
    Short(String, String),
    Full { ingredient: String, state: String },
}

impl RequirementData {
    pub fn parts(&self) -> (&str, &str) {
        match self {
            RequirementData::Short(ingredient, state) => (ingredient, state),
            RequirementData::Full { ingredient, state } => (ingredient, state),
        }
    }
}

/// One menu entry in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuItemData {
    pub name: String,
    pub ingredients: Vec<RequirementData>,
    pub reward: u32,
    #[serde(default)]
    pub penalty: u32,
    /// Falls back to the config's default order time limit.
    #[serde(default)]
    pub time_limit_ms: Option<u64>,
}
