use crate::id::{ItemId, ItemIds};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Kinds and states
// ---------------------------------------------------------------------------

/// The ingredient variants a storage station can hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngredientKind {
    Rice,
    Nori,
    Cucumber,
    Fish,
    Shrimp,
}

impl IngredientKind {
    pub fn all() -> [IngredientKind; 5] {
        [
            IngredientKind::Rice,
            IngredientKind::Nori,
            IngredientKind::Cucumber,
            IngredientKind::Fish,
            IngredientKind::Shrimp,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            IngredientKind::Rice => "Rice",
            IngredientKind::Nori => "Nori",
            IngredientKind::Cucumber => "Cucumber",
            IngredientKind::Fish => "Fish",
            IngredientKind::Shrimp => "Shrimp",
        }
    }

    /// Prefix used when minting item ids.
    pub fn id_prefix(self) -> &'static str {
        match self {
            IngredientKind::Rice => "rice",
            IngredientKind::Nori => "nori",
            IngredientKind::Cucumber => "cucumber",
            IngredientKind::Fish => "fish",
            IngredientKind::Shrimp => "shrimp",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<IngredientKind> {
        Self::all()
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
    }

    fn choppable(self) -> bool {
        matches!(
            self,
            IngredientKind::Cucumber | IngredientKind::Fish | IngredientKind::Shrimp
        )
    }

    /// State that the first `cook()` call starts from, if the kind cooks at all.
    fn cook_entry(self) -> Option<IngredientState> {
        match self {
            IngredientKind::Rice => Some(IngredientState::Raw),
            IngredientKind::Fish | IngredientKind::Shrimp => Some(IngredientState::Chopped),
            IngredientKind::Nori | IngredientKind::Cucumber => None,
        }
    }

    fn plates_when(self, state: IngredientState) -> bool {
        use IngredientState::*;
        match self {
            IngredientKind::Rice => state == Cooked,
            IngredientKind::Nori => state == Raw,
            IngredientKind::Cucumber => state == Chopped,
            IngredientKind::Fish => matches!(state, Chopped | Cooked),
            IngredientKind::Shrimp => state == Cooked,
        }
    }
}

impl fmt::Display for IngredientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Preparation state. Ordered: states only ever advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngredientState {
    Raw,
    Chopped,
    Cooking,
    Cooked,
    Burned,
}

impl IngredientState {
    pub fn from_name(name: &str) -> Option<IngredientState> {
        match name.trim().to_ascii_lowercase().as_str() {
            "raw" => Some(IngredientState::Raw),
            "chopped" => Some(IngredientState::Chopped),
            "cooking" => Some(IngredientState::Cooking),
            "cooked" => Some(IngredientState::Cooked),
            "burned" => Some(IngredientState::Burned),
            _ => None,
        }
    }

    fn prefix(self) -> Option<&'static str> {
        match self {
            IngredientState::Raw => None,
            IngredientState::Chopped => Some("Chopped"),
            IngredientState::Cooking => Some("Cooking"),
            IngredientState::Cooked => Some("Cooked"),
            IngredientState::Burned => Some("Burned"),
        }
    }
}

// ---------------------------------------------------------------------------
// Preparable
// ---------------------------------------------------------------------------

/// Chop/cook/plate capability shared by ingredients and dishes.
///
/// `chop` and `cook` return whether the state changed. Outside the legal
/// source state they are no-ops.
pub trait Preparable {
    fn can_be_chopped(&self) -> bool;
    fn can_be_cooked(&self) -> bool;
    fn can_be_placed_on_plate(&self) -> bool;
    fn chop(&mut self) -> bool;
    fn cook(&mut self) -> bool;
}

// ---------------------------------------------------------------------------
// Ingredient
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: ItemId,
    pub kind: IngredientKind,
    state: IngredientState,
}

impl Ingredient {
    /// A fresh raw ingredient with a newly minted id.
    pub fn new(kind: IngredientKind, ids: &mut ItemIds) -> Self {
        Self {
            id: ids.mint(kind.id_prefix()),
            kind,
            state: IngredientState::Raw,
        }
    }

    pub fn state(&self) -> IngredientState {
        self.state
    }

    /// Display name, prefixed by state: `Rice`, `Chopped Cucumber`, `Cooked Rice`.
    pub fn name(&self) -> String {
        match self.state.prefix() {
            Some(prefix) => format!("{prefix} {}", self.kind.name()),
            None => self.kind.name().to_string(),
        }
    }

    /// Whether the ingredient lies somewhere on its kind's cooking path.
    fn on_cook_path(&self) -> bool {
        match self.kind.cook_entry() {
            Some(entry) => self.state >= entry && self.state != IngredientState::Burned,
            None => false,
        }
    }

    /// Entry step taken when a pot or pan accepts the ingredient.
    pub fn begin_cooking(&mut self) -> bool {
        if self.kind.cook_entry() == Some(self.state) {
            self.cook()
        } else {
            false
        }
    }

    /// Cook-threshold step: COOKING -> COOKED.
    pub fn finish_cooking(&mut self) -> bool {
        if self.state == IngredientState::Cooking {
            self.cook()
        } else {
            false
        }
    }

    /// Burn-threshold step. Terminal.
    pub fn burn(&mut self) -> bool {
        if self.on_cook_path() {
            self.state = IngredientState::Burned;
            true
        } else {
            false
        }
    }
}

impl Preparable for Ingredient {
    fn can_be_chopped(&self) -> bool {
        self.kind.choppable() && self.state == IngredientState::Raw
    }

    fn can_be_cooked(&self) -> bool {
        self.on_cook_path()
    }

    fn can_be_placed_on_plate(&self) -> bool {
        self.kind.plates_when(self.state)
    }

    fn chop(&mut self) -> bool {
        if self.can_be_chopped() {
            self.state = IngredientState::Chopped;
            true
        } else {
            false
        }
    }

    fn cook(&mut self) -> bool {
        if !self.on_cook_path() {
            return false;
        }
        self.state = match self.state {
            IngredientState::Raw | IngredientState::Chopped => IngredientState::Cooking,
            IngredientState::Cooking => IngredientState::Cooked,
            IngredientState::Cooked => IngredientState::Burned,
            IngredientState::Burned => return false,
        };
        true
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
