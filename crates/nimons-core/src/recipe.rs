use crate::ingredient::{Ingredient, IngredientKind, IngredientState};
use crate::item::Dish;
use rand::Rng;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Content errors caught when a recipe or menu is built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeError {
    #[error("recipe has no name")]
    EmptyName,
    #[error("recipe {0:?} has no ingredient requirements")]
    NoIngredients(String),
    #[error("menu has no items")]
    EmptyMenu,
}

// ---------------------------------------------------------------------------
// Recipe
// ---------------------------------------------------------------------------

/// One ingredient a recipe needs, in a specific state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IngredientRequirement {
    pub kind: IngredientKind,
    pub state: IngredientState,
}

impl IngredientRequirement {
    pub fn is_met_by(&self, ingredient: &Ingredient) -> bool {
        ingredient.kind == self.kind && ingredient.state() == self.state
    }
}

/// Immutable once built. Construct with [`RecipeBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    name: String,
    requirements: Vec<IngredientRequirement>,
}

impl Recipe {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requirements(&self) -> &[IngredientRequirement] {
        &self.requirements
    }

    /// Exact, unordered multiset match of the dish's components against the
    /// requirements. Each requirement consumes one component; no extras.
    pub fn matches(&self, dish: &Dish) -> bool {
        if dish.components.len() != self.requirements.len() {
            return false;
        }
        let mut used = vec![false; dish.components.len()];
        self.requirements.iter().all(|req| {
            let slot = dish
                .components
                .iter()
                .enumerate()
                .find(|(i, c)| !used[*i] && req.is_met_by(c))
                .map(|(i, _)| i);
            match slot {
                Some(i) => {
                    used[i] = true;
                    true
                }
                None => false,
            }
        })
    }
}

/// Builds a [`Recipe`], failing fast on content errors.
#[derive(Debug, Default)]
pub struct RecipeBuilder {
    name: String,
    requirements: Vec<IngredientRequirement>,
}

impl RecipeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn require(mut self, kind: IngredientKind, state: IngredientState) -> Self {
        self.requirements.push(IngredientRequirement { kind, state });
        self
    }

    pub fn build(self) -> Result<Recipe, RecipeError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(RecipeError::EmptyName);
        }
        if self.requirements.is_empty() {
            return Err(RecipeError::NoIngredients(name));
        }
        Ok(Recipe {
            name,
            requirements: self.requirements,
        })
    }
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

/// A recipe as offered to customers: what it pays and how long they wait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub recipe: Recipe,
    pub reward: u32,
    pub penalty: u32,
    pub time_limit_ms: u64,
}

/// The set of recipes orders are drawn from. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn new(items: Vec<MenuItem>) -> Result<Self, RecipeError> {
        if items.is_empty() {
            return Err(RecipeError::EmptyMenu);
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Uniformly random menu item.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &MenuItem {
        &self.items[rng.gen_range(0..self.items.len())]
    }

    /// The five sushi dishes, each waiting `time_limit_ms`.
    pub fn standard(time_limit_ms: u64) -> Self {
        use IngredientKind::*;
        use IngredientState::*;

        let table: [(&str, &[(IngredientKind, IngredientState)], u32, u32); 5] = [
            ("Kappa Maki", &[(Rice, Cooked), (Nori, Raw), (Cucumber, Chopped)], 40, 10),
            ("Sake Maki", &[(Rice, Cooked), (Nori, Raw), (Fish, Chopped)], 50, 15),
            ("Ebi Maki", &[(Rice, Cooked), (Nori, Raw), (Shrimp, Cooked)], 60, 15),
            ("Sake Nigiri", &[(Rice, Cooked), (Fish, Chopped)], 45, 10),
            ("Ebi Nigiri", &[(Rice, Cooked), (Shrimp, Cooked)], 55, 15),
        ];

        let items = table
            .iter()
            .map(|(name, reqs, reward, penalty)| {
                let requirements = reqs
                    .iter()
                    .map(|&(kind, state)| IngredientRequirement { kind, state })
                    .collect();
                MenuItem {
                    recipe: Recipe {
                        name: name.to_string(),
                        requirements,
                    },
                    reward: *reward,
                    penalty: *penalty,
                    time_limit_ms,
                }
            })
            .collect();
        Self { items }
    }

    pub fn find(&self, name: &str) -> Option<&MenuItem> {
        self.items
            .iter()
            .find(|item| item.recipe.name().eq_ignore_ascii_case(name))
    }
}
