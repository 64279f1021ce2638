//! Menu loading: recipe definitions from a data file, resolved into a
//! [`Menu`].

use crate::loader::{DataLoadError, check_duplicate, deserialize_list};
use crate::schema::MenuItemData;
use nimons_core::ingredient::{IngredientKind, IngredientState};
use nimons_core::recipe::{Menu, MenuItem, RecipeBuilder};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// TOML menus keep their entries under this key.
pub const TOML_KEY: &str = "recipes";

/// Load and resolve a menu file. Entries without a time limit wait
/// `default_time_limit_ms`.
pub fn load_menu(path: &Path, default_time_limit_ms: u64) -> Result<Menu, DataLoadError> {
    let data: Vec<MenuItemData> = deserialize_list(path, TOML_KEY)?;
    let menu = resolve_menu(data, default_time_limit_ms, path)?;
    info!(file = %path.display(), recipes = menu.len(), "menu loaded");
    Ok(menu)
}

/// Resolve deserialized entries. `file` is only used for error context.
pub fn resolve_menu(
    data: Vec<MenuItemData>,
    default_time_limit_ms: u64,
    file: &Path,
) -> Result<Menu, DataLoadError> {
    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(data.len());

    for entry in data {
        check_duplicate(&mut seen, entry.name.trim(), file)?;

        let mut builder = RecipeBuilder::new().name(entry.name.as_str());
        for requirement in &entry.ingredients {
            let (ingredient, state) = requirement.parts();
            let kind =
                IngredientKind::from_name(ingredient).ok_or_else(|| DataLoadError::UnresolvedRef {
                    file: file.to_path_buf(),
                    name: ingredient.to_string(),
                    expected_kind: "ingredient",
                })?;
            let state =
                IngredientState::from_name(state).ok_or_else(|| DataLoadError::UnresolvedRef {
                    file: file.to_path_buf(),
                    name: state.to_string(),
                    expected_kind: "ingredient state",
                })?;
            builder = builder.require(kind, state);
        }
        let recipe = builder.build().map_err(|source| DataLoadError::Recipe {
            file: file.to_path_buf(),
            source,
        })?;

        items.push(MenuItem {
            recipe,
            reward: entry.reward,
            penalty: entry.penalty,
            time_limit_ms: entry.time_limit_ms.unwrap_or(default_time_limit_ms),
        });
    }

    Menu::new(items).map_err(|source| DataLoadError::Recipe {
        file: file.to_path_buf(),
        source,
    })
}
