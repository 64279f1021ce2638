//! Items owned by exactly one container at a time: a chef's hand, a station
//! table, a utensil, a plate, or a plate stack.

use crate::id::{ItemId, ItemIds};
use crate::ingredient::{Ingredient, Preparable};
use crate::matching;
use crate::utensil::Utensil;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Dish
// ---------------------------------------------------------------------------

/// A named composition of ingredients. Nested dishes are flattened on merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    pub id: ItemId,
    pub name: String,
    pub components: Vec<Ingredient>,
}

impl Dish {
    pub fn new(name: impl Into<String>, components: Vec<Ingredient>, ids: &mut ItemIds) -> Self {
        Self {
            id: ids.mint("dish"),
            name: name.into(),
            components,
        }
    }

    /// A dish with at least one component.
    pub fn is_complete(&self) -> bool {
        !self.components.is_empty()
    }

    /// Append every component of `food`, flattening nested dishes.
    pub fn merge(&mut self, food: Food) {
        self.components.extend(food.into_components());
    }

    fn burn(&mut self) -> bool {
        let mut changed = false;
        for component in &mut self.components {
            changed |= component.burn();
        }
        changed
    }
}

impl Preparable for Dish {
    fn can_be_chopped(&self) -> bool {
        false
    }

    fn can_be_cooked(&self) -> bool {
        false
    }

    fn can_be_placed_on_plate(&self) -> bool {
        self.is_complete()
    }

    fn chop(&mut self) -> bool {
        false
    }

    fn cook(&mut self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Food
// ---------------------------------------------------------------------------

/// Anything preparable: a single ingredient or an assembled dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Food {
    Ingredient(Ingredient),
    Dish(Dish),
}

impl Food {
    pub fn id(&self) -> &ItemId {
        match self {
            Food::Ingredient(ingredient) => &ingredient.id,
            Food::Dish(dish) => &dish.id,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Food::Ingredient(ingredient) => ingredient.name(),
            Food::Dish(dish) => dish.name.clone(),
        }
    }

    pub fn as_ingredient(&self) -> Option<&Ingredient> {
        match self {
            Food::Ingredient(ingredient) => Some(ingredient),
            Food::Dish(_) => None,
        }
    }

    pub fn into_components(self) -> Vec<Ingredient> {
        match self {
            Food::Ingredient(ingredient) => vec![ingredient],
            Food::Dish(dish) => dish.components,
        }
    }

    pub fn begin_cooking(&mut self) -> bool {
        match self {
            Food::Ingredient(ingredient) => ingredient.begin_cooking(),
            Food::Dish(_) => false,
        }
    }

    pub fn finish_cooking(&mut self) -> bool {
        match self {
            Food::Ingredient(ingredient) => ingredient.finish_cooking(),
            Food::Dish(_) => false,
        }
    }

    pub fn burn(&mut self) -> bool {
        match self {
            Food::Ingredient(ingredient) => ingredient.burn(),
            Food::Dish(dish) => dish.burn(),
        }
    }
}

impl Preparable for Food {
    fn can_be_chopped(&self) -> bool {
        match self {
            Food::Ingredient(i) => i.can_be_chopped(),
            Food::Dish(d) => d.can_be_chopped(),
        }
    }

    fn can_be_cooked(&self) -> bool {
        match self {
            Food::Ingredient(i) => i.can_be_cooked(),
            Food::Dish(d) => d.can_be_cooked(),
        }
    }

    fn can_be_placed_on_plate(&self) -> bool {
        match self {
            Food::Ingredient(i) => i.can_be_placed_on_plate(),
            Food::Dish(d) => d.can_be_placed_on_plate(),
        }
    }

    fn chop(&mut self) -> bool {
        match self {
            Food::Ingredient(i) => i.chop(),
            Food::Dish(d) => d.chop(),
        }
    }

    fn cook(&mut self) -> bool {
        match self {
            Food::Ingredient(i) => i.cook(),
            Food::Dish(d) => d.cook(),
        }
    }
}

impl From<Ingredient> for Food {
    fn from(ingredient: Ingredient) -> Self {
        Food::Ingredient(ingredient)
    }
}

impl From<Dish> for Food {
    fn from(dish: Dish) -> Self {
        Food::Dish(dish)
    }
}

// ---------------------------------------------------------------------------
// Plate
// ---------------------------------------------------------------------------

/// Holds at most one dish. Clean until served, clean again after washing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plate {
    pub id: ItemId,
    clean: bool,
    dish: Option<Dish>,
}

impl Plate {
    pub fn new(ids: &mut ItemIds) -> Self {
        Self {
            id: ids.mint("plate"),
            clean: true,
            dish: None,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.clean
    }

    pub fn dish(&self) -> Option<&Dish> {
        self.dish.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.dish.is_none()
    }

    /// Plate `food`. On refusal the food is handed back untouched and the
    /// plate is unchanged.
    pub fn place(&mut self, food: Food, ids: &mut ItemIds) -> Result<(), Food> {
        if !self.clean || !food.can_be_placed_on_plate() {
            return Err(food);
        }

        match self.dish.as_mut() {
            None => {
                let dish = match food {
                    Food::Dish(dish) => dish,
                    Food::Ingredient(ingredient) => {
                        let name = ingredient.name();
                        Dish::new(name, vec![ingredient], ids)
                    }
                };
                self.dish = Some(dish);
            }
            Some(dish) => {
                if let Some(named) = matching::combined_name(&dish.name, &food.name()) {
                    dish.name = named.to_string();
                }
                dish.merge(food);
            }
        }
        Ok(())
    }

    /// Remove the dish, leaving the plate clean and empty.
    pub fn take_dish(&mut self) -> Option<Dish> {
        self.dish.take()
    }

    /// Served plates lose their dish and need washing.
    pub fn mark_dirty(&mut self) {
        self.dish = None;
        self.clean = false;
    }

    pub fn wash(&mut self) {
        self.clean = true;
    }
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// Closed sum over everything a chef can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Food(Food),
    Plate(Plate),
    Utensil(Utensil),
}

impl Item {
    pub fn id(&self) -> &ItemId {
        match self {
            Item::Food(food) => food.id(),
            Item::Plate(plate) => &plate.id,
            Item::Utensil(utensil) => &utensil.id,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Item::Food(food) => food.name(),
            Item::Plate(plate) => match (&plate.dish, plate.clean) {
                (Some(dish), _) => format!("Plate ({})", dish.name),
                (None, true) => "Plate".to_string(),
                (None, false) => "Dirty Plate".to_string(),
            },
            Item::Utensil(utensil) => utensil.name(),
        }
    }
}

impl From<Food> for Item {
    fn from(food: Food) -> Self {
        Item::Food(food)
    }
}

impl From<Ingredient> for Item {
    fn from(ingredient: Ingredient) -> Self {
        Item::Food(Food::Ingredient(ingredient))
    }
}

impl From<Dish> for Item {
    fn from(dish: Dish) -> Self {
        Item::Food(Food::Dish(dish))
    }
}

impl From<Plate> for Item {
    fn from(plate: Plate) -> Self {
        Item::Plate(plate)
    }
}

impl From<Utensil> for Item {
    fn from(utensil: Utensil) -> Self {
        Item::Utensil(utensil)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient::{IngredientKind, IngredientState};

    fn cooked_rice(ids: &mut ItemIds) -> Ingredient {
        let mut rice = Ingredient::new(IngredientKind::Rice, ids);
        rice.begin_cooking();
        rice.finish_cooking();
        rice
    }

    #[test]
    fn plating_refused_leaves_both_unchanged() {
        let mut ids = ItemIds::new();
        let mut plate = Plate::new(&mut ids);
        let raw_rice = Ingredient::new(IngredientKind::Rice, &mut ids);
        let before = plate.clone();

        let returned = plate.place(raw_rice.clone().into(), &mut ids).unwrap_err();
        assert_eq!(returned, Food::Ingredient(raw_rice));
        assert_eq!(plate, before);
    }

    #[test]
    fn plating_creates_then_extends_dish() {
        let mut ids = ItemIds::new();
        let mut plate = Plate::new(&mut ids);

        plate.place(cooked_rice(&mut ids).into(), &mut ids).unwrap();
        assert_eq!(plate.dish().unwrap().name, "Cooked Rice");

        let nori = Ingredient::new(IngredientKind::Nori, &mut ids);
        plate.place(nori.into(), &mut ids).unwrap();
        let dish = plate.dish().unwrap();
        assert_eq!(dish.name, "Sushi Base");
        assert_eq!(dish.components.len(), 2);
    }

    #[test]
    fn dirty_plate_refuses_food() {
        let mut ids = ItemIds::new();
        let mut plate = Plate::new(&mut ids);
        plate.mark_dirty();
        let nori = Ingredient::new(IngredientKind::Nori, &mut ids);
        assert!(plate.place(nori.into(), &mut ids).is_err());

        plate.wash();
        assert!(plate.is_clean());
        let nori = Ingredient::new(IngredientKind::Nori, &mut ids);
        assert!(plate.place(nori.into(), &mut ids).is_ok());
    }

    #[test]
    fn merge_flattens_nested_dishes() {
        let mut ids = ItemIds::new();
        let inner = Dish::new(
            "Sushi Base",
            vec![
                cooked_rice(&mut ids),
                Ingredient::new(IngredientKind::Nori, &mut ids),
            ],
            &mut ids,
        );
        let mut outer = Dish::new("Cucumber", vec![], &mut ids);
        assert!(!outer.is_complete());
        outer.merge(inner.into());
        assert_eq!(outer.components.len(), 2);
        assert!(outer.components.iter().any(|c| c.state() == IngredientState::Cooked));
    }

    #[test]
    fn item_names_describe_plates() {
        let mut ids = ItemIds::new();
        let mut plate = Plate::new(&mut ids);
        assert_eq!(Item::from(plate.clone()).name(), "Plate");
        plate.mark_dirty();
        assert_eq!(Item::from(plate).name(), "Dirty Plate");
    }
}
