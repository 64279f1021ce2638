use super::{Interaction, RejectReason, Slot, StationContext, hand_to_table, plate_food, slot, table_to_hand};
use crate::chef::Chef;
use crate::ingredient::{Ingredient, IngredientKind};
use crate::item::Item;

/// Endless source of one ingredient kind, with a single table slot.
#[derive(Debug, Clone)]
pub struct StorageStation {
    source: IngredientKind,
    table: Option<Item>,
}

impl StorageStation {
    pub fn new(source: IngredientKind) -> Self {
        Self {
            source,
            table: None,
        }
    }

    pub fn source(&self) -> IngredientKind {
        self.source
    }

    pub fn table(&self) -> Option<&Item> {
        self.table.as_ref()
    }

    /// Scenarios, first match wins:
    /// 1. empty hand, occupied table: pick up
    /// 2. plate in hand, empty table: set the plate down
    /// 3. food in hand, plate on table: plate the food
    /// 4. empty hand, empty table: spawn a fresh ingredient into the hand
    /// 5. food in hand, empty table: set it down
    pub fn interact(&mut self, chef: &mut Chef, ctx: &mut StationContext<'_>) -> Interaction {
        match (slot(&chef.hand), slot(&self.table)) {
            (Slot::Empty, Slot::Food | Slot::Plate | Slot::Utensil) => {
                table_to_hand(chef, &mut self.table)
            }
            (Slot::Plate, Slot::Empty) => hand_to_table(chef, &mut self.table),
            (Slot::Food, Slot::Plate) => plate_food(&mut self.table, &mut chef.hand, ctx.ids),
            (Slot::Empty, Slot::Empty) => {
                chef.hand = Some(Ingredient::new(self.source, ctx.ids).into());
                Interaction::Spawned(self.source)
            }
            (Slot::Food, Slot::Empty) => hand_to_table(chef, &mut self.table),
            (Slot::Utensil, Slot::Empty) => Interaction::Rejected(RejectReason::NotCookable),
            (_, _) => Interaction::Rejected(RejectReason::TableOccupied),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient::{IngredientState, Preparable};
    use crate::item::{Food, Plate};
    use crate::test_utils::StationHarness;

    #[test]
    fn empty_hand_spawns_source() {
        let mut h = StationHarness::new();
        let mut storage = StorageStation::new(IngredientKind::Cucumber);
        assert_eq!(
            h.run(|chef, ctx| storage.interact(chef, ctx)),
            Interaction::Spawned(IngredientKind::Cucumber)
        );
        match &h.chef.hand {
            Some(Item::Food(Food::Ingredient(i))) => {
                assert_eq!(i.kind, IngredientKind::Cucumber);
                assert_eq!(i.state(), IngredientState::Raw);
            }
            other => panic!("expected a cucumber, got {other:?}"),
        }
    }

    #[test]
    fn food_is_set_down_and_picked_up() {
        let mut h = StationHarness::new();
        let mut storage = StorageStation::new(IngredientKind::Nori);
        h.run(|chef, ctx| storage.interact(chef, ctx));
        assert!(matches!(h.run(|chef, ctx| storage.interact(chef, ctx)), Interaction::Placed(_)));
        assert!(h.chef.hand.is_none());
        assert!(matches!(h.run(|chef, ctx| storage.interact(chef, ctx)), Interaction::PickedUp(_)));
        assert!(storage.table().is_none());
    }

    #[test]
    fn food_in_hand_plates_onto_table_plate() {
        let mut h = StationHarness::new();
        let mut storage = StorageStation::new(IngredientKind::Nori);
        h.chef.hand = Some(Plate::new(&mut h.ids).into());
        assert!(matches!(h.run(|chef, ctx| storage.interact(chef, ctx)), Interaction::Placed(_)));

        h.chef.hand = Some(Ingredient::new(IngredientKind::Nori, &mut h.ids).into());
        assert_eq!(
            h.run(|chef, ctx| storage.interact(chef, ctx)),
            Interaction::Plated {
                dish: "Nori".to_string()
            }
        );
        assert!(h.chef.hand.is_none());
    }

    #[test]
    fn unplatable_food_stays_in_hand() {
        let mut h = StationHarness::new();
        let mut storage = StorageStation::new(IngredientKind::Fish);
        h.chef.hand = Some(Plate::new(&mut h.ids).into());
        h.run(|chef, ctx| storage.interact(chef, ctx));

        let mut fish = Ingredient::new(IngredientKind::Fish, &mut h.ids);
        assert!(!fish.can_be_placed_on_plate());
        fish.chop();
        fish.cook();
        h.chef.hand = Some(fish.into());
        assert_eq!(
            h.run(|chef, ctx| storage.interact(chef, ctx)),
            Interaction::Rejected(RejectReason::CannotPlate)
        );
        assert!(h.chef.hand.is_some());
    }

    #[test]
    fn empty_hand_takes_table_plate_first() {
        let mut h = StationHarness::new();
        let mut storage = StorageStation::new(IngredientKind::Rice);
        h.chef.hand = Some(Plate::new(&mut h.ids).into());
        h.run(|chef, ctx| storage.interact(chef, ctx));
        assert!(matches!(h.run(|chef, ctx| storage.interact(chef, ctx)), Interaction::PickedUp(_)));
        assert!(matches!(h.chef.hand, Some(Item::Plate(_))));
    }
}
