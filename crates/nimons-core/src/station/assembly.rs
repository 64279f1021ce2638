use super::{Interaction, RejectReason, StationContext, hand_to_table, table_to_hand};
use crate::chef::Chef;
use crate::item::{Food, Item};
use crate::matching;

#[derive(Debug, Clone, Default)]
pub struct AssemblyStation {
    table: Option<Item>,
}

impl AssemblyStation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> Option<&Item> {
        self.table.as_ref()
    }

    /// Pick up, drop, or combine hand and table food into one dish that
    /// replaces the table item. Combining two foods always succeeds; anything
    /// else leaves both slots alone.
    pub fn interact(&mut self, chef: &mut Chef, ctx: &mut StationContext<'_>) -> Interaction {
        match (chef.hand.is_some(), self.table.is_some()) {
            (false, true) => table_to_hand(chef, &mut self.table),
            (true, false) => hand_to_table(chef, &mut self.table),
            (true, true) => {
                let (Some(Item::Food(_)), Some(Item::Food(_))) = (&chef.hand, &self.table) else {
                    return Interaction::Rejected(RejectReason::NotFood);
                };
                let (Some(Item::Food(held)), Some(Item::Food(placed))) =
                    (chef.hand.take(), self.table.take())
                else {
                    return Interaction::Rejected(RejectReason::NotFood);
                };
                let dish = matching::assemble(placed, held, ctx.ids);
                let name = dish.name.clone();
                self.table = Some(Item::Food(Food::Dish(dish)));
                Interaction::Assembled(name)
            }
            (false, false) => Interaction::Rejected(RejectReason::NothingHere),
        }
    }
}
