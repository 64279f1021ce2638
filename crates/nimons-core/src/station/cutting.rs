use super::{
    Interaction, RejectReason, Slot, StationContext, StationEffect, hand_to_table, plate_food, slot,
    table_to_hand,
};
use crate::chef::Chef;
use crate::config::GameConfig;
use crate::id::ChefId;
use crate::ingredient::Preparable;
use crate::item::Item;

/// One table slot and a chop timer that only runs while a chef is cutting.
#[derive(Debug, Clone, Default)]
pub struct CuttingStation {
    table: Option<Item>,
    progress_ms: u64,
    cutter: Option<ChefId>,
    chop_duration_ms: u64,
}

impl CuttingStation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> Option<&Item> {
        self.table.as_ref()
    }

    pub fn progress_ms(&self) -> u64 {
        self.progress_ms
    }

    pub fn active_cutter(&self) -> Option<ChefId> {
        self.cutter
    }

    pub fn progress(&self) -> Option<f32> {
        if self.progress_ms == 0 || self.chop_duration_ms == 0 {
            return None;
        }
        Some((self.progress_ms as f32 / self.chop_duration_ms as f32).min(1.0))
    }

    fn table_choppable(&self) -> bool {
        matches!(&self.table, Some(Item::Food(food)) if food.can_be_chopped())
    }

    /// Scenarios, first match wins:
    /// 1. plate in hand, occupied table, nobody cutting: plate the table item
    /// 2. item in hand, empty table: set it down, progress restarts
    /// 3. empty hand, choppable raw item, nobody cutting: start or resume
    ///    cutting and freeze the chef
    /// 4. empty hand, occupied table, nobody cutting: pick up
    /// 5. the active cutter again: pause, keeping progress
    pub fn interact(&mut self, chef: &mut Chef, ctx: &mut StationContext<'_>) -> Interaction {
        self.chop_duration_ms = ctx.config.chop_duration_ms;
        let hand = slot(&chef.hand);
        let table = slot(&self.table);

        if hand == Slot::Plate && table != Slot::Empty && self.cutter.is_none() {
            return plate_food(&mut chef.hand, &mut self.table, ctx.ids);
        }
        if hand != Slot::Empty && table == Slot::Empty {
            self.progress_ms = 0;
            return hand_to_table(chef, &mut self.table);
        }
        if hand == Slot::Empty && self.cutter.is_none() && self.table_choppable() {
            chef.busy = true;
            self.cutter = Some(chef.id);
            return Interaction::CuttingStarted {
                resumed: self.progress_ms > 0,
            };
        }
        if hand == Slot::Empty && table != Slot::Empty && self.cutter.is_none() {
            return table_to_hand(chef, &mut self.table);
        }
        if self.cutter == Some(chef.id) {
            chef.busy = false;
            self.cutter = None;
            return Interaction::CuttingPaused {
                progress_ms: self.progress_ms,
            };
        }

        let reason = if self.cutter.is_some() {
            RejectReason::StationInUse
        } else if hand == Slot::Empty {
            RejectReason::NothingHere
        } else {
            RejectReason::TableOccupied
        };
        Interaction::Rejected(reason)
    }

    /// Advance the chop while a cutter is recorded. At the threshold the item
    /// is chopped once, progress resets and the cutter is released.
    pub fn update(&mut self, delta_ms: u64, config: &GameConfig, effects: &mut Vec<StationEffect>) {
        self.chop_duration_ms = config.chop_duration_ms;
        let Some(cutter) = self.cutter else {
            return;
        };
        let Some(Item::Food(food)) = self.table.as_mut() else {
            return;
        };

        self.progress_ms += delta_ms;
        if self.progress_ms < config.chop_duration_ms {
            return;
        }

        food.chop();
        let item = food.name();
        self.progress_ms = 0;
        self.cutter = None;
        effects.push(StationEffect::ChopCompleted {
            chef: cutter,
            item,
        });
    }
}
