//! Station interaction state machines.
//!
//! Every station kind is a variant of [`Station`]. `interact` is a pure
//! function of the chef's hand, the station's contents and its progress; it
//! always ends in exactly one [`Interaction`], either a state change or a
//! [`Interaction::Rejected`] with the reason. Scenarios inside each station
//! are matched in a fixed priority order.
//!
//! `update` runs every tick whether or not a chef is present and reports
//! anything the kitchen must act on as [`StationEffect`]s.

mod assembly;
mod cooking;
mod cutting;
mod plate_storage;
mod serving;
mod storage;
mod trash;
mod washing;

pub use assembly::AssemblyStation;
pub use cooking::CookingStation;
pub use cutting::CuttingStation;
pub use plate_storage::PlateStorageStation;
pub use serving::ServingStation;
pub use storage::StorageStation;
pub use trash::TrashStation;
pub use washing::{WashingRole, WashingStation};

use crate::chef::Chef;
use crate::config::GameConfig;
use crate::id::{ChefId, ItemId, ItemIds, OrderIndex, StationId};
use crate::ingredient::IngredientKind;
use crate::item::{Item, Plate};
use crate::order::OrderManager;
use crate::utensil::DeviceKind;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Why an interaction did nothing. Player mistakes, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("nothing to do here")]
    NothingHere,
    #[error("no station in front of the chef")]
    NoStation,
    #[error("unknown chef")]
    UnknownChef,
    #[error("chef is busy at another station")]
    ChefBusy,
    #[error("another chef is working this station")]
    StationInUse,
    #[error("the table is already occupied")]
    TableOccupied,
    #[error("that cannot go on a plate")]
    CannotPlate,
    #[error("that cannot be chopped")]
    NotChoppable,
    #[error("only a utensil can be mounted here")]
    NotAUtensil,
    #[error("the utensil is full or still cooking")]
    UtensilFull,
    #[error("the utensil refuses that ingredient")]
    IngredientRefused,
    #[error("that is not cookable")]
    NotCookable,
    #[error("the utensil is empty")]
    UtensilEmpty,
    #[error("only food can be assembled")]
    NotFood,
    #[error("no plates left")]
    NoPlates,
    #[error("only plates go here")]
    NotAPlate,
    #[error("only dirty plates can be washed")]
    NotDirty,
    #[error("dirty plates go in the sink, not the rack")]
    NotASink,
    #[error("there is no dish on this plate")]
    NoDish,
    #[error("no active order wants this dish")]
    NoMatchingOrder,
}

/// What a single interact call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    PickedUp(String),
    Placed(String),
    Spawned(IngredientKind),
    Plated { dish: String },
    CuttingStarted { resumed: bool },
    CuttingPaused { progress_ms: u64 },
    UtensilMounted(DeviceKind),
    UtensilRemoved(DeviceKind),
    AddedToUtensil(String),
    Assembled(String),
    PlateTaken { clean: bool },
    PlateStored,
    DirtyPlateDropped,
    WashingStarted { resumed: bool },
    WashingPaused { progress_percent: u32 },
    Served {
        dish: String,
        order: Option<OrderIndex>,
        recipe: Option<String>,
        reward: u32,
    },
    Discarded(String),
    Emptied(DeviceKind),
    Rejected(RejectReason),
}

impl Interaction {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Interaction::Rejected(_))
    }
}

/// Something a station update needs the kitchen to finish.
#[derive(Debug, Clone, PartialEq)]
pub enum StationEffect {
    /// Release the chef; the item on the table is now chopped.
    ChopCompleted { chef: ChefId, item: String },
    /// Release the chef (if still recorded); one dirty plate is clean.
    WashCompleted { chef: Option<ChefId>, plate: ItemId },
    /// Deliver a clean plate to another station (a washing rack).
    Transfer { to: StationId, plate: Plate },
    DeviceCooked { device: DeviceKind },
    DeviceBurned { device: DeviceKind },
    /// A served plate is back and needs a home in plate storage.
    PlateReturned(Plate),
}

/// Shared kitchen state a station may touch during an interaction.
pub struct StationContext<'a> {
    pub ids: &'a mut ItemIds,
    pub orders: &'a OrderManager,
    pub config: &'a GameConfig,
}

// ---------------------------------------------------------------------------
// Slot classification
// ---------------------------------------------------------------------------

/// Coarse shape of a hand or table slot, for scenario matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Empty,
    Food,
    Plate,
    Utensil,
}

pub(crate) fn slot(item: &Option<Item>) -> Slot {
    match item {
        None => Slot::Empty,
        Some(Item::Food(_)) => Slot::Food,
        Some(Item::Plate(_)) => Slot::Plate,
        Some(Item::Utensil(_)) => Slot::Utensil,
    }
}

// ---------------------------------------------------------------------------
// Station
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationKind {
    IngredientStorage,
    Cutting,
    Cooking,
    Assembly,
    Washing,
    Serving,
    Trash,
    PlateStorage,
}

impl StationKind {
    pub fn name(self) -> &'static str {
        match self {
            StationKind::IngredientStorage => "Ingredient Storage",
            StationKind::Cutting => "Cutting Station",
            StationKind::Cooking => "Cooking Station",
            StationKind::Assembly => "Assembly Station",
            StationKind::Washing => "Washing Station",
            StationKind::Serving => "Serving Station",
            StationKind::Trash => "Trash",
            StationKind::PlateStorage => "Plate Storage",
        }
    }
}

/// Closed sum over the station kinds. Dispatch is by enum match.
#[derive(Debug, Clone)]
pub enum Station {
    IngredientStorage(StorageStation),
    Cutting(CuttingStation),
    Cooking(CookingStation),
    Assembly(AssemblyStation),
    Washing(WashingStation),
    Serving(ServingStation),
    Trash(TrashStation),
    PlateStorage(PlateStorageStation),
}

impl Station {
    pub fn kind(&self) -> StationKind {
        match self {
            Station::IngredientStorage(_) => StationKind::IngredientStorage,
            Station::Cutting(_) => StationKind::Cutting,
            Station::Cooking(_) => StationKind::Cooking,
            Station::Assembly(_) => StationKind::Assembly,
            Station::Washing(_) => StationKind::Washing,
            Station::Serving(_) => StationKind::Serving,
            Station::Trash(_) => StationKind::Trash,
            Station::PlateStorage(_) => StationKind::PlateStorage,
        }
    }

    pub fn interact(&mut self, chef: &mut Chef, ctx: &mut StationContext<'_>) -> Interaction {
        match self {
            Station::IngredientStorage(s) => s.interact(chef, ctx),
            Station::Cutting(s) => s.interact(chef, ctx),
            Station::Cooking(s) => s.interact(chef, ctx),
            Station::Assembly(s) => s.interact(chef, ctx),
            Station::Washing(s) => s.interact(chef),
            Station::Serving(s) => s.interact(chef, ctx),
            Station::Trash(s) => s.interact(chef),
            Station::PlateStorage(s) => s.interact(chef),
        }
    }

    pub fn update(&mut self, delta_ms: u64, config: &GameConfig, effects: &mut Vec<StationEffect>) {
        match self {
            Station::Cutting(s) => s.update(delta_ms, config, effects),
            Station::Cooking(s) => s.update(delta_ms, effects),
            Station::Washing(s) => s.update(delta_ms, config, effects),
            Station::Serving(s) => s.update(delta_ms, effects),
            Station::IngredientStorage(_)
            | Station::Assembly(_)
            | Station::Trash(_)
            | Station::PlateStorage(_) => {}
        }
    }

    /// The chef frozen at this station by a timed action, if any.
    pub fn active_worker(&self) -> Option<ChefId> {
        match self {
            Station::Cutting(s) => s.active_cutter(),
            Station::Washing(s) => s.active_washer(),
            _ => None,
        }
    }

    /// Display name of whatever sits on the station.
    pub fn visible_item(&self) -> Option<String> {
        match self {
            Station::IngredientStorage(s) => s.table().map(Item::name),
            Station::Cutting(s) => s.table().map(Item::name),
            Station::Cooking(s) => s.utensil().map(|u| match u.contents().first() {
                Some(food) => format!("{} ({})", u.name(), food.name()),
                None => u.name(),
            }),
            Station::Assembly(s) => s.table().map(Item::name),
            Station::PlateStorage(s) => s.top().map(|p| Item::Plate(p.clone()).name()),
            Station::Washing(_) | Station::Serving(_) | Station::Trash(_) => None,
        }
    }

    /// Progress of the station's timed action in 0..=1.
    pub fn progress(&self) -> Option<f32> {
        match self {
            Station::Cutting(s) => s.progress(),
            Station::Cooking(s) => s.utensil().filter(|u| u.is_cooking()).map(|u| u.progress()),
            Station::Washing(s) => s.progress(),
            _ => None,
        }
    }

    /// Plates stacked here (plate storage, sink and rack).
    pub fn stacked_plates(&self) -> Option<usize> {
        match self {
            Station::PlateStorage(s) => Some(s.len()),
            Station::Washing(s) => Some(s.dirty_count() + s.clean_count()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Take the hand item and put it in `table`.
pub(crate) fn hand_to_table(chef: &mut Chef, table: &mut Option<Item>) -> Interaction {
    match chef.hand.take() {
        Some(item) => {
            let name = item.name();
            *table = Some(item);
            Interaction::Placed(name)
        }
        None => Interaction::Rejected(RejectReason::NothingHere),
    }
}

/// Take the table item into the hand.
pub(crate) fn table_to_hand(chef: &mut Chef, table: &mut Option<Item>) -> Interaction {
    match table.take() {
        Some(item) => {
            let name = item.name();
            chef.hand = Some(item);
            Interaction::PickedUp(name)
        }
        None => Interaction::Rejected(RejectReason::NothingHere),
    }
}

/// Plate whatever food sits in `food_slot` onto the plate held in
/// `plate_slot`. On refusal both slots are left as they were.
pub(crate) fn plate_food(
    plate_slot: &mut Option<Item>,
    food_slot: &mut Option<Item>,
    ids: &mut ItemIds,
) -> Interaction {
    let (Some(Item::Plate(plate)), Some(Item::Food(_))) = (plate_slot.as_mut(), food_slot.as_ref())
    else {
        return Interaction::Rejected(RejectReason::CannotPlate);
    };
    let Some(Item::Food(food)) = food_slot.take() else {
        return Interaction::Rejected(RejectReason::CannotPlate);
    };
    match plate.place(food, ids) {
        Ok(()) => Interaction::Plated {
            dish: plate.dish().map(|d| d.name.clone()).unwrap_or_default(),
        },
        Err(food) => {
            *food_slot = Some(Item::Food(food));
            Interaction::Rejected(RejectReason::CannotPlate)
        }
    }
}
