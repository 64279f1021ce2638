//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::chef::Chef;
use crate::clock::{ManualTimeSource, TimeSource};
use crate::config::GameConfig;
use crate::id::{ChefId, ItemIds};
use crate::ingredient::{Ingredient, IngredientKind, IngredientState, Preparable};
use crate::kitchen::{Kitchen, Movement};
use crate::map::{Direction, GridPosition, KitchenMap};
use crate::order::OrderManager;
use crate::station::{
    AssemblyStation, CookingStation, CuttingStation, PlateStorageStation, ServingStation, Station,
    StationContext, StorageStation, TrashStation, WashingStation,
};
use crate::utensil::DeviceKind;
use std::sync::Arc;

// ===========================================================================
// Station harness
// ===========================================================================

/// Everything a station needs for `interact`, without a map.
pub struct StationHarness {
    pub ids: ItemIds,
    pub orders: OrderManager,
    pub config: GameConfig,
    pub chef: Chef,
}

impl StationHarness {
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        Self {
            ids: ItemIds::new(),
            orders: OrderManager::new(config.orders.max_active_orders),
            config,
            chef: Chef::new(ChefId(0), "Nimon", GridPosition::new(0, 0)),
        }
    }

    /// Run `f` as the harness chef.
    pub fn run<R>(&mut self, f: impl FnOnce(&mut Chef, &mut StationContext<'_>) -> R) -> R {
        let mut ctx = StationContext {
            ids: &mut self.ids,
            orders: &self.orders,
            config: &self.config,
        };
        f(&mut self.chef, &mut ctx)
    }

    /// Run `f` as some other chef.
    pub fn run_as<R>(
        &mut self,
        chef: &mut Chef,
        f: impl FnOnce(&mut Chef, &mut StationContext<'_>) -> R,
    ) -> R {
        let mut ctx = StationContext {
            ids: &mut self.ids,
            orders: &self.orders,
            config: &self.config,
        };
        f(chef, &mut ctx)
    }
}

impl Default for StationHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Ingredients
// ===========================================================================

/// A fresh ingredient driven through chop/cook until it reaches `state`.
/// Stops early if the variant cannot get there.
pub fn prepared(kind: IngredientKind, state: IngredientState, ids: &mut ItemIds) -> Ingredient {
    let mut ingredient = Ingredient::new(kind, ids);
    while ingredient.state() < state {
        let advanced = if ingredient.can_be_chopped() {
            ingredient.chop()
        } else {
            ingredient.cook()
        };
        if !advanced {
            break;
        }
    }
    ingredient
}

// ===========================================================================
// Test kitchen
// ===========================================================================

/// Station positions in [`test_map`].
///
/// ```text
///   0 1 2 3 4 5 6
/// 0 X I I I C R X     I rice, nori, cucumber; C cutting; R pot
/// 1 X . . . . . I     I fish
/// 2 T . V . V . I     T trash; V spawns; I shrimp
/// 3 X . . . . . R     R pan
/// 4 X A P S W W X     assembly, plates, serving, sink, rack
/// ```
pub mod layout {
    use crate::map::GridPosition;

    pub const RICE: GridPosition = GridPosition { x: 1, y: 0 };
    pub const NORI: GridPosition = GridPosition { x: 2, y: 0 };
    pub const CUCUMBER: GridPosition = GridPosition { x: 3, y: 0 };
    pub const CUTTING: GridPosition = GridPosition { x: 4, y: 0 };
    pub const POT: GridPosition = GridPosition { x: 5, y: 0 };
    pub const FISH: GridPosition = GridPosition { x: 6, y: 1 };
    pub const SHRIMP: GridPosition = GridPosition { x: 6, y: 2 };
    pub const PAN: GridPosition = GridPosition { x: 6, y: 3 };
    pub const TRASH: GridPosition = GridPosition { x: 0, y: 2 };
    pub const ASSEMBLY: GridPosition = GridPosition { x: 1, y: 4 };
    pub const PLATES: GridPosition = GridPosition { x: 2, y: 4 };
    pub const SERVING: GridPosition = GridPosition { x: 3, y: 4 };
    pub const SINK: GridPosition = GridPosition { x: 4, y: 4 };
    pub const RACK: GridPosition = GridPosition { x: 5, y: 4 };
    pub const SPAWNS: [GridPosition; 2] = [GridPosition { x: 2, y: 2 }, GridPosition { x: 4, y: 2 }];
}

pub fn test_map() -> KitchenMap {
    let mut map = KitchenMap::new(7, 5);
    let stations = [
        (layout::RICE, Station::IngredientStorage(StorageStation::new(IngredientKind::Rice))),
        (layout::NORI, Station::IngredientStorage(StorageStation::new(IngredientKind::Nori))),
        (
            layout::CUCUMBER,
            Station::IngredientStorage(StorageStation::new(IngredientKind::Cucumber)),
        ),
        (layout::CUTTING, Station::Cutting(CuttingStation::new())),
        (
            layout::POT,
            Station::Cooking(CookingStation::new(Some(DeviceKind::BoilingPot))),
        ),
        (layout::FISH, Station::IngredientStorage(StorageStation::new(IngredientKind::Fish))),
        (
            layout::SHRIMP,
            Station::IngredientStorage(StorageStation::new(IngredientKind::Shrimp)),
        ),
        (
            layout::PAN,
            Station::Cooking(CookingStation::new(Some(DeviceKind::FryingPan))),
        ),
        (layout::TRASH, Station::Trash(TrashStation::new())),
        (layout::ASSEMBLY, Station::Assembly(AssemblyStation::new())),
        (layout::PLATES, Station::PlateStorage(PlateStorageStation::new())),
        (layout::SERVING, Station::Serving(ServingStation::new())),
        (layout::SINK, Station::Washing(WashingStation::sink())),
        (layout::RACK, Station::Washing(WashingStation::rack())),
    ];
    for (pos, station) in stations {
        map.place_station(pos, station)
            .expect("test layout places each station once");
    }
    for (x, y) in [(0, 0), (6, 0), (0, 1), (0, 3), (0, 4), (6, 4)] {
        map.set_wall(GridPosition::new(x, y))
            .expect("test layout walls are free");
    }
    for spawn in layout::SPAWNS {
        map.add_spawn(spawn).expect("test layout spawns are floor");
    }
    map.link_washing(layout::SINK, layout::RACK)
        .expect("test layout has a washing pair");
    map
}

/// The test map with a single chef.
pub fn test_kitchen() -> Kitchen {
    test_kitchen_with(GameConfig {
        chef_count: 1,
        ..GameConfig::default()
    })
}

pub fn test_kitchen_with(config: GameConfig) -> Kitchen {
    Kitchen::new(config, test_map()).expect("test map is valid")
}

/// Where a chef stands to use the station at `station`, and which way it
/// faces. Only meaningful for [`test_map`], whose stations ring the floor.
pub fn approach(station: GridPosition) -> (GridPosition, Direction) {
    match (station.x, station.y) {
        (x, 0) => (GridPosition::new(x, 1), Direction::North),
        (x, 4) => (GridPosition::new(x, 3), Direction::South),
        (0, y) => (GridPosition::new(1, y), Direction::West),
        (_, y) => (GridPosition::new(5, y), Direction::East),
    }
}

/// Walk a chef on [`test_map`] to face `station`: vertical leg first, then
/// horizontal. Returns false if the path was blocked.
pub fn walk_to(kitchen: &mut Kitchen, chef: ChefId, station: GridPosition) -> bool {
    let (stand, facing) = approach(station);
    loop {
        let Some(pos) = kitchen.chef(chef).map(|c| c.position) else {
            return false;
        };
        if pos == stand {
            break;
        }
        let dir = if pos.y < stand.y {
            Direction::South
        } else if pos.y > stand.y {
            Direction::North
        } else if pos.x < stand.x {
            Direction::East
        } else {
            Direction::West
        };
        if !matches!(kitchen.move_chef(chef, dir), Movement::Moved(_)) {
            return false;
        }
    }
    kitchen.move_chef(chef, facing) == Movement::Turned
}

// ===========================================================================
// Time
// ===========================================================================

/// A manual clock and the same clock as a shared time source.
pub fn manual_time() -> (ManualTimeSource, Arc<dyn TimeSource>) {
    let manual = ManualTimeSource::new();
    let source: Arc<dyn TimeSource> = Arc::new(manual.clone());
    (manual, source)
}
