//! The kitchen engine: map, chefs, order book and score driven by one tick.
//!
//! # Tick Pipeline
//!
//! Each [`Kitchen::update`] runs:
//! 1. **Stations** -- every station's `update(delta)`, chef present or not.
//! 2. **Effects** -- release chefs after a chop or wash, move washed plates to
//!    their rack, put returned plates back into storage, report device events.
//! 3. **Orders** -- count down active orders; expired ones fail and their
//!    penalty is subtracted from the score.
//!
//! Chef input (`move_chef`, `interact`) happens between ticks on the same
//! thread. Only the order book is shared with other threads.

use crate::chef::Chef;
use crate::config::GameConfig;
use crate::event::{EventBus, GameEvent};
use crate::id::{ChefId, ItemIds, OrderIndex, StationId};
use crate::item::Plate;
use crate::map::{Direction, GridPosition, KitchenMap, MapError};
use crate::order::{Order, OrderManager};
use crate::score::Score;
use crate::station::{
    Interaction, RejectReason, Station, StationContext, StationEffect, StationKind, WashingRole,
};
use crate::utensil::Utensil;
use crate::view::{ChefView, KitchenView, OrderView, StationView};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Moved(GridPosition),
    /// The target tile was blocked; the chef only turned to face it.
    Turned,
    /// Frozen by a timed action.
    Busy,
    UnknownChef,
}

// ---------------------------------------------------------------------------
// Kitchen
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Kitchen {
    config: GameConfig,
    map: KitchenMap,
    chefs: Vec<Chef>,
    ids: ItemIds,
    orders: Arc<OrderManager>,
    events: Arc<EventBus>,
    score: Score,
}

impl Kitchen {
    /// Stock plates and starting utensils, then spawn chefs on the map's
    /// spawn points (at most `config.chef_count`, at least one).
    pub fn new(config: GameConfig, map: KitchenMap) -> Result<Self, MapError> {
        if map.spawns().is_empty() {
            return Err(MapError::NoSpawnPoints);
        }
        let mut map = map;
        let mut ids = ItemIds::new();
        stock(&mut map, &config, &mut ids);

        let spawns = map.spawns().to_vec();
        let mut chefs = Vec::new();
        for (n, pos) in spawns.into_iter().take(config.chef_count.max(1)).enumerate() {
            let id = ChefId(n as u32);
            map.occupy(pos, id)?;
            chefs.push(Chef::new(id, format!("Chef {}", n + 1), pos));
        }

        let orders = Arc::new(OrderManager::new(config.orders.max_active_orders));
        let events = Arc::new(EventBus::new(config.event_history_capacity));
        info!(
            width = map.width(),
            height = map.height(),
            stations = map.stations().count(),
            chefs = chefs.len(),
            "kitchen opened"
        );

        Ok(Self {
            config,
            map,
            chefs,
            ids,
            orders,
            events,
            score: Score::new(),
        })
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn map(&self) -> &KitchenMap {
        &self.map
    }

    pub fn chefs(&self) -> &[Chef] {
        &self.chefs
    }

    pub fn chef(&self, id: ChefId) -> Option<&Chef> {
        self.chefs.iter().find(|c| c.id == id)
    }

    pub fn chef_mut(&mut self, id: ChefId) -> Option<&mut Chef> {
        self.chefs.iter_mut().find(|c| c.id == id)
    }

    pub fn orders(&self) -> &Arc<OrderManager> {
        &self.orders
    }

    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn ids_mut(&mut self) -> &mut ItemIds {
        &mut self.ids
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.map.station(id)
    }

    /// First station of `kind` in placement order.
    pub fn find_station(&self, kind: StationKind) -> Option<StationId> {
        self.map
            .stations()
            .find(|(_, placed)| placed.station.kind() == kind)
            .map(|(id, _)| id)
    }

    // -----------------------------------------------------------------------
    // Chef input
    // -----------------------------------------------------------------------

    /// Face `dir` and step into it if the tile is walkable.
    pub fn move_chef(&mut self, chef: ChefId, dir: Direction) -> Movement {
        let Some(chef) = self.chefs.iter_mut().find(|c| c.id == chef) else {
            return Movement::UnknownChef;
        };
        if chef.busy {
            return Movement::Busy;
        }
        chef.facing = dir;
        let from = chef.position;
        let to = from.step(dir);
        if !self.map.is_walkable(to) {
            return Movement::Turned;
        }
        if self.map.occupy(to, chef.id).is_err() {
            return Movement::Turned;
        }
        self.map.vacate(from);
        chef.position = to;
        Movement::Moved(to)
    }

    /// Interact with the station the chef is facing.
    pub fn interact(&mut self, chef_id: ChefId) -> Interaction {
        let Some(chef) = self.chefs.iter_mut().find(|c| c.id == chef_id) else {
            return Interaction::Rejected(RejectReason::UnknownChef);
        };
        let target = chef.facing_tile();
        let station = match self.map.station_at(target) {
            Some(id) => self.map.station_mut(id),
            None => None,
        };
        if chef.busy && station.as_ref().and_then(|s| s.active_worker()) != Some(chef.id) {
            debug!(chef = chef_id.0, "busy chef tried to act elsewhere");
            return Interaction::Rejected(RejectReason::ChefBusy);
        }
        let Some(station) = station else {
            debug!(chef = chef_id.0, tile = %target, "nothing to interact with");
            return Interaction::Rejected(RejectReason::NoStation);
        };

        let kind = station.kind();
        let mut ctx = StationContext {
            ids: &mut self.ids,
            orders: &self.orders,
            config: &self.config,
        };
        let outcome = station.interact(chef, &mut ctx);

        match &outcome {
            Interaction::Rejected(reason) => {
                debug!(chef = chef_id.0, station = kind.name(), %reason, "interaction rejected");
            }
            Interaction::Served {
                dish,
                order,
                recipe,
                reward,
            } => {
                self.apply_served(chef_id, dish, *order, recipe.as_deref(), *reward);
            }
            other => debug!(chef = chef_id.0, station = kind.name(), outcome = ?other, "interaction"),
        }
        outcome
    }

    fn apply_served(
        &mut self,
        chef: ChefId,
        dish: &str,
        order: Option<OrderIndex>,
        recipe: Option<&str>,
        reward: u32,
    ) {
        if let Some(index) = order {
            let recipe = recipe.unwrap_or(dish).to_string();
            info!(order = %index, recipe = %recipe, reward, "order completed");
            self.events.publish(GameEvent::OrderCompleted {
                index,
                recipe,
                reward,
            });
        }
        let (old, new) = self.score.add(reward);
        self.events.publish(GameEvent::ScoreChanged { old, new });
        self.events.publish(GameEvent::DishServed {
            chef,
            dish: dish.to_string(),
        });
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance every station and the order book by `delta_ms`.
    pub fn update(&mut self, delta_ms: u64) {
        let mut effects = Vec::new();
        let mut pending: Vec<(StationId, StationEffect)> = Vec::new();
        for (id, placed) in self.map.stations_mut() {
            placed.station.update(delta_ms, &self.config, &mut effects);
            pending.extend(effects.drain(..).map(|effect| (id, effect)));
        }
        for (source, effect) in pending {
            self.apply_effect(source, effect);
        }

        for order in self.orders.tick(delta_ms) {
            self.fail_order(&order);
        }
    }

    fn apply_effect(&mut self, source: StationId, effect: StationEffect) {
        match effect {
            StationEffect::ChopCompleted { chef, item } => {
                self.release(chef);
                debug!(chef = chef.0, item = %item, "chop completed");
                self.events.publish(GameEvent::ChopCompleted { chef, item });
            }
            StationEffect::WashCompleted { chef, plate } => {
                if let Some(chef) = chef {
                    self.release(chef);
                }
                debug!(plate = %plate, "plate washed");
                self.events.publish(GameEvent::PlateWashed { plate });
            }
            StationEffect::Transfer { to, plate } => match self.map.station_mut(to) {
                Some(Station::Washing(rack)) => rack.receive_clean(plate),
                _ => {
                    warn!("washed plate has no rack; sending it to plate storage");
                    self.store_plate(plate);
                }
            },
            StationEffect::DeviceCooked { device } => {
                let station = self.station_label(source);
                debug!(station = %station, device = device.name(), "device finished cooking");
                self.events
                    .publish(GameEvent::DeviceCooked { station, device });
            }
            StationEffect::DeviceBurned { device } => {
                let station = self.station_label(source);
                info!(station = %station, device = device.name(), "contents burned");
                self.events
                    .publish(GameEvent::DeviceBurned { station, device });
            }
            StationEffect::PlateReturned(plate) => {
                let id = plate.id.clone();
                if self.store_plate(plate) {
                    self.events.publish(GameEvent::PlateReturned { plate: id });
                }
            }
        }
    }

    fn release(&mut self, chef: ChefId) {
        if let Some(chef) = self.chef_mut(chef) {
            chef.busy = false;
        }
    }

    fn station_label(&self, id: StationId) -> String {
        match self.map.placed(id) {
            Some(placed) => format!("{} {}", placed.name, placed.position),
            None => "unknown station".to_string(),
        }
    }

    /// Plate storage first, then the dirty stack of a sink. Returns false if
    /// the kitchen has neither and the plate is lost.
    fn store_plate(&mut self, plate: Plate) -> bool {
        let storage = self
            .map
            .stations()
            .find(|(_, p)| matches!(p.station, Station::PlateStorage(_)))
            .or_else(|| {
                self.map.stations().find(|(_, p)| {
                    matches!(&p.station, Station::Washing(w) if matches!(w.role(), WashingRole::Sink { .. }))
                })
            })
            .map(|(id, _)| id);

        match storage.and_then(|id| self.map.station_mut(id)) {
            Some(Station::PlateStorage(storage)) => {
                storage.push(plate);
                true
            }
            Some(Station::Washing(sink)) if !plate.is_clean() => {
                sink.receive_dirty(plate);
                true
            }
            Some(Station::Washing(sink)) => {
                sink.receive_clean(plate);
                true
            }
            _ => {
                warn!(plate = %plate.id, "no plate storage or sink; plate discarded");
                false
            }
        }
    }

    fn fail_order(&mut self, order: &Order) {
        let (old, new) = self.score.subtract(order.penalty);
        info!(
            order = %order.index,
            recipe = order.recipe.name(),
            penalty = order.penalty,
            "order expired"
        );
        self.events.publish(GameEvent::OrderFailed {
            index: order.index,
            recipe: order.recipe.name().to_string(),
            penalty: order.penalty,
        });
        self.events.publish(GameEvent::ScoreChanged { old, new });
    }

    /// End of game: every active order becomes expired without penalty.
    pub fn close_orders(&mut self) -> Vec<Order> {
        let expired = self.orders.close_all();
        for order in &expired {
            info!(order = %order.index, recipe = order.recipe.name(), "order closed at game end");
            self.events.publish(GameEvent::OrderExpired {
                index: order.index,
                recipe: order.recipe.name().to_string(),
            });
        }
        expired
    }

    // -----------------------------------------------------------------------
    // Render feed
    // -----------------------------------------------------------------------

    pub fn view(&self, remaining_ms: u64) -> KitchenView {
        KitchenView {
            width: self.map.width(),
            height: self.map.height(),
            walls: self
                .map
                .tiles()
                .iter()
                .filter(|t| t.wall)
                .map(|t| t.position)
                .collect(),
            chefs: self
                .chefs
                .iter()
                .map(|c| ChefView {
                    id: c.id,
                    name: c.name.clone(),
                    position: c.position,
                    facing: c.facing,
                    holding: c.hand.as_ref().map(|item| item.name()),
                    busy: c.busy,
                })
                .collect(),
            stations: self
                .map
                .stations()
                .map(|(_, p)| StationView {
                    name: p.name.clone(),
                    kind: p.station.kind(),
                    position: p.position,
                    item: p.station.visible_item(),
                    progress: p.station.progress(),
                    plates: p.station.stacked_plates(),
                })
                .collect(),
            orders: self
                .orders
                .active()
                .into_iter()
                .map(|o| OrderView {
                    index: o.index,
                    recipe: o.recipe.name().to_string(),
                    remaining_ms: o.remaining_ms(),
                    time_limit_ms: o.time_limit_ms,
                    reward: o.reward,
                })
                .collect(),
            score: self.score.value(),
            remaining_ms,
        }
    }
}

/// Stock every plate storage and mount each cooking station's starting
/// utensil.
fn stock(map: &mut KitchenMap, config: &GameConfig, ids: &mut ItemIds) {
    let mut has_plate_storage = false;
    for (_, placed) in map.stations_mut() {
        match &mut placed.station {
            Station::PlateStorage(storage) => {
                has_plate_storage = true;
                for _ in 0..config.initial_plates {
                    storage.push(Plate::new(ids));
                }
            }
            Station::Cooking(cooking) => {
                if let Some(kind) = cooking.starting_device()
                    && cooking.utensil().is_none()
                    && cooking
                        .mount(Utensil::new(kind, config.device(kind), ids))
                        .is_err()
                {
                    warn!(device = kind.name(), "cooking station already stocked");
                }
            }
            _ => {}
        }
    }
    if !has_plate_storage && config.initial_plates > 0 {
        warn!("map has no plate storage; starting plates were not stocked");
    }
}
