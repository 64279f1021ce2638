//! Read-only render feed.
//!
//! Snapshot types that copy what a renderer needs out of the kitchen each
//! tick. All fields are owned; nothing borrows into kitchen storage.

use crate::id::{ChefId, OrderIndex};
use crate::map::{Direction, GridPosition};
use crate::station::StationKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChefView {
    pub id: ChefId,
    pub name: String,
    pub position: GridPosition,
    pub facing: Direction,
    /// Display name of the held item.
    pub holding: Option<String>,
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationView {
    pub name: String,
    pub kind: StationKind,
    pub position: GridPosition,
    /// Whatever sits on the station, by display name.
    pub item: Option<String>,
    /// Progress of a timed action in 0..=1.
    pub progress: Option<f32>,
    pub plates: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderView {
    pub index: OrderIndex,
    pub recipe: String,
    pub remaining_ms: u64,
    pub time_limit_ms: u64,
    pub reward: u32,
}

/// Everything the render loop reads in one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KitchenView {
    pub width: u32,
    pub height: u32,
    pub walls: Vec<GridPosition>,
    pub chefs: Vec<ChefView>,
    pub stations: Vec<StationView>,
    pub orders: Vec<OrderView>,
    pub score: u32,
    pub remaining_ms: u64,
}
