//! Tile grid, placed stations and chef spawn points.

use crate::id::{ChefId, StationId};
use crate::station::{Station, WashingRole};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A position on the 2D grid. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring position one step in `dir`.
    pub fn step(&self, dir: Direction) -> GridPosition {
        let (dx, dy) = dir.offset();
        GridPosition::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Offset for this direction.
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// Errors from map construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("position {0} is outside the map")]
    OutOfBounds(GridPosition),
    #[error("position {0} is already occupied")]
    Occupied(GridPosition),
    #[error("position {0} is a wall")]
    Wall(GridPosition),
    #[error("the map has no chef spawn points")]
    NoSpawnPoints,
    #[error("no washing station at {0}")]
    NotWashing(GridPosition),
}

/// One grid cell.
#[derive(Debug, Clone)]
pub struct Tile {
    pub position: GridPosition,
    pub wall: bool,
    pub station: Option<StationId>,
    pub chef: Option<ChefId>,
}

impl Tile {
    fn floor(position: GridPosition) -> Self {
        Self {
            position,
            wall: false,
            station: None,
            chef: None,
        }
    }

    /// Not a wall and nothing standing on it.
    pub fn is_walkable(&self) -> bool {
        !self.wall && self.station.is_none() && self.chef.is_none()
    }
}

/// A station together with where it sits and its display name.
#[derive(Debug, Clone)]
pub struct PlacedStation {
    pub name: String,
    pub position: GridPosition,
    pub station: Station,
}

// ---------------------------------------------------------------------------
// KitchenMap
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct KitchenMap {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    stations: SlotMap<StationId, PlacedStation>,
    spawns: Vec<GridPosition>,
}

impl KitchenMap {
    /// An all-floor map.
    pub fn new(width: u32, height: u32) -> Self {
        let tiles = (0..height as i32)
            .flat_map(|y| (0..width as i32).map(move |x| Tile::floor(GridPosition::new(x, y))))
            .collect();
        Self {
            width,
            height,
            tiles,
            stations: SlotMap::with_key(),
            spawns: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, pos: GridPosition) -> Option<usize> {
        if pos.x < 0 || pos.y < 0 || pos.x >= self.width as i32 || pos.y >= self.height as i32 {
            return None;
        }
        Some(pos.y as usize * self.width as usize + pos.x as usize)
    }

    fn tile_mut(&mut self, pos: GridPosition) -> Result<&mut Tile, MapError> {
        let idx = self.index(pos).ok_or(MapError::OutOfBounds(pos))?;
        Ok(&mut self.tiles[idx])
    }

    // -- Construction --

    pub fn set_wall(&mut self, pos: GridPosition) -> Result<(), MapError> {
        let tile = self.tile_mut(pos)?;
        if tile.station.is_some() || tile.chef.is_some() {
            return Err(MapError::Occupied(pos));
        }
        tile.wall = true;
        Ok(())
    }

    pub fn place_station(
        &mut self,
        pos: GridPosition,
        station: Station,
    ) -> Result<StationId, MapError> {
        let tile = self.tile_mut(pos)?;
        if tile.wall {
            return Err(MapError::Wall(pos));
        }
        if tile.station.is_some() {
            return Err(MapError::Occupied(pos));
        }
        let name = station.kind().name().to_string();
        let id = self.stations.insert(PlacedStation {
            name,
            position: pos,
            station,
        });
        self.tile_mut(pos)?.station = Some(id);
        Ok(id)
    }

    pub fn add_spawn(&mut self, pos: GridPosition) -> Result<(), MapError> {
        let tile = self.tile(pos).ok_or(MapError::OutOfBounds(pos))?;
        if tile.wall {
            return Err(MapError::Wall(pos));
        }
        if tile.station.is_some() || self.spawns.contains(&pos) {
            return Err(MapError::Occupied(pos));
        }
        self.spawns.push(pos);
        Ok(())
    }

    /// Pair two washing tiles: clean plates from `sink` go to `rack`.
    pub fn link_washing(&mut self, sink: GridPosition, rack: GridPosition) -> Result<(), MapError> {
        let sink_id = self.washing_at(sink)?;
        let rack_id = self.washing_at(rack)?;
        if let Some(Station::Washing(s)) = self.station_mut(sink_id) {
            s.set_role(WashingRole::Sink {
                rack: Some(rack_id),
            });
        }
        if let Some(Station::Washing(r)) = self.station_mut(rack_id) {
            r.set_role(WashingRole::Rack);
        }
        Ok(())
    }

    fn washing_at(&self, pos: GridPosition) -> Result<StationId, MapError> {
        match self.station_at(pos) {
            Some(id) if matches!(self.station(id), Some(Station::Washing(_))) => Ok(id),
            _ => Err(MapError::NotWashing(pos)),
        }
    }

    // -- Queries --

    pub fn tile(&self, pos: GridPosition) -> Option<&Tile> {
        self.index(pos).map(|idx| &self.tiles[idx])
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn station_at(&self, pos: GridPosition) -> Option<StationId> {
        self.tile(pos).and_then(|t| t.station)
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(id).map(|p| &p.station)
    }

    pub fn station_mut(&mut self, id: StationId) -> Option<&mut Station> {
        self.stations.get_mut(id).map(|p| &mut p.station)
    }

    pub fn placed(&self, id: StationId) -> Option<&PlacedStation> {
        self.stations.get(id)
    }

    pub fn stations(&self) -> impl Iterator<Item = (StationId, &PlacedStation)> {
        self.stations.iter()
    }

    pub fn stations_mut(&mut self) -> impl Iterator<Item = (StationId, &mut PlacedStation)> {
        self.stations.iter_mut()
    }

    pub fn spawns(&self) -> &[GridPosition] {
        &self.spawns
    }

    pub fn is_walkable(&self, pos: GridPosition) -> bool {
        self.tile(pos).is_some_and(Tile::is_walkable)
    }

    // -- Occupancy --

    pub(crate) fn occupy(&mut self, pos: GridPosition, chef: ChefId) -> Result<(), MapError> {
        let tile = self.tile_mut(pos)?;
        if !tile.is_walkable() {
            return Err(MapError::Occupied(pos));
        }
        tile.chef = Some(chef);
        Ok(())
    }

    pub(crate) fn vacate(&mut self, pos: GridPosition) {
        if let Ok(tile) = self.tile_mut(pos) {
            tile.chef = None;
        }
    }
}
