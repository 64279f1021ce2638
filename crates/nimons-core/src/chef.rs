use crate::id::ChefId;
use crate::item::Item;
use crate::map::{Direction, GridPosition};

/// A player-controlled actor. Holds at most one item.
#[derive(Debug, Clone)]
pub struct Chef {
    pub id: ChefId,
    pub name: String,
    pub position: GridPosition,
    pub facing: Direction,
    pub hand: Option<Item>,
    /// Frozen by a timed action (cutting, washing).
    pub busy: bool,
}

impl Chef {
    pub fn new(id: ChefId, name: impl Into<String>, position: GridPosition) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            facing: Direction::South,
            hand: None,
            busy: false,
        }
    }

    /// The tile the chef interacts with.
    pub fn facing_tile(&self) -> GridPosition {
        self.position.step(self.facing)
    }

    pub fn is_holding(&self) -> bool {
        self.hand.is_some()
    }
}
