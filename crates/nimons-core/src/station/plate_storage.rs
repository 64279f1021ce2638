use super::{Interaction, RejectReason};
use crate::chef::Chef;
use crate::item::{Item, Plate};

/// LIFO plate stack. Hands out whatever is on top, clean or dirty.
#[derive(Debug, Clone, Default)]
pub struct PlateStorageStation {
    stack: Vec<Plate>,
}

impl PlateStorageStation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn top(&self) -> Option<&Plate> {
        self.stack.last()
    }

    /// Return path used by serving and stocking.
    pub fn push(&mut self, plate: Plate) {
        self.stack.push(plate);
    }

    pub fn interact(&mut self, chef: &mut Chef) -> Interaction {
        match chef.hand.take() {
            None => match self.stack.pop() {
                Some(plate) => {
                    let clean = plate.is_clean();
                    chef.hand = Some(Item::Plate(plate));
                    Interaction::PlateTaken { clean }
                }
                None => Interaction::Rejected(RejectReason::NoPlates),
            },
            Some(Item::Plate(plate)) => {
                self.stack.push(plate);
                Interaction::PlateStored
            }
            Some(other) => {
                chef.hand = Some(other);
                Interaction::Rejected(RejectReason::NotAPlate)
            }
        }
    }
}
