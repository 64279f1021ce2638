use super::{Interaction, RejectReason};
use crate::chef::Chef;
use crate::item::Item;

#[derive(Debug, Clone, Default)]
pub struct TrashStation;

impl TrashStation {
    pub fn new() -> Self {
        Self
    }

    /// A utensil with contents is emptied and stays in hand; anything else
    /// held is destroyed.
    pub fn interact(&mut self, chef: &mut Chef) -> Interaction {
        match chef.hand.as_mut() {
            None => Interaction::Rejected(RejectReason::NothingHere),
            Some(Item::Utensil(utensil)) => {
                if utensil.is_empty() {
                    return Interaction::Rejected(RejectReason::UtensilEmpty);
                }
                utensil.clear_contents();
                utensil.reset();
                Interaction::Emptied(utensil.kind)
            }
            Some(_) => {
                let name = chef.hand.take().map(|item| item.name()).unwrap_or_default();
                Interaction::Discarded(name)
            }
        }
    }
}
