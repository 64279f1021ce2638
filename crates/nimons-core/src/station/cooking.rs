use super::{Interaction, RejectReason, StationContext, StationEffect};
use crate::chef::Chef;
use crate::item::Item;
use crate::utensil::{DeviceEvent, DeviceKind, InsertRefusal, Utensil};

/// Holds at most one utensil. The mounted device cooks on every tick with
/// or without a chef nearby.
#[derive(Debug, Clone, Default)]
pub struct CookingStation {
    utensil: Option<Utensil>,
    starting_device: Option<DeviceKind>,
}

impl CookingStation {
    /// `starting_device` is stocked when the kitchen opens.
    pub fn new(starting_device: Option<DeviceKind>) -> Self {
        Self {
            utensil: None,
            starting_device,
        }
    }

    pub fn starting_device(&self) -> Option<DeviceKind> {
        self.starting_device
    }

    pub fn utensil(&self) -> Option<&Utensil> {
        self.utensil.as_ref()
    }

    /// Mount a utensil directly. Returns it back if one is already mounted.
    pub fn mount(&mut self, utensil: Utensil) -> Result<(), Utensil> {
        if self.utensil.is_some() {
            return Err(utensil);
        }
        self.utensil = Some(utensil);
        Ok(())
    }

    /// Scenarios, first match wins:
    /// 1. nothing mounted: a utensil in hand is mounted, anything else is refused
    /// 2. mounted, empty hand: take the whole utensil
    /// 3. mounted, plate in hand: plate the first content, then empty and
    ///    reset the device
    /// 4. mounted, food in hand: insert if the device is idle and accepts it
    pub fn interact(&mut self, chef: &mut Chef, ctx: &mut StationContext<'_>) -> Interaction {
        if self.utensil.is_none() {
            return self.mount_from_hand(chef);
        }
        let Some(hand) = chef.hand.take() else {
            return match self.utensil.take() {
                Some(utensil) => {
                    let kind = utensil.kind;
                    chef.hand = Some(Item::Utensil(utensil));
                    Interaction::UtensilRemoved(kind)
                }
                None => Interaction::Rejected(RejectReason::NothingHere),
            };
        };
        let Some(utensil) = self.utensil.as_mut() else {
            chef.hand = Some(hand);
            return Interaction::Rejected(RejectReason::NothingHere);
        };

        match hand {
            Item::Plate(mut plate) => {
                let outcome = match utensil.take_first() {
                    None => Interaction::Rejected(RejectReason::UtensilEmpty),
                    Some(food) => match plate.place(food, ctx.ids) {
                        Ok(()) => {
                            utensil.clear_contents();
                            utensil.reset();
                            Interaction::Plated {
                                dish: plate.dish().map(|d| d.name.clone()).unwrap_or_default(),
                            }
                        }
                        Err(food) => {
                            utensil.restore_first(food);
                            Interaction::Rejected(RejectReason::CannotPlate)
                        }
                    },
                };
                chef.hand = Some(Item::Plate(plate));
                outcome
            }
            Item::Food(food) => match utensil.try_insert(food) {
                Ok(()) => {
                    let name = utensil.contents().first().map(|f| f.name()).unwrap_or_default();
                    Interaction::AddedToUtensil(name)
                }
                Err((food, refusal)) => {
                    chef.hand = Some(Item::Food(food));
                    Interaction::Rejected(match refusal {
                        InsertRefusal::Full => RejectReason::UtensilFull,
                        InsertRefusal::Refused => RejectReason::IngredientRefused,
                    })
                }
            },
            other @ Item::Utensil(_) => {
                chef.hand = Some(other);
                Interaction::Rejected(RejectReason::NotCookable)
            }
        }
    }

    fn mount_from_hand(&mut self, chef: &mut Chef) -> Interaction {
        match chef.hand.take() {
            Some(Item::Utensil(utensil)) => {
                let kind = utensil.kind;
                self.utensil = Some(utensil);
                Interaction::UtensilMounted(kind)
            }
            Some(other) => {
                chef.hand = Some(other);
                Interaction::Rejected(RejectReason::NotAUtensil)
            }
            None => Interaction::Rejected(RejectReason::NothingHere),
        }
    }

    pub fn update(&mut self, delta_ms: u64, effects: &mut Vec<StationEffect>) {
        let Some(utensil) = self.utensil.as_mut() else {
            return;
        };
        match utensil.update(delta_ms) {
            Some(DeviceEvent::Cooked) => effects.push(StationEffect::DeviceCooked {
                device: utensil.kind,
            }),
            Some(DeviceEvent::Burned) => effects.push(StationEffect::DeviceBurned {
                device: utensil.kind,
            }),
            None => {}
        }
    }
}
