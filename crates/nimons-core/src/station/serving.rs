use super::{Interaction, RejectReason, StationContext, StationEffect};
use crate::chef::Chef;
use crate::config::ServingPolicy;
use crate::item::{Item, Plate};

#[derive(Debug, Clone)]
struct PendingReturn {
    plate: Plate,
    remaining_ms: u64,
}

/// Takes plated dishes for active orders and sends the plates back dirty.
#[derive(Debug, Clone, Default)]
pub struct ServingStation {
    returns: Vec<PendingReturn>,
}

impl ServingStation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plates waiting to go back to plate storage.
    pub fn pending_returns(&self) -> usize {
        self.returns.len()
    }

    pub fn interact(&mut self, chef: &mut Chef, ctx: &mut StationContext<'_>) -> Interaction {
        let Some(Item::Plate(plate)) = &chef.hand else {
            return Interaction::Rejected(RejectReason::NoDish);
        };
        let Some(dish) = plate.dish() else {
            return Interaction::Rejected(RejectReason::NoDish);
        };
        if !dish.is_complete() {
            return Interaction::Rejected(RejectReason::NoDish);
        }

        let (order, recipe, reward) = match ctx.orders.fulfill(dish) {
            Some(order) => (
                Some(order.index),
                Some(order.recipe.name().to_string()),
                order.reward,
            ),
            None => match ctx.config.serving_policy {
                ServingPolicy::MatchActiveOrder => {
                    return Interaction::Rejected(RejectReason::NoMatchingOrder);
                }
                ServingPolicy::AcceptAnyDish => (None, None, ctx.config.orders.fallback_reward),
            },
        };

        let Some(Item::Plate(mut plate)) = chef.hand.take() else {
            return Interaction::Rejected(RejectReason::NoDish);
        };
        let dish = plate.dish().map(|d| d.name.clone()).unwrap_or_default();
        plate.mark_dirty();
        self.returns.push(PendingReturn {
            plate,
            remaining_ms: ctx.config.plate_return_delay_ms,
        });

        Interaction::Served {
            dish,
            order,
            recipe,
            reward,
        }
    }

    pub fn update(&mut self, delta_ms: u64, effects: &mut Vec<StationEffect>) {
        for pending in &mut self.returns {
            pending.remaining_ms = pending.remaining_ms.saturating_sub(delta_ms);
        }
        let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.returns)
            .into_iter()
            .partition(|p| p.remaining_ms == 0);
        self.returns = waiting;
        effects.extend(ready.into_iter().map(|p| StationEffect::PlateReturned(p.plate)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::id::OrderIndex;
    use crate::ingredient::{Ingredient, IngredientKind, Preparable};
    use crate::recipe::Menu;
    use crate::test_utils::StationHarness;

    fn sake_nigiri_plate(h: &mut StationHarness) -> Item {
        let mut plate = Plate::new(&mut h.ids);
        let mut rice = Ingredient::new(IngredientKind::Rice, &mut h.ids);
        rice.cook();
        rice.cook();
        let mut fish = Ingredient::new(IngredientKind::Fish, &mut h.ids);
        fish.chop();
        plate.place(rice.into(), &mut h.ids).unwrap();
        plate.place(fish.into(), &mut h.ids).unwrap();
        plate.into()
    }

    fn spawn(h: &StationHarness, recipe: &str) {
        let menu = Menu::standard(60_000);
        h.orders
            .spawn_if_room(|| menu.find(recipe).unwrap().clone())
            .unwrap();
    }

    #[test]
    fn matching_dish_completes_order() {
        let mut h = StationHarness::new();
        spawn(&h, "Sake Nigiri");
        let mut station = ServingStation::new();
        h.chef.hand = Some(sake_nigiri_plate(&mut h));

        let outcome = h.run(|chef, ctx| station.interact(chef, ctx));
        assert_eq!(
            outcome,
            Interaction::Served {
                dish: "Sake Nigiri".to_string(),
                order: Some(OrderIndex(1)),
                recipe: Some("Sake Nigiri".to_string()),
                reward: 45,
            }
        );
        assert!(h.chef.hand.is_none());
        assert_eq!(h.orders.active_count(), 0);
        assert_eq!(station.pending_returns(), 1);
    }

    #[test]
    fn unmatched_dish_stays_in_hand() {
        let mut h = StationHarness::new();
        spawn(&h, "Ebi Maki");
        let mut station = ServingStation::new();
        h.chef.hand = Some(sake_nigiri_plate(&mut h));

        assert_eq!(
            h.run(|chef, ctx| station.interact(chef, ctx)),
            Interaction::Rejected(RejectReason::NoMatchingOrder)
        );
        assert!(h.chef.hand.is_some());
        assert_eq!(h.orders.active_count(), 1);
    }

    #[test]
    fn permissive_policy_pays_fallback() {
        let config = GameConfig {
            serving_policy: ServingPolicy::AcceptAnyDish,
            ..GameConfig::default()
        };
        let mut h = StationHarness::with_config(config);
        let mut station = ServingStation::new();
        h.chef.hand = Some(sake_nigiri_plate(&mut h));
        assert!(matches!(
            h.run(|chef, ctx| station.interact(chef, ctx)),
            Interaction::Served {
                order: None,
                reward: 10,
                ..
            }
        ));
    }

    #[test]
    fn empty_plate_is_refused() {
        let mut h = StationHarness::new();
        let mut station = ServingStation::new();
        h.chef.hand = Some(Plate::new(&mut h.ids).into());
        assert_eq!(
            h.run(|chef, ctx| station.interact(chef, ctx)),
            Interaction::Rejected(RejectReason::NoDish)
        );
    }

    #[test]
    fn served_plate_returns_dirty_after_delay() {
        let mut h = StationHarness::new();
        spawn(&h, "Sake Nigiri");
        let mut station = ServingStation::new();
        h.chef.hand = Some(sake_nigiri_plate(&mut h));
        h.run(|chef, ctx| station.interact(chef, ctx));

        let mut effects = Vec::new();
        station.update(1_999, &mut effects);
        assert!(effects.is_empty());
        station.update(1, &mut effects);
        match effects.as_slice() {
            [StationEffect::PlateReturned(plate)] => {
                assert!(!plate.is_clean());
                assert!(plate.is_empty());
            }
            other => panic!("expected one returned plate, got {other:?}"),
        }
        assert_eq!(station.pending_returns(), 0);
    }
}
