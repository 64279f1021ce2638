//! End-to-end kitchen scenarios: cooking, cutting, assembly, plating and
//! serving, driven the way a player would drive them.

use nimons_core::event::{EventKind, GameEvent};
use nimons_core::id::{ChefId, ItemIds};
use nimons_core::ingredient::{Ingredient, IngredientKind, IngredientState};
use nimons_core::item::{Food, Item};
use nimons_core::kitchen::Kitchen;
use nimons_core::recipe::Menu;
use nimons_core::station::{AssemblyStation, CuttingStation, Interaction, StorageStation};
use nimons_core::test_utils::*;
use nimons_core::utensil::{DeviceKind, Utensil};

fn ingredient_state(item: &Option<Item>) -> IngredientState {
    match item {
        Some(Item::Food(Food::Ingredient(i))) => i.state(),
        other => panic!("expected an ingredient, got {other:?}"),
    }
}

fn act(kitchen: &mut Kitchen, station: nimons_core::map::GridPosition) -> Interaction {
    assert!(walk_to(kitchen, ChefId(0), station), "path to {station} blocked");
    kitchen.interact(ChefId(0))
}

// ===========================================================================
// Kappa Maki by assembly
// ===========================================================================

#[test]
fn kappa_maki_by_assembly() {
    let mut h = StationHarness::new();
    let config = h.config.clone();

    // Rice in the pot until the cook threshold.
    let mut pot = Utensil::new(DeviceKind::BoilingPot, &config.boiling_pot, &mut h.ids);
    pot.try_insert(Ingredient::new(IngredientKind::Rice, &mut h.ids).into())
        .unwrap();
    pot.update(config.boiling_pot.cook_ms);
    let rice = pot.take_contents().pop().unwrap();
    assert_eq!(rice.name(), "Cooked Rice");

    // Fresh nori from storage, unchanged.
    let mut nori_storage = StorageStation::new(IngredientKind::Nori);
    assert_eq!(
        h.run(|chef, ctx| nori_storage.interact(chef, ctx)),
        Interaction::Spawned(IngredientKind::Nori)
    );
    assert_eq!(ingredient_state(&h.chef.hand), IngredientState::Raw);
    let nori = h.chef.hand.take().unwrap();

    // Cucumber chopped at the cutting board.
    let mut board = CuttingStation::new();
    h.chef.hand = Some(Ingredient::new(IngredientKind::Cucumber, &mut h.ids).into());
    h.run(|chef, ctx| board.interact(chef, ctx));
    h.run(|chef, ctx| board.interact(chef, ctx));
    let mut effects = Vec::new();
    board.update(config.chop_duration_ms - 1, &config, &mut effects);
    assert!(effects.is_empty());
    board.update(1, &config, &mut effects);
    assert_eq!(effects.len(), 1);
    h.chef.busy = false;
    h.run(|chef, ctx| board.interact(chef, ctx));
    assert_eq!(ingredient_state(&h.chef.hand), IngredientState::Chopped);
    let cucumber = h.chef.hand.take().unwrap();

    // Pairwise assembly.
    let mut assembly = AssemblyStation::new();
    h.chef.hand = Some(nori);
    h.run(|chef, ctx| assembly.interact(chef, ctx));
    h.chef.hand = Some(Item::Food(rice));
    assert_eq!(
        h.run(|chef, ctx| assembly.interact(chef, ctx)),
        Interaction::Assembled("Sushi Base".to_string())
    );
    h.chef.hand = Some(cucumber);
    assert_eq!(
        h.run(|chef, ctx| assembly.interact(chef, ctx)),
        Interaction::Assembled("Kappa Maki".to_string())
    );
}

// ===========================================================================
// Kappa Maki by plating, served for an order
// ===========================================================================

#[test]
fn kappa_maki_plated_and_served() {
    let mut kitchen = test_kitchen();
    let menu = Menu::standard(60_000);
    kitchen
        .orders()
        .spawn_if_room(|| menu.find("Kappa Maki").unwrap().clone())
        .unwrap();

    // Cook the rice.
    assert_eq!(
        act(&mut kitchen, layout::RICE),
        Interaction::Spawned(IngredientKind::Rice)
    );
    assert!(matches!(
        act(&mut kitchen, layout::POT),
        Interaction::AddedToUtensil(_)
    ));
    kitchen.update(4_000);

    // Plate it straight out of the pot.
    assert_eq!(
        act(&mut kitchen, layout::PLATES),
        Interaction::PlateTaken { clean: true }
    );
    assert!(matches!(act(&mut kitchen, layout::POT), Interaction::Plated { .. }));

    // Park the plate on the cucumber storage table and plate nori onto it.
    assert!(matches!(act(&mut kitchen, layout::CUCUMBER), Interaction::Placed(_)));
    assert_eq!(
        act(&mut kitchen, layout::NORI),
        Interaction::Spawned(IngredientKind::Nori)
    );
    assert_eq!(
        act(&mut kitchen, layout::CUCUMBER),
        Interaction::Plated {
            dish: "Sushi Base".to_string()
        }
    );

    // Move the plate to the nori table, then fetch and chop a cucumber.
    assert!(matches!(kitchen.interact(ChefId(0)), Interaction::PickedUp(_)));
    assert!(matches!(act(&mut kitchen, layout::NORI), Interaction::Placed(_)));
    assert_eq!(
        act(&mut kitchen, layout::CUCUMBER),
        Interaction::Spawned(IngredientKind::Cucumber)
    );
    assert!(matches!(act(&mut kitchen, layout::CUTTING), Interaction::Placed(_)));
    assert_eq!(
        kitchen.interact(ChefId(0)),
        Interaction::CuttingStarted { resumed: false }
    );
    kitchen.update(3_000);
    assert_eq!(
        kitchen.interact(ChefId(0)),
        Interaction::PickedUp("Chopped Cucumber".to_string())
    );

    assert_eq!(
        act(&mut kitchen, layout::NORI),
        Interaction::Plated {
            dish: "Kappa Maki".to_string()
        }
    );
    assert!(matches!(kitchen.interact(ChefId(0)), Interaction::PickedUp(_)));

    match act(&mut kitchen, layout::SERVING) {
        Interaction::Served {
            dish,
            recipe,
            reward,
            ..
        } => {
            assert_eq!(dish, "Kappa Maki");
            assert_eq!(recipe.as_deref(), Some("Kappa Maki"));
            assert_eq!(reward, 40);
        }
        other => panic!("expected the dish to be served, got {other:?}"),
    }
    assert_eq!(kitchen.score().value(), 40);
    assert_eq!(kitchen.orders().counts().completed, 1);
    assert!(
        kitchen
            .events()
            .history()
            .iter()
            .any(|e| matches!(e, GameEvent::OrderCompleted { recipe, .. } if recipe == "Kappa Maki"))
    );
}

// ===========================================================================
// Cutting pause / resume
// ===========================================================================

#[test]
fn cutting_resume_keeps_progress() {
    let mut kitchen = test_kitchen();
    let chef = ChefId(0);
    act(&mut kitchen, layout::CUCUMBER);
    act(&mut kitchen, layout::CUTTING);

    assert_eq!(
        kitchen.interact(chef),
        Interaction::CuttingStarted { resumed: false }
    );
    kitchen.update(2_000);
    assert_eq!(
        kitchen.interact(chef),
        Interaction::CuttingPaused { progress_ms: 2_000 }
    );
    assert!(!kitchen.chef(chef).unwrap().busy);

    // Time passes without a cutter; nothing happens.
    kitchen.update(10_000);
    let cutting = kitchen.map().station_at(layout::CUTTING).unwrap();
    assert_eq!(
        kitchen.station(cutting).unwrap().visible_item().as_deref(),
        Some("Cucumber")
    );

    assert_eq!(
        kitchen.interact(chef),
        Interaction::CuttingStarted { resumed: true }
    );
    kitchen.update(999);
    assert_eq!(
        kitchen.station(cutting).unwrap().visible_item().as_deref(),
        Some("Cucumber")
    );
    kitchen.update(1);
    assert_eq!(
        kitchen.station(cutting).unwrap().visible_item().as_deref(),
        Some("Chopped Cucumber")
    );
    assert!(!kitchen.chef(chef).unwrap().busy);
}

// ===========================================================================
// Devices
// ===========================================================================

#[test]
fn unattended_pot_burns() {
    let mut kitchen = test_kitchen();
    act(&mut kitchen, layout::RICE);
    act(&mut kitchen, layout::POT);

    kitchen.update(4_000);
    kitchen.update(5_000);
    let burned = kitchen
        .events()
        .history()
        .into_iter()
        .filter(|e| e.kind() == EventKind::DeviceBurned)
        .count();
    assert_eq!(burned, 1);

    // Trash empties the pot but keeps it in hand.
    assert!(matches!(
        kitchen.interact(ChefId(0)),
        Interaction::UtensilRemoved(DeviceKind::BoilingPot)
    ));
    assert_eq!(
        act(&mut kitchen, layout::TRASH),
        Interaction::Emptied(DeviceKind::BoilingPot)
    );
}

#[test]
fn pan_refuses_raw_fish() {
    let mut kitchen = test_kitchen();
    act(&mut kitchen, layout::FISH);
    assert!(act(&mut kitchen, layout::PAN).is_rejected());

    let mut ids = ItemIds::new();
    let fish = prepared(IngredientKind::Fish, IngredientState::Chopped, &mut ids);
    kitchen.chef_mut(ChefId(0)).unwrap().hand = Some(fish.into());
    assert!(matches!(
        kitchen.interact(ChefId(0)),
        Interaction::AddedToUtensil(_)
    ));
}
