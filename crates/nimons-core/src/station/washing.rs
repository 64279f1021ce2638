use super::{Interaction, RejectReason, StationEffect};
use crate::chef::Chef;
use crate::config::GameConfig;
use crate::id::{ChefId, StationId};
use crate::item::{Item, Plate};

/// Which side of a sink/rack pair this tile is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WashingRole {
    /// Takes dirty plates and washes them. Clean plates go to `rack` when
    /// linked, otherwise they stay here.
    Sink { rack: Option<StationId> },
    /// Output side; only hands out clean plates.
    Rack,
}

/// Dirty plates in, clean plates out. Washing is chef-attended and advances
/// in fixed steps of accumulated tick time.
#[derive(Debug, Clone)]
pub struct WashingStation {
    role: WashingRole,
    dirty: Vec<Plate>,
    clean: Vec<Plate>,
    progress_percent: u32,
    step_elapsed_ms: u64,
    washer: Option<ChefId>,
}

impl Default for WashingStation {
    fn default() -> Self {
        Self::sink()
    }
}

impl WashingStation {
    pub fn sink() -> Self {
        Self::with_role(WashingRole::Sink { rack: None })
    }

    pub fn rack() -> Self {
        Self::with_role(WashingRole::Rack)
    }

    fn with_role(role: WashingRole) -> Self {
        Self {
            role,
            dirty: Vec::new(),
            clean: Vec::new(),
            progress_percent: 0,
            step_elapsed_ms: 0,
            washer: None,
        }
    }

    pub fn role(&self) -> WashingRole {
        self.role
    }

    pub(crate) fn set_role(&mut self, role: WashingRole) {
        self.role = role;
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    pub fn clean_count(&self) -> usize {
        self.clean.len()
    }

    pub fn progress_percent(&self) -> u32 {
        self.progress_percent
    }

    pub fn active_washer(&self) -> Option<ChefId> {
        self.washer
    }

    pub fn progress(&self) -> Option<f32> {
        (self.progress_percent > 0).then(|| self.progress_percent as f32 / 100.0)
    }

    /// Accept a washed plate from a linked sink.
    pub fn receive_clean(&mut self, plate: Plate) {
        self.clean.push(plate);
    }

    /// Accept a dirty plate routed here by the kitchen.
    pub fn receive_dirty(&mut self, plate: Plate) {
        self.dirty.push(plate);
    }

    /// Scenarios, first match wins:
    /// 1. dirty plate in hand (sink only): add it to the dirty stack
    /// 2. the active washer again: pause, keeping progress
    /// 3. empty hand, clean plate ready: take it
    /// 4. empty hand, dirty plates pending (sink only): start or resume
    ///    washing and freeze the chef
    pub fn interact(&mut self, chef: &mut Chef) -> Interaction {
        let is_sink = matches!(self.role, WashingRole::Sink { .. });

        if is_sink && matches!(&chef.hand, Some(Item::Plate(p)) if !p.is_clean()) {
            if let Some(Item::Plate(plate)) = chef.hand.take() {
                self.dirty.push(plate);
            }
            return Interaction::DirtyPlateDropped;
        }
        if self.washer == Some(chef.id) {
            self.washer = None;
            chef.busy = false;
            return Interaction::WashingPaused {
                progress_percent: self.progress_percent,
            };
        }
        if let Some(held) = &chef.hand {
            let dirty = matches!(held, Item::Plate(p) if !p.is_clean());
            return Interaction::Rejected(if dirty {
                RejectReason::NotASink
            } else {
                RejectReason::NotDirty
            });
        }
        if let Some(plate) = self.clean.pop() {
            chef.hand = Some(Item::Plate(plate));
            return Interaction::PlateTaken { clean: true };
        }
        if is_sink && !self.dirty.is_empty() {
            if self.washer.is_some() {
                return Interaction::Rejected(RejectReason::StationInUse);
            }
            self.washer = Some(chef.id);
            chef.busy = true;
            return Interaction::WashingStarted {
                resumed: self.progress_percent > 0 || self.step_elapsed_ms > 0,
            };
        }
        Interaction::Rejected(RejectReason::NothingHere)
    }

    /// Add `wash_increment_percent` per `wash_step_ms` while a washer is
    /// recorded. At 100% the bottom-most dirty plate is cleaned.
    pub fn update(&mut self, delta_ms: u64, config: &GameConfig, effects: &mut Vec<StationEffect>) {
        let WashingRole::Sink { rack } = self.role else {
            return;
        };
        if self.washer.is_none() || self.dirty.is_empty() {
            return;
        }

        self.step_elapsed_ms += delta_ms;
        while self.step_elapsed_ms >= config.wash_step_ms {
            self.step_elapsed_ms -= config.wash_step_ms;
            self.progress_percent = (self.progress_percent + config.wash_increment_percent).min(100);
            if self.progress_percent < 100 {
                continue;
            }

            let mut plate = self.dirty.remove(0);
            plate.wash();
            let id = plate.id.clone();
            self.progress_percent = 0;
            self.step_elapsed_ms = 0;
            effects.push(StationEffect::WashCompleted {
                chef: self.washer.take(),
                plate: id,
            });
            match rack {
                Some(rack) => effects.push(StationEffect::Transfer { to: rack, plate }),
                None => self.clean.push(plate),
            }
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::ItemIds;
    use crate::map::GridPosition;
    use slotmap::SlotMap;

    fn dirty_plate(ids: &mut ItemIds) -> Plate {
        let mut plate = Plate::new(ids);
        plate.mark_dirty();
        plate
    }

    fn chef() -> Chef {
        Chef::new(ChefId(0), "Nimon", GridPosition::new(0, 0))
    }

    #[test]
    fn washing_takes_four_steps() {
        let mut ids = ItemIds::new();
        let config = GameConfig::default();
        let mut sink = WashingStation::sink();
        let mut chef = chef();

        chef.hand = Some(dirty_plate(&mut ids).into());
        assert_eq!(sink.interact(&mut chef), Interaction::DirtyPlateDropped);
        assert_eq!(
            sink.interact(&mut chef),
            Interaction::WashingStarted { resumed: false }
        );
        assert!(chef.busy);

        let mut effects = Vec::new();
        for _ in 0..3 {
            sink.update(500, &config, &mut effects);
        }
        assert_eq!(sink.progress_percent(), 75);
        assert!(effects.is_empty());

        sink.update(500, &config, &mut effects);
        assert!(matches!(
            effects.as_slice(),
            [StationEffect::WashCompleted { chef: Some(ChefId(0)), .. }]
        ));
        assert_eq!(sink.clean_count(), 1);
        assert_eq!(sink.dirty_count(), 0);
        assert_eq!(sink.active_washer(), None);
    }

    #[test]
    fn washing_never_blocks_interact() {
        let mut ids = ItemIds::new();
        let mut sink = WashingStation::sink();
        let mut chef = chef();
        chef.hand = Some(dirty_plate(&mut ids).into());
        sink.interact(&mut chef);

        let start = std::time::Instant::now();
        sink.interact(&mut chef);
        assert!(start.elapsed() < std::time::Duration::from_millis(100));
        assert_eq!(sink.progress_percent(), 0);
    }

    #[test]
    fn pause_keeps_progress() {
        let mut ids = ItemIds::new();
        let config = GameConfig::default();
        let mut sink = WashingStation::sink();
        let mut chef = chef();
        chef.hand = Some(dirty_plate(&mut ids).into());
        sink.interact(&mut chef);
        sink.interact(&mut chef);
        sink.update(1_000, &config, &mut Vec::new());

        assert_eq!(
            sink.interact(&mut chef),
            Interaction::WashingPaused { progress_percent: 50 }
        );
        assert!(!chef.busy);
        sink.update(5_000, &config, &mut Vec::new());
        assert_eq!(sink.progress_percent(), 50);

        assert_eq!(
            sink.interact(&mut chef),
            Interaction::WashingStarted { resumed: true }
        );
    }

    #[test]
    fn bottom_plate_is_washed_first() {
        let mut ids = ItemIds::new();
        let config = GameConfig::default();
        let mut sink = WashingStation::sink();
        let mut chef = chef();
        let first = dirty_plate(&mut ids);
        let first_id = first.id.clone();
        chef.hand = Some(first.into());
        sink.interact(&mut chef);
        chef.hand = Some(dirty_plate(&mut ids).into());
        sink.interact(&mut chef);

        sink.interact(&mut chef);
        let mut effects = Vec::new();
        sink.update(2_000, &config, &mut effects);
        assert!(matches!(
            effects.as_slice(),
            [StationEffect::WashCompleted { plate, .. }] if *plate == first_id
        ));
        assert_eq!(sink.dirty_count(), 1);
    }

    #[test]
    fn linked_sink_transfers_to_rack() {
        let mut ids = ItemIds::new();
        let config = GameConfig::default();
        let mut keys: SlotMap<StationId, ()> = SlotMap::with_key();
        let rack_id = keys.insert(());

        let mut sink = WashingStation::sink();
        sink.set_role(WashingRole::Sink {
            rack: Some(rack_id),
        });
        let mut chef = chef();
        chef.hand = Some(dirty_plate(&mut ids).into());
        sink.interact(&mut chef);
        sink.interact(&mut chef);

        let mut effects = Vec::new();
        sink.update(2_000, &config, &mut effects);
        assert!(matches!(
            effects.last(),
            Some(StationEffect::Transfer { to, plate }) if *to == rack_id && plate.is_clean()
        ));
        assert_eq!(sink.clean_count(), 0);
    }

    #[test]
    fn rack_hands_out_clean_plates_only() {
        let mut ids = ItemIds::new();
        let mut rack = WashingStation::rack();
        let mut chef = chef();
        assert_eq!(
            rack.interact(&mut chef),
            Interaction::Rejected(RejectReason::NothingHere)
        );

        rack.receive_clean(Plate::new(&mut ids));
        assert_eq!(rack.interact(&mut chef), Interaction::PlateTaken { clean: true });

        let mut other = Chef::new(ChefId(1), "Other", GridPosition::new(1, 0));
        other.hand = Some(dirty_plate(&mut ids).into());
        assert_eq!(
            rack.interact(&mut other),
            Interaction::Rejected(RejectReason::NotASink)
        );
    }
}
