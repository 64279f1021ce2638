use crate::config::DeviceConfig;
use crate::id::{ItemId, ItemIds};
use crate::ingredient::IngredientState;
use crate::item::Food;
use serde::{Deserialize, Serialize};

/// The cooking devices a cooking station can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    BoilingPot,
    FryingPan,
    Oven,
}

impl DeviceKind {
    pub fn all() -> [DeviceKind; 3] {
        [DeviceKind::BoilingPot, DeviceKind::FryingPan, DeviceKind::Oven]
    }

    pub fn name(self) -> &'static str {
        match self {
            DeviceKind::BoilingPot => "Boiling Pot",
            DeviceKind::FryingPan => "Frying Pan",
            DeviceKind::Oven => "Oven",
        }
    }

    /// Accepts `pot`, `pan`, `oven` and the full names.
    pub fn from_name(name: &str) -> Option<DeviceKind> {
        match name.trim().to_ascii_lowercase().replace([' ', '_'], "").as_str() {
            "pot" | "boilingpot" => Some(DeviceKind::BoilingPot),
            "pan" | "fryingpan" => Some(DeviceKind::FryingPan),
            "oven" => Some(DeviceKind::Oven),
            _ => None,
        }
    }

    fn id_prefix(self) -> &'static str {
        match self {
            DeviceKind::BoilingPot => "pot",
            DeviceKind::FryingPan => "pan",
            DeviceKind::Oven => "oven",
        }
    }

    /// Device-specific ingredient gate, independent of current contents.
    pub fn accepts(self, food: &Food) -> bool {
        match self {
            DeviceKind::BoilingPot => {
                let name = food.name().to_uppercase();
                ["RICE", "BERAS", "PASTA"]
                    .iter()
                    .any(|starch| name.contains(starch))
            }
            DeviceKind::FryingPan => food
                .as_ingredient()
                .is_some_and(|i| i.state() == IngredientState::Chopped),
            DeviceKind::Oven => true,
        }
    }
}

/// Threshold crossed during one [`Utensil::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceEvent {
    Cooked,
    Burned,
}

/// Why a utensil refused food.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertRefusal {
    /// Already holding something or still cooking.
    Full,
    /// The device never takes this food.
    Refused,
}

/// A portable cooking container with its own timer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utensil {
    pub id: ItemId,
    pub kind: DeviceKind,
    capacity: usize,
    contents: Vec<Food>,
    cooking: bool,
    elapsed_ms: u64,
    cook_ms: u64,
    burn_ms: u64,
    cooked: bool,
    burned: bool,
}

impl Utensil {
    pub fn new(kind: DeviceKind, config: &DeviceConfig, ids: &mut ItemIds) -> Self {
        Self {
            id: ids.mint(kind.id_prefix()),
            kind,
            capacity: config.capacity.max(1),
            contents: Vec::new(),
            cooking: false,
            elapsed_ms: 0,
            cook_ms: config.cook_ms,
            burn_ms: config.burn_ms,
            cooked: false,
            burned: false,
        }
    }

    pub fn name(&self) -> String {
        self.kind.name().to_string()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contents(&self) -> &[Food] {
        &self.contents
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn is_cooking(&self) -> bool {
        self.cooking
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn is_burned(&self) -> bool {
        self.burned
    }

    /// Cook progress in 0..=1, for display.
    pub fn progress(&self) -> f32 {
        if self.cook_ms == 0 {
            return 1.0;
        }
        (self.elapsed_ms as f32 / self.cook_ms as f32).min(1.0)
    }

    /// Empty, idle, and the device takes this food.
    pub fn can_accept(&self, food: &Food) -> bool {
        self.contents.is_empty() && !self.cooking && self.kind.accepts(food)
    }

    /// Insert and start cooking in one step. Pot and pan advance the food
    /// to its cooking state on entry; the oven leaves it as is.
    pub fn try_insert(&mut self, mut food: Food) -> Result<(), (Food, InsertRefusal)> {
        if !self.contents.is_empty() || self.cooking || self.contents.len() >= self.capacity {
            return Err((food, InsertRefusal::Full));
        }
        if !self.kind.accepts(&food) {
            return Err((food, InsertRefusal::Refused));
        }

        if self.kind != DeviceKind::Oven {
            food.begin_cooking();
        }
        self.contents.push(food);
        self.cooking = true;
        self.elapsed_ms = 0;
        self.cooked = false;
        self.burned = false;
        Ok(())
    }

    /// Advance the timer. Burned wins when both thresholds fall in one tick.
    pub fn update(&mut self, delta_ms: u64) -> Option<DeviceEvent> {
        if !self.cooking || self.contents.is_empty() {
            return None;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms);

        if self.elapsed_ms >= self.burn_ms {
            for food in &mut self.contents {
                food.burn();
            }
            self.cooked = true;
            self.burned = true;
            self.cooking = false;
            return Some(DeviceEvent::Burned);
        }

        if !self.cooked && self.elapsed_ms >= self.cook_ms {
            self.cooked = true;
            if self.kind != DeviceKind::Oven {
                for food in &mut self.contents {
                    food.finish_cooking();
                }
            }
            return Some(DeviceEvent::Cooked);
        }

        None
    }

    /// Stop the timer. Contents are left for the caller.
    pub fn reset(&mut self) {
        self.cooking = false;
        self.elapsed_ms = 0;
        self.cooked = false;
        self.burned = false;
    }

    pub fn take_contents(&mut self) -> Vec<Food> {
        std::mem::take(&mut self.contents)
    }

    /// Remove the first content item, if any.
    pub fn take_first(&mut self) -> Option<Food> {
        if self.contents.is_empty() {
            None
        } else {
            Some(self.contents.remove(0))
        }
    }

    /// Put back a content item taken with [`take_first`](Self::take_first).
    pub fn restore_first(&mut self, food: Food) {
        self.contents.insert(0, food);
    }

    pub fn clear_contents(&mut self) {
        self.contents.clear();
    }
}
