use serde::{Deserialize, Serialize};

/// Non-negative score accumulator. Subtraction floors at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Score(u32);

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// Returns `(old, new)`.
    pub fn add(&mut self, points: u32) -> (u32, u32) {
        let old = self.0;
        self.0 = self.0.saturating_add(points);
        (old, self.0)
    }

    /// Returns `(old, new)`.
    pub fn subtract(&mut self, points: u32) -> (u32, u32) {
        let old = self.0;
        self.0 = self.0.saturating_sub(points);
        (old, self.0)
    }

    pub fn passes(self, threshold: u32) -> bool {
        self.0 >= threshold
    }
}
