//! Static tunables consumed by the simulation.
//!
//! Every duration is in milliseconds. [`GameConfig::default`] carries the
//! stock values; data files may override any subset of fields (all structs
//! are `#[serde(default)]`), after which [`GameConfig::validate`] must pass.

use crate::utensil::DeviceKind;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A configuration value the simulation cannot run with.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("{device:?} burn threshold ({burn_ms}ms) must exceed its cook threshold ({cook_ms}ms)")]
    BurnBeforeCook {
        device: DeviceKind,
        cook_ms: u64,
        burn_ms: u64,
    },
    #[error("wash increment must be between 1 and 100 percent, got {0}")]
    WashIncrement(u32),
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Timing and capacity of one cooking device kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub cook_ms: u64,
    pub burn_ms: u64,
    pub capacity: usize,
}

/// Order book policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    pub max_active_orders: usize,
    pub spawn_interval_ms: u64,
    /// Time limit for menu entries that do not set their own.
    pub default_time_limit_ms: u64,
    /// Seed for the generator's recipe picks.
    pub seed: u64,
    /// Points for a dish accepted without a matching order
    /// (only under [`ServingPolicy::AcceptAnyDish`]).
    pub fallback_reward: u32,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            max_active_orders: 3,
            spawn_interval_ms: 8_000,
            default_time_limit_ms: 60_000,
            seed: 0x4E1_4045,
            fallback_reward: 10,
        }
    }
}

/// Length of a stage and the score needed to pass it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub duration_ms: u64,
    pub pass_threshold: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_ms: 180_000,
            pass_threshold: 100,
        }
    }
}

/// How the serving station decides whether to take a plated dish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServingPolicy {
    /// The dish must match an active order's recipe exactly.
    #[default]
    MatchActiveOrder,
    /// Deprecated: any non-empty dish is accepted, matching orders first and
    /// paying `fallback_reward` otherwise. Kept for old stage configs only.
    AcceptAnyDish,
}

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// All tunables for one game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cadence of the simulation/render tick.
    pub tick_ms: u64,
    /// Chefs spawned at the map's spawn points (capped by spawn count).
    pub chef_count: usize,
    pub chop_duration_ms: u64,
    /// Time per washing increment.
    pub wash_step_ms: u64,
    pub wash_increment_percent: u32,
    /// Delay before a served (now dirty) plate reappears in plate storage.
    pub plate_return_delay_ms: u64,
    /// Clean plates stocked into every plate storage at kitchen start.
    pub initial_plates: usize,
    pub boiling_pot: DeviceConfig,
    pub frying_pan: DeviceConfig,
    pub oven: DeviceConfig,
    pub orders: OrderConfig,
    pub session: SessionConfig,
    pub event_history_capacity: usize,
    pub worker_threads: usize,
    pub shutdown_timeout_ms: u64,
    pub serving_policy: ServingPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            chef_count: 2,
            chop_duration_ms: 3_000,
            wash_step_ms: 500,
            wash_increment_percent: 25,
            plate_return_delay_ms: 2_000,
            initial_plates: 4,
            boiling_pot: DeviceConfig {
                cook_ms: 4_000,
                burn_ms: 9_000,
                capacity: 1,
            },
            frying_pan: DeviceConfig {
                cook_ms: 3_000,
                burn_ms: 7_000,
                capacity: 1,
            },
            oven: DeviceConfig {
                cook_ms: 5_000,
                burn_ms: 10_000,
                capacity: 1,
            },
            orders: OrderConfig::default(),
            session: SessionConfig::default(),
            event_history_capacity: 256,
            worker_threads: 2,
            shutdown_timeout_ms: 2_000,
            serving_policy: ServingPolicy::default(),
        }
    }
}

impl GameConfig {
    /// Timing for a device kind.
    pub fn device(&self, kind: DeviceKind) -> &DeviceConfig {
        match kind {
            DeviceKind::BoilingPot => &self.boiling_pot,
            DeviceKind::FryingPan => &self.frying_pan,
            DeviceKind::Oven => &self.oven,
        }
    }

    /// Check every value the simulation relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("tick_ms", self.tick_ms),
            ("chop_duration_ms", self.chop_duration_ms),
            ("wash_step_ms", self.wash_step_ms),
            ("orders.spawn_interval_ms", self.orders.spawn_interval_ms),
            ("orders.max_active_orders", self.orders.max_active_orders as u64),
            ("orders.default_time_limit_ms", self.orders.default_time_limit_ms),
            ("session.duration_ms", self.session.duration_ms),
            ("event_history_capacity", self.event_history_capacity as u64),
            ("worker_threads", self.worker_threads as u64),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::Zero { field });
            }
        }

        if self.wash_increment_percent == 0 || self.wash_increment_percent > 100 {
            return Err(ConfigError::WashIncrement(self.wash_increment_percent));
        }

        for kind in DeviceKind::all() {
            let device = self.device(kind);
            if device.capacity == 0 {
                return Err(ConfigError::Zero {
                    field: "device capacity",
                });
            }
            if device.burn_ms <= device.cook_ms {
                return Err(ConfigError::BurnBeforeCook {
                    device: kind,
                    cook_ms: device.cook_ms,
                    burn_ms: device.burn_ms,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_chop_duration_rejected() {
        let config = GameConfig {
            chop_duration_ms: 0,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Zero {
                field: "chop_duration_ms"
            })
        );
    }

    #[test]
    fn burn_must_follow_cook() {
        let mut config = GameConfig::default();
        config.frying_pan.burn_ms = config.frying_pan.cook_ms;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BurnBeforeCook {
                device: DeviceKind::FryingPan,
                ..
            })
        ));
    }

    #[test]
    fn wash_increment_bounds() {
        let config = GameConfig {
            wash_increment_percent: 101,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::WashIncrement(101)));
    }

    #[test]
    fn device_lookup_matches_kind() {
        let config = GameConfig::default();
        assert_eq!(config.device(DeviceKind::Oven).cook_ms, 5_000);
        assert_eq!(config.device(DeviceKind::BoilingPot).burn_ms, 9_000);
    }
}
