//! Game balance constants
//!
//! Every tunable lives in [`Tuning`]. Defaults reproduce the stock game;
//! partial JSON documents override individual fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::FRAME_MS;

/// How the spawn timer picks up a shrinking interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpawnCadence {
    /// Re-arm with the current interval after every firing
    #[default]
    Adaptive,
    /// Keep the period registered at session start
    Fixed,
}

impl SpawnCadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnCadence::Adaptive => "Adaptive",
            SpawnCadence::Fixed => "Fixed",
        }
    }
}

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("malformed tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Tunable constants. Distances are pixels, speeds pixels per frame,
/// durations milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_size: f32,
    pub player_speed: f32,
    pub player_max_health: i32,

    // === Bullets ===
    pub bullet_size: f32,
    pub bullet_speed: f32,

    // === Enemies ===
    pub enemy_size: f32,
    pub enemy_speed: f32,
    pub enemy_damage: i32,

    // === Pickups ===
    pub pickup_size: f32,
    pub pickup_speed: f32,
    pub pickup_heal: i32,
    pub pickup_lifetime_ms: f32,

    // === Spawning / difficulty ===
    pub spawn_interval_ms: f32,
    /// Multiplier applied to the interval at each difficulty step
    pub spawn_decay: f32,
    pub spawn_floor_ms: f32,
    pub initial_batch_size: u32,
    pub kills_per_step: u32,
    pub enemies_per_pickup: u32,
    pub cadence: SpawnCadence,

    // === Effects ===
    pub explosion_start_radius: f32,
    pub explosion_max_radius: f32,
    pub explosion_growth: f32,
    pub explosion_fade: f32,
    pub smoke_fade: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_size: 70.0,
            player_speed: 5.0,
            player_max_health: 100,

            bullet_size: 30.0,
            bullet_speed: 10.0,

            enemy_size: 70.0,
            enemy_speed: 2.0,
            enemy_damage: 10,

            pickup_size: 70.0,
            pickup_speed: 1.0,
            pickup_heal: 25,
            pickup_lifetime_ms: 10_000.0,

            spawn_interval_ms: 1000.0,
            spawn_decay: 0.95,
            spawn_floor_ms: 200.0,
            initial_batch_size: 1,
            kills_per_step: 10,
            enemies_per_pickup: 10,
            cadence: SpawnCadence::Adaptive,

            explosion_start_radius: 10.0,
            explosion_max_radius: 50.0,
            explosion_growth: 2.0,
            explosion_fade: 0.05,
            smoke_fade: 0.03,
        }
    }
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("player_size", self.player_size),
            ("player_speed", self.player_speed),
            ("bullet_size", self.bullet_size),
            ("bullet_speed", self.bullet_speed),
            ("enemy_size", self.enemy_size),
            ("enemy_speed", self.enemy_speed),
            ("pickup_size", self.pickup_size),
            ("pickup_lifetime_ms", self.pickup_lifetime_ms),
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("spawn_floor_ms", self.spawn_floor_ms),
            ("explosion_growth", self.explosion_growth),
            ("explosion_fade", self.explosion_fade),
            ("smoke_fade", self.smoke_fade),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be greater than zero",
                });
            }
        }

        if self.player_max_health <= 0 {
            return Err(TuningError::Invalid {
                field: "player_max_health",
                reason: "must be greater than zero",
            });
        }
        if self.spawn_decay.is_nan() || self.spawn_decay <= 0.0 || self.spawn_decay > 1.0 {
            return Err(TuningError::Invalid {
                field: "spawn_decay",
                reason: "must be in (0, 1]",
            });
        }
        if self.spawn_floor_ms < FRAME_MS {
            return Err(TuningError::Invalid {
                field: "spawn_floor_ms",
                reason: "must be at least one frame",
            });
        }
        if self.spawn_floor_ms > self.spawn_interval_ms {
            return Err(TuningError::Invalid {
                field: "spawn_floor_ms",
                reason: "must not exceed spawn_interval_ms",
            });
        }
        if self.enemy_damage < 0 {
            return Err(TuningError::Invalid {
                field: "enemy_damage",
                reason: "must not be negative",
            });
        }
        if self.pickup_heal < 0 {
            return Err(TuningError::Invalid {
                field: "pickup_heal",
                reason: "must not be negative",
            });
        }
        if self.explosion_start_radius.is_nan() || self.explosion_start_radius < 0.0 {
            return Err(TuningError::Invalid {
                field: "explosion_start_radius",
                reason: "must not be negative",
            });
        }
        if self.explosion_max_radius.is_nan()
            || self.explosion_max_radius < self.explosion_start_radius
        {
            return Err(TuningError::Invalid {
                field: "explosion_max_radius",
                reason: "must not be below explosion_start_radius",
            });
        }
        if self.kills_per_step == 0 {
            return Err(TuningError::Invalid {
                field: "kills_per_step",
                reason: "must be at least 1",
            });
        }
        if self.enemies_per_pickup == 0 {
            return Err(TuningError::Invalid {
                field: "enemies_per_pickup",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Resolve a tuning source; `None` or any error means defaults
    fn from_source(source: Option<String>, origin: &str) -> Self {
        let Some(json) = source else {
            log::info!("Using default tuning");
            return Self::default();
        };
        match Self::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", origin);
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning from {}: {}", origin, e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "boshki_tuning";

    /// Load tuning overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|storage| storage.get_item(Self::STORAGE_KEY).ok())
            .flatten();
        Self::from_source(json, "LocalStorage")
    }

    /// Environment variable naming a JSON tuning file
    #[cfg(not(target_arch = "wasm32"))]
    const ENV_VAR: &'static str = "BOSHKI_TUNING";

    /// Load tuning overrides from the file named by `BOSHKI_TUNING` (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            return Self::from_source(None, Self::ENV_VAR);
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => Self::from_source(Some(json), &path),
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {}", path, e);
                Self::default()
            }
        }
    }
}
