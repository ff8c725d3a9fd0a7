//! Timed enemy/pickup spawning and the difficulty ramp

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::entity::{Enemy, Pickup};
use super::state::GameState;
use crate::tuning::{SpawnCadence, Tuning};

/// Most firings one timer advance may produce; any backlog past it is dropped
pub const MAX_FIRINGS_PER_ADVANCE: u32 = 4;

/// Spawn timer and difficulty counters
#[derive(Debug, Clone, PartialEq)]
pub struct Spawner {
    /// Current spawn interval (shrinks with difficulty)
    pub interval_ms: f32,
    /// Enemies spawned per firing
    pub batch_size: u32,
    /// Cumulative enemies spawned this session
    pub enemies_spawned: u32,
    cadence: SpawnCadence,
    /// Period registered at session start (used by `SpawnCadence::Fixed`)
    initial_period_ms: f32,
    floor_ms: f32,
    elapsed_ms: f32,
}

impl Spawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            interval_ms: tuning.spawn_interval_ms,
            batch_size: tuning.initial_batch_size,
            enemies_spawned: 0,
            cadence: tuning.cadence,
            initial_period_ms: tuning.spawn_interval_ms,
            floor_ms: tuning.spawn_floor_ms,
            elapsed_ms: 0.0,
        }
    }

    /// Period the timer is currently armed with
    pub fn period_ms(&self) -> f32 {
        match self.cadence {
            SpawnCadence::Adaptive => self.interval_ms,
            SpawnCadence::Fixed => self.initial_period_ms,
        }
    }

    /// Advance the timer, returning how many firings fell due (at most
    /// [`MAX_FIRINGS_PER_ADVANCE`])
    pub fn advance_timer(&mut self, dt_ms: f32) -> u32 {
        self.elapsed_ms += dt_ms;
        let mut firings = 0;
        loop {
            let period = self.period_ms().max(self.floor_ms);
            if self.elapsed_ms < period {
                break;
            }
            if firings == MAX_FIRINGS_PER_ADVANCE {
                log::debug!("Spawn backlog of {:.1} ms dropped", self.elapsed_ms);
                self.elapsed_ms = 0.0;
                break;
            }
            self.elapsed_ms -= period;
            firings += 1;
        }
        firings
    }

    /// Apply the difficulty ramp for a new kill count.
    /// Returns true when a difficulty step happened.
    pub fn record_kill(&mut self, kills: u32, tuning: &Tuning) -> bool {
        if kills == 0 || kills % tuning.kills_per_step != 0 {
            return false;
        }
        self.interval_ms = (self.interval_ms * tuning.spawn_decay).max(self.floor_ms);
        self.batch_size += 1;
        log::info!(
            "Difficulty up at {} kills: interval {:.1} ms, batch size {}",
            kills,
            self.interval_ms,
            self.batch_size
        );
        true
    }
}

/// Random point on a random edge of the canvas (edges equally likely)
pub fn edge_point(rng: &mut impl Rng, bounds: Vec2) -> Vec2 {
    let side = rng.random_range(0..4);
    let t: f32 = rng.random();
    match side {
        0 => Vec2::new(0.0, t * bounds.y),
        1 => Vec2::new(bounds.x, t * bounds.y),
        2 => Vec2::new(t * bounds.x, 0.0),
        _ => Vec2::new(t * bounds.x, bounds.y),
    }
}

/// Uniform random point inside the canvas
pub fn interior_point(rng: &mut impl Rng, bounds: Vec2) -> Vec2 {
    Vec2::new(rng.random::<f32>() * bounds.x, rng.random::<f32>() * bounds.y)
}

/// Run the spawn timer for one frame and spawn whatever fell due
pub fn run_spawner(state: &mut GameState, dt_ms: f32) {
    let firings = state.spawner.advance_timer(dt_ms);
    for _ in 0..firings {
        spawn_batch(state);
    }
}

/// Spawn one batch of enemies, plus a pickup for every Nth enemy
pub fn spawn_batch(state: &mut GameState) {
    for _ in 0..state.spawner.batch_size {
        let pos = edge_point(&mut state.rng, state.bounds);
        state.enemies.push(Enemy::new(pos, &state.tuning));
        state.spawner.enemies_spawned += 1;

        if state.spawner.enemies_spawned % state.tuning.enemies_per_pickup == 0 {
            let pos = interior_point(&mut state.rng, state.bounds);
            let heading = state.rng.random::<f32>() * TAU;
            state.pickups.push(Pickup::new(pos, heading, &state.tuning));
            log::debug!("Pickup spawned at ({:.0}, {:.0})", pos.x, pos.y);
        }
    }
    log::debug!(
        "Spawned {} enemies ({} total)",
        state.spawner.batch_size,
        state.spawner.enemies_spawned
    );
}
