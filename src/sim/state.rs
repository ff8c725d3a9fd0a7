//! Game state and session lifecycle
//!
//! Everything one session mutates lives in [`GameState`]; nothing is global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{Bullet, Enemy, Explosion, Pickup, Player, Smoke};
use super::spawner::Spawner;
use crate::angle_to;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Nothing advances until unpaused
    Paused,
    /// Player health reached zero; terminal until reset
    GameOver,
}

/// Complete session state (deterministic for a given seed and input)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the session was started with
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Canvas size
    pub bounds: Vec2,
    pub phase: GamePhase,
    /// Simulated frame counter
    pub frame: u64,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub pickups: Vec<Pickup>,
    pub explosions: Vec<Explosion>,
    pub smokes: Vec<Smoke>,
    pub score: u32,
    /// Enemies destroyed by bullets
    pub kills: u32,
    pub spawner: Spawner,
}

impl GameState {
    /// Create a new session on a canvas of the given size
    pub fn new(seed: u64, bounds: Vec2, tuning: Tuning) -> Self {
        let state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(bounds / 2.0, &tuning),
            spawner: Spawner::new(&tuning),
            tuning,
            bounds,
            phase: GamePhase::Playing,
            frame: 0,
            bullets: Vec::new(),
            enemies: Vec::new(),
            pickups: Vec::new(),
            explosions: Vec::new(),
            smokes: Vec::new(),
            score: 0,
            kills: 0,
        };
        log::info!(
            "Session started: seed {}, canvas {}x{}, {} spawn cadence",
            seed,
            bounds.x,
            bounds.y,
            state.tuning.cadence.as_str()
        );
        state
    }

    /// Start over with a fresh seed, keeping tuning and canvas size
    pub fn reset(&mut self, seed: u64) {
        let tuning = std::mem::take(&mut self.tuning);
        *self = Self::new(seed, self.bounds, tuning);
    }

    /// Fire one bullet from the player's centre toward `target`.
    /// Returns false (and does nothing) unless the session is playing.
    pub fn fire_at(&mut self, target: Vec2) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let origin = self.player.center();
        let angle = angle_to(origin, target);
        self.bullets.push(Bullet::new(origin, angle, &self.tuning));
        true
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(1, Vec2::new(800.0, 600.0), Tuning::default())
    }

    #[test]
    fn test_new_session() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.player.health, 100);
        assert!(state.bullets.is_empty() && state.enemies.is_empty() && state.pickups.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.spawner.batch_size, 1);
    }

    #[test]
    fn test_fire_aims_from_player_center() {
        let mut state = state();
        // Centre is (435, 335); aim straight right
        assert!(state.fire_at(Vec2::new(735.0, 335.0)));
        let bullet = &state.bullets[0];
        assert_eq!(bullet.pos, Vec2::new(435.0, 335.0));
        assert!(bullet.angle.abs() < 1e-6);
        assert!((bullet.vel - Vec2::new(10.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_fire_ignored_after_game_over() {
        let mut state = state();
        state.phase = GamePhase::GameOver;
        assert!(!state.fire_at(Vec2::ZERO));
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let tuning = Tuning {
            enemy_speed: 4.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(5, Vec2::new(640.0, 480.0), tuning.clone());
        state.score = 12;
        state.kills = 12;
        state.player.health = -10;
        state.phase = GamePhase::GameOver;
        state.fire_at(Vec2::ZERO);
        state.spawner.batch_size = 4;

        state.reset(9);

        assert_eq!(state.seed, 9);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.kills, 0);
        assert_eq!(state.player.health, 100);
        assert_eq!(state.spawner.batch_size, 1);
        assert_eq!(state.bounds, Vec2::new(640.0, 480.0));
        assert_eq!(state.tuning, tuning);
    }
}
