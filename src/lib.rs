//! Boshki Shooter - a single-screen canvas arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, game state)
//! - `renderer`: Draw layer over an abstract 2D surface (canvas on the web)
//! - `platform`: Input state shared between event listeners and the frame loop
//! - `tuning`: Data-driven game balance

pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::{SpawnCadence, Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation frame length (60 Hz, matching display refresh)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Maximum frames simulated per display callback to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Longest wall-clock gap fed into the accumulator (tab switches etc.)
    pub const MAX_FRAME_DELTA_MS: f32 = 100.0;

    /// Canvas size used when the host has none (headless runs, tests)
    pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;
    pub const DEFAULT_CANVAS_HEIGHT: f32 = 600.0;
}

/// Angle (radians) of the direction from `from` toward `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x)
}

/// Velocity of the given speed along `angle`
#[inline]
pub fn velocity_along(angle: f32, speed: f32) -> Vec2 {
    Vec2::from_angle(angle) * speed
}
