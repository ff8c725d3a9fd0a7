//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed frame length only
//! - Seeded RNG only
//! - Stable iteration order (collections keep insertion order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Body, CollisionReport, is_colliding, resolve_collisions};
pub use entity::{
    Bullet, Directions, Enemy, Entity, Explosion, FrameContext, Pickup, Player, Smoke,
};
pub use spawner::{Spawner, edge_point, interior_point, run_spawner, spawn_batch};
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, tick};
