//! Fixed-step frame update
//!
//! One call to [`tick`] is one frame: spawn, move, prune, collide, and the
//! session-end check.

use rand::Rng;

use super::collision::{CollisionReport, resolve_collisions};
use super::entity::{Directions, Entity, FrameContext, Smoke};
use super::spawner::run_spawner;
use super::state::{GamePhase, GameState};

/// Input commands for a single frame (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Directional keys currently held
    pub keys: Directions,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one frame of `dt_ms` milliseconds.
///
/// Returns what the collision pass did; empty when nothing advanced.
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) -> CollisionReport {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused at frame {}", state.frame);
                return CollisionReport::default();
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed at frame {}", state.frame);
            }
            GamePhase::GameOver => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return CollisionReport::default();
    }

    state.frame += 1;

    let mut ctx = FrameContext {
        bounds: state.bounds,
        target: state.player.pos,
        keys: input.keys,
        dt_ms,
    };

    state.player.advance(&ctx);
    ctx.target = state.player.pos;

    run_spawner(state, dt_ms);

    // Bullets leave a smoke puff at their new position every frame
    advance_all(&mut state.bullets, &ctx);
    for bullet in &state.bullets {
        let roll: f32 = state.rng.random();
        state.smokes.push(Smoke::new(bullet.pos, roll, &state.tuning));
    }
    prune(&mut state.bullets, &ctx);

    advance_all(&mut state.enemies, &ctx);
    advance_all(&mut state.pickups, &ctx);
    prune(&mut state.pickups, &ctx);
    advance_all(&mut state.explosions, &ctx);
    prune(&mut state.explosions, &ctx);
    advance_all(&mut state.smokes, &ctx);
    prune(&mut state.smokes, &ctx);

    let report = resolve_collisions(state);

    if state.player.is_defeated() {
        state.phase = GamePhase::GameOver;
        log::info!(
            "Game over at frame {}: score {}, health {}",
            state.frame,
            state.score,
            state.player.health
        );
    }

    report
}

fn advance_all<T: Entity>(items: &mut [T], ctx: &FrameContext) {
    for item in items.iter_mut() {
        item.advance(ctx);
    }
}

/// Remove expired entities (order kept, every element visited once)
fn prune<T: Entity>(items: &mut Vec<T>, ctx: &FrameContext) {
    items.retain(|item| !item.is_expired(ctx));
}
