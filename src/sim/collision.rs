//! Collision detection and resolution
//!
//! The hit test is asymmetric: the distance between centres is
//! compared against the *target's* size alone, not a sum of radii.

use glam::Vec2;

use super::entity::{Bullet, Enemy, Explosion, Pickup, Player};
use super::state::GameState;

/// Anything with a position and a size the hit test can measure
pub trait Body {
    fn pos(&self) -> Vec2;
    fn size(&self) -> f32;
}

macro_rules! impl_body {
    ($($ty:ty),*) => {
        $(impl Body for $ty {
            fn pos(&self) -> Vec2 {
                self.pos
            }
            fn size(&self) -> f32 {
                self.size
            }
        })*
    };
}

impl_body!(Player, Bullet, Enemy, Pickup);

/// Check whether `source` touches `target`: `distance < target.size()`
#[inline]
pub fn is_colliding(source: &impl Body, target: &impl Body) -> bool {
    source.pos().distance(target.pos()) < target.size()
}

/// What one collision pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Enemies destroyed by bullets
    pub enemies_shot: u32,
    /// Pickups destroyed by bullets
    pub pickups_shot: u32,
    /// Enemies that ran into the player
    pub enemies_touched: u32,
    /// Pickups the player picked up
    pub pickups_collected: u32,
}

/// Sweep every entity pair once and apply damage, score and removal.
///
/// Removal is mark-and-compact: flags are set during the sweep and the
/// collections are compacted once it is over, so an entity removed early in
/// the pass takes part in no later pair and no sibling is skipped.
pub fn resolve_collisions(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();
    let mut bullet_dead = vec![false; state.bullets.len()];
    let mut enemy_dead = vec![false; state.enemies.len()];
    let mut pickup_dead = vec![false; state.pickups.len()];

    // Bullets vs enemies, then bullets vs pickups
    for (bi, bullet) in state.bullets.iter().enumerate() {
        // Bullets pierce enemies: one bullet may take out several per frame
        for (ei, enemy) in state.enemies.iter().enumerate() {
            if enemy_dead[ei] || !is_colliding(bullet, enemy) {
                continue;
            }
            enemy_dead[ei] = true;
            state
                .explosions
                .push(Explosion::new(enemy.pos, &state.tuning));
            state.kills += 1;
            state.score += 1;
            state.spawner.record_kill(state.kills, &state.tuning);
            report.enemies_shot += 1;
        }

        for (pi, pickup) in state.pickups.iter().enumerate() {
            if pickup_dead[pi] || !is_colliding(bullet, pickup) {
                continue;
            }
            pickup_dead[pi] = true;
            bullet_dead[bi] = true;
            state
                .explosions
                .push(Explosion::new(pickup.pos, &state.tuning));
            report.pickups_shot += 1;
            break;
        }
    }

    // Player vs enemies
    let player = &mut state.player;
    for (ei, enemy) in state.enemies.iter().enumerate() {
        if enemy_dead[ei] || !is_colliding(&*player, enemy) {
            continue;
        }
        if player.health > 0 {
            player.health -= enemy.damage;
        }
        // A defeated player still clears enemies on contact
        enemy_dead[ei] = true;
        report.enemies_touched += 1;
        log::debug!("Player hit for {} (health {})", enemy.damage, player.health);
    }

    // Player vs pickups
    for (pi, pickup) in state.pickups.iter().enumerate() {
        if pickup_dead[pi] || !is_colliding(&*player, pickup) {
            continue;
        }
        if player.health < player.max_health {
            player.health = (player.health + pickup.heal).min(player.max_health);
        }
        pickup_dead[pi] = true;
        report.pickups_collected += 1;
        log::debug!("Pickup collected (health {})", player.health);
    }

    compact(&mut state.bullets, &bullet_dead);
    compact(&mut state.enemies, &enemy_dead);
    compact(&mut state.pickups, &pickup_dead);

    report
}

/// Drop every item whose flag is set, keeping order
fn compact<T>(items: &mut Vec<T>, dead: &[bool]) {
    let mut flags = dead.iter();
    items.retain(|_| !flags.next().copied().unwrap_or(false));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameState;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn empty_state() -> GameState {
        let mut state = GameState::new(7, Vec2::new(800.0, 600.0), Tuning::default());
        // Park the player far from the action
        state.player.pos = Vec2::new(700.0, 500.0);
        state
    }

    fn bullet_at(pos: Vec2) -> Bullet {
        Bullet::new(pos, 0.0, &Tuning::default())
    }

    #[test]
    fn test_collision_threshold_uses_target_size() {
        let tuning = Tuning::default();
        let bullet = bullet_at(Vec2::ZERO);
        assert!(is_colliding(&bullet, &Enemy::new(Vec2::new(50.0, 0.0), &tuning)));
        assert!(!is_colliding(&bullet, &Enemy::new(Vec2::new(100.0, 0.0), &tuning)));
        // Exactly at the threshold is a miss
        assert!(!is_colliding(&bullet, &Enemy::new(Vec2::new(70.0, 0.0), &tuning)));
    }

    #[test]
    fn test_collision_is_asymmetric() {
        let tuning = Tuning::default();
        let bullet = bullet_at(Vec2::ZERO);
        let enemy = Enemy::new(Vec2::new(50.0, 0.0), &tuning);
        // Bullet size 30 < 50, enemy size 70 > 50
        assert!(is_colliding(&bullet, &enemy));
        assert!(!is_colliding(&enemy, &bullet));
    }

    #[test]
    fn test_bullet_pierces_two_enemies() {
        let mut state = empty_state();
        state.bullets.push(bullet_at(Vec2::new(100.0, 100.0)));
        state.enemies.push(Enemy::new(Vec2::new(120.0, 100.0), &state.tuning));
        state.enemies.push(Enemy::new(Vec2::new(100.0, 130.0), &state.tuning));
        state.enemies.push(Enemy::new(Vec2::new(400.0, 100.0), &state.tuning));

        let report = resolve_collisions(&mut state);

        assert_eq!(report.enemies_shot, 2);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].pos, Vec2::new(400.0, 100.0));
        assert_eq!(state.bullets.len(), 1, "bullet survives enemy hits");
        assert_eq!(state.explosions.len(), 2);
        assert_eq!(state.kills, 2);
        assert_eq!(state.score, 2);
    }

    #[test]
    fn test_bullet_and_pickup_destroy_each_other() {
        let mut state = empty_state();
        state.bullets.push(bullet_at(Vec2::new(100.0, 100.0)));
        state.pickups.push(Pickup::new(Vec2::new(110.0, 100.0), 0.0, &state.tuning));
        state.pickups.push(Pickup::new(Vec2::new(90.0, 100.0), 0.0, &state.tuning));

        let report = resolve_collisions(&mut state);

        assert_eq!(report.pickups_shot, 1);
        assert!(state.bullets.is_empty());
        // A spent bullet takes no second pickup
        assert_eq!(state.pickups.len(), 1);
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_enemy_hit_costs_damage() {
        let mut state = empty_state();
        state.player.pos = Vec2::new(300.0, 300.0);
        state.enemies.push(Enemy::new(Vec2::new(310.0, 300.0), &state.tuning));

        let report = resolve_collisions(&mut state);

        assert_eq!(report.enemies_touched, 1);
        assert_eq!(state.player.health, 90);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_damage_guard_stops_at_zero() {
        let mut state = empty_state();
        state.player.pos = Vec2::new(300.0, 300.0);
        for _ in 0..11 {
            state.enemies.push(Enemy::new(Vec2::new(300.0, 310.0), &state.tuning));
            resolve_collisions(&mut state);
        }
        // The eleventh hit lands on health 0 and is ignored
        assert_eq!(state.player.health, 0);
        assert!(state.player.is_defeated());
        assert!(state.enemies.is_empty(), "defeated player still clears enemies");
    }

    #[test]
    fn test_health_may_go_negative() {
        let mut state = empty_state();
        state.player.pos = Vec2::new(300.0, 300.0);
        state.player.health = 5;
        state.enemies.push(Enemy::new(Vec2::new(300.0, 310.0), &state.tuning));
        resolve_collisions(&mut state);
        assert_eq!(state.player.health, -5);
    }

    #[test]
    fn test_same_frame_hits_apply_in_order() {
        let mut state = empty_state();
        state.player.pos = Vec2::new(300.0, 300.0);
        state.player.health = 15;
        for _ in 0..3 {
            state.enemies.push(Enemy::new(Vec2::new(300.0, 310.0), &state.tuning));
        }
        let report = resolve_collisions(&mut state);
        // 15 -> 5 -> -5, third hit ignored
        assert_eq!(state.player.health, -5);
        assert_eq!(report.enemies_touched, 3);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_shot_enemy_does_not_hurt_player() {
        let mut state = empty_state();
        state.player.pos = Vec2::new(300.0, 300.0);
        state.bullets.push(bullet_at(Vec2::new(300.0, 300.0)));
        state.enemies.push(Enemy::new(Vec2::new(310.0, 300.0), &state.tuning));

        let report = resolve_collisions(&mut state);

        assert_eq!(report.enemies_shot, 1);
        assert_eq!(report.enemies_touched, 0);
        assert_eq!(state.player.health, 100);
    }

    #[test]
    fn test_pickup_heal_is_capped() {
        let mut state = empty_state();
        state.player.pos = Vec2::new(300.0, 300.0);
        state.player.health = 90;
        state.pickups.push(Pickup::new(Vec2::new(300.0, 320.0), 0.0, &state.tuning));

        let report = resolve_collisions(&mut state);

        assert_eq!(report.pickups_collected, 1);
        assert_eq!(state.player.health, 100);
        assert!(state.pickups.is_empty());
    }

    #[test]
    fn test_pickup_consumed_at_full_health() {
        let mut state = empty_state();
        state.player.pos = Vec2::new(300.0, 300.0);
        state.pickups.push(Pickup::new(Vec2::new(300.0, 320.0), 0.0, &state.tuning));
        resolve_collisions(&mut state);
        assert_eq!(state.player.health, 100);
        assert!(state.pickups.is_empty());
    }

    #[test]
    fn test_tenth_kill_steps_difficulty() {
        let mut state = empty_state();
        state.bullets.push(bullet_at(Vec2::new(100.0, 100.0)));
        for i in 0..10 {
            state
                .enemies
                .push(Enemy::new(Vec2::new(100.0 + i as f32, 100.0), &state.tuning));
        }

        resolve_collisions(&mut state);

        assert_eq!(state.kills, 10);
        assert_eq!(state.spawner.batch_size, 2);
        assert!((state.spawner.interval_ms - 950.0).abs() < 1e-3);
    }

    #[test]
    fn test_removal_does_not_skip_neighbours() {
        let mut state = empty_state();
        // Adjacent enemies all overlapping the same bullet
        state.bullets.push(bullet_at(Vec2::new(100.0, 100.0)));
        for _ in 0..5 {
            state.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), &state.tuning));
        }
        resolve_collisions(&mut state);
        assert!(state.enemies.is_empty());
        assert_eq!(state.kills, 5);
    }

    proptest! {
        #[test]
        fn prop_hit_iff_within_target_size(
            sx in -500.0f32..500.0, sy in -500.0f32..500.0,
            tx in -500.0f32..500.0, ty in -500.0f32..500.0,
        ) {
            let tuning = Tuning::default();
            let bullet = bullet_at(Vec2::new(sx, sy));
            let enemy = Enemy::new(Vec2::new(tx, ty), &tuning);
            let distance = Vec2::new(sx, sy).distance(Vec2::new(tx, ty));
            prop_assert_eq!(is_colliding(&bullet, &enemy), distance < tuning.enemy_size);
        }

        #[test]
        fn prop_heal_never_exceeds_max(health in -50i32..=100, pickups in 1usize..5) {
            let mut state = empty_state();
            state.player.pos = Vec2::new(300.0, 300.0);
            state.player.health = health;
            for _ in 0..pickups {
                state.pickups.push(Pickup::new(Vec2::new(300.0, 310.0), 0.0, &state.tuning));
            }
            resolve_collisions(&mut state);
            prop_assert!(state.player.health <= state.player.max_health);
            prop_assert!(state.player.health >= health);
            prop_assert!(state.pickups.is_empty());
        }
    }
}
