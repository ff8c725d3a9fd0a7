//! Entity types and their per-frame behaviour
//!
//! Every entity is plain data plus an [`Entity`] impl; the frame loop
//! advances and prunes each collection uniformly.

use glam::Vec2;

use crate::tuning::Tuning;
use crate::{angle_to, velocity_along};

/// Smallest smoke puff radius
pub const SMOKE_MIN_SIZE: f32 = 2.0;
/// Random extra radius added on top of [`SMOKE_MIN_SIZE`]
pub const SMOKE_SIZE_SPREAD: f32 = 5.0;

/// Directional input flags, read once per frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Everything an entity may read while advancing one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    /// Canvas size
    pub bounds: Vec2,
    /// Player anchor position enemies are chasing
    pub target: Vec2,
    pub keys: Directions,
    /// Frame length in milliseconds
    pub dt_ms: f32,
}

/// Capability shared by everything the frame loop owns
pub trait Entity {
    /// Advance one frame
    fn advance(&mut self, ctx: &FrameContext);

    /// Whether the entity should be pruned after this frame's advance
    fn is_expired(&self, _ctx: &FrameContext) -> bool {
        false
    }
}

/// The player avatar. `pos` is the top-left corner of its sprite box.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
}

impl Player {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            size: tuning.player_size,
            speed: tuning.player_speed,
            health: tuning.player_max_health,
            max_health: tuning.player_max_health,
        }
    }

    /// Centre of the sprite box (fire origin, rotation pivot)
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }
}

impl Entity for Player {
    fn advance(&mut self, ctx: &FrameContext) {
        let keys = ctx.keys;
        let mut delta = Vec2::ZERO;
        if keys.up {
            delta.y -= self.speed;
        }
        if keys.down {
            delta.y += self.speed;
        }
        if keys.left {
            delta.x -= self.speed;
        }
        if keys.right {
            delta.x += self.speed;
        }

        let max = (ctx.bounds - Vec2::splat(self.size)).max(Vec2::ZERO);
        self.pos = (self.pos + delta).clamp(Vec2::ZERO, max);
    }
}

/// A projectile flying along a fixed heading
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading at fire time (also the sprite rotation)
    pub angle: f32,
    pub size: f32,
}

impl Bullet {
    pub fn new(origin: Vec2, angle: f32, tuning: &Tuning) -> Self {
        Self {
            pos: origin,
            vel: velocity_along(angle, tuning.bullet_speed),
            angle,
            size: tuning.bullet_size,
        }
    }

    pub fn is_off_screen(&self, bounds: Vec2) -> bool {
        self.pos.x < 0.0 || self.pos.x > bounds.x || self.pos.y < 0.0 || self.pos.y > bounds.y
    }
}

impl Entity for Bullet {
    fn advance(&mut self, _ctx: &FrameContext) {
        self.pos += self.vel;
    }

    fn is_expired(&self, ctx: &FrameContext) -> bool {
        self.is_off_screen(ctx.bounds)
    }
}

/// A chaser. Lives until it touches the player or a bullet.
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub damage: i32,
}

impl Enemy {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            size: tuning.enemy_size,
            speed: tuning.enemy_speed,
            damage: tuning.enemy_damage,
        }
    }
}

impl Entity for Enemy {
    fn advance(&mut self, ctx: &FrameContext) {
        // Heading is recomputed from the live delta every frame
        if self.pos == ctx.target {
            return;
        }
        let angle = angle_to(self.pos, ctx.target);
        self.pos += velocity_along(angle, self.speed);
    }
}

/// A bouncing heal item ("boshki")
#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub heal: i32,
    pub age_ms: f32,
    pub lifetime_ms: f32,
}

impl Pickup {
    pub fn new(pos: Vec2, angle: f32, tuning: &Tuning) -> Self {
        Self {
            pos,
            vel: velocity_along(angle, tuning.pickup_speed),
            size: tuning.pickup_size,
            heal: tuning.pickup_heal,
            age_ms: 0.0,
            lifetime_ms: tuning.pickup_lifetime_ms,
        }
    }
}

impl Entity for Pickup {
    fn advance(&mut self, ctx: &FrameContext) {
        self.pos += self.vel;
        self.age_ms += ctx.dt_ms;

        if self.pos.x <= 0.0 || self.pos.x >= ctx.bounds.x {
            self.vel.x = -self.vel.x;
        }
        if self.pos.y <= 0.0 || self.pos.y >= ctx.bounds.y {
            self.vel.y = -self.vel.y;
        }
    }

    fn is_expired(&self, _ctx: &FrameContext) -> bool {
        self.age_ms > self.lifetime_ms
    }
}

/// Expanding, fading ring left where something was destroyed
#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub opacity: f32,
    pub growth: f32,
    pub fade: f32,
    pub finished: bool,
}

impl Explosion {
    pub fn new(pos: Vec2, tuning: &Tuning) -> Self {
        Self {
            pos,
            radius: tuning.explosion_start_radius,
            max_radius: tuning.explosion_max_radius,
            opacity: 1.0,
            growth: tuning.explosion_growth,
            fade: tuning.explosion_fade,
            finished: false,
        }
    }
}

impl Entity for Explosion {
    fn advance(&mut self, _ctx: &FrameContext) {
        self.radius += self.growth;
        self.opacity -= self.fade;
        if self.radius >= self.max_radius || self.opacity <= 0.0 {
            self.finished = true;
        }
    }

    fn is_expired(&self, _ctx: &FrameContext) -> bool {
        self.finished
    }
}

/// Trail puff left behind by bullets
#[derive(Debug, Clone, PartialEq)]
pub struct Smoke {
    pub pos: Vec2,
    pub size: f32,
    pub alpha: f32,
    pub fade: f32,
}

impl Smoke {
    /// `roll` in [0, 1) picks the puff size
    pub fn new(pos: Vec2, roll: f32, tuning: &Tuning) -> Self {
        Self {
            pos,
            size: SMOKE_MIN_SIZE + roll * SMOKE_SIZE_SPREAD,
            alpha: 1.0,
            fade: tuning.smoke_fade,
        }
    }
}

impl Entity for Smoke {
    fn advance(&mut self, _ctx: &FrameContext) {
        self.alpha -= self.fade;
    }

    fn is_expired(&self, _ctx: &FrameContext) -> bool {
        self.alpha <= 0.0
    }
}
