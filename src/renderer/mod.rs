//! Draw layer
//!
//! Translates a [`GameState`] into calls on a [`Surface`]. No game logic
//! happens here. The browser surface lives in [`canvas`].

#[cfg(target_arch = "wasm32")]
pub mod canvas;

use std::f32::consts::PI;

use glam::Vec2;

use crate::sim::{Bullet, Enemy, Explosion, GameState, Pickup, Player, Smoke};

/// Height of the health bar along the top edge
pub const HEALTH_BAR_HEIGHT: f32 = 10.0;
/// Extra sprite rotation applied to bullets
pub const BULLET_SPRITE_TILT: f32 = PI / 32.0;

/// Opaque image handles the surface resolves to loaded assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    Background,
    Player,
    Enemy,
    Pickup,
    Bullet,
}

impl Sprite {
    pub const ALL: [Sprite; 5] = [
        Sprite::Background,
        Sprite::Player,
        Sprite::Enemy,
        Sprite::Pickup,
        Sprite::Bullet,
    ];
}

/// Straight sRGB colour with alpha in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const RED: Rgba = Rgba::rgb(255, 0, 0);
    pub const GREEN: Rgba = Rgba::rgb(0, 128, 0);
    pub const ORANGE: Rgba = Rgba::rgb(255, 165, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS colour string, e.g. `rgba(128, 128, 128, 0.5)`
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// A 2D drawing surface (canvas 2D context or a test double)
pub trait Surface {
    fn clear_rect(&mut self, pos: Vec2, size: Vec2);
    fn draw_image(&mut self, sprite: Sprite, pos: Vec2, size: Vec2);
    /// Intrinsic size of a sprite, `None` until it is loaded
    fn sprite_size(&self, sprite: Sprite) -> Option<Vec2>;

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, angle: f32);
    fn set_global_alpha(&mut self, alpha: f32);

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Rgba);
    fn stroke_rect(&mut self, pos: Vec2, size: Vec2, color: Rgba);
    fn fill_arc(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn stroke_arc(&mut self, center: Vec2, radius: f32, color: Rgba, line_width: f32);
    fn fill_text(&mut self, text: &str, pos: Vec2, font: &str, color: Rgba);
}

/// Anything the renderer knows how to put on a surface
pub trait Draw {
    fn draw<S: Surface>(&self, surface: &mut S);
}

/// Sprite centred on `center`, `size` wide and tall
fn draw_centered<S: Surface>(surface: &mut S, sprite: Sprite, center: Vec2, size: f32) {
    surface.draw_image(sprite, center - Vec2::splat(size / 2.0), Vec2::splat(size));
}

impl Draw for Bullet {
    fn draw<S: Surface>(&self, surface: &mut S) {
        // Keep the sprite's aspect ratio; square until the image is known
        let aspect = surface
            .sprite_size(Sprite::Bullet)
            .filter(|s| s.y > 0.0)
            .map_or(1.0, |s| s.x / s.y);
        let size = Vec2::new(self.size * aspect, self.size);

        surface.save();
        surface.translate(self.pos);
        surface.rotate(self.angle + BULLET_SPRITE_TILT);
        surface.draw_image(Sprite::Bullet, -size / 2.0, size);
        surface.restore();
    }
}

impl Draw for Enemy {
    fn draw<S: Surface>(&self, surface: &mut S) {
        draw_centered(surface, Sprite::Enemy, self.pos, self.size);
    }
}

impl Draw for Pickup {
    fn draw<S: Surface>(&self, surface: &mut S) {
        draw_centered(surface, Sprite::Pickup, self.pos, self.size);
    }
}

impl Draw for Explosion {
    fn draw<S: Surface>(&self, surface: &mut S) {
        if self.finished {
            return;
        }
        surface.save();
        surface.set_global_alpha(self.opacity.clamp(0.0, 1.0));
        surface.fill_arc(self.pos, self.radius, Rgba::ORANGE);
        surface.stroke_arc(self.pos, self.radius, Rgba::RED, 2.0);
        surface.restore();
    }
}

impl Draw for Smoke {
    fn draw<S: Surface>(&self, surface: &mut S) {
        let color = Rgba::rgb(128, 128, 128).with_alpha(self.alpha.clamp(0.0, 1.0));
        surface.fill_arc(self.pos, self.size, color);
    }
}

/// Player sprite rotated around its centre to face `pointer`
fn draw_player<S: Surface>(surface: &mut S, player: &Player, pointer: Vec2) {
    let center = player.center();
    let angle = crate::angle_to(center, pointer);

    surface.save();
    surface.translate(center);
    surface.rotate(angle);
    surface.draw_image(
        Sprite::Player,
        Vec2::splat(-player.size / 2.0),
        Vec2::splat(player.size),
    );
    surface.restore();
}

fn draw_health_bar<S: Surface>(surface: &mut S, player: &Player, bounds: Vec2) {
    let bar = Vec2::new(bounds.x, HEALTH_BAR_HEIGHT);
    let fraction = player.health.max(0) as f32 / player.max_health as f32;

    surface.fill_rect(Vec2::ZERO, bar, Rgba::RED);
    surface.fill_rect(Vec2::ZERO, Vec2::new(bar.x * fraction, bar.y), Rgba::GREEN);
    surface.stroke_rect(Vec2::ZERO, bar, Rgba::BLACK);
}

fn draw_all<T: Draw, S: Surface>(items: &[T], surface: &mut S) {
    for item in items {
        item.draw(surface);
    }
}

/// Render one complete frame.
///
/// Returns false once the session is over (the "Game Over" screen was drawn
/// instead of the playfield).
pub fn render<S: Surface>(surface: &mut S, state: &GameState, pointer: Vec2) -> bool {
    let bounds = state.bounds;
    surface.clear_rect(Vec2::ZERO, bounds);
    surface.draw_image(Sprite::Background, Vec2::ZERO, bounds);

    draw_health_bar(surface, &state.player, bounds);
    surface.fill_text(
        &format!("Score: {}", state.score),
        Vec2::new(10.0, 30.0),
        "20px Arial",
        Rgba::WHITE,
    );

    if state.player.is_defeated() {
        surface.fill_text(
            "Game Over",
            Vec2::new(bounds.x / 2.0 - 60.0, bounds.y / 2.0),
            "30px Arial",
            Rgba::RED,
        );
        return false;
    }

    draw_player(surface, &state.player, pointer);
    draw_all(&state.bullets, surface);
    draw_all(&state.enemies, surface);
    draw_all(&state.pickups, surface);
    draw_all(&state.explosions, surface);
    draw_all(&state.smokes, surface);

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    /// Surface double that records every call
    #[derive(Default)]
    struct Recorder {
        ops: Vec<Op>,
        bullet_size: Option<Vec2>,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Clear,
        Image(Sprite, Vec2, Vec2),
        Save,
        Restore,
        Translate(Vec2),
        Rotate(f32),
        Alpha(f32),
        FillRect(Vec2, Vec2, Rgba),
        StrokeRect,
        FillArc(Vec2, f32, Rgba),
        StrokeArc(f32),
        Text(String),
    }

    impl Surface for Recorder {
        fn clear_rect(&mut self, _pos: Vec2, _size: Vec2) {
            self.ops.push(Op::Clear);
        }
        fn draw_image(&mut self, sprite: Sprite, pos: Vec2, size: Vec2) {
            self.ops.push(Op::Image(sprite, pos, size));
        }
        fn sprite_size(&self, sprite: Sprite) -> Option<Vec2> {
            match sprite {
                Sprite::Bullet => self.bullet_size,
                _ => None,
            }
        }
        fn save(&mut self) {
            self.ops.push(Op::Save);
        }
        fn restore(&mut self) {
            self.ops.push(Op::Restore);
        }
        fn translate(&mut self, offset: Vec2) {
            self.ops.push(Op::Translate(offset));
        }
        fn rotate(&mut self, angle: f32) {
            self.ops.push(Op::Rotate(angle));
        }
        fn set_global_alpha(&mut self, alpha: f32) {
            self.ops.push(Op::Alpha(alpha));
        }
        fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Rgba) {
            self.ops.push(Op::FillRect(pos, size, color));
        }
        fn stroke_rect(&mut self, _pos: Vec2, _size: Vec2, _color: Rgba) {
            self.ops.push(Op::StrokeRect);
        }
        fn fill_arc(&mut self, center: Vec2, radius: f32, color: Rgba) {
            self.ops.push(Op::FillArc(center, radius, color));
        }
        fn stroke_arc(&mut self, _center: Vec2, _radius: f32, _color: Rgba, line_width: f32) {
            self.ops.push(Op::StrokeArc(line_width));
        }
        fn fill_text(&mut self, text: &str, _pos: Vec2, _font: &str, _color: Rgba) {
            self.ops.push(Op::Text(text.to_string()));
        }
    }

    impl Recorder {
        fn images(&self, sprite: Sprite) -> Vec<(Vec2, Vec2)> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Image(s, pos, size) if *s == sprite => Some((*pos, *size)),
                    _ => None,
                })
                .collect()
        }

        fn texts(&self) -> Vec<String> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text(t) => Some(t.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    fn state() -> GameState {
        GameState::new(3, Vec2::new(800.0, 600.0), Tuning::default())
    }

    #[test]
    fn test_render_playing_frame() {
        let mut state = state();
        state.score = 7;
        state.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), &state.tuning));
        state.pickups.push(Pickup::new(Vec2::new(200.0, 200.0), 0.0, &state.tuning));

        let mut surface = Recorder::default();
        assert!(render(&mut surface, &state, Vec2::new(0.0, 0.0)));

        assert_eq!(surface.ops[0], Op::Clear);
        assert_eq!(
            surface.images(Sprite::Background),
            vec![(Vec2::ZERO, Vec2::new(800.0, 600.0))]
        );
        assert_eq!(surface.texts(), vec!["Score: 7".to_string()]);
        assert_eq!(
            surface.images(Sprite::Enemy),
            vec![(Vec2::new(65.0, 65.0), Vec2::splat(70.0))]
        );
        assert_eq!(
            surface.images(Sprite::Pickup),
            vec![(Vec2::new(165.0, 165.0), Vec2::splat(70.0))]
        );
        // Player drawn around its centre
        assert!(surface.ops.contains(&Op::Translate(Vec2::new(435.0, 335.0))));
        assert_eq!(
            surface.images(Sprite::Player),
            vec![(Vec2::splat(-35.0), Vec2::splat(70.0))]
        );
    }

    #[test]
    fn test_render_reports_session_over() {
        let mut state = state();
        state.player.health = -10;
        state.enemies.push(Enemy::new(Vec2::new(100.0, 100.0), &state.tuning));

        let mut surface = Recorder::default();
        assert!(!render(&mut surface, &state, Vec2::ZERO));

        assert!(surface.texts().contains(&"Game Over".to_string()));
        assert!(surface.images(Sprite::Player).is_empty());
        assert!(surface.images(Sprite::Enemy).is_empty());
    }

    #[test]
    fn test_health_bar_fill() {
        let mut state = state();
        state.player.health = 25;
        let mut surface = Recorder::default();
        render(&mut surface, &state, Vec2::ZERO);
        assert!(surface.ops.contains(&Op::FillRect(
            Vec2::ZERO,
            Vec2::new(200.0, HEALTH_BAR_HEIGHT),
            Rgba::GREEN
        )));

        // Negative health draws an empty bar, not a negative one
        state.player.health = -10;
        let mut surface = Recorder::default();
        render(&mut surface, &state, Vec2::ZERO);
        assert!(surface.ops.contains(&Op::FillRect(
            Vec2::ZERO,
            Vec2::new(0.0, HEALTH_BAR_HEIGHT),
            Rgba::GREEN
        )));
    }

    #[test]
    fn test_bullet_keeps_sprite_aspect() {
        let bullet = Bullet::new(Vec2::new(50.0, 60.0), 0.0, &Tuning::default());

        let mut surface = Recorder {
            bullet_size: Some(Vec2::new(120.0, 40.0)),
            ..Default::default()
        };
        bullet.draw(&mut surface);
        assert_eq!(
            surface.ops,
            vec![
                Op::Save,
                Op::Translate(Vec2::new(50.0, 60.0)),
                Op::Rotate(BULLET_SPRITE_TILT),
                Op::Image(Sprite::Bullet, Vec2::new(-45.0, -15.0), Vec2::new(90.0, 30.0)),
                Op::Restore,
            ]
        );

        // Not loaded yet: square
        let mut surface = Recorder::default();
        bullet.draw(&mut surface);
        assert_eq!(
            surface.images(Sprite::Bullet),
            vec![(Vec2::splat(-15.0), Vec2::splat(30.0))]
        );
    }

    #[test]
    fn test_explosion_uses_opacity() {
        let mut explosion = Explosion::new(Vec2::new(10.0, 10.0), &Tuning::default());
        explosion.opacity = 0.4;
        let mut surface = Recorder::default();
        explosion.draw(&mut surface);
        assert_eq!(
            surface.ops,
            vec![
                Op::Save,
                Op::Alpha(0.4),
                Op::FillArc(Vec2::new(10.0, 10.0), 10.0, Rgba::ORANGE),
                Op::StrokeArc(2.0),
                Op::Restore,
            ]
        );

        explosion.finished = true;
        let mut surface = Recorder::default();
        explosion.draw(&mut surface);
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn test_smoke_colour_carries_alpha() {
        let mut smoke = Smoke::new(Vec2::ZERO, 0.0, &Tuning::default());
        smoke.alpha = 0.5;
        let mut surface = Recorder::default();
        smoke.draw(&mut surface);
        assert_eq!(
            surface.ops,
            vec![Op::FillArc(Vec2::ZERO, 2.0, Rgba::rgb(128, 128, 128).with_alpha(0.5))]
        );
        assert_eq!(Rgba::rgb(128, 128, 128).with_alpha(0.5).to_css(), "rgba(128, 128, 128, 0.5)");
    }
}
