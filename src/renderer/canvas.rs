//! Canvas 2D surface for the browser build

use std::collections::HashMap;
use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use super::{Rgba, Sprite, Surface};

/// Path each sprite is loaded from, relative to the page
pub fn sprite_path(sprite: Sprite) -> &'static str {
    match sprite {
        Sprite::Background => "./images/back.webp",
        Sprite::Player => "./images/gopstop.png",
        Sprite::Enemy => "./images/ment.png",
        Sprite::Pickup => "./images/shisha-3.png",
        Sprite::Bullet => "./images/joint-2.png",
    }
}

/// Wraps a 2D context plus the sprite images it draws
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    images: HashMap<Sprite, HtmlImageElement>,
}

impl CanvasSurface {
    /// Start loading every sprite. Images that are still loading are skipped
    /// when drawn.
    pub fn new(ctx: CanvasRenderingContext2d) -> Result<Self, JsValue> {
        let mut images = HashMap::new();
        for sprite in Sprite::ALL {
            let image = HtmlImageElement::new()?;
            image.set_src(sprite_path(sprite));
            images.insert(sprite, image);
        }
        log::info!("Loading {} sprites", images.len());
        Ok(Self { ctx, images })
    }

    fn loaded(&self, sprite: Sprite) -> Option<&HtmlImageElement> {
        self.images
            .get(&sprite)
            .filter(|img| img.complete() && img.natural_width() > 0)
    }

    fn arc_path(&self, center: Vec2, radius: f32) -> bool {
        self.ctx.begin_path();
        match self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU)
        {
            Ok(()) => true,
            Err(e) => {
                log::warn!("arc failed: {:?}", e);
                false
            }
        }
    }
}

impl Surface for CanvasSurface {
    fn clear_rect(&mut self, pos: Vec2, size: Vec2) {
        self.ctx
            .clear_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
    }

    fn draw_image(&mut self, sprite: Sprite, pos: Vec2, size: Vec2) {
        let Some(image) = self.loaded(sprite) else {
            return;
        };
        if let Err(e) = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
            image,
            pos.x as f64,
            pos.y as f64,
            size.x as f64,
            size.y as f64,
        ) {
            log::warn!("draw_image({:?}) failed: {:?}", sprite, e);
        }
    }

    fn sprite_size(&self, sprite: Sprite) -> Option<Vec2> {
        self.loaded(sprite)
            .map(|img| Vec2::new(img.natural_width() as f32, img.natural_height() as f32))
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        if let Err(e) = self.ctx.translate(offset.x as f64, offset.y as f64) {
            log::warn!("translate failed: {:?}", e);
        }
    }

    fn rotate(&mut self, angle: f32) {
        if let Err(e) = self.ctx.rotate(angle as f64) {
            log::warn!("rotate failed: {:?}", e);
        }
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
    }

    fn stroke_rect(&mut self, pos: Vec2, size: Vec2, color: Rgba) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx
            .stroke_rect(pos.x as f64, pos.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_arc(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if self.arc_path(center, radius) {
            self.ctx.set_fill_style_str(&color.to_css());
            self.ctx.fill();
        }
    }

    fn stroke_arc(&mut self, center: Vec2, radius: f32, color: Rgba, line_width: f32) {
        if self.arc_path(center, radius) {
            self.ctx.set_stroke_style_str(&color.to_css());
            self.ctx.set_line_width(line_width as f64);
            self.ctx.stroke();
        }
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, font: &str, color: Rgba) {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str(&color.to_css());
        if let Err(e) = self.ctx.fill_text(text, pos.x as f64, pos.y as f64) {
            log::warn!("fill_text failed: {:?}", e);
        }
    }
}
