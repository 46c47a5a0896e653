//! Positioned game objects and their collision tests.

use std::sync::Arc;

use crate::render::Renderer;
use crate::sprite::{HitMask, Sprite};

/// Axis-aligned rectangle, origin top-left, y down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Strict overlap; rectangles that only share an edge do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Snaps to whole pixels: position floored, size rounded.
    fn pixels(&self) -> (i64, i64, i64, i64) {
        (
            self.x.floor() as i64,
            self.y.floor() as i64,
            self.w.round() as i64,
            self.h.round() as i64,
        )
    }
}

/// Per-pixel test over the intersection of two masked rectangles.
pub fn pixel_collision(a: Rect, b: Rect, mask_a: &HitMask, mask_b: &HitMask) -> bool {
    let (ax, ay, aw, ah) = a.pixels();
    let (bx, by, bw, bh) = b.pixels();
    let left = ax.max(bx);
    let top = ay.max(by);
    let right = (ax + aw).min(bx + bw);
    let bottom = (ay + ah).min(by + bh);
    if right <= left || bottom <= top {
        return false;
    }
    for y in top..bottom {
        for x in left..right {
            if mask_a.get((x - ax) as usize, (y - ay) as usize)
                && mask_b.get((x - bx) as usize, (y - by) as usize)
            {
                return true;
            }
        }
    }
    false
}

/// Position, size and optional image shared by every entity.
#[derive(Clone, Debug)]
pub struct Body {
    pub x: f64,
    pub y: f64,
    w: f64,
    h: f64,
    sprite: Option<Arc<Sprite>>,
}

impl Body {
    /// An imageless body; negative sizes are clamped to zero.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Body {
            x,
            y,
            w: w.max(0.0),
            h: h.max(0.0),
            sprite: None,
        }
    }

    /// A body sized to its image.
    pub fn with_sprite(sprite: Arc<Sprite>, x: f64, y: f64) -> Self {
        Body {
            x,
            y,
            w: sprite.width() as f64,
            h: sprite.height() as f64,
            sprite: Some(sprite),
        }
    }

    pub fn w(&self) -> f64 {
        self.w
    }

    pub fn h(&self) -> f64 {
        self.h
    }

    pub fn cx(&self) -> f64 {
        self.x + self.w / 2.0
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn sprite(&self) -> Option<&Arc<Sprite>> {
        self.sprite.as_ref()
    }

    pub fn hit_mask(&self) -> Option<&HitMask> {
        self.sprite.as_deref().map(Sprite::hit_mask)
    }

    /// Swaps the image and resizes to it.
    pub fn set_sprite(&mut self, sprite: Arc<Sprite>) {
        self.w = sprite.width() as f64;
        self.h = sprite.height() as f64;
        self.sprite = Some(sprite);
    }

    /// Pixel-exact when both bodies carry a mask, bounding boxes otherwise.
    pub fn collides_with(&self, other: &Body) -> bool {
        let (a, b) = (self.rect(), other.rect());
        if !a.overlaps(&b) {
            return false;
        }
        match (self.hit_mask(), other.hit_mask()) {
            (Some(ma), Some(mb)) => pixel_collision(a, b, ma, mb),
            _ => true,
        }
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        if let Some(sprite) = &self.sprite {
            renderer.draw_image(sprite, self.x, self.y);
        }
        self.render_debug(renderer);
    }

    pub fn render_debug(&self, renderer: &mut dyn Renderer) {
        if renderer.debug_overlay() {
            let label = format!("{:.1}, {:.1}, {:.1}, {:.1}", self.x, self.y, self.w, self.h);
            renderer.draw_debug_rect(self.rect(), &label);
        }
    }
}

/// Anything that lives in a game session.
pub trait Entity {
    fn body(&self) -> &Body;

    /// Advances exactly one frame. Passive entities do nothing.
    fn tick(&mut self);

    fn render(&self, renderer: &mut dyn Renderer) {
        self.body().render(renderer);
    }

    fn collides_with(&self, other: &dyn Entity) -> bool {
        self.body().collides_with(other.body())
    }
}
