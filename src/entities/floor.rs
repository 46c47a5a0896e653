use crate::assets::Sprites;
use crate::entity::{Body, Entity};
use crate::window::Window;

pub const FLOOR_VELOCITY: f64 = 4.0;

/// The ground strip. Scrolls left by wrapping over the part of its image
/// wider than the window.
pub struct Floor {
    body: Body,
    vel_x: f64,
    x_extra: f64,
}

impl Floor {
    pub fn new(window: &Window, sprites: &Sprites) -> Self {
        let body = Body::with_sprite(sprites.base.clone(), 0.0, window.viewport_height());
        let x_extra = body.w() - window.width();
        Floor {
            body,
            vel_x: FLOOR_VELOCITY,
            x_extra,
        }
    }

    pub fn y(&self) -> f64 {
        self.body.y
    }

    pub fn velocity(&self) -> f64 {
        self.vel_x
    }

    pub fn stop(&mut self) {
        self.vel_x = 0.0;
    }
}

impl Entity for Floor {
    fn body(&self) -> &Body {
        &self.body
    }

    fn tick(&mut self) {
        if self.x_extra > 0.0 {
            self.body.x = -((-self.body.x + self.vel_x) % self.x_extra);
        }
    }
}
