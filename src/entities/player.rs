use std::sync::Arc;

use crate::assets::Sprites;
use crate::entity::{Body, Entity};
use crate::render::Renderer;
use crate::sprite::Sprite;
use crate::window::Window;

use super::floor::Floor;
use super::pipe::{Pipe, PipeField};

/// Frame index sequence for the flapping animation.
const WING_CYCLE: [usize; 4] = [0, 1, 2, 1];
/// Ticks between animation frames.
const WING_PERIOD: u64 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerMode {
    /// Hovering on the splash screen.
    ShmIdle,
    Normal,
    Crash,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrashCause {
    Floor,
    Pipe,
}

pub struct Player {
    body: Body,
    frames: Vec<Arc<Sprite>>,
    mode: PlayerMode,
    crash_cause: Option<CrashCause>,

    vel_y: f64,
    min_vel_y: f64,
    max_vel_y: f64,
    acc_y: f64,
    flap_acc: f64,
    flapped: bool,

    rot: f64,
    vel_rot: f64,
    rot_min: f64,
    rot_max: f64,

    min_y: f64,
    max_y: f64,
    prev_x: f64,

    frame: u64,
    wing_step: usize,
    wings_frozen: bool,
}

impl Player {
    pub fn new(window: &Window, sprites: &Sprites) -> Self {
        let image = sprites.player[0].clone();
        let x = (window.width() * 0.2).floor();
        let y = ((window.height() - image.height() as f64) / 2.0).floor();
        let body = Body::with_sprite(image, x, y);
        let max_y = window.viewport_height() - body.h() * 0.75;
        let mut player = Player {
            body,
            frames: sprites.player.clone(),
            mode: PlayerMode::ShmIdle,
            crash_cause: None,
            vel_y: 0.0,
            min_vel_y: 0.0,
            max_vel_y: 0.0,
            acc_y: 0.0,
            flap_acc: 0.0,
            flapped: false,
            rot: 0.0,
            vel_rot: 0.0,
            rot_min: 0.0,
            rot_max: 0.0,
            min_y: 0.0,
            max_y,
            prev_x: x,
            frame: 0,
            wing_step: 0,
            wings_frozen: false,
        };
        player.reset_shm();
        player
    }

    pub fn mode(&self) -> PlayerMode {
        self.mode
    }

    pub fn crash_cause(&self) -> Option<CrashCause> {
        self.crash_cause
    }

    pub fn velocity_y(&self) -> f64 {
        self.vel_y
    }

    pub fn min_velocity_y(&self) -> f64 {
        self.min_vel_y
    }

    pub fn max_velocity_y(&self) -> f64 {
        self.max_vel_y
    }

    /// Cosmetic tilt in degrees, counter-clockwise.
    pub fn rotation(&self) -> f64 {
        self.rot
    }

    /// Switches flight mode. Crash is terminal: once crashed, nothing
    /// leaves it. Returns whether the mode was applied.
    pub fn set_mode(&mut self, mode: PlayerMode) -> bool {
        if self.mode == PlayerMode::Crash {
            return false;
        }
        self.mode = mode;
        match mode {
            PlayerMode::ShmIdle => self.reset_shm(),
            PlayerMode::Normal => self.reset_normal(),
            PlayerMode::Crash => {
                self.wings_frozen = true;
                self.reset_crash();
            }
        }
        true
    }

    fn reset_shm(&mut self) {
        self.vel_y = 1.0;
        self.max_vel_y = 4.0;
        self.min_vel_y = -4.0;
        self.acc_y = 0.5;
        self.rot = 0.0;
        self.vel_rot = 0.0;
        self.rot_min = 0.0;
        self.rot_max = 0.0;
        self.flap_acc = 0.0;
        self.flapped = false;
    }

    fn reset_normal(&mut self) {
        self.max_vel_y = 10.0;
        self.min_vel_y = -8.0;
        self.acc_y = 1.0;
        self.flap_acc = -9.0;
        self.vel_y = self.flap_acc.max(self.min_vel_y);
        self.rot = 20.0;
        self.vel_rot = -3.0;
        self.rot_min = -90.0;
        self.rot_max = 20.0;
        self.flapped = false;
    }

    fn reset_crash(&mut self) {
        self.acc_y = 2.0;
        self.vel_y = 7.0;
        self.max_vel_y = 15.0;
        self.vel_rot = -8.0;
        self.rot_min = -90.0;
        self.rot_max = 20.0;
    }

    /// Upward impulse. Ignored outside normal flight, at the top of the
    /// window, and when already climbing at full speed. Returns whether
    /// the player flapped.
    pub fn flap(&mut self) -> bool {
        if self.mode != PlayerMode::Normal
            || self.body.y <= self.min_y
            || self.vel_y == self.min_vel_y
        {
            return false;
        }
        self.vel_y = self.flap_acc.max(self.min_vel_y);
        self.flapped = true;
        self.rot = self.rot_max;
        true
    }

    fn animate(&mut self) {
        self.frame += 1;
        if self.wings_frozen || self.frame % WING_PERIOD != 0 {
            return;
        }
        self.wing_step = (self.wing_step + 1) % WING_CYCLE.len();
        if let Some(image) = self.frames.get(WING_CYCLE[self.wing_step]) {
            self.body.set_sprite(image.clone());
        }
    }

    fn tick_shm(&mut self) {
        if self.vel_y >= self.max_vel_y || self.vel_y <= self.min_vel_y {
            self.acc_y = -self.acc_y;
        }
        self.vel_y += self.acc_y;
        self.body.y += self.vel_y;
    }

    fn tick_normal(&mut self) {
        if self.vel_y < self.max_vel_y && !self.flapped {
            self.vel_y += self.acc_y;
        }
        self.vel_y = self.vel_y.clamp(self.min_vel_y, self.max_vel_y);
        self.flapped = false;
        self.body.y = (self.body.y + self.vel_y).clamp(self.min_y, self.max_y);
        self.rotate();
    }

    fn tick_crash(&mut self) {
        if self.min_y <= self.body.y && self.body.y <= self.max_y {
            self.body.y = (self.body.y + self.vel_y).clamp(self.min_y, self.max_y);
            if self.crash_cause != Some(CrashCause::Floor) {
                self.rotate();
            }
        }
        if self.vel_y < self.max_vel_y {
            self.vel_y += self.acc_y;
        }
    }

    fn rotate(&mut self) {
        if self.vel_y < 0.0 {
            self.rot = self.rot_max;
        } else {
            self.rot = (self.rot + self.vel_rot).clamp(self.rot_min, self.rot_max);
        }
    }

    fn prev_cx(&self) -> f64 {
        self.prev_x + self.body.w() / 2.0
    }

    /// True on the tick the player's centre passes the pipe's right edge.
    pub fn crossed(&self, pipe: &Pipe) -> bool {
        let before = self.prev_cx() - pipe.prev_trailing_edge();
        let now = self.body.cx() - pipe.trailing_edge();
        before < 0.0 && now >= 0.0
    }

    /// Floor contact, or a pixel hit on any pipe. Records what was hit.
    pub fn collided(&mut self, pipes: &PipeField, floor: &Floor) -> bool {
        if self.body.rect().bottom() >= floor.y() {
            self.crash_cause = Some(CrashCause::Floor);
            return true;
        }
        let rect = self.body.rect();
        for pipe in pipes.lower().chain(pipes.upper()) {
            let p = pipe.body().rect();
            if rect.right() < p.x || rect.x > p.right() {
                continue;
            }
            if self.collides_with(pipe) {
                self.crash_cause = Some(CrashCause::Pipe);
                return true;
            }
        }
        false
    }

    /// Resting on the ground, within a pixel.
    pub fn landed(&self, floor: &Floor) -> bool {
        self.body.rect().bottom() >= floor.y() - 1.0
    }
}

impl Entity for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn tick(&mut self) {
        self.prev_x = self.body.x;
        self.animate();
        match self.mode {
            PlayerMode::ShmIdle => self.tick_shm(),
            PlayerMode::Normal => self.tick_normal(),
            PlayerMode::Crash => self.tick_crash(),
        }
    }

    fn render(&self, renderer: &mut dyn Renderer) {
        if let Some(image) = self.body.sprite() {
            renderer.draw_image(&image.rotated(self.rot), self.body.x, self.body.y);
        }
        self.body.render_debug(renderer);
    }
}
