//! The entity set that lives for one splash, play and game-over cycle.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::debug;

use crate::assets::Sprites;
use crate::entities::{Background, Floor, Message, PipeField, Player, Score};
use crate::entity::Entity;
use crate::error::GameError;
use crate::render::Renderer;
use crate::window::Window;

pub struct Session {
    pub background: Background,
    pub floor: Floor,
    pub player: Player,
    pub pipes: PipeField,
    pub score: Score,
    pub welcome: Message,
    pub game_over: Message,
}

impl Session {
    /// Builds every entity up front. Fails before anything is drawn when
    /// an asset is unusable or the pipe gap cannot fit.
    pub fn new(window: &Window, sprites: &Sprites, rng: &mut StdRng) -> Result<Self, GameError> {
        sprites.validate()?;
        let pipes = PipeField::new(window, sprites, StdRng::seed_from_u64(rng.next_u64()))?;
        debug!(
            width = window.width(),
            height = window.height(),
            pipes = pipes.len(),
            "session_built"
        );
        Ok(Session {
            background: Background::new(sprites),
            floor: Floor::new(window, sprites),
            player: Player::new(window, sprites),
            pipes,
            score: Score::new(window, sprites),
            welcome: Message::welcome(window, sprites),
            game_over: Message::game_over(window, sprites),
        })
    }

    /// Scrolls pipes and ground, then moves the player.
    pub fn advance(&mut self) {
        self.floor.tick();
        self.pipes.tick();
        self.player.tick();
    }

    /// Points scored this tick.
    pub fn score_crossings(&mut self) -> u32 {
        let crossed = self
            .pipes
            .upper()
            .filter(|pipe| self.player.crossed(pipe))
            .count() as u32;
        for _ in 0..crossed {
            self.score.add();
        }
        crossed
    }

    /// Hovering bird over the welcome banner.
    pub fn draw_splash(&self, renderer: &mut dyn Renderer) {
        self.background.render(renderer);
        self.floor.render(renderer);
        self.player.render(renderer);
        self.welcome.render(renderer);
    }

    pub fn draw_play(&self, renderer: &mut dyn Renderer) {
        self.background.render(renderer);
        self.pipes.render(renderer);
        self.floor.render(renderer);
        self.score.render(renderer);
        self.player.render(renderer);
    }

    pub fn draw_game_over(&self, renderer: &mut dyn Renderer) {
        self.draw_play(renderer);
        self.game_over.render(renderer);
    }
}
